//! Animation module for the tree/scatter morph
//!
//! Moves every particle toward its current layout target once per frame,
//! with idle float, swirl, billboarding and light pulsing layered on top.

mod animator;

pub use animator::{FrameContext, ParticleAnimator, ParticleMotion, ParticleTransform};
