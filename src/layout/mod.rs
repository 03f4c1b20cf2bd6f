//! Procedural particle layouts
//!
//! Builds the immutable particle dataset: a spiral "tree" target and a
//! spherical "scatter" target per particle, plus role and visual attributes.

mod generator;

pub use generator::{LayoutGenerator, scatter_direction};
