//! Shared morph state and the discrete events that mutate it

mod morph;
mod router;

pub use morph::{Layout, MorphState, Overlay};
pub use router::{InteractionRouter, Transition, UiEvent};
