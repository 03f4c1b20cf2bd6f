//! Hand-gesture input
//!
//! Classifier results are polled once per animation frame and mapped onto the
//! same layout targets as the manual control. Everything here is optional:
//! any failure leaves the scene on manual input.

mod classifier;
mod bridge;
mod poll;
pub mod web;

pub use classifier::{Classification, ClassifierSlot, GestureClassifier, VisionError, VisionStatus};
pub use bridge::{GestureBridge, GestureMapping, GestureOutcome};
pub use poll::{CancellationToken, GesturePoller, PollResult};
