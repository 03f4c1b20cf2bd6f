use std::cell::Cell;
use std::rc::Rc;

use crate::state::MorphState;
use super::{ClassifierSlot, GestureBridge, GestureClassifier, GestureOutcome, VisionStatus};

/// Shared stop flag for the repeating poll task
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// What one scheduled tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// Token cancelled; the task must not requeue
    Stopped,
    /// Gesture input disabled by permission or an overlay
    Suspended,
    /// Classifier not loaded or no camera frame yet
    NotReady,
    /// Frame not newer than the last one classified, or inference failed
    Skipped,
    Observed(GestureOutcome),
}

impl PollResult {
    pub fn should_requeue(&self) -> bool {
        *self != PollResult::Stopped
    }
}

/// One classification per tick against the latest frame.
///
/// Inference is never queued: a tick that cannot classify right away is
/// skipped and the next tick tries again.
#[derive(Debug)]
pub struct GesturePoller<C> {
    slot: ClassifierSlot<C>,
    bridge: GestureBridge,
    token: CancellationToken,
    last_timestamp: Option<f64>,
}

impl<C: GestureClassifier> GesturePoller<C> {
    pub fn new(bridge: GestureBridge, token: CancellationToken) -> Self {
        Self {
            slot: ClassifierSlot::NotRequested,
            bridge,
            token,
            last_timestamp: None,
        }
    }

    pub fn slot_mut(&mut self) -> &mut ClassifierSlot<C> {
        &mut self.slot
    }

    pub fn status(&self) -> VisionStatus {
        self.slot.status()
    }

    pub fn bridge(&self) -> &GestureBridge {
        &self.bridge
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn tick(&mut self, state: &mut MorphState, timestamp_ms: f64) -> PollResult {
        if self.token.is_cancelled() {
            return PollResult::Stopped;
        }
        if !GestureBridge::is_active(state) {
            return PollResult::Suspended;
        }
        let Some(classifier) = self.slot.get_mut() else {
            return PollResult::NotReady;
        };
        if !classifier.is_frame_ready() {
            return PollResult::NotReady;
        }
        // Video-mode classifiers reject timestamps that do not advance
        if self.last_timestamp.map_or(false, |last| timestamp_ms <= last) {
            return PollResult::Skipped;
        }
        self.last_timestamp = Some(timestamp_ms);

        match classifier.recognize(timestamp_ms) {
            Ok(ranked) => PollResult::Observed(self.bridge.observe(ranked.first(), state)),
            Err(e) => {
                log::warn!("{}", e);
                PollResult::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use crate::config::GestureConfig;
    use crate::gesture::{Classification, VisionError};
    use crate::state::Layout;

    /// Replays a scripted sequence of results
    struct ScriptedClassifier {
        frame_ready: bool,
        script: VecDeque<Result<Vec<Classification>, VisionError>>,
        calls: usize,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<Result<Vec<Classification>, VisionError>>) -> Self {
            Self {
                frame_ready: true,
                script: script.into(),
                calls: 0,
            }
        }
    }

    impl GestureClassifier for ScriptedClassifier {
        fn is_frame_ready(&self) -> bool {
            self.frame_ready
        }

        fn recognize(&mut self, _timestamp_ms: f64) -> Result<Vec<Classification>, VisionError> {
            self.calls += 1;
            self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn poller(script: Vec<Result<Vec<Classification>, VisionError>>) -> GesturePoller<ScriptedClassifier> {
        let mut poller = GesturePoller::new(
            GestureBridge::from_config(&GestureConfig::default()),
            CancellationToken::new(),
        );
        poller.slot_mut().begin_loading();
        poller.slot_mut().finish(Ok(ScriptedClassifier::new(script)));
        poller
    }

    fn granted() -> MorphState {
        let mut state = MorphState::new();
        state.grant_permission();
        state
    }

    fn palm(score: f32) -> Result<Vec<Classification>, VisionError> {
        Ok(vec![
            Classification::new("Open_Palm", score),
            Classification::new("Closed_Fist", 0.05),
        ])
    }

    #[test]
    fn test_not_ready_until_loaded() {
        let mut poller: GesturePoller<ScriptedClassifier> = GesturePoller::new(
            GestureBridge::from_config(&GestureConfig::default()),
            CancellationToken::new(),
        );
        let mut state = granted();
        assert_eq!(poller.tick(&mut state, 16.0), PollResult::NotReady);
        poller.slot_mut().begin_loading();
        assert_eq!(poller.status(), VisionStatus::Loading);
        assert_eq!(poller.tick(&mut state, 32.0), PollResult::NotReady);
    }

    #[test]
    fn test_top_ranked_result_drives_layout() {
        let mut poller = poller(vec![palm(0.9)]);
        let mut state = granted();
        let result = poller.tick(&mut state, 16.0);
        assert_eq!(result, PollResult::Observed(GestureOutcome::Switched(Layout::Scattered)));
        assert_eq!(state.layout(), Layout::Scattered);
    }

    #[test]
    fn test_below_threshold_sequence_keeps_tree() {
        let mut poller = poller(vec![palm(0.2), palm(0.4), palm(0.55)]);
        let mut state = granted();
        for frame in 1..=3 {
            poller.tick(&mut state, frame as f64 * 16.0);
        }
        assert_eq!(state.layout(), Layout::Tree);
    }

    #[test]
    fn test_stale_timestamp_skipped() {
        let mut poller = poller(vec![palm(0.9), palm(0.9)]);
        let mut state = granted();
        poller.tick(&mut state, 100.0);
        assert_eq!(poller.tick(&mut state, 100.0), PollResult::Skipped);
        assert_eq!(poller.slot_mut().get_mut().map(|c| c.calls), Some(1));
    }

    #[test]
    fn test_inference_error_is_skipped() {
        let mut poller = poller(vec![Err(VisionError::Inference("boom".to_string())), palm(0.9)]);
        let mut state = granted();
        assert_eq!(poller.tick(&mut state, 16.0), PollResult::Skipped);
        assert_eq!(state.layout(), Layout::Tree);
        assert!(matches!(poller.tick(&mut state, 32.0), PollResult::Observed(_)));
        assert_eq!(state.layout(), Layout::Scattered);
    }

    #[test]
    fn test_no_inference_while_suspended() {
        let mut poller = poller(vec![palm(0.9)]);
        let mut state = MorphState::new();
        assert_eq!(poller.tick(&mut state, 16.0), PollResult::Suspended);
        assert_eq!(poller.slot_mut().get_mut().map(|c| c.calls), Some(0));
    }

    #[test]
    fn test_frame_not_ready() {
        let mut poller = poller(vec![palm(0.9)]);
        if let Some(c) = poller.slot_mut().get_mut() {
            c.frame_ready = false;
        }
        let mut state = granted();
        assert_eq!(poller.tick(&mut state, 16.0), PollResult::NotReady);
    }

    #[test]
    fn test_cancelled_token_stops() {
        let mut poller = poller(vec![palm(0.9)]);
        let handle = poller.token().clone();
        handle.cancel();
        let mut state = granted();
        let result = poller.tick(&mut state, 16.0);
        assert_eq!(result, PollResult::Stopped);
        assert!(!result.should_requeue());
        assert_eq!(state.layout(), Layout::Tree);
    }

    #[test]
    fn test_empty_result_reports_no_hand() {
        let mut poller = poller(vec![Ok(Vec::new())]);
        let mut state = granted();
        assert_eq!(
            poller.tick(&mut state, 16.0),
            PollResult::Observed(GestureOutcome::NoHand)
        );
    }
}
