use std::collections::VecDeque;

use particle_tree_morph::config::SceneConfig;
use particle_tree_morph::data::ParticleRole;
use particle_tree_morph::gesture::{
    CancellationToken, Classification, GestureBridge, GestureClassifier, GestureOutcome, GesturePoller,
    PollResult, VisionError,
};
use particle_tree_morph::math::Vec3;
use particle_tree_morph::scene::TreeScene;
use particle_tree_morph::state::{Layout, Overlay, Transition, UiEvent};

/// Classifier that returns a fixed sequence of results
struct ReplayClassifier {
    results: VecDeque<Vec<Classification>>,
}

impl GestureClassifier for ReplayClassifier {
    fn is_frame_ready(&self) -> bool {
        true
    }

    fn recognize(&mut self, _timestamp_ms: f64) -> Result<Vec<Classification>, VisionError> {
        Ok(self.results.pop_front().unwrap_or_default())
    }
}

fn scene() -> TreeScene {
    TreeScene::new(&SceneConfig::default(), 2024)
}

fn poller(results: Vec<Vec<Classification>>) -> GesturePoller<ReplayClassifier> {
    let config = SceneConfig::default();
    let mut poller = GesturePoller::new(GestureBridge::from_config(&config.gesture), CancellationToken::new());
    poller.slot_mut().begin_loading();
    poller.slot_mut().finish(Ok(ReplayClassifier {
        results: results.into(),
    }));
    poller
}

#[test]
fn test_generates_working_count_with_clue_first() {
    let scene = scene();
    assert_eq!(scene.particles().len(), 450);
    assert_eq!(scene.particles()[0].role, ParticleRole::CluePhoto);
    assert_eq!(
        scene.particles().iter().filter(|p| p.role == ParticleRole::CluePhoto).count(),
        1
    );
}

#[test]
fn test_controls_locked_until_permission() {
    let scene = scene();
    assert_eq!(scene.dispatch(UiEvent::PressStart), Transition::Ignored);
    assert_eq!(scene.dispatch(UiEvent::Tap(0)), Transition::Ignored);
    assert_eq!(scene.layout(), Layout::Tree);
    assert_eq!(scene.state().borrow().overlay(), Overlay::None);

    assert_eq!(scene.dispatch(UiEvent::GrantPermission), Transition::Applied);
    assert_eq!(scene.dispatch(UiEvent::Tap(0)), Transition::Applied);
    assert_eq!(scene.state().borrow().overlay(), Overlay::PhotoSelected(0));
}

#[test]
fn test_press_scatters_and_release_reforms() {
    let mut scene = scene();
    let camera = Vec3::new(0.0, 5.0, 60.0);
    assert_eq!(scene.layout(), Layout::Tree);
    scene.dispatch(UiEvent::GrantPermission);

    assert_eq!(scene.dispatch(UiEvent::PressStart), Transition::Applied);
    assert_eq!(scene.layout(), Layout::Scattered);
    for _ in 0..300 {
        scene.tick(1.0 / 60.0, camera);
    }
    let scattered = &scene.transforms()[5];
    assert!((scattered.position - scene.particles()[5].scatter_position).length() < 0.5);

    assert_eq!(scene.dispatch(UiEvent::PressEnd), Transition::Applied);
    assert_eq!(scene.layout(), Layout::Tree);
}

#[test]
fn test_clue_photo_leads_to_reward() {
    let scene = scene();
    scene.dispatch(UiEvent::GrantPermission);
    let state = scene.state();

    assert_eq!(scene.dispatch(UiEvent::Tap(0)), Transition::Applied);
    assert_eq!(state.borrow().selected(), Some(0));
    assert_eq!(state.borrow().overlay(), Overlay::PhotoSelected(0));

    assert_eq!(scene.dispatch(UiEvent::StartSelfie), Transition::Applied);
    assert!(state.borrow().selfie_active());
    assert_eq!(state.borrow().selected(), None);

    assert_eq!(scene.dispatch(UiEvent::Reward), Transition::Applied);
    assert!(state.borrow().reward_active());
    assert_eq!(state.borrow().overlay(), Overlay::Reward);
}

#[test]
fn test_low_confidence_gesture_keeps_tree() {
    let scene = scene();
    scene.dispatch(UiEvent::GrantPermission);
    let state = scene.state();
    let mut poller = poller(vec![vec![Classification::new("Open_Palm", 0.4)]]);

    let result = poller.tick(&mut state.borrow_mut(), 16.0);
    assert_eq!(result, PollResult::Observed(GestureOutcome::BelowThreshold));
    assert_eq!(scene.layout(), Layout::Tree);
}

#[test]
fn test_confident_gesture_scatters_until_fist() {
    let scene = scene();
    scene.dispatch(UiEvent::GrantPermission);
    let state = scene.state();
    let mut poller = poller(vec![
        vec![Classification::new("Open_Palm", 0.9)],
        vec![Classification::new("Open_Palm", 0.88)],
        vec![Classification::new("Closed_Fist", 0.7)],
    ]);

    assert_eq!(
        poller.tick(&mut state.borrow_mut(), 16.0),
        PollResult::Observed(GestureOutcome::Switched(Layout::Scattered))
    );
    assert_eq!(
        poller.tick(&mut state.borrow_mut(), 32.0),
        PollResult::Observed(GestureOutcome::Unchanged)
    );
    assert_eq!(
        poller.tick(&mut state.borrow_mut(), 48.0),
        PollResult::Observed(GestureOutcome::Switched(Layout::Tree))
    );
    assert_eq!(poller.bridge().last_gesture(), "Closed_Fist");
}

#[test]
fn test_gestures_ignored_while_photo_open() {
    let scene = scene();
    scene.dispatch(UiEvent::GrantPermission);
    scene.dispatch(UiEvent::Tap(0));
    let state = scene.state();
    let mut poller = poller(vec![vec![Classification::new("Open_Palm", 0.95)]]);

    assert_eq!(poller.tick(&mut state.borrow_mut(), 16.0), PollResult::Suspended);
    assert_eq!(scene.layout(), Layout::Tree);
}

#[test]
fn test_cancelled_poller_stops() {
    let scene = scene();
    scene.dispatch(UiEvent::GrantPermission);
    let state = scene.state();
    let mut poller = poller(vec![vec![Classification::new("Open_Palm", 0.95)]]);

    poller.token().cancel();
    let result = poller.tick(&mut state.borrow_mut(), 16.0);
    assert_eq!(result, PollResult::Stopped);
    assert!(!result.should_requeue());
    assert_eq!(scene.layout(), Layout::Tree);
}
