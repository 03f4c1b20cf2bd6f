use std::collections::HashMap;

use crate::config::{GestureConfig, GestureRule};
use crate::state::{Layout, MorphState};
use super::Classification;

/// Category to layout table. Several categories may share a target.
#[derive(Debug, Clone, Default)]
pub struct GestureMapping {
    targets: HashMap<String, Layout>,
}

impl GestureMapping {
    pub fn from_rules(rules: &[GestureRule]) -> Self {
        let targets = rules
            .iter()
            .map(|rule| (rule.category.clone(), rule.layout))
            .collect();
        Self { targets }
    }

    pub fn target(&self, category: &str) -> Option<Layout> {
        self.targets.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Result of feeding one classification into the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Permission missing or an overlay covers the scene
    Suspended,
    NoHand,
    BelowThreshold,
    /// Confident, but the category has no mapping
    Unmapped,
    /// Mapped to the layout already in place
    Unchanged,
    Switched(Layout),
}

/// Translates confident hand poses into layout changes
#[derive(Debug, Clone)]
pub struct GestureBridge {
    threshold: f32,
    mapping: GestureMapping,
    last_gesture: String,
}

impl GestureBridge {
    pub fn new(threshold: f32, mapping: GestureMapping) -> Self {
        Self {
            threshold,
            mapping,
            last_gesture: "None".to_string(),
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.confidence_threshold, GestureMapping::from_rules(&config.rules))
    }

    /// Last confident category, or "None" once the hand leaves the frame
    pub fn last_gesture(&self) -> &str {
        &self.last_gesture
    }

    /// Gesture input only counts once the camera is granted and no overlay is up
    pub fn is_active(state: &MorphState) -> bool {
        state.permission_granted() && !state.overlay_active()
    }

    /// Apply the top-ranked classification of one poll.
    ///
    /// Level-triggered: the same confident pose seen on every poll writes the
    /// layout once and reports `Unchanged` afterwards.
    pub fn observe(&mut self, top: Option<&Classification>, state: &mut MorphState) -> GestureOutcome {
        if !Self::is_active(state) {
            return GestureOutcome::Suspended;
        }

        let Some(top) = top else {
            self.last_gesture = "None".to_string();
            return GestureOutcome::NoHand;
        };

        if top.score <= self.threshold {
            return GestureOutcome::BelowThreshold;
        }

        if self.last_gesture != top.category {
            self.last_gesture = top.category.clone();
        }

        match self.mapping.target(&top.category) {
            None => GestureOutcome::Unmapped,
            Some(layout) => {
                if state.set_layout(layout) {
                    log::debug!("gesture {} ({:.2}) -> {}", top.category, top.score, layout.as_str());
                    GestureOutcome::Switched(layout)
                } else {
                    GestureOutcome::Unchanged
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PaletteColor, Particle, ParticleRole, ParticleShape};
    use crate::math::Vec3;
    use crate::state::{InteractionRouter, UiEvent};

    fn bridge() -> GestureBridge {
        GestureBridge::from_config(&GestureConfig::default())
    }

    fn granted() -> MorphState {
        let mut state = MorphState::new();
        state.grant_permission();
        state
    }

    fn sample(category: &str, score: f32) -> Classification {
        Classification::new(category, score)
    }

    #[test]
    fn test_default_mapping() {
        let mapping = GestureMapping::from_rules(&GestureConfig::default().rules);
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.target("Open_Palm"), Some(Layout::Scattered));
        assert_eq!(mapping.target("Victory"), Some(Layout::Scattered));
        assert_eq!(mapping.target("Closed_Fist"), Some(Layout::Tree));
        assert_eq!(mapping.target("Thumb_Up"), Some(Layout::Tree));
        assert_eq!(mapping.target("Pointing_Up"), None);
    }

    #[test]
    fn test_below_threshold_never_changes_layout() {
        let mut bridge = bridge();
        let mut state = granted();
        for score in [0.1, 0.4, 0.59, 0.6] {
            let outcome = bridge.observe(Some(&sample("Open_Palm", score)), &mut state);
            assert_eq!(outcome, GestureOutcome::BelowThreshold);
        }
        assert_eq!(state.layout(), Layout::Tree);
        assert_eq!(bridge.last_gesture(), "None");
    }

    #[test]
    fn test_repeated_open_palm_switches_once() {
        let mut bridge = bridge();
        let mut state = granted();
        let palm = sample("Open_Palm", 0.9);
        let outcomes: Vec<_> = (0..5).map(|_| bridge.observe(Some(&palm), &mut state)).collect();
        assert_eq!(outcomes[0], GestureOutcome::Switched(Layout::Scattered));
        assert!(outcomes[1..].iter().all(|o| *o == GestureOutcome::Unchanged));
        assert_eq!(state.layout(), Layout::Scattered);
        assert_eq!(bridge.last_gesture(), "Open_Palm");
    }

    #[test]
    fn test_fist_returns_to_tree() {
        let mut bridge = bridge();
        let mut state = granted();
        bridge.observe(Some(&sample("Victory", 0.8)), &mut state);
        let outcome = bridge.observe(Some(&sample("Closed_Fist", 0.7)), &mut state);
        assert_eq!(outcome, GestureOutcome::Switched(Layout::Tree));
    }

    #[test]
    fn test_unmapped_category_is_ignored() {
        let mut bridge = bridge();
        let mut state = granted();
        let outcome = bridge.observe(Some(&sample("Pointing_Up", 0.95)), &mut state);
        assert_eq!(outcome, GestureOutcome::Unmapped);
        assert_eq!(state.layout(), Layout::Tree);
        assert_eq!(bridge.last_gesture(), "Pointing_Up");
    }

    #[test]
    fn test_no_hand_resets_label() {
        let mut bridge = bridge();
        let mut state = granted();
        bridge.observe(Some(&sample("Thumb_Up", 0.9)), &mut state);
        assert_eq!(bridge.observe(None, &mut state), GestureOutcome::NoHand);
        assert_eq!(bridge.last_gesture(), "None");
        assert_eq!(state.layout(), Layout::Tree);
    }

    #[test]
    fn test_suspended_without_permission() {
        let mut bridge = bridge();
        let mut state = MorphState::new();
        let outcome = bridge.observe(Some(&sample("Open_Palm", 0.99)), &mut state);
        assert_eq!(outcome, GestureOutcome::Suspended);
        assert_eq!(state.layout(), Layout::Tree);
    }

    fn clue_photo() -> Vec<Particle> {
        vec![Particle {
            id: 0,
            role: ParticleRole::CluePhoto,
            shape: ParticleShape::Plane,
            tree_position: Vec3::ZERO,
            scatter_position: Vec3::new(0.0, 40.0, 0.0),
            scale: 3.0,
            color: PaletteColor::Gold,
            texture_url: Some("https://example.test/433".to_string()),
            phase: 0.0,
            speed: 1.0,
            initial_rotation: Vec3::ZERO,
        }]
    }

    #[test]
    fn test_suspended_while_photo_open() {
        let particles = clue_photo();
        let mut bridge = bridge();
        let mut state = granted();
        InteractionRouter::dispatch(&mut state, &particles, UiEvent::Tap(0));

        let palm = sample("Open_Palm", 0.9);
        assert_eq!(bridge.observe(Some(&palm), &mut state), GestureOutcome::Suspended);
        assert_eq!(state.layout(), Layout::Tree);

        InteractionRouter::dispatch(&mut state, &particles, UiEvent::ClosePhoto);
        assert_eq!(
            bridge.observe(Some(&palm), &mut state),
            GestureOutcome::Switched(Layout::Scattered)
        );
    }

    #[test]
    fn test_suspended_during_selfie_and_reward() {
        let particles = clue_photo();
        let mut bridge = bridge();
        let mut state = granted();
        let palm = sample("Open_Palm", 0.95);

        InteractionRouter::dispatch(&mut state, &particles, UiEvent::Tap(0));
        InteractionRouter::dispatch(&mut state, &particles, UiEvent::StartSelfie);
        assert!(state.selfie_active());
        assert_eq!(bridge.observe(Some(&palm), &mut state), GestureOutcome::Suspended);
        assert_eq!(state.layout(), Layout::Tree);

        InteractionRouter::dispatch(&mut state, &particles, UiEvent::Reward);
        assert!(state.reward_active());
        assert_eq!(bridge.observe(Some(&palm), &mut state), GestureOutcome::Suspended);
        assert_eq!(state.layout(), Layout::Tree);
    }

    #[test]
    fn test_manual_and_gesture_share_targets() {
        let mut bridge = bridge();
        let mut state = granted();
        InteractionRouter::dispatch(&mut state, &[], UiEvent::PressStart);
        let outcome = bridge.observe(Some(&sample("Open_Palm", 0.9)), &mut state);
        assert_eq!(outcome, GestureOutcome::Unchanged);
        bridge.observe(Some(&sample("Closed_Fist", 0.9)), &mut state);
        assert_eq!(state.layout(), Layout::Tree);
    }
}
