use serde::{Deserialize, Serialize};

/// Which target set every particle is moving toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
    #[default]
    Tree,
    Scattered,
}

impl Layout {
    pub fn is_scattered(&self) -> bool {
        *self == Layout::Scattered
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Tree => "tree",
            Layout::Scattered => "scattered",
        }
    }
}

/// Overlay currently covering the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    PhotoSelected(usize),
    Selfie,
    Reward,
}

impl Overlay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overlay::None => "none",
            Overlay::PhotoSelected(_) => "photo",
            Overlay::Selfie => "selfie",
            Overlay::Reward => "reward",
        }
    }
}

/// Single source of truth for the layout target and overlay flow.
///
/// Fields are private so every write goes through a method that keeps the
/// overlay invariants: entering the selfie clears the selected photo, and the
/// reward is only reachable from the selfie.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MorphState {
    layout: Layout,
    permission_granted: bool,
    selected: Option<usize>,
    selfie_active: bool,
    reward_active: bool,
}

impl MorphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selfie_active(&self) -> bool {
        self.selfie_active
    }

    pub fn reward_active(&self) -> bool {
        self.reward_active
    }

    pub fn overlay(&self) -> Overlay {
        if self.reward_active {
            Overlay::Reward
        } else if self.selfie_active {
            Overlay::Selfie
        } else if let Some(id) = self.selected {
            Overlay::PhotoSelected(id)
        } else {
            Overlay::None
        }
    }

    /// True while a modal, the selfie view or the reward view covers the scene
    pub fn overlay_active(&self) -> bool {
        self.overlay() != Overlay::None
    }

    /// Returns whether the layout changed
    pub fn set_layout(&mut self, layout: Layout) -> bool {
        if self.layout == layout {
            return false;
        }
        log::debug!("layout {} -> {}", self.layout.as_str(), layout.as_str());
        self.layout = layout;
        true
    }

    pub fn grant_permission(&mut self) -> bool {
        if self.permission_granted {
            return false;
        }
        self.permission_granted = true;
        true
    }

    pub(crate) fn select(&mut self, id: usize) {
        self.selected = Some(id);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) fn enter_selfie(&mut self) {
        self.selected = None;
        self.selfie_active = true;
    }

    pub(crate) fn enter_reward(&mut self) {
        debug_assert!(self.selfie_active);
        self.selfie_active = false;
        self.reward_active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = MorphState::new();
        assert_eq!(state.layout(), Layout::Tree);
        assert!(!state.permission_granted());
        assert_eq!(state.overlay(), Overlay::None);
    }

    #[test]
    fn test_set_layout_reports_change() {
        let mut state = MorphState::new();
        assert!(state.set_layout(Layout::Scattered));
        assert!(!state.set_layout(Layout::Scattered));
        assert!(state.set_layout(Layout::Tree));
    }

    #[test]
    fn test_selfie_clears_selection() {
        let mut state = MorphState::new();
        state.select(0);
        assert_eq!(state.overlay(), Overlay::PhotoSelected(0));
        state.enter_selfie();
        assert_eq!(state.selected(), None);
        assert_eq!(state.overlay(), Overlay::Selfie);
    }

    #[test]
    fn test_reward_overrides_other_overlays() {
        let mut state = MorphState::new();
        state.enter_selfie();
        state.enter_reward();
        assert!(state.reward_active());
        assert_eq!(state.overlay(), Overlay::Reward);
    }

    #[test]
    fn test_layout_serde_names() {
        let yaml = serde_yaml::to_string(&Layout::Scattered).unwrap();
        assert_eq!(yaml.trim(), "Scattered");
    }
}
