use crate::data::Particle;
use super::{Layout, MorphState};

/// Discrete input from the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    GrantPermission,
    /// Manual control pressed (mouse or touch)
    PressStart,
    PressEnd,
    /// Tap on the particle with this id
    Tap(usize),
    ClosePhoto,
    StartSelfie,
    Reward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    fn from_changed(changed: bool) -> Self {
        if changed {
            Transition::Applied
        } else {
            Transition::Ignored
        }
    }

    pub fn is_applied(&self) -> bool {
        *self == Transition::Applied
    }
}

/// Applies UI events to the morph state.
///
/// Press and tap are ignored until permission is granted.
/// Manual press input is level-triggered and shares its targets with the
/// gesture bridge, so whichever writer ran last before a frame wins.
pub struct InteractionRouter;

impl InteractionRouter {
    pub fn dispatch(state: &mut MorphState, particles: &[Particle], event: UiEvent) -> Transition {
        let result = match event {
            UiEvent::GrantPermission => Transition::from_changed(state.grant_permission()),
            UiEvent::PressStart | UiEvent::PressEnd | UiEvent::Tap(_) if !state.permission_granted() => {
                Transition::Ignored
            }
            UiEvent::PressStart => Transition::from_changed(state.set_layout(Layout::Scattered)),
            UiEvent::PressEnd => Transition::from_changed(state.set_layout(Layout::Tree)),
            UiEvent::Tap(id) => Self::tap(state, particles, id),
            UiEvent::ClosePhoto => {
                if state.selected().is_some() && !state.selfie_active() && !state.reward_active() {
                    state.clear_selection();
                    Transition::Applied
                } else {
                    Transition::Ignored
                }
            }
            UiEvent::StartSelfie => {
                let clue_selected = state
                    .selected()
                    .and_then(|id| particles.get(id))
                    .map_or(false, |p| p.is_clue());
                if clue_selected && !state.selfie_active() && !state.reward_active() {
                    state.enter_selfie();
                    Transition::Applied
                } else {
                    Transition::Ignored
                }
            }
            UiEvent::Reward => {
                if state.selfie_active() {
                    state.enter_reward();
                    Transition::Applied
                } else {
                    Transition::Ignored
                }
            }
        };

        log::debug!("{:?} -> {:?} (overlay {})", event, result, state.overlay().as_str());
        result
    }

    fn tap(state: &mut MorphState, particles: &[Particle], id: usize) -> Transition {
        if state.overlay_active() {
            return Transition::Ignored;
        }
        match particles.get(id) {
            Some(particle) if particle.is_photo() => {
                state.select(id);
                Transition::Applied
            }
            _ => Transition::Ignored,
        }
    }
}
