//! Browser-independent core of the experience
//!
//! Owns the immutable particle dataset, the per-particle motion state and the
//! shared `MorphState`. The wasm engine drives it once per frame.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{FrameContext, ParticleAnimator, ParticleMotion, ParticleTransform};
use crate::config::SceneConfig;
use crate::data::Particle;
use crate::interaction::PickTarget;
use crate::layout::LayoutGenerator;
use crate::math::Vec3;
use crate::mesh::shapes;
use crate::state::{InteractionRouter, Layout, MorphState, Transition, UiEvent};

pub struct TreeScene {
    particles: Vec<Particle>,
    motions: Vec<ParticleMotion>,
    state: Rc<RefCell<MorphState>>,
    animator: ParticleAnimator,
    transforms: Vec<ParticleTransform>,
    hovered: Option<usize>,
    time: f32,
}

impl TreeScene {
    /// Generate the dataset once; it never changes afterwards
    pub fn new(config: &SceneConfig, seed: u64) -> Self {
        let particles = LayoutGenerator::new(config.layout.clone())
            .with_seed(seed)
            .generate(config.requested_count);
        let motions = particles.iter().map(ParticleMotion::new).collect();

        Self {
            particles,
            motions,
            state: Rc::new(RefCell::new(MorphState::new())),
            animator: ParticleAnimator::new(config.motion.clone()),
            transforms: Vec::new(),
            hovered: None,
            time: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: usize) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Handle shared with the gesture loop
    pub fn state(&self) -> Rc<RefCell<MorphState>> {
        Rc::clone(&self.state)
    }

    pub fn layout(&self) -> Layout {
        self.state.borrow().layout()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn transforms(&self) -> &[ParticleTransform] {
        &self.transforms
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn set_hovered(&mut self, id: Option<usize>) {
        self.hovered = id.filter(|&id| id < self.particles.len());
    }

    /// Route a UI event into the shared state
    pub fn dispatch(&self, event: UiEvent) -> Transition {
        let mut state = self.state.borrow_mut();
        InteractionRouter::dispatch(&mut state, &self.particles, event)
    }

    /// Advance the clock and every particle by `delta` seconds
    pub fn tick(&mut self, delta: f32, camera_position: Vec3) -> &[ParticleTransform] {
        let delta = delta.max(0.0);
        self.time += delta;

        let ctx = FrameContext {
            layout: self.layout(),
            time: self.time,
            delta,
            camera_position,
            hovered: self.hovered,
        };
        self.transforms = self.animator.update_all(&self.particles, &mut self.motions, &ctx);
        &self.transforms
    }

    /// Bounding spheres at the last rendered positions
    pub fn pick_targets(&self) -> Vec<PickTarget> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, particle)| {
                let center = self
                    .transforms
                    .get(i)
                    .map_or(self.motions[i].base, |t| t.position);
                PickTarget {
                    particle_id: particle.id,
                    center,
                    radius: shapes::pick_radius(particle.shape) * particle.scale,
                }
            })
            .collect()
    }
}
