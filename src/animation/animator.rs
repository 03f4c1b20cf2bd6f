//! Per-frame particle morph
//!
//! Each tick moves a particle's smoothed base position toward its current
//! layout target, then layers secondary motion on the output:
//! - swirl around the spiral while the tree is formed
//! - idle bob
//! - spin for solids, camera billboarding for photos
//! - emissive pulsing for the small light particles

use crate::config::MotionConfig;
use crate::data::Particle;
use crate::math::{Mat4, Quat, Vec3};
use crate::state::Layout;

/// Live state of one particle, carried between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleMotion {
    /// Smoothed position before secondary offsets
    pub base: Vec3,
    /// Accumulated Euler spin for solids
    pub spin: Vec3,
    pub orientation: Quat,
}

impl ParticleMotion {
    /// Particles start at their scatter point so the first frames form the tree
    pub fn new(particle: &Particle) -> Self {
        Self {
            base: particle.scatter_position,
            spin: particle.initial_rotation,
            orientation: Quat::from_euler_xyz(particle.initial_rotation),
        }
    }
}

/// Per-frame inputs shared by every particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub layout: Layout,
    /// Seconds since start
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    pub camera_position: Vec3,
    pub hovered: Option<usize>,
}

/// What the renderer draws for one particle this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTransform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub emissive: f32,
}

impl ParticleTransform {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.orientation, self.scale)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleAnimator {
    pub config: MotionConfig,
}

impl ParticleAnimator {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Exponential smoothing factor for this frame
    fn step(&self, particle: &Particle, layout: Layout, delta: f32) -> f32 {
        let rate = match layout {
            Layout::Tree => self.config.form_rate * particle.speed,
            Layout::Scattered => self.config.scatter_rate,
        };
        (rate * delta.max(0.0)).min(1.0)
    }

    /// Advance one particle by one frame
    pub fn update(
        &self,
        particle: &Particle,
        motion: &mut ParticleMotion,
        ctx: &FrameContext,
    ) -> ParticleTransform {
        let cfg = &self.config;
        let target = particle.target(ctx.layout.is_scattered());
        debug_assert!(target.is_finite(), "particle {} has a non-finite target", particle.id);

        let step = self.step(particle, ctx.layout, ctx.delta);
        motion.base += (target - motion.base) * step;

        let mut position = motion.base;
        if ctx.layout == Layout::Tree {
            let angle = ctx.time * cfg.swirl_frequency + particle.id as f32;
            position += Vec3::on_ring(angle, cfg.swirl_radius, 0.0);
        }
        position.y += (ctx.time * particle.speed + particle.phase).sin() * cfg.float_amplitude;

        if particle.is_photo() {
            let facing = Quat::look_toward(ctx.camera_position - position, Vec3::UP);
            motion.orientation = motion.orientation.slerp(&facing, cfg.billboard_smoothing);
        } else {
            motion.spin.x += ctx.delta * cfg.spin_rate_x * particle.speed;
            motion.spin.y += ctx.delta * cfg.spin_rate_y * particle.speed;
            motion.orientation = Quat::from_euler_xyz(motion.spin);
        }

        ParticleTransform {
            position,
            orientation: motion.orientation,
            scale: particle.scale,
            emissive: self.emissive(particle, ctx),
        }
    }

    /// Lights pulse regardless of hover; hover only lifts the larger solids
    pub fn emissive(&self, particle: &Particle, ctx: &FrameContext) -> f32 {
        let cfg = &self.config;
        if particle.is_photo() {
            return cfg.photo_frame_emissive;
        }
        if particle.scale < cfg.light_scale_threshold {
            let wave = (ctx.time * cfg.light_frequency + particle.id as f32).sin() * 0.5 + 0.5;
            cfg.light_base + cfg.light_amplitude * wave
        } else if ctx.hovered == Some(particle.id) {
            cfg.hover_emissive
        } else {
            cfg.base_emissive
        }
    }

    /// Advance every particle. Particles never read each other's state.
    pub fn update_all(
        &self,
        particles: &[Particle],
        motions: &mut [ParticleMotion],
        ctx: &FrameContext,
    ) -> Vec<ParticleTransform> {
        debug_assert_eq!(particles.len(), motions.len());
        particles
            .iter()
            .zip(motions.iter_mut())
            .map(|(particle, motion)| self.update(particle, motion, ctx))
            .collect()
    }
}
