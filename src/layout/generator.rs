use std::f32::consts::{PI, TAU};
use crate::config::LayoutConfig;
use crate::data::{PaletteColor, Particle, ParticleRole, ParticleShape};
use crate::math::Vec3;

/// Role-dependent attributes chosen for one index
#[derive(Debug, Clone)]
struct Attributes {
    role: ParticleRole,
    shape: ParticleShape,
    color: PaletteColor,
    scale: f32,
    texture_url: Option<String>,
}

/// Particle layout generator
pub struct LayoutGenerator {
    pub config: LayoutConfig,
    rng: fastrand::Rng,
}

impl LayoutGenerator {
    /// Generator drawing from an unseeded random source
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// Make the generated dataset reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Number of particles `generate` actually produces
    pub fn working_count(&self) -> usize {
        self.config.working_count
    }

    /// Generate the particle dataset.
    ///
    /// The dataset always holds `working_count` particles. A smaller request
    /// would leave gaps in the spiral, so the request is only reported.
    pub fn generate(&mut self, requested_count: usize) -> Vec<Particle> {
        let total = self.config.working_count;
        if requested_count != total {
            log::debug!(
                "requested {} particles, generating working count {}",
                requested_count,
                total
            );
        }

        let particles: Vec<Particle> = (0..total).map(|i| self.generate_particle(i, total)).collect();

        log::info!(
            "generated {} particles ({} photos)",
            particles.len(),
            particles.iter().filter(|p| p.is_photo()).count()
        );
        particles
    }

    fn generate_particle(&mut self, index: usize, total: usize) -> Particle {
        let t = index as f32 / total as f32;
        let attributes = self.assign_attributes(index);

        let jitter = self.random_range(self.config.radial_jitter_min, self.config.radial_jitter_max);
        let tree_position = self.tree_position(t, jitter);

        let scatter_radius = self.random_range(self.config.scatter_radius_min, self.config.scatter_radius_max);
        let scatter_position = scatter_direction(index, total).scale(scatter_radius);

        let initial_rotation = Vec3::new(self.rng.f32() * PI, self.rng.f32() * PI, 0.0);
        let phase = self.rng.f32() * TAU;
        let speed = self.random_range(0.8, 1.4);

        debug_assert!(tree_position.is_finite() && scatter_position.is_finite());

        Particle {
            id: index,
            role: attributes.role,
            shape: attributes.shape,
            tree_position,
            scatter_position,
            scale: attributes.scale,
            color: attributes.color,
            texture_url: attributes.texture_url,
            phase,
            speed,
            initial_rotation,
        }
    }

    /// Photos occupy the leading slots; everything after is an ornament tier
    fn assign_attributes(&mut self, index: usize) -> Attributes {
        let cfg = &self.config;

        if index < cfg.photo_slots {
            let (role, url) = if index == 0 {
                (ParticleRole::CluePhoto, self.photo_url(cfg.clue_photo_id, 600, 700))
            } else if index < cfg.brand_slots_end {
                let id = cfg.brand_photo_ids[index % cfg.brand_photo_ids.len()];
                (ParticleRole::BrandPhoto, self.photo_url(id, 500, 500))
            } else {
                let id = cfg.seasonal_photo_ids[index % cfg.seasonal_photo_ids.len()];
                (ParticleRole::SeasonalPhoto, self.photo_url(id, 500, 500))
            };

            return Attributes {
                role,
                shape: ParticleShape::Plane,
                color: PaletteColor::Gold,
                scale: cfg.photo_scale,
                texture_url: Some(url),
            };
        }

        let (star_threshold, gift_threshold) = (cfg.star_threshold, cfg.gift_threshold);
        let draw = self.rng.f32();

        if draw > star_threshold {
            Attributes {
                role: ParticleRole::Star,
                shape: ParticleShape::Octahedron,
                color: PaletteColor::Champagne,
                scale: self.random_range(0.8, 1.2),
                texture_url: None,
            }
        } else if draw > gift_threshold {
            let color = if self.rng.f32() > 0.5 {
                PaletteColor::DeepRed
            } else {
                PaletteColor::BrandOrange
            };
            Attributes {
                role: ParticleRole::Gift,
                shape: ParticleShape::Cube,
                color,
                scale: self.random_range(1.2, 1.6),
                texture_url: None,
            }
        } else {
            let color_draw = self.rng.f32();
            let color = if color_draw > 0.5 {
                PaletteColor::Gold
            } else if color_draw > 0.2 {
                PaletteColor::Emerald
            } else if color_draw > 0.1 {
                PaletteColor::DeepRed
            } else {
                PaletteColor::BrandOrange
            };
            Attributes {
                role: ParticleRole::Ornament,
                shape: ParticleShape::Sphere,
                color,
                scale: self.random_range(1.0, 1.8),
                texture_url: None,
            }
        }
    }

    /// Spiral radius at parameter `t`; concave, so the base flares out quickly
    pub fn tree_radius(&self, t: f32) -> f32 {
        t.clamp(0.0, 1.0).powf(self.config.radius_exponent) * self.config.radius_bottom
    }

    /// Point on the spiral at parameter `t` with multiplicative radial jitter
    pub fn tree_position(&self, t: f32, jitter: f32) -> Vec3 {
        let cfg = &self.config;
        let y = (1.0 - t) * cfg.height + cfg.y_offset;
        let radius = self.tree_radius(t) * jitter;
        let angle = t * TAU * cfg.turns;
        Vec3::on_ring(angle, radius, y)
    }

    fn photo_url(&self, id: u32, width: u32, height: u32) -> String {
        format!("{}/id/{}/{}/{}", self.config.photo_base_url, id, width, height)
    }

    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }
}

/// Unit direction of `index` on an equal-area spiral over the sphere
pub fn scatter_direction(index: usize, total: usize) -> Vec3 {
    let phi = (-1.0 + 2.0 * index as f32 / total as f32).clamp(-1.0, 1.0).acos();
    let theta = (total as f32 * PI).sqrt() * phi;
    Vec3::new(
        theta.cos() * phi.sin(),
        theta.sin() * phi.sin(),
        phi.cos(),
    )
}
