pub mod particle;

pub use particle::{Particle, ParticleRole, ParticleShape, PaletteColor};
