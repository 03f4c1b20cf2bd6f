use serde::{Deserialize, Serialize};
use crate::math::Vec3;

/// Categorical role of a particle in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleRole {
    Ornament,
    Gift,
    /// Small diamond accent
    Star,
    BrandPhoto,
    SeasonalPhoto,
    /// The single photo that unlocks the selfie flow
    CluePhoto,
}

impl ParticleRole {
    pub fn is_photo(&self) -> bool {
        matches!(
            self,
            ParticleRole::BrandPhoto | ParticleRole::SeasonalPhoto | ParticleRole::CluePhoto
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleRole::Ornament => "ornament",
            ParticleRole::Gift => "gift",
            ParticleRole::Star => "star",
            ParticleRole::BrandPhoto => "brand-photo",
            ParticleRole::SeasonalPhoto => "seasonal-photo",
            ParticleRole::CluePhoto => "clue-photo",
        }
    }
}

/// Geometry used to draw a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleShape {
    Sphere,
    Cube,
    Octahedron,
    /// Framed photo
    Plane,
}

/// Fixed luxury palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteColor {
    Gold,
    Champagne,
    Emerald,
    BrandOrange,
    DeepRed,
}

impl PaletteColor {
    pub fn hex(&self) -> &'static str {
        match self {
            PaletteColor::Gold => "#FFD700",
            PaletteColor::Champagne => "#FFFACD",
            PaletteColor::Emerald => "#006B3C",
            PaletteColor::BrandOrange => "#FF5500",
            PaletteColor::DeepRed => "#D00000",
        }
    }

    /// Color as 0..1 RGB for shaders
    pub fn rgb(&self) -> Vec3 {
        let (r, g, b) = match self {
            PaletteColor::Gold => (0xFF, 0xD7, 0x00),
            PaletteColor::Champagne => (0xFF, 0xFA, 0xCD),
            PaletteColor::Emerald => (0x00, 0x6B, 0x3C),
            PaletteColor::BrandOrange => (0xFF, 0x55, 0x00),
            PaletteColor::DeepRed => (0xD0, 0x00, 0x00),
        };
        Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// One generated unit of the tree. Immutable once the layout is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Index in the dataset; also seeds the particle's phase offsets
    pub id: usize,
    pub role: ParticleRole,
    pub shape: ParticleShape,
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub scale: f32,
    pub color: PaletteColor,
    /// Present exactly for photo particles
    pub texture_url: Option<String>,
    /// Bob phase offset in radians
    pub phase: f32,
    /// Speed multiplier for forming, bobbing and spinning
    pub speed: f32,
    /// Starting Euler rotation (x, y; z stays 0)
    pub initial_rotation: Vec3,
}

impl Particle {
    pub fn is_photo(&self) -> bool {
        self.shape == ParticleShape::Plane
    }

    pub fn is_clue(&self) -> bool {
        self.role == ParticleRole::CluePhoto
    }

    /// Target position for the given layout
    pub fn target(&self, scattered: bool) -> Vec3 {
        if scattered {
            self.scatter_position
        } else {
            self.tree_position
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(role: ParticleRole, shape: ParticleShape) -> Particle {
        Particle {
            id: 3,
            role,
            shape,
            tree_position: Vec3::new(1.0, 2.0, 3.0),
            scatter_position: Vec3::new(-40.0, 0.0, 0.0),
            scale: 1.0,
            color: PaletteColor::Gold,
            texture_url: None,
            phase: 0.0,
            speed: 1.0,
            initial_rotation: Vec3::ZERO,
        }
    }

    #[test]
    fn test_photo_roles() {
        assert!(ParticleRole::CluePhoto.is_photo());
        assert!(ParticleRole::BrandPhoto.is_photo());
        assert!(ParticleRole::SeasonalPhoto.is_photo());
        assert!(!ParticleRole::Gift.is_photo());
        assert!(!ParticleRole::Star.is_photo());
    }

    #[test]
    fn test_target_selection() {
        let p = sample(ParticleRole::Ornament, ParticleShape::Sphere);
        assert_eq!(p.target(false), p.tree_position);
        assert_eq!(p.target(true), p.scatter_position);
    }

    #[test]
    fn test_palette_rgb() {
        let gold = PaletteColor::Gold.rgb();
        assert!((gold.x - 1.0).abs() < 0.001);
        assert!((gold.y - 215.0 / 255.0).abs() < 0.001);
        assert_eq!(gold.z, 0.0);
        assert_eq!(PaletteColor::BrandOrange.hex(), "#FF5500");
    }

    #[test]
    fn test_clue_flag() {
        let p = sample(ParticleRole::CluePhoto, ParticleShape::Plane);
        assert!(p.is_clue());
        assert!(p.is_photo());
    }
}
