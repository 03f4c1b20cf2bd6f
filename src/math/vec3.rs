use std::ops::{Add, AddAssign, Mul, Sub};
use serde::{Serialize, Deserialize};

/// 3D vector for particle positions, directions and camera placement.
/// Y is up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the horizontal circle of `radius` at height `y`
    pub fn on_ring(angle: f32, radius: f32, y: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos * radius, y, sin * radius)
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Length of the projection onto the XZ plane
    pub fn horizontal_length(&self) -> f32 {
        self.x.hypot(self.z)
    }

    /// Unit vector, or `self` unchanged when it has no length
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            *self
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Some unit vector orthogonal to `self`
    pub fn perpendicular(&self) -> Self {
        let n = self.normalize();
        let helper = if n.y.abs() < 0.9 { Vec3::UP } else { Vec3::RIGHT };
        n.cross(&helper).normalize()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        self.scale(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_length_and_normalize() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.length() - 5.0).abs() < 0.0001);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 0.0001);
        assert!((n.x - 0.6).abs() < 0.0001);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_dot_and_cross() {
        assert_eq!(Vec3::RIGHT.dot(&Vec3::UP), 0.0);
        assert!((Vec3::new(1.0, 2.0, 3.0).dot(&Vec3::new(4.0, 5.0, 6.0)) - 32.0).abs() < 0.0001);
        // Right-handed: X cross Y = Z
        assert_eq!(Vec3::RIGHT.cross(&Vec3::UP), Vec3::FORWARD);
    }

    #[test]
    fn test_on_ring() {
        let p = Vec3::on_ring(FRAC_PI_2, 4.0, 7.0);
        assert!(p.x.abs() < 1e-5);
        assert_eq!(p.y, 7.0);
        assert!((p.z - 4.0).abs() < 1e-5);
        assert!((Vec3::on_ring(1.3, 2.5, -3.0).horizontal_length() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_length_ignores_height() {
        let v = Vec3::new(3.0, 100.0, 4.0);
        assert!((v.horizontal_length() - 5.0).abs() < 0.0001);
        assert!(v.is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_perpendicular_is_orthogonal_unit() {
        for v in [Vec3::UP, Vec3::FORWARD, Vec3::new(0.2, -3.0, 1.5)] {
            let p = v.perpendicular();
            assert!(p.dot(&v).abs() < 1e-5);
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_vec3_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, a.scale(2.0));
        assert!((a.distance(&b) - 27.0f32.sqrt()).abs() < 1e-5);

        let mut acc = a;
        acc += b;
        assert_eq!(acc, Vec3::new(5.0, 7.0, 9.0));
    }
}
