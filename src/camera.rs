use crate::config::CameraConfig;
use crate::math::Vec3;
use crate::state::Layout;

/// Radians of orbit per pixel of drag
const ORBIT_SENSITIVITY: f32 = 0.01;
/// Distance change per wheel unit
const ZOOM_SENSITIVITY: f32 = 0.05;

/// Orbit camera around the tree: no panning, clamped polar band and distance
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    /// Angle around the Y axis; 0 looks down -Z from +Z
    azimuth: f32,
    /// Angle from the +Y axis
    polar: f32,
    config: CameraConfig,
}

impl OrbitCamera {
    /// Starts at `(0, height, distance)` looking at the origin
    pub fn new(config: CameraConfig) -> Self {
        let start = Vec3::new(0.0, config.height, config.distance);
        let distance = start.length().clamp(config.min_distance, config.max_distance);
        let polar = (start.y / start.length().max(f32::EPSILON)).acos();
        let mut camera = Self {
            target: Vec3::ZERO,
            distance,
            azimuth: 0.0,
            polar,
            config,
        };
        camera.polar = camera.clamp_polar(camera.polar);
        camera
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        polar.clamp(self.config.min_polar, self.config.max_polar)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Vertical field of view in radians
    pub fn fov(&self) -> f32 {
        self.config.fov_degrees.to_radians()
    }

    pub fn near(&self) -> f32 {
        self.config.near
    }

    pub fn far(&self) -> f32 {
        self.config.far
    }

    /// Drag in pixels; dragging right swings the camera left around the tree
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth -= delta_x * ORBIT_SENSITIVITY;
        self.polar = self.clamp_polar(self.polar - delta_y * ORBIT_SENSITIVITY);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * ZOOM_SENSITIVITY)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Slow turntable, only while the tree is formed
    pub fn auto_rotate(&mut self, layout: Layout, delta: f32) {
        if layout == Layout::Tree {
            self.azimuth += self.config.auto_rotate_speed * delta.max(0.0);
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a).scale(self.distance)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let camera = OrbitCamera::default();
        let pos = camera.position();
        assert!((pos - Vec3::new(0.0, 5.0, 60.0)).length() < 1e-3);
    }

    #[test]
    fn test_polar_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10_000.0);
        assert!((camera.polar() - std::f32::consts::PI / 2.5).abs() < 1e-6);
        camera.orbit(0.0, -10_000.0);
        assert!((camera.polar() - std::f32::consts::PI / 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(-1_000.0);
        assert_eq!(camera.distance(), 30.0);
        camera.zoom(10_000.0);
        assert_eq!(camera.distance(), 90.0);
        assert!((camera.position().length() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_rotate_only_in_tree() {
        let mut camera = OrbitCamera::default();
        camera.auto_rotate(Layout::Scattered, 1.0);
        assert_eq!(camera.azimuth(), 0.0);
        camera.auto_rotate(Layout::Tree, 1.0);
        assert!(camera.azimuth() > 0.0);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = OrbitCamera::default();
        let before = camera.position().length();
        camera.orbit(120.0, 15.0);
        assert!((camera.position().length() - before).abs() < 1e-3);
    }
}
