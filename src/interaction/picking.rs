use crate::math::Vec3;

/// Information about a ray-particle intersection
#[derive(Debug, Clone, PartialEq)]
pub struct HitInfo {
    pub particle_id: usize,
    pub distance: f32,
    pub hit_point: Vec3,
}

/// Bounding sphere of one particle for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub particle_id: usize,
    pub center: Vec3,
    pub radius: f32,
}

/// Camera description needed to turn a screen point into a ray
#[derive(Debug, Clone, Copy)]
pub struct PickCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
}

impl PickCamera {
    /// World-space ray direction through a pixel
    pub fn ray_direction(&self, screen_x: f32, screen_y: f32, width: f32, height: f32) -> Vec3 {
        let ndc_x = (2.0 * screen_x / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / height);

        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;

        (forward + right.scale(ndc_x * half_width) + up.scale(ndc_y * half_height)).normalize()
    }
}

/// Ray-based picking against particle bounding spheres
pub struct RayPicker {
    targets: Vec<PickTarget>,
}

impl RayPicker {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Replace the pick targets; called after each animation tick
    pub fn set_targets(&mut self, targets: Vec<PickTarget>) {
        self.targets = targets;
    }

    /// Cast a ray from screen coordinates and find the closest hit
    pub fn pick(
        &self,
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        camera: &PickCamera,
    ) -> Option<HitInfo> {
        self.pick_where(screen_x, screen_y, screen_width, screen_height, camera, |_| true)
    }

    /// Like `pick`, but only particles accepted by `filter` can be hit.
    /// Rejected particles do not occlude the ones behind them.
    pub fn pick_where(
        &self,
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        camera: &PickCamera,
        filter: impl Fn(usize) -> bool,
    ) -> Option<HitInfo> {
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return None;
        }
        let ray_dir = camera.ray_direction(screen_x, screen_y, screen_width, screen_height);
        self.cast(camera.position, ray_dir, filter)
    }

    /// Closest accepted target along a world-space ray
    pub fn cast(&self, origin: Vec3, ray_dir: Vec3, filter: impl Fn(usize) -> bool) -> Option<HitInfo> {
        let mut closest: Option<HitInfo> = None;

        for target in self.targets.iter().filter(|t| filter(t.particle_id)) {
            if let Some(dist) = ray_sphere_intersect(origin, ray_dir, target.center, target.radius) {
                if closest.as_ref().map_or(true, |c| dist < c.distance) {
                    closest = Some(HitInfo {
                        particle_id: target.particle_id,
                        distance: dist,
                        hit_point: origin + ray_dir.scale(dist),
                    });
                }
            }
        }

        closest
    }
}

impl Default for RayPicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest positive hit distance, if any
fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    sphere_center: Vec3,
    sphere_radius: f32,
) -> Option<f32> {
    let oc = ray_origin - sphere_center;

    let a = ray_dir.dot(&ray_dir);
    let b = 2.0 * oc.dot(&ray_dir);
    let c = oc.dot(&oc) - sphere_radius * sphere_radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t > 0.0 {
        return Some(t);
    }
    let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
    (t2 > 0.0).then_some(t2)
}
