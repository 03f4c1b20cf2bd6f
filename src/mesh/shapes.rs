//! Primitive geometry for particles and scene decorations
//!
//! All shapes are unit-sized around the origin; particle scale is applied
//! through the model matrix.

use std::f32::consts::{PI, TAU};

use crate::data::ParticleShape;
use crate::math::Vec3;
use super::geometry::{Mesh, Vertex};

/// Latitude/longitude sphere of radius 1
pub fn sphere(segments: usize, rings: usize) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let polar = v * PI;
        let (sin_p, cos_p) = polar.sin_cos();
        let row = (0..=segments).map(|seg| {
            let u = seg as f32 / segments as f32;
            let (sin_a, cos_a) = (u * TAU).sin_cos();
            let normal = Vec3::new(sin_p * cos_a, cos_p, sin_p * sin_a);
            Vertex::new(normal, normal).with_uv(u, v)
        });
        mesh.add_vertices(row);
    }

    let stride = (segments + 1) as u32;
    for ring in 0..rings as u32 {
        for seg in 0..segments as u32 {
            let a = ring * stride + seg;
            let b = a + stride;
            mesh.add_quad(a, a + 1, b + 1, b);
        }
    }

    mesh
}

/// Axis-aligned box centered on the origin
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut mesh = Mesh::new();

    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::RIGHT, Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::FORWARD, Vec3::UP),
        (Vec3::UP, Vec3::RIGHT, Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::RIGHT, Vec3::FORWARD),
        (Vec3::FORWARD, Vec3::RIGHT, Vec3::UP),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
    ];
    let half = Vec3::new(hx, hy, hz);
    let extent = |v: Vec3| Vec3::new(v.x * half.x, v.y * half.y, v.z * half.z);

    for (normal, u_axis, v_axis) in faces {
        let center = extent(normal);
        let du = extent(u_axis);
        let dv = extent(v_axis);
        let start = mesh.add_vertices([
            Vertex::new(center - du - dv, normal).with_uv(0.0, 0.0),
            Vertex::new(center + du - dv, normal).with_uv(1.0, 0.0),
            Vertex::new(center + du + dv, normal).with_uv(1.0, 1.0),
            Vertex::new(center - du + dv, normal).with_uv(0.0, 1.0),
        ]);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }

    mesh
}

pub fn cube() -> Mesh {
    cuboid(1.0, 1.0, 1.0)
}

/// Eight-faced diamond with vertices at distance 1
pub fn octahedron() -> Mesh {
    let top = Vec3::UP;
    let bottom = Vec3::new(0.0, -1.0, 0.0);
    let equator = [
        Vec3::RIGHT,
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::FORWARD,
    ];

    let mut mesh = Mesh::new();
    for i in 0..4 {
        let a = equator[i];
        let b = equator[(i + 1) % 4];
        mesh.add_facet(a, b, top);
        mesh.add_facet(b, a, bottom);
    }
    mesh
}

/// Flat rectangle in the XY plane facing +Z
pub fn quad(width: f32, height: f32) -> Mesh {
    let (hx, hy) = (width * 0.5, height * 0.5);
    let mut mesh = Mesh::new();
    let start = mesh.add_vertices([
        Vertex::new(Vec3::new(-hx, -hy, 0.0), Vec3::FORWARD).with_uv(0.0, 1.0),
        Vertex::new(Vec3::new(hx, -hy, 0.0), Vec3::FORWARD).with_uv(1.0, 1.0),
        Vertex::new(Vec3::new(hx, hy, 0.0), Vec3::FORWARD).with_uv(1.0, 0.0),
        Vertex::new(Vec3::new(-hx, hy, 0.0), Vec3::FORWARD).with_uv(0.0, 0.0),
    ]);
    mesh.add_quad(start, start + 1, start + 2, start + 3);
    mesh
}

/// Flat annulus in the XZ plane facing up
pub fn ring(inner: f32, outer: f32, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::new();

    for seg in 0..=segments {
        let u = seg as f32 / segments as f32;
        let (sin_a, cos_a) = (u * TAU).sin_cos();
        let dir = Vec3::new(cos_a, 0.0, sin_a);
        mesh.add_vertices([
            Vertex::new(dir.scale(inner), Vec3::UP).with_uv(u, 0.0),
            Vertex::new(dir.scale(outer), Vec3::UP).with_uv(u, 1.0),
        ]);
    }
    for seg in 0..segments as u32 {
        let a = seg * 2;
        // Counter-clockwise seen from above
        mesh.add_quad(a, a + 2, a + 3, a + 1);
    }

    mesh
}

/// Photo frame slab (width, height, depth) before particle scale
pub const FRAME_SIZE: (f32, f32, f32) = (1.2, 1.4, 0.1);
/// Photo picture quad side, slightly in front of the frame
pub const PICTURE_SIZE: f32 = 0.9;
pub const PICTURE_OFFSET: f32 = 0.06;

/// Unscaled bounding radius used for picking
pub fn pick_radius(shape: ParticleShape) -> f32 {
    match shape {
        ParticleShape::Sphere | ParticleShape::Octahedron => 1.0,
        ParticleShape::Cube => 0.5 * 3f32.sqrt(),
        ParticleShape::Plane => {
            let (w, h, _) = FRAME_SIZE;
            0.5 * (w * w + h * h).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_unit_normals(mesh: &Mesh) -> bool {
        mesh.vertices.iter().all(|v| (v.normal.length() - 1.0).abs() < 1e-4)
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = sphere(16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2);
        assert!(mesh.vertices.iter().all(|v| (v.position.length() - 1.0).abs() < 1e-4));
        assert!(all_unit_normals(&mesh));
    }

    #[test]
    fn test_cube_faces() {
        let mesh = cube();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.vertices.iter().all(|v| {
            v.position.x.abs() <= 0.5 + 1e-6 && v.position.y.abs() <= 0.5 + 1e-6 && v.position.z.abs() <= 0.5 + 1e-6
        }));
        let extent = mesh.vertices.iter().map(|v| v.position.length()).fold(0.0f32, f32::max);
        assert!((extent - pick_radius(ParticleShape::Cube)).abs() < 1e-4);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = cube();
        for v in &mesh.vertices {
            assert!(v.normal.dot(&v.position) > 0.0);
        }
    }

    #[test]
    fn test_octahedron_facets_face_outward() {
        let mesh = octahedron();
        assert_eq!(mesh.triangle_count(), 8);
        assert!(all_unit_normals(&mesh));
        for tri in mesh.indices.chunks(3) {
            let v = mesh.vertices[tri[0] as usize];
            let centroid = (mesh.vertices[tri[0] as usize].position
                + mesh.vertices[tri[1] as usize].position
                + mesh.vertices[tri[2] as usize].position)
                .scale(1.0 / 3.0);
            assert!(v.normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_quad_faces_forward() {
        let mesh = quad(0.9, 0.9);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::FORWARD));
        assert!((mesh.vertices[2].position.x - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_ring_band() {
        let mesh = ring(14.0, 14.2, 64);
        assert_eq!(mesh.triangle_count(), 128);
        for v in &mesh.vertices {
            let r = v.position.horizontal_length();
            assert!(r > 13.99 && r < 14.21);
            assert_eq!(v.position.y, 0.0);
        }
    }

    #[test]
    fn test_plane_pick_radius_covers_frame() {
        assert!((pick_radius(ParticleShape::Plane) - 0.922).abs() < 1e-3);
    }
}
