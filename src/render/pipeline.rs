use web_sys::{WebGl2RenderingContext, WebGlProgram, WebGlTexture, WebGlUniformLocation};
use crate::animation::ParticleTransform;
use crate::data::{PaletteColor, Particle, ParticleShape};
use crate::math::{Mat4, Quat, Vec3};
use crate::mesh::shapes;
use super::shaders::*;
use super::textures::{ImageLoader, PhotoTextureCache};
use super::webgl::{GpuMesh, WebGLContext};

/// Scene background (#000502)
const BACKGROUND: [f32; 3] = [0.0, 0.02, 0.008];
/// Frame and placeholder gold (#D4AF37)
const FRAME_GOLD: Vec3 = Vec3::new(0.831, 0.686, 0.216);

const STAR_POSITION: Vec3 = Vec3::new(0.0, 14.0, 0.0);
const STAR_SIZE: f32 = 2.5;
const STAR_EMISSIVE: f32 = 4.0;
const STAR_FLOAT_SPEED: f32 = 3.0;
const STAR_FLOAT_AMPLITUDE: f32 = 0.25;

const RING_Y: f32 = -15.0;
const RING_SPIN: f32 = 0.1;
const RING_OPACITY: f32 = 0.3;

/// Cached uniform locations for the material shader
struct MaterialUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive_color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    unlit: Option<WebGlUniformLocation>,
    use_texture: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
}

/// Surface parameters for one draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive_color: Vec3,
    pub emissive: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub unlit: bool,
}

impl Material {
    /// Polished ornament in a palette color
    pub fn ornament(color: PaletteColor, emissive: f32) -> Self {
        let rgb = color.rgb();
        Self {
            color: rgb,
            emissive_color: rgb,
            emissive,
            metalness: 0.9,
            roughness: 0.1,
            opacity: 1.0,
            unlit: false,
        }
    }

    /// Photo frame; the clue photo is framed in brand orange
    pub fn frame(is_clue: bool, emissive: f32) -> Self {
        let color = if is_clue { PaletteColor::BrandOrange.rgb() } else { FRAME_GOLD };
        Self {
            color,
            emissive_color: color,
            emissive,
            metalness: 1.0,
            roughness: 0.1,
            opacity: 1.0,
            unlit: false,
        }
    }

    /// Gold card shown until (or instead of) the photo texture
    pub fn placeholder() -> Self {
        Self {
            color: FRAME_GOLD,
            emissive_color: Vec3::ZERO,
            emissive: 0.0,
            metalness: 0.6,
            roughness: 0.4,
            opacity: 1.0,
            unlit: false,
        }
    }

    /// Photo texture shown as-is
    pub fn picture() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            emissive_color: Vec3::ZERO,
            emissive: 0.0,
            metalness: 0.0,
            roughness: 1.0,
            opacity: 1.0,
            unlit: true,
        }
    }
}

/// Mesh library for every shape the scene draws
struct SceneMeshes {
    sphere: GpuMesh,
    cube: GpuMesh,
    octahedron: GpuMesh,
    frame: GpuMesh,
    picture: GpuMesh,
    ring: GpuMesh,
}

/// Complete render pipeline for the particle tree
pub struct RenderPipeline {
    ctx: WebGLContext,
    program: WebGlProgram,
    uniforms: MaterialUniforms,
    meshes: SceneMeshes,

    textures: PhotoTextureCache<WebGlTexture>,
    loader: ImageLoader,

    // Dimensions
    width: i32,
    height: i32,

    // Camera state
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);
        let program = ctx.create_program(MATERIAL_VERTEX_SHADER, MATERIAL_FRAGMENT_SHADER)?;

        let uniforms = MaterialUniforms {
            model: ctx.get_uniform_location(&program, "u_model"),
            view: ctx.get_uniform_location(&program, "u_view"),
            projection: ctx.get_uniform_location(&program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&program, "u_camera_pos"),
            color: ctx.get_uniform_location(&program, "u_color"),
            emissive_color: ctx.get_uniform_location(&program, "u_emissive_color"),
            emissive: ctx.get_uniform_location(&program, "u_emissive"),
            metalness: ctx.get_uniform_location(&program, "u_metalness"),
            roughness: ctx.get_uniform_location(&program, "u_roughness"),
            opacity: ctx.get_uniform_location(&program, "u_opacity"),
            unlit: ctx.get_uniform_location(&program, "u_unlit"),
            use_texture: ctx.get_uniform_location(&program, "u_use_texture"),
            texture: ctx.get_uniform_location(&program, "u_texture"),
        };

        let (frame_w, frame_h, frame_d) = shapes::FRAME_SIZE;
        let meshes = SceneMeshes {
            sphere: ctx.upload_mesh(&shapes::sphere(24, 16))?,
            cube: ctx.upload_mesh(&shapes::cube())?,
            octahedron: ctx.upload_mesh(&shapes::octahedron())?,
            frame: ctx.upload_mesh(&shapes::cuboid(frame_w, frame_h, frame_d))?,
            picture: ctx.upload_mesh(&shapes::quad(shapes::PICTURE_SIZE, shapes::PICTURE_SIZE))?,
            ring: ctx.upload_mesh(&shapes::ring(14.0, 14.2, 64))?,
        };

        Ok(Self {
            ctx,
            program,
            uniforms,
            meshes,
            textures: PhotoTextureCache::new(),
            loader: ImageLoader::new(),
            width,
            height,
            camera_position: Vec3::new(0.0, 5.0, 60.0),
            camera_target: Vec3::ZERO,
            fov: 35f32.to_radians(),
            near: 0.1,
            far: 300.0,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Start loading every photo texture not requested yet
    pub fn request_photos(&mut self, particles: &[Particle]) {
        for url in particles.iter().filter_map(|p| p.texture_url.as_deref()) {
            if self.textures.request(url) {
                self.loader.load(url);
            }
        }
        log::debug!("{} photo textures loading", self.loader.in_flight());
    }

    /// Upload images that finished loading since the last frame
    fn pump_textures(&mut self) {
        let finished = self.loader.take_finished();
        if finished.is_empty() {
            return;
        }
        for (url, result) in finished {
            let uploaded = result.and_then(|image| self.ctx.create_texture_from_image(&image));
            self.textures.resolve(&url, uploaded);
        }
        log::debug!(
            "photo textures: {} ready, {} failed, {} pending",
            self.textures.ready_count(),
            self.textures.failed_count(),
            self.textures.pending_count()
        );
    }

    /// Render a frame
    pub fn render(&mut self, particles: &[Particle], transforms: &[ParticleTransform], time: f32) {
        self.pump_textures();

        let projection = Mat4::perspective(self.fov, self.aspect(), self.near, self.far);
        let view = Mat4::look_at(self.camera_position, self.camera_target, Vec3::UP);

        self.ctx.begin_frame(BACKGROUND, self.width, self.height);
        self.ctx.gl.use_program(Some(&self.program));
        self.ctx.set_mat4(self.uniforms.view.as_ref(), &view);
        self.ctx.set_mat4(self.uniforms.projection.as_ref(), &projection);
        self.ctx.set_vec3(self.uniforms.camera_pos.as_ref(), self.camera_position);
        self.ctx.set_i32(self.uniforms.texture.as_ref(), 0);

        for (particle, transform) in particles.iter().zip(transforms) {
            let model = transform.model_matrix();
            match particle.shape {
                ParticleShape::Plane => self.draw_photo(particle, transform, &model),
                shape => {
                    let mesh = match shape {
                        ParticleShape::Cube => &self.meshes.cube,
                        ParticleShape::Octahedron => &self.meshes.octahedron,
                        _ => &self.meshes.sphere,
                    };
                    let material = Material::ornament(particle.color, transform.emissive);
                    self.draw(mesh, &model, &material, None);
                }
            }
        }

        self.draw_decorations(time);
    }

    fn draw_photo(&self, particle: &Particle, transform: &ParticleTransform, model: &Mat4) {
        let frame = Material::frame(particle.is_clue(), transform.emissive);
        self.draw(&self.meshes.frame, model, &frame, None);

        let picture_model = model.mul(&Mat4::translation(0.0, 0.0, shapes::PICTURE_OFFSET));
        let texture = particle
            .texture_url
            .as_deref()
            .and_then(|url| self.textures.texture(url));
        match texture {
            Some(texture) => self.draw(&self.meshes.picture, &picture_model, &Material::picture(), Some(texture)),
            None => self.draw(&self.meshes.picture, &picture_model, &Material::placeholder(), None),
        }
    }

    /// Tree-top star and the slowly turning base ring
    fn draw_decorations(&self, time: f32) {
        let star_position = STAR_POSITION
            + Vec3::new(0.0, (time * STAR_FLOAT_SPEED).sin() * STAR_FLOAT_AMPLITUDE, 0.0);
        let star_rotation = Quat::from_axis_angle(Vec3::FORWARD, std::f32::consts::FRAC_PI_4);
        let star = Material::ornament(PaletteColor::Gold, STAR_EMISSIVE);
        self.draw(
            &self.meshes.octahedron,
            &Mat4::from_trs(star_position, star_rotation, STAR_SIZE),
            &star,
            None,
        );

        self.ctx.set_translucent(true);
        let ring_model = Mat4::from_trs(
            Vec3::new(0.0, RING_Y, 0.0),
            Quat::from_axis_angle(Vec3::UP, time * RING_SPIN),
            1.0,
        );
        let ring = Material {
            opacity: RING_OPACITY,
            unlit: true,
            ..Material::ornament(PaletteColor::BrandOrange, 0.0)
        };
        self.draw(&self.meshes.ring, &ring_model, &ring, None);
        self.ctx.set_translucent(false);
    }

    fn draw(&self, mesh: &GpuMesh, model: &Mat4, material: &Material, texture: Option<&WebGlTexture>) {
        let ctx = &self.ctx;
        let u = &self.uniforms;

        ctx.set_mat4(u.model.as_ref(), model);
        ctx.set_vec3(u.color.as_ref(), material.color);
        ctx.set_vec3(u.emissive_color.as_ref(), material.emissive_color);
        ctx.set_f32(u.emissive.as_ref(), material.emissive);
        ctx.set_f32(u.metalness.as_ref(), material.metalness);
        ctx.set_f32(u.roughness.as_ref(), material.roughness);
        ctx.set_f32(u.opacity.as_ref(), material.opacity);
        ctx.set_bool(u.unlit.as_ref(), material.unlit);
        ctx.set_bool(u.use_texture.as_ref(), texture.is_some());

        ctx.bind_texture(texture);
        ctx.draw_mesh(mesh);
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Release GPU resources
    pub fn dispose(&mut self) {
        let gl = &self.ctx.gl;
        for texture in self.textures.drain_ready() {
            gl.delete_texture(Some(&texture));
        }
        let meshes = [
            &self.meshes.sphere,
            &self.meshes.cube,
            &self.meshes.octahedron,
            &self.meshes.frame,
            &self.meshes.picture,
            &self.meshes.ring,
        ];
        for mesh in meshes {
            self.ctx.delete_mesh(mesh);
        }
        gl.delete_program(Some(&self.program));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_frame_is_orange() {
        let clue = Material::frame(true, 0.5);
        let plain = Material::frame(false, 0.5);
        assert_eq!(clue.color, PaletteColor::BrandOrange.rgb());
        assert_eq!(plain.color, FRAME_GOLD);
        assert_eq!(clue.emissive, 0.5);
    }

    #[test]
    fn test_picture_is_unlit() {
        assert!(Material::picture().unlit);
        assert!(!Material::placeholder().unlit);
    }

    #[test]
    fn test_ornament_glows_in_own_color() {
        let m = Material::ornament(PaletteColor::Emerald, 2.5);
        assert_eq!(m.emissive_color, PaletteColor::Emerald.rgb());
        assert_eq!(m.emissive, 2.5);
    }
}
