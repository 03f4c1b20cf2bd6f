use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

/// Floats per interleaved `Vertex`: position(3) + normal(3) + uv(2)
const VERTEX_FLOATS: i32 = 8;

/// Static geometry living on the GPU
pub struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

/// Data for a static buffer
enum BufferData<'a> {
    Vertices(&'a [f32]),
    Indices(&'a [u32]),
}

/// WebGL2 context with the handful of operations the scene needs
pub struct WebGLContext {
    pub gl: Gl,
}

impl WebGLContext {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }

    fn compile_shader(&self, shader_type: u32, source: &str) -> Result<WebGlShader, String> {
        let gl = &self.gl;
        let shader = gl.create_shader(shader_type).ok_or("Failed to create shader")?;
        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        let compiled = gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            return Ok(shader);
        }
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(format!("Shader compilation failed: {}", log))
    }

    /// Compile and link a vertex/fragment pair
    pub fn create_program(&self, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, String> {
        let gl = &self.gl;
        let vert = self.compile_shader(Gl::VERTEX_SHADER, vert_src)?;
        let frag = self.compile_shader(Gl::FRAGMENT_SHADER, frag_src)?;

        let program = gl.create_program().ok_or("Failed to create program")?;
        gl.attach_shader(&program, &vert);
        gl.attach_shader(&program, &frag);
        gl.link_program(&program);
        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));

        let linked = gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            return Ok(program);
        }
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(format!("Program linking failed: {}", log))
    }

    /// Create a buffer bound to the current VAO
    fn static_buffer(&self, data: BufferData<'_>) -> Result<WebGlBuffer, String> {
        let gl = &self.gl;
        let buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        // Safety: the views are consumed by buffer_data before any allocation
        match data {
            BufferData::Vertices(values) => {
                gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
                unsafe {
                    let view = js_sys::Float32Array::view(values);
                    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
                }
            }
            BufferData::Indices(values) => {
                gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));
                unsafe {
                    let view = js_sys::Uint32Array::view(values);
                    gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
                }
            }
        }
        Ok(buffer)
    }

    /// Upload a mesh with the `Vertex` attribute layout (locations 0, 1, 2)
    pub fn upload_mesh(&self, mesh: &Mesh) -> Result<GpuMesh, String> {
        let gl = &self.gl;
        let vao = gl.create_vertex_array().ok_or("Failed to create VAO")?;
        gl.bind_vertex_array(Some(&vao));

        let vertices = mesh.vertex_data();
        let vertex_buffer = self.static_buffer(BufferData::Vertices(&vertices))?;
        let index_buffer = self.static_buffer(BufferData::Indices(mesh.index_data()))?;

        let stride = VERTEX_FLOATS * 4;
        for (location, size, offset) in [(0, 3, 0), (1, 3, 12), (2, 2, 24)] {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(location, size, Gl::FLOAT, false, stride, offset);
        }
        gl.bind_vertex_array(None);

        debug_assert_eq!(vertices.len(), mesh.vertex_count() * VERTEX_FLOATS as usize);
        Ok(GpuMesh {
            vao,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_data().len() as i32,
        })
    }

    pub fn draw_mesh(&self, mesh: &GpuMesh) {
        let gl = &self.gl;
        gl.bind_vertex_array(Some(&mesh.vao));
        gl.draw_elements_with_i32(Gl::TRIANGLES, mesh.index_count, Gl::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
    }

    pub fn delete_mesh(&self, mesh: &GpuMesh) {
        self.gl.delete_vertex_array(Some(&mesh.vao));
        self.gl.delete_buffer(Some(&mesh.vertex_buffer));
        self.gl.delete_buffer(Some(&mesh.index_buffer));
    }

    /// Upload a decoded photo as a mipmapped, edge-clamped RGBA texture
    pub fn create_texture_from_image(&self, image: &HtmlImageElement) -> Result<WebGlTexture, String> {
        let gl = &self.gl;
        let texture = gl.create_texture().ok_or("Failed to create texture")?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
        gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, 0);

        let upload = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
            Gl::TEXTURE_2D,
            0,
            Gl::RGBA as i32,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            image,
        );
        if let Err(e) = upload {
            gl.bind_texture(Gl::TEXTURE_2D, None);
            gl.delete_texture(Some(&texture));
            return Err(format!("Failed to upload texture: {:?}", e));
        }

        gl.generate_mipmap(Gl::TEXTURE_2D);
        let params = [
            (Gl::TEXTURE_MIN_FILTER, Gl::LINEAR_MIPMAP_LINEAR),
            (Gl::TEXTURE_MAG_FILTER, Gl::LINEAR),
            (Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE),
            (Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE),
        ];
        for (name, value) in params {
            gl.tex_parameteri(Gl::TEXTURE_2D, name, value as i32);
        }

        gl.bind_texture(Gl::TEXTURE_2D, None);
        Ok(texture)
    }

    /// Bind `texture` to unit 0, or unbind it
    pub fn bind_texture(&self, texture: Option<&WebGlTexture>) {
        self.gl.active_texture(Gl::TEXTURE0);
        self.gl.bind_texture(Gl::TEXTURE_2D, texture);
    }

    pub fn get_uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    pub fn set_f32(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    pub fn set_i32(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    pub fn set_bool(&self, location: Option<&WebGlUniformLocation>, value: bool) {
        self.gl.uniform1i(location, value as i32);
    }

    pub fn set_vec3(&self, location: Option<&WebGlUniformLocation>, v: Vec3) {
        self.gl.uniform3f(location, v.x, v.y, v.z);
    }

    pub fn set_mat4(&self, location: Option<&WebGlUniformLocation>, m: &Mat4) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, m.as_slice());
    }

    /// Full viewport, cleared to `background`, opaque depth-tested pass
    pub fn begin_frame(&self, background: [f32; 3], width: i32, height: i32) {
        let gl = &self.gl;
        gl.viewport(0, 0, width, height);
        gl.clear_color(background[0], background[1], background[2], 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        gl.enable(Gl::DEPTH_TEST);
        self.set_translucent(false);
    }

    /// Alpha-blended drawing that does not write depth
    pub fn set_translucent(&self, enabled: bool) {
        let gl = &self.gl;
        if enabled {
            gl.enable(Gl::BLEND);
            gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        } else {
            gl.disable(Gl::BLEND);
        }
        gl.depth_mask(!enabled);
    }
}
