pub mod webgl;
pub mod shaders;
pub mod pipeline;
pub mod textures;

pub use webgl::WebGLContext;
pub use pipeline::{Material, RenderPipeline};
pub use textures::{PhotoTextureCache, TextureState};
