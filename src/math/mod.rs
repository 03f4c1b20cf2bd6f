pub mod vec3;
pub mod matrix;
pub mod quat;

pub use vec3::Vec3;
pub use matrix::Mat4;
pub use quat::Quat;
