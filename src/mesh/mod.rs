pub mod geometry;
pub mod shapes;

pub use geometry::{Mesh, Vertex};
