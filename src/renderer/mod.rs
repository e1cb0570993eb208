//! WebGPU rendering module
//!
//! Sprites are tessellated into flat-colored triangles on the CPU and drawn
//! in a single pass. Labels are not drawn here; the web front end mirrors
//! them into DOM elements.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, scene_to_ndc};
pub use shapes::scene_vertices;
pub use vertex::Vertex;
