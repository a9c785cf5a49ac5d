//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into a flat-colored triangle list and
//! drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::build_scene;
pub use vertex::Vertex;
