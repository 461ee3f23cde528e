//! WebGPU rendering module
//!
//! CPU-side shape tessellation into one vertex-colored triangle list per
//! frame, uploaded through a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
