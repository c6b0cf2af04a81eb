//! GPU rendering module using wgpu
//!
//! Draws the light tree as additively blended triangles, with a
//! per-fragment falloff matching the software canvas.

pub mod context;
pub mod pipelines;

pub use context::GpuContext;
pub use pipelines::{FrameBatch, SceneVertex, ScenePipeline};
