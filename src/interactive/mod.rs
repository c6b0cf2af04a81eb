//! Interactive front ends for placing obstacles and steering the torch

mod editor;
mod viewer;
pub mod gpu_viewer;

pub use editor::{EditorAction, Movement, ObstacleKind, SceneEditor};
pub use viewer::{InteractiveViewer, ViewerConfig};
pub use gpu_viewer::{run_gpu_viewer, GpuViewerConfig};
