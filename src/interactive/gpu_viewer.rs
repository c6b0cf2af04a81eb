//! GPU-accelerated interactive torch viewer using wgpu + winit

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::DVec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::editor::{self, EditorAction, Movement, SceneEditor};
use crate::gpu::{FrameBatch, GpuContext, ScenePipeline};
use crate::light::CastMode;

/// Configuration for the GPU viewer
#[derive(Clone)]
pub struct GpuViewerConfig {
    /// Window size in pixels; world units are pixels too
    pub window_size: (u32, u32),
    /// Torch field of view in degrees
    pub field_of_view: f64,
    /// Torch movement per frame in pixels
    pub move_speed: f64,
    pub cast_mode: CastMode,
    /// Window title
    pub title: String,
}

impl Default for GpuViewerConfig {
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            field_of_view: 45.0,
            move_speed: 4.0,
            cast_mode: CastMode::Parallel,
            title: "Torchlight - GPU Viewer (ESC to exit)".to_string(),
        }
    }
}

const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn action_for(key: KeyCode) -> Option<EditorAction> {
    match key {
        KeyCode::KeyL => Some(EditorAction::ToggleOutline),
        KeyCode::KeyO => Some(EditorAction::ToggleObstacles),
        KeyCode::KeyE => Some(EditorAction::CycleKind),
        KeyCode::KeyQ => Some(EditorAction::ToggleRotation),
        KeyCode::KeyR => Some(EditorAction::ToggleRed),
        KeyCode::KeyG => Some(EditorAction::ToggleGreen),
        KeyCode::KeyB => Some(EditorAction::ToggleBlue),
        KeyCode::KeyC => Some(EditorAction::PaintTorch),
        _ => None,
    }
}

/// GPU-accelerated viewer state
struct ViewerState {
    gpu_ctx: GpuContext,
    pipeline: ScenePipeline,
    batch: FrameBatch,
    editor: SceneEditor,

    // Interaction state
    held: Movement,
    cursor: Option<DVec2>,
    last_frame: Instant,
}

impl ViewerState {
    fn new(window: Arc<Window>, config: &GpuViewerConfig) -> Result<Self, String> {
        let gpu_ctx = GpuContext::new(window)?;
        let pipeline = ScenePipeline::new(&gpu_ctx);

        let (width, height) = gpu_ctx.size;
        let editor = SceneEditor::new(
            width as f64,
            height as f64,
            config.field_of_view.to_radians(),
            config.move_speed,
            config.cast_mode,
        );

        Ok(Self {
            gpu_ctx,
            pipeline,
            batch: FrameBatch::new(),
            editor,
            held: Movement::default(),
            cursor: None,
            last_frame: Instant::now(),
        })
    }

    fn set_held(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.held.up = pressed,
            KeyCode::KeyS => self.held.down = pressed,
            KeyCode::KeyA => self.held.left = pressed,
            KeyCode::KeyD => self.held.right = pressed,
            _ => {}
        }
    }

    fn update_and_render(&mut self) {
        // Movement speed is per frame, so step at most once per frame period
        if self.last_frame.elapsed() >= FRAME_TIME {
            self.last_frame = Instant::now();
            self.editor.update(self.held, self.cursor);
        }

        self.batch.clear();
        self.editor.render(&mut self.batch);

        match self.pipeline.render(&self.gpu_ctx, &self.batch) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu_ctx.reconfigure();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

/// Application handler for winit event loop
struct GpuViewerApp {
    config: GpuViewerConfig,
    state: Option<ViewerState>,
}

impl GpuViewerApp {
    fn new(config: GpuViewerConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for GpuViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match ViewerState::new(window, &self.config) {
            Ok(state) => {
                println!("=== GPU Interactive Torch Viewer ===");
                editor::print_controls();
                log::info!("{}", state.editor.status());

                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Failed to create viewer state: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state.gpu_ctx.resize((size.width, size.height));
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state: key_state,
                    repeat,
                    ..
                },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                state.set_held(key, pressed);

                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                } else if let Some(action) = action_for(key).filter(|_| pressed && !repeat) {
                    state.editor.apply(action);
                    state.gpu_ctx.set_title(&state.editor.status());
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = Some(DVec2::new(position.x, position.y));
            }

            WindowEvent::CursorLeft { .. } => {
                state.cursor = None;
            }

            WindowEvent::MouseInput { state: btn_state, button: MouseButton::Left, .. } => {
                if let Some(at) = state.cursor {
                    match btn_state {
                        ElementState::Pressed => state.editor.begin_drawing(at),
                        ElementState::Released => state.editor.finish_drawing(at),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                state.update_and_render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            // Request continuous redraw for smooth updates
            state.gpu_ctx.request_redraw();
        }
    }
}

/// Run the GPU viewer
pub fn run_gpu_viewer(config: GpuViewerConfig) -> Result<(), String> {
    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {}", e))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings_match_software_viewer() {
        assert_eq!(action_for(KeyCode::KeyL), Some(EditorAction::ToggleOutline));
        assert_eq!(action_for(KeyCode::KeyC), Some(EditorAction::PaintTorch));
        assert_eq!(action_for(KeyCode::KeyW), None);
        assert_eq!(action_for(KeyCode::Escape), None);
    }
}
