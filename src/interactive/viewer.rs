//! Interactive torch viewer - software rendered into a minifb window

use glam::DVec2;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use super::editor::{self, EditorAction, Movement, SceneEditor};
use crate::light::CastMode;
use crate::render::Canvas;

/// Configuration for the interactive viewer
#[derive(Clone)]
pub struct ViewerConfig {
    /// Window size in pixels; world units are pixels too
    pub window_size: (usize, usize),
    /// Torch field of view in degrees
    pub field_of_view: f64,
    /// Torch movement per frame in pixels
    pub move_speed: f64,
    pub cast_mode: CastMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            field_of_view: 45.0,
            move_speed: 4.0,
            cast_mode: CastMode::Sequential,
        }
    }
}

const ACTION_KEYS: [(Key, EditorAction); 8] = [
    (Key::L, EditorAction::ToggleOutline),
    (Key::O, EditorAction::ToggleObstacles),
    (Key::E, EditorAction::CycleKind),
    (Key::Q, EditorAction::ToggleRotation),
    (Key::R, EditorAction::ToggleRed),
    (Key::G, EditorAction::ToggleGreen),
    (Key::B, EditorAction::ToggleBlue),
    (Key::C, EditorAction::PaintTorch),
];

/// Interactive viewer for the light caster
pub struct InteractiveViewer {
    config: ViewerConfig,
    editor: SceneEditor,
    canvas: Canvas,
    window: Window,
    buffer: Vec<u32>,
}

impl InteractiveViewer {
    /// Create a new interactive viewer with the given configuration
    pub fn new(config: ViewerConfig) -> Result<Self, String> {
        let (width, height) = config.window_size;

        let window = Window::new(
            "Torchlight - Interactive Viewer (ESC to exit)",
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        let editor = SceneEditor::new(
            width as f64,
            height as f64,
            config.field_of_view.to_radians(),
            config.move_speed,
            config.cast_mode,
        );

        Ok(Self {
            config,
            editor,
            canvas: Canvas::new(width, height),
            window,
            buffer: vec![0u32; width * height],
        })
    }

    /// Run the interactive viewer loop
    pub fn run(&mut self) -> Result<(), String> {
        let (width, height) = self.config.window_size;

        // Limit to ~60fps
        self.window.set_target_fps(60);

        println!("=== Interactive Torch Viewer ===");
        editor::print_controls();
        log::info!("{}", self.editor.status());

        let mut was_down = false;

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            for (key, action) in ACTION_KEYS {
                if self.window.is_key_pressed(key, KeyRepeat::No) {
                    self.editor.apply(action);
                }
            }

            let cursor = self
                .window
                .get_mouse_pos(MouseMode::Discard)
                .map(|(x, y)| DVec2::new(x as f64, y as f64));

            let down = self.window.get_mouse_down(MouseButton::Left);
            if let Some(at) = cursor {
                if down && !was_down {
                    self.editor.begin_drawing(at);
                } else if !down && was_down {
                    self.editor.finish_drawing(at);
                }
            }
            was_down = down;

            let movement = Movement {
                up: self.window.is_key_down(Key::W),
                down: self.window.is_key_down(Key::S),
                left: self.window.is_key_down(Key::A),
                right: self.window.is_key_down(Key::D),
            };
            self.editor.update(movement, cursor);

            self.canvas.clear();
            self.editor.render(&mut self.canvas);
            self.canvas.write_to_buffer(&mut self.buffer);

            self.window
                .update_with_buffer(&self.buffer, width, height)
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
