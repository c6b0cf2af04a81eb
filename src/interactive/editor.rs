//! Scene state shared by both viewers: the torch, the obstacle list and the
//! drawing tool. Front ends translate their own input events into calls here.

use std::f64::consts::PI;

use glam::DVec2;

use crate::color::RayColor;
use crate::light::{CastMode, LightTree};
use crate::obstacle::{FilterLine, Obstacle, ReflectLine, SolidCircle, SolidLine, SolidRect};
use crate::render::RenderTarget;

/// What a left-drag draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleKind {
    #[default]
    SolidLine,
    Mirror,
    Filter,
    SolidBox,
    SolidCircle,
}

impl ObstacleKind {
    const ALL: [ObstacleKind; 5] = [
        ObstacleKind::SolidLine,
        ObstacleKind::Mirror,
        ObstacleKind::Filter,
        ObstacleKind::SolidBox,
        ObstacleKind::SolidCircle,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            ObstacleKind::SolidLine => "Solid Line",
            ObstacleKind::Mirror => "Mirror",
            ObstacleKind::Filter => "Filter",
            ObstacleKind::SolidBox => "Solid Box",
            ObstacleKind::SolidCircle => "Solid Circle",
        }
    }

    /// Build an obstacle from a drag between `start` and `end`.
    pub fn create(self, start: DVec2, end: DVec2, filter: RayColor) -> Box<dyn Obstacle> {
        match self {
            ObstacleKind::SolidLine => Box::new(SolidLine::new(start, end)),
            ObstacleKind::Mirror => Box::new(ReflectLine::with_filter(start, end, filter)),
            ObstacleKind::Filter => Box::new(FilterLine::with_filter(start, end, filter)),
            ObstacleKind::SolidBox => Box::new(SolidRect::new(start.min(end), start.max(end))),
            ObstacleKind::SolidCircle => Box::new(SolidCircle::new(start, (end - start).length())),
        }
    }
}

/// Keyboard actions, independent of the windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    ToggleOutline,
    ToggleObstacles,
    CycleKind,
    ToggleRotation,
    ToggleRed,
    ToggleGreen,
    ToggleBlue,
    PaintTorch,
}

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

pub struct SceneEditor {
    light: LightTree,
    obstacles: Vec<Box<dyn Obstacle>>,
    origin: DVec2,
    target: DVec2,
    move_speed: f64,
    kind: ObstacleKind,
    filter: RayColor,
    drawing: Option<DVec2>,
    pub draw_outline: bool,
    pub draw_obstacles: bool,
    pub rotation_fixed: bool,
}

impl SceneEditor {
    /// Torch a quarter of the way across a `width` x `height` view, facing right.
    pub fn new(width: f64, height: f64, field_of_view: f64, move_speed: f64, mode: CastMode) -> Self {
        let origin = DVec2::new((width / 4.0).floor(), (height / 2.0).floor());
        let mut light = LightTree::new(origin, 0.0, field_of_view, RayColor::WHITE).with_mode(mode);
        light.cast(&[]);

        SceneEditor {
            light,
            obstacles: Vec::new(),
            origin,
            target: origin + DVec2::X,
            move_speed,
            kind: ObstacleKind::default(),
            filter: RayColor::WHITE,
            drawing: None,
            draw_outline: false,
            draw_obstacles: true,
            rotation_fixed: false,
        }
    }

    pub fn light(&self) -> &LightTree {
        &self.light
    }

    pub fn obstacles(&self) -> &[Box<dyn Obstacle>] {
        &self.obstacles
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn filter(&self) -> RayColor {
        self.filter
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn add_obstacle(&mut self, obstacle: Box<dyn Obstacle>) {
        self.obstacles.push(obstacle);
    }

    pub fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::ToggleOutline => self.draw_outline = !self.draw_outline,
            EditorAction::ToggleObstacles => self.draw_obstacles = !self.draw_obstacles,
            EditorAction::CycleKind => self.kind = self.kind.next(),
            EditorAction::ToggleRotation => self.rotation_fixed = !self.rotation_fixed,
            EditorAction::ToggleRed => self.filter ^= RayColor::RED,
            EditorAction::ToggleGreen => self.filter ^= RayColor::GREEN,
            EditorAction::ToggleBlue => self.filter ^= RayColor::BLUE,
            EditorAction::PaintTorch => self.light.set_color(self.filter),
        }
        log::info!("{}", self.status());
    }

    /// Start dragging out a new obstacle. It is live in the scene at once
    /// and follows the cursor until released.
    pub fn begin_drawing(&mut self, at: DVec2) {
        self.drawing = Some(at);
        self.obstacles.push(self.kind.create(at, at, self.filter));
    }

    pub fn finish_drawing(&mut self, at: DVec2) {
        self.update_drawing(at);
        self.drawing = None;
    }

    fn update_drawing(&mut self, at: DVec2) {
        if let (Some(start), Some(last)) = (self.drawing, self.obstacles.last_mut()) {
            *last = self.kind.create(start, at, self.filter);
        }
    }

    /// Advance one frame: move the torch, aim it at the cursor unless
    /// rotation is fixed, recast, then stretch any obstacle being drawn.
    pub fn update(&mut self, movement: Movement, cursor: Option<DVec2>) {
        if movement.up {
            self.origin.y -= self.move_speed;
        }
        if movement.down {
            self.origin.y += self.move_speed;
        }
        if movement.left {
            self.origin.x -= self.move_speed;
        }
        if movement.right {
            self.origin.x += self.move_speed;
        }

        if !self.rotation_fixed {
            if let Some(cursor) = cursor {
                self.target = cursor;
            }
        }

        self.light.set_origin(self.origin);
        self.light.aim(self.target - self.origin);
        self.light.cast(&self.obstacles);

        if let Some(cursor) = cursor {
            self.update_drawing(cursor);
        }
    }

    pub fn render(&self, target: &mut dyn RenderTarget) {
        self.light.render(target);

        if self.draw_outline {
            self.light.render_outlines(target);
        }
        if self.draw_obstacles {
            for obstacle in &self.obstacles {
                obstacle.render(target);
            }
        }
    }

    pub fn status(&self) -> String {
        format!(
            "Object: {} | Filter: {} | Torch: {} | FOV: {:.0} deg{}",
            self.kind.name(),
            self.filter.name(),
            self.light.color().name(),
            self.light.field_of_view() * 180.0 / PI,
            if self.rotation_fixed { " | rotation fixed" } else { "" },
        )
    }
}

pub(crate) fn print_controls() {
    println!("Controls:");
    println!("  Mouse       - Aim the torch");
    println!("  W/A/S/D     - Move the torch");
    println!("  Left Drag   - Draw an object");
    println!("  E           - Change object type");
    println!("  R/G/B       - Toggle filter colours");
    println!("  C           - Colour the torch with the filter");
    println!("  Q           - Fix torch rotation");
    println!("  L           - Toggle sector outlines");
    println!("  O           - Toggle obstacle outlines");
    println!("  ESC         - Exit");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::SectorId;

    fn editor() -> SceneEditor {
        SceneEditor::new(800.0, 600.0, 45f64.to_radians(), 4.0, CastMode::Sequential)
    }

    #[test]
    fn test_initial_torch() {
        let editor = editor();
        assert_eq!(editor.light().origin(), DVec2::new(200.0, 300.0));
        assert!((editor.light().field_of_view() - 45f64.to_radians()).abs() < 1e-9);
        assert_eq!(editor.light().children(SectorId::ROOT).count(), 1);
    }

    #[test]
    fn test_kind_cycles_through_all() {
        let mut kind = ObstacleKind::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(kind.name());
            kind = kind.next();
        }
        assert_eq!(kind, ObstacleKind::SolidLine);
        assert_eq!(seen, ["Solid Line", "Mirror", "Filter", "Solid Box", "Solid Circle"]);
    }

    #[test]
    fn test_filter_toggles_and_paints_torch() {
        let mut editor = editor();
        editor.apply(EditorAction::ToggleRed);
        editor.apply(EditorAction::ToggleBlue);
        assert_eq!(editor.filter(), RayColor::GREEN);

        editor.apply(EditorAction::PaintTorch);
        assert_eq!(editor.light().color(), RayColor::GREEN);
        assert!(editor.status().contains("Torch: Green"));
    }

    #[test]
    fn test_movement_and_fixed_rotation() {
        let mut editor = editor();
        let still = Movement::default();

        editor.update(Movement { up: true, right: true, ..still }, Some(DVec2::new(204.0, 100.0)));
        assert_eq!(editor.light().origin(), DVec2::new(204.0, 296.0));
        assert!((editor.light().root().mid_angle() + PI / 2.0).abs() < 1e-9);

        editor.apply(EditorAction::ToggleRotation);
        editor.update(still, Some(DVec2::new(400.0, 296.0)));
        assert!((editor.light().root().mid_angle() + PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_draws_obstacle() {
        let mut editor = editor();
        editor.apply(EditorAction::CycleKind);
        editor.apply(EditorAction::CycleKind);
        editor.apply(EditorAction::CycleKind);
        assert_eq!(editor.kind(), ObstacleKind::SolidBox);

        editor.begin_drawing(DVec2::new(300.0, 320.0));
        assert!(editor.is_drawing());
        assert_eq!(editor.obstacles().len(), 1);

        editor.update(Movement::default(), Some(DVec2::new(260.0, 280.0)));
        editor.finish_drawing(DVec2::new(260.0, 280.0));
        assert!(!editor.is_drawing());
        assert_eq!(editor.obstacles().len(), 1);

        // Box normalized from the drag corners
        let verts = editor.obstacles()[0].find_verts();
        assert_eq!(verts[0], DVec2::new(260.0, 280.0));
        assert_eq!(verts[2], DVec2::new(300.0, 280.0));
    }

    #[test]
    fn test_obstacle_casts_shadow_after_update() {
        let mut editor = editor();
        editor.add_obstacle(Box::new(SolidLine::from_coords(250.0, 250.0, 250.0, 350.0)));
        editor.update(Movement::default(), Some(DVec2::new(400.0, 300.0)));

        assert!(editor.light().sectors().any(|(_, s)| s.incident.is_some()));
    }
}
