use glam::DVec2;

use crate::geometry::Line;
use crate::light::{Sector, SectorSeed};

use super::Obstacle;

/// An opaque wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidLine {
    pub line: Line,
}

impl SolidLine {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        SolidLine { line: Line::new(start, end) }
    }

    pub fn from_coords(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        SolidLine { line: Line::from_coords(start_x, start_y, end_x, end_y) }
    }
}

impl From<Line> for SolidLine {
    fn from(line: Line) -> Self {
        SolidLine { line }
    }
}

impl Obstacle for SolidLine {
    fn find_closest_point(&self, point: DVec2) -> DVec2 {
        self.line.find_closest_point(point)
    }

    fn find_clip_line(&self, _sector: &Sector) -> Line {
        self.line
    }

    fn interact(&self, _sector: &Sector) -> Vec<SectorSeed> {
        Vec::new()
    }

    fn find_verts(&self) -> Vec<DVec2> {
        vec![self.line.start, self.line.end]
    }
}
