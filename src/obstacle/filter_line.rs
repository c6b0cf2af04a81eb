use glam::DVec2;

use crate::color::RayColor;
use crate::geometry::Line;
use crate::light::{DEFAULT_RANGE, Sector, SectorSeed};

use super::{Obstacle, SolidLine};

/// A coloured pane. Light passing through keeps only the channels in
/// `filter`; light already exactly that colour passes straight through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterLine {
    pub wall: SolidLine,
    pub filter: RayColor,
}

impl FilterLine {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self::with_filter(start, end, RayColor::PASS_ALL)
    }

    pub fn with_filter(start: DVec2, end: DVec2, filter: RayColor) -> Self {
        FilterLine {
            wall: SolidLine::new(start, end),
            filter,
        }
    }

    pub fn from_coords(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self::new(DVec2::new(start_x, start_y), DVec2::new(end_x, end_y))
    }

    #[inline]
    pub fn line(&self) -> &Line {
        &self.wall.line
    }
}

impl Obstacle for FilterLine {
    fn find_closest_point(&self, point: DVec2) -> DVec2 {
        self.wall.find_closest_point(point)
    }

    fn find_clip_line(&self, sector: &Sector) -> Line {
        if sector.color == self.filter {
            return Line::degenerate(DVec2::ZERO);
        }
        self.wall.find_clip_line(sector)
    }

    /// Continue the sector on the far side of the pane.
    fn interact(&self, sector: &Sector) -> Vec<SectorSeed> {
        let mut seed = sector.seed(
            sector.field_left,
            sector.field_right,
            (sector.proj_left, sector.proj_right),
            (DEFAULT_RANGE, DEFAULT_RANGE),
        );
        seed.color = sector.color & self.filter;
        vec![seed]
    }

    fn find_verts(&self) -> Vec<DVec2> {
        self.wall.find_verts()
    }
}
