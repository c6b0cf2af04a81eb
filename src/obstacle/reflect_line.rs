use glam::DVec2;

use crate::color::RayColor;
use crate::geometry::{Line, VectorExt};
use crate::light::{DEFAULT_RANGE, Sector, SectorSeed};

use super::{Obstacle, SolidLine};

/// A mirror. Blocks like a wall and sends back a reflected sector tinted by
/// `filter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectLine {
    pub wall: SolidLine,
    pub filter: RayColor,
}

impl ReflectLine {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self::with_filter(start, end, RayColor::PASS_ALL)
    }

    pub fn with_filter(start: DVec2, end: DVec2, filter: RayColor) -> Self {
        ReflectLine {
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

impl Obstacle for ReflectLine {
    fn find_closest_point(&self, point: DVec2) -> DVec2 {
        self.wall.find_closest_point(point)
    }

    fn find_clip_line(&self, sector: &Sector) -> Line {
        self.wall.find_clip_line(sector)
    }

    /// The reflected sector starts from the mirror image of the incoming
    /// origin, with its boundaries reflected and exchanged so left stays left.
    /// Its near edge is the incoming far edge; a converging sector collapses
    /// at the mirror and gets no far edge.
    fn interact(&self, sector: &Sector) -> Vec<SectorSeed> {
        let line = self.line();
        let tangent = line.direction;
        let normal = tangent.perpendicular_right();

        let proj = if sector.is_focusing() { 0.0 } else { DEFAULT_RANGE };

        vec![SectorSeed {
            origin: (sector.origin - line.start).mirror(tangent, normal) + line.start,
            field_left: sector.field_right.mirror(tangent, normal),
            field_right: sector.field_left.mirror(tangent, normal),
            clip_left: sector.proj_right,
            clip_right: sector.proj_left,
            proj_left: proj,
            proj_right: proj,
            color: sector.color & self.filter,
        }]
    }

    fn find_verts(&self) -> Vec<DVec2> {
        self.wall.find_verts()
    }
}
