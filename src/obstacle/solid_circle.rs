use std::f64::consts::PI;

use glam::DVec2;

use crate::geometry::{Circle, Line, from_angle};
use crate::light::{Sector, SectorSeed};

use super::Obstacle;

/// An opaque disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidCircle {
    pub circle: Circle,
}

impl SolidCircle {
    pub fn new(origin: DVec2, radius: f64) -> Self {
        SolidCircle { circle: Circle::new(origin, radius) }
    }

    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.circle.origin
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.circle.radius
    }
}

impl From<Circle> for SolidCircle {
    fn from(circle: Circle) -> Self {
        SolidCircle { circle }
    }
}

impl Obstacle for SolidCircle {
    fn find_closest_point(&self, point: DVec2) -> DVec2 {
        let diff = point - self.origin();
        let dist = diff.length();

        if dist <= self.radius() {
            return point;
        }

        self.origin() + diff * self.radius() / dist
    }

    /// Chord between the two tangent points seen from the sector origin.
    ///
    /// The tangent points are where the disc meets the circle whose diameter
    /// runs from the disc's centre to the viewer.
    fn find_clip_line(&self, sector: &Sector) -> Line {
        let diff = sector.origin - self.origin();
        let dist = diff.length();

        if dist <= self.radius() {
            return Line::degenerate(self.origin());
        }

        let construction = Circle::new(self.origin() + diff * 0.5, dist * 0.5);
        match self.circle.find_intersections(&construction).as_slice() {
            &[a, b] => Line::new(a, b),
            _ => Line::degenerate(self.origin()),
        }
    }

    fn interact(&self, _sector: &Sector) -> Vec<SectorSeed> {
        Vec::new()
    }

    fn find_verts(&self) -> Vec<DVec2> {
        let count = (self.radius().sqrt() * 4.0).max(4.0) as usize;

        let point = |i: usize| self.origin() + from_angle(PI * 2.0 * i as f64 / count as f64) * self.radius();

        let mut verts = Vec::with_capacity(count * 2);
        for i in 0..count {
            verts.push(point(i));
            verts.push(point((i + 1) % count));
        }
        verts
    }
}
