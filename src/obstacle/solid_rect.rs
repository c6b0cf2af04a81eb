use glam::DVec2;

use crate::geometry::Line;
use crate::light::{Sector, SectorSeed};

use super::Obstacle;

/// An opaque axis-aligned box. `top` is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidRect {
    pub top_left: DVec2,
    pub top_right: DVec2,
    pub bottom_left: DVec2,
    pub bottom_right: DVec2,
    pub center: DVec2,
}

impl SolidRect {
    pub fn new(top_left: DVec2, bottom_right: DVec2) -> Self {
        SolidRect {
            top_left,
            top_right: DVec2::new(bottom_right.x, top_left.y),
            bottom_left: DVec2::new(top_left.x, bottom_right.y),
            bottom_right,
            center: (top_left + bottom_right) / 2.0,
        }
    }

    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + width, y + height))
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.top_left.y
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.top_left.x
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom_right.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.bottom_right.x
    }
}

impl Obstacle for SolidRect {
    fn find_closest_point(&self, point: DVec2) -> DVec2 {
        if point.x <= self.left() {
            if point.y <= self.top() {
                return self.top_left;
            }
            if point.y >= self.bottom() {
                return self.bottom_left;
            }
            return DVec2::new(self.left(), point.y);
        }

        if point.x >= self.right() {
            if point.y <= self.top() {
                return self.top_right;
            }
            if point.y >= self.bottom() {
                return self.bottom_right;
            }
            return DVec2::new(self.right(), point.y);
        }

        if point.y <= self.top() {
            return DVec2::new(point.x, self.top());
        }
        if point.y >= self.bottom() {
            return DVec2::new(point.x, self.bottom());
        }

        point
    }

    /// The silhouette seen from the sector origin: a diagonal from a corner
    /// region, a side from an edge band, nothing from inside.
    fn find_clip_line(&self, sector: &Sector) -> Line {
        let o = sector.origin;

        if o.x <= self.left() {
            if o.y <= self.top() {
                return Line::new(self.bottom_left, self.top_right);
            }
            if o.y >= self.bottom() {
                return Line::new(self.top_left, self.bottom_right);
            }
            return Line::new(self.top_left, self.bottom_left);
        }

        if o.x >= self.right() {
            if o.y <= self.top() {
                return Line::new(self.top_left, self.bottom_right);
            }
            if o.y >= self.bottom() {
                return Line::new(self.bottom_left, self.top_right);
            }
            return Line::new(self.top_right, self.bottom_right);
        }

        if o.y <= self.top() {
            return Line::new(self.top_left, self.top_right);
        }
        if o.y >= self.bottom() {
            return Line::new(self.bottom_left, self.bottom_right);
        }

        Line::degenerate(self.center)
    }

    fn interact(&self, _sector: &Sector) -> Vec<SectorSeed> {
        Vec::new()
    }

    fn find_verts(&self) -> Vec<DVec2> {
        vec![
            self.top_left,
            self.top_right,
            self.top_right,
            self.bottom_right,
            self.bottom_right,
            self.bottom_left,
            self.bottom_left,
            self.top_left,
        ]
    }
}
