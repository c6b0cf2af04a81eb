//! Line segments

use glam::DVec2;

use super::vector::VectorExt;

/// A line segment with its length and unit direction cached at construction.
///
/// A zero-length segment carries a zero direction. Code that needs a
/// "nothing here" result returns one of these rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
    pub length: f64,
    pub direction: DVec2,
}

impl Line {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        let diff = end - start;
        let length = diff.length();
        let direction = if length > 0.0 { diff / length } else { DVec2::ZERO };

        Line { start, end, length, direction }
    }

    pub fn from_coords(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self::new(DVec2::new(start_x, start_y), DVec2::new(end_x, end_y))
    }

    /// Segment starting at `start` running `length` along `direction`.
    pub fn from_direction(start: DVec2, direction: DVec2, length: f64) -> Self {
        let direction = direction.normalize_or_zero();
        Line {
            start,
            end: start + direction * length,
            length,
            direction,
        }
    }

    /// Zero-length segment at `point`.
    pub fn degenerate(point: DVec2) -> Self {
        Self::new(point, point)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length == 0.0
    }

    pub fn translate(&self, offset: DVec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    pub fn change_basis(&self, i: DVec2, j: DVec2) -> Self {
        Self::new(self.start.change_basis(i, j), self.end.change_basis(i, j))
    }

    pub fn revert_basis(&self, i: DVec2, j: DVec2) -> Self {
        Self::new(self.start.revert_basis(i, j), self.end.revert_basis(i, j))
    }

    pub fn mirror(&self, tangent: DVec2, normal: DVec2) -> Self {
        Self::new(self.start.mirror(tangent, normal), self.end.mirror(tangent, normal))
    }

    pub fn rotate(&self, angle: f64) -> Self {
        Self::new(self.start.rotate_by(angle), self.end.rotate_by(angle))
    }

    pub fn rotate_about(&self, axis: DVec2, angle: f64) -> Self {
        Self::new(
            self.start.rotate_about(axis, angle),
            self.end.rotate_about(axis, angle),
        )
    }

    pub fn is_parallel(&self, other: &Line) -> bool {
        self.direction.is_parallel(other.direction)
    }

    /// Distance along this line (from `start`) to where it crosses the
    /// infinite extension of `other`.
    ///
    /// Not guarded: parallel lines give a non-finite result.
    pub fn find_intersection_travel(&self, other: &Line) -> f64 {
        let od = self.start - other.start;
        let denom = self.direction.x * other.direction.y - self.direction.y * other.direction.x;

        (other.direction.x * od.y - other.direction.y * od.x) / denom
    }

    /// Point where the infinite extensions of both lines cross.
    pub fn find_intersection(&self, other: &Line) -> DVec2 {
        self.start + self.direction * self.find_intersection_travel(other)
    }

    /// Whether the two bounded segments cross.
    pub fn intersects(&self, other: &Line) -> bool {
        let od = self.start - other.start;
        let denom = self.direction.x * other.direction.y - self.direction.y * other.direction.x;

        let a = (other.direction.x * od.y - other.direction.y * od.x) / denom;
        let b = (self.direction.x * od.y - self.direction.y * od.x) / denom;

        a >= 0.0 && b >= 0.0 && a <= self.length && b <= other.length
    }

    /// Closest point on the segment to `point`.
    pub fn find_closest_point(&self, point: DVec2) -> DVec2 {
        if self.is_degenerate() {
            return self.start;
        }

        let perp = Line::new(point, point + self.direction.perpendicular_right());
        let travel = self.find_intersection_travel(&perp).clamp(0.0, self.length);

        self.start + self.direction * travel
    }
}
