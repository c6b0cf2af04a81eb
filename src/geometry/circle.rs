//! Circles and circle/circle intersection

use glam::DVec2;

use super::vector::VectorExt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub origin: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(origin: DVec2, radius: f64) -> Self {
        Circle { origin, radius }
    }

    pub fn translate(&self, offset: DVec2) -> Self {
        Circle::new(self.origin + offset, self.radius)
    }

    pub fn mirror(&self, tangent: DVec2, normal: DVec2) -> Self {
        Circle::new(self.origin.mirror(tangent, normal), self.radius)
    }

    pub fn rotate(&self, angle: f64) -> Self {
        Circle::new(self.origin.rotate_by(angle), self.radius)
    }

    pub fn rotate_about(&self, axis: DVec2, angle: f64) -> Self {
        Circle::new(self.origin.rotate_about(axis, angle), self.radius)
    }

    pub fn contains(&self, point: DVec2) -> bool {
        (point - self.origin).length() <= self.radius
    }

    pub fn is_intersecting(&self, other: &Circle) -> bool {
        let dist = (other.origin - self.origin).length();
        dist <= self.radius + other.radius && dist >= (self.radius - other.radius).abs()
    }

    /// Points where the two circle outlines meet.
    ///
    /// Projects onto the radical axis between the two centres and solves the
    /// shared chord. Returns no points when the circles are apart or one lies
    /// inside the other, one point when they touch externally, two otherwise.
    pub fn find_intersections(&self, other: &Circle) -> Vec<DVec2> {
        let diff = other.origin - self.origin;
        let dist = diff.length();

        if dist == 0.0
            || dist > self.radius + other.radius
            || dist < (self.radius - other.radius).abs()
        {
            return Vec::new();
        }

        if dist == self.radius + other.radius {
            return vec![self.origin + diff * (self.radius / dist)];
        }

        let a = (self.radius * self.radius - other.radius * other.radius + dist * dist) / (2.0 * dist);
        let h = (self.radius * self.radius - a * a).sqrt();

        let mid = self.origin + diff * (a / dist);

        vec![
            DVec2::new(mid.x + h * diff.y / dist, mid.y - h * diff.x / dist),
            DVec2::new(mid.x - h * diff.y / dist, mid.y + h * diff.x / dist),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_two_points() {
        let a = Circle::new(DVec2::ZERO, 5.0);
        let b = Circle::new(DVec2::new(8.0, 0.0), 5.0);

        let points = a.find_intersections(&b);
        assert_eq!(points.len(), 2);
        for p in &points {
            assert!((p.length() - 5.0).abs() < TOL);
            assert!(((*p - b.origin).length() - 5.0).abs() < TOL);
            assert!((p.x - 4.0).abs() < TOL);
        }
        assert!((points[0].y + points[1].y).abs() < TOL);
    }

    #[test]
    fn test_touching_gives_one_point() {
        let a = Circle::new(DVec2::ZERO, 2.0);
        let b = Circle::new(DVec2::new(5.0, 0.0), 3.0);

        let points = a.find_intersections(&b);
        assert_eq!(points.len(), 1);
        assert!((points[0] - DVec2::new(2.0, 0.0)).length() < TOL);
    }

    #[test]
    fn test_apart_or_nested_gives_none() {
        let a = Circle::new(DVec2::ZERO, 2.0);
        assert!(a.find_intersections(&Circle::new(DVec2::new(10.0, 0.0), 1.0)).is_empty());
        assert!(!a.is_intersecting(&Circle::new(DVec2::new(10.0, 0.0), 1.0)));

        let big = Circle::new(DVec2::ZERO, 10.0);
        let small = Circle::new(DVec2::new(1.0, 0.0), 1.0);
        assert!(big.find_intersections(&small).is_empty());
        assert!(small.find_intersections(&big).is_empty());
    }

    #[test]
    fn test_contains() {
        let c = Circle::new(DVec2::new(1.0, 1.0), 2.0);
        assert!(c.contains(DVec2::new(2.0, 2.0)));
        assert!(!c.contains(DVec2::new(4.0, 1.0)));
    }
}
