//! Vector operations on `glam::DVec2` and angle helpers.

use std::f64::consts::PI;

use glam::DVec2;

/// 2D vector operations that `glam` does not provide directly.
pub trait VectorExt {
    /// (-y, x): the perpendicular a quarter turn counter-clockwise.
    fn perpendicular_left(self) -> DVec2;
    /// (y, -x): the perpendicular a quarter turn clockwise.
    fn perpendicular_right(self) -> DVec2;
    /// Angle from the positive x axis, in (-pi, pi].
    fn angle(self) -> f64;
    /// Rotate about the origin, keeping length.
    fn rotate_by(self, angle: f64) -> DVec2;
    /// Rotate about `axis`.
    fn rotate_about(self, axis: DVec2, angle: f64) -> DVec2;
    /// Express this vector in the (possibly non-orthogonal) basis `i`, `j`.
    fn change_basis(self, i: DVec2, j: DVec2) -> DVec2;
    /// Inverse of [`VectorExt::change_basis`]: `x * i + y * j`.
    fn revert_basis(self, i: DVec2, j: DVec2) -> DVec2;
    /// Keep the component along `tangent`, negate the component along `normal`.
    fn mirror(self, tangent: DVec2, normal: DVec2) -> DVec2;
    fn is_parallel(self, other: DVec2) -> bool;
}

impl VectorExt for DVec2 {
    #[inline]
    fn perpendicular_left(self) -> DVec2 {
        DVec2::new(-self.y, self.x)
    }

    #[inline]
    fn perpendicular_right(self) -> DVec2 {
        DVec2::new(self.y, -self.x)
    }

    #[inline]
    fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    fn rotate_by(self, angle: f64) -> DVec2 {
        let angle = angle + self.angle();
        DVec2::new(angle.cos(), angle.sin()) * self.length()
    }

    fn rotate_about(self, axis: DVec2, angle: f64) -> DVec2 {
        (self - axis).rotate_by(angle) + axis
    }

    fn change_basis(self, i: DVec2, j: DVec2) -> DVec2 {
        let inv_det = 1.0 / (i.x * j.y - i.y * j.x);

        DVec2::new(
            (self.x * j.y - self.y * j.x) * inv_det,
            (self.y * i.x - self.x * i.y) * inv_det,
        )
    }

    #[inline]
    fn revert_basis(self, i: DVec2, j: DVec2) -> DVec2 {
        i * self.x + j * self.y
    }

    fn mirror(self, tangent: DVec2, normal: DVec2) -> DVec2 {
        let inv_det = 1.0 / (tangent.x * normal.y - tangent.y * normal.x);

        (tangent * (self.x * normal.y - self.y * normal.x)
            - normal * (self.y * tangent.x - self.x * tangent.y))
            * inv_det
    }

    #[inline]
    fn is_parallel(self, other: DVec2) -> bool {
        self.x * other.y == self.y * other.x
    }
}

/// Unit vector pointing along `angle`.
#[inline]
pub fn from_angle(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into [-pi, pi).
pub fn wrap_angle(angle: f64) -> f64 {
    angle - (angle / (PI * 2.0) + 0.5).floor() * PI * 2.0
}

/// Wrap an angle into [basis - pi, basis + pi).
pub fn wrap_angle_about(angle: f64, basis: f64) -> f64 {
    wrap_angle(angle - basis) + basis
}

/// Counter-clockwise sweep from `b` to `a`, in [0, 2pi).
///
/// `_keep_positive` is accepted for call-site compatibility and has no effect;
/// the result is already non-negative.
pub fn angle_dif(a: f64, b: f64, _keep_positive: bool) -> f64 {
    wrap_angle_about(a - b, PI)
}
