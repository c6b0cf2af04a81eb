//! Things that block, reflect or tint light.
//!
//! Every obstacle answers the same four questions for the caster: how close
//! it comes to a point, which edge of it a sector sees, what secondary light
//! it produces when it bounds a sector, and how to draw its outline.

mod filter_line;
mod reflect_line;
mod solid_circle;
mod solid_line;
mod solid_rect;

pub use filter_line::FilterLine;
pub use reflect_line::ReflectLine;
pub use solid_circle::SolidCircle;
pub use solid_line::SolidLine;
pub use solid_rect::SolidRect;

use std::fmt;

use glam::DVec2;

use crate::geometry::Line;
use crate::light::{Sector, SectorSeed};
use crate::render::{Primitive, RenderTarget};

/// Index of an obstacle in the slice handed to [`crate::light::LightTree::cast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub usize);

pub trait Obstacle: Send + Sync + fmt::Debug {
    /// Point on the obstacle nearest to `point`. Used to order obstacles
    /// nearest-first before clipping.
    fn find_closest_point(&self, point: DVec2) -> DVec2;

    /// Edge that casts this obstacle's shadow as seen from the sector's
    /// origin, in world space. A zero-length line means no shadow.
    fn find_clip_line(&self, sector: &Sector) -> Line;

    /// Secondary light produced where `sector` meets this obstacle.
    fn interact(&self, sector: &Sector) -> Vec<SectorSeed>;

    /// Outline as a line list.
    fn find_verts(&self) -> Vec<DVec2>;

    fn render(&self, target: &mut dyn RenderTarget) {
        target.submit(Primitive::ObstacleOutline, &self.find_verts());
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::f64::consts::FRAC_1_SQRT_2;

    use glam::DVec2;

    use crate::color::RayColor;
    use crate::light::{Sector, SectorId, SectorSeed};

    /// Depth-one quarter wedge at `origin` facing +x, reaching `range`.
    pub fn wedge(origin: DVec2, range: f64, color: RayColor) -> Sector {
        let root = Sector::root(origin, DVec2::X, DVec2::X, range, color);
        let seed = SectorSeed {
            origin,
            field_left: DVec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            field_right: DVec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            clip_left: 0.0,
            clip_right: 0.0,
            proj_left: range,
            proj_right: range,
            color,
        };
        Sector::child(&root, SectorId::ROOT, seed, None)
    }
}
