//! A single angular sector of propagating light.
//!
//! Distances are measured from the sector origin along the two unit boundary
//! vectors. The near ("clip") edge joins `field_left * clip_left` to
//! `field_right * clip_right`, the far ("projection") edge does the same with
//! the projection distances. A zero pair means that edge is absent.

use glam::DVec2;

use crate::color::RayColor;
use crate::geometry::{Line, VectorExt};
use crate::obstacle::ObstacleId;

use super::{CLIP_EPSILON, SectorId};

/// Everything needed to create a sector, minus its place in the tree.
///
/// Obstacles hand these back from [`crate::obstacle::Obstacle::interact`];
/// the tree links them in below the sector that hit the obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorSeed {
    pub origin: DVec2,
    /// Need not be unit length; normalized when the sector is created.
    pub field_left: DVec2,
    pub field_right: DVec2,
    pub clip_left: f64,
    pub clip_right: f64,
    pub proj_left: f64,
    pub proj_right: f64,
    pub color: RayColor,
}

#[derive(Debug, Clone)]
pub struct Sector {
    pub origin: DVec2,
    pub field_left: DVec2,
    pub field_right: DVec2,
    pub clip_left: f64,
    pub clip_right: f64,
    pub proj_left: f64,
    pub proj_right: f64,
    pub depth: usize,
    pub color: RayColor,
    /// Obstacle whose interaction produced this sector (never occludes it).
    pub source: Option<ObstacleId>,
    /// Obstacle currently bounding the far edge of this sector.
    pub incident: Option<ObstacleId>,
    pub parent: Option<SectorId>,
    pub children: Vec<SectorId>,
    /// Triangle list covering the lit area, filled in once casting finishes.
    verts: Vec<DVec2>,
}

impl Sector {
    /// A root sector with its near edge at the origin and its far edge at
    /// `range`. Boundary vectors must already be unit length.
    pub(crate) fn root(origin: DVec2, field_left: DVec2, field_right: DVec2, range: f64, color: RayColor) -> Self {
        Sector {
            origin,
            field_left,
            field_right,
            clip_left: 0.0,
            clip_right: 0.0,
            proj_left: range,
            proj_right: range,
            depth: 0,
            color,
            source: None,
            incident: None,
            parent: None,
            children: Vec::new(),
            verts: Vec::new(),
        }
    }

    /// A child of `parent` built from `seed`.
    ///
    /// A child cast from the same point as its parent carries the parent's
    /// incident obstacle as it stands right now: it lies in front of that
    /// obstacle until something nearer clips it.
    pub(crate) fn child(parent: &Sector, parent_id: SectorId, seed: SectorSeed, source: Option<ObstacleId>) -> Self {
        let incident = if parent.origin == seed.origin {
            parent.incident
        } else {
            None
        };

        Sector {
            origin: seed.origin,
            field_left: seed.field_left.normalize(),
            field_right: seed.field_right.normalize(),
            clip_left: seed.clip_left,
            clip_right: seed.clip_right,
            proj_left: seed.proj_left,
            proj_right: seed.proj_right,
            depth: parent.depth + 1,
            color: seed.color,
            source,
            incident,
            parent: Some(parent_id),
            children: Vec::new(),
            verts: Vec::new(),
        }
    }

    /// Seed for a child sharing this sector's origin and colour.
    pub(crate) fn seed(
        &self,
        field_left: DVec2,
        field_right: DVec2,
        clip: (f64, f64),
        proj: (f64, f64),
    ) -> SectorSeed {
        SectorSeed {
            origin: self.origin,
            field_left,
            field_right,
            clip_left: clip.0,
            clip_right: clip.1,
            proj_left: proj.0,
            proj_right: proj.1,
            color: self.color,
        }
    }

    /// The near edge lies beyond the far edge on at least one side, so the
    /// sector describes a converging volume.
    #[inline]
    pub fn is_focusing(&self) -> bool {
        self.clip_left > self.proj_left || self.clip_right > self.proj_right
    }

    #[inline]
    pub fn left_angle(&self) -> f64 {
        self.field_left.angle()
    }

    #[inline]
    pub fn right_angle(&self) -> f64 {
        self.field_right.angle()
    }

    pub fn mid_angle(&self) -> f64 {
        (self.field_left + self.field_right).angle()
    }

    /// Near edge relative to the origin.
    pub fn clip_line(&self) -> Line {
        Line::new(self.field_left * self.clip_left, self.field_right * self.clip_right)
    }

    /// Far edge relative to the origin.
    pub fn proj_line(&self) -> Line {
        Line::new(self.field_left * self.proj_left, self.field_right * self.proj_right)
    }

    /// Render triangles (world space). Empty until the sector has been cast.
    pub fn verts(&self) -> &[DVec2] {
        &self.verts
    }

    /// Polygon edges of [`Sector::verts`] as a line list.
    pub fn edge_verts(&self) -> Vec<DVec2> {
        let count = self.verts.len();
        let mut edges = Vec::with_capacity(count * 2);
        for i in 0..count {
            edges.push(self.verts[i]);
            edges.push(self.verts[(i + 1) % count]);
        }
        edges
    }

    /// Part of a world-space obstacle edge that lies inside this sector,
    /// relative to the origin.
    ///
    /// The result runs from the left boundary side to the right boundary
    /// side. Edges outside the wedge, in front of the near edge, behind the
    /// far edge, or shorter than [`CLIP_EPSILON`] give `None`.
    pub fn find_line_intersection(&self, line: &Line) -> Option<Line> {
        if line.length == 0.0 {
            return None;
        }

        let mut start = line.start;
        let mut end = line.end;

        let diff = start - self.origin;
        let end_dir = (end - self.origin).change_basis(diff, diff.perpendicular_left());

        let neg = self.is_focusing();

        if (end_dir.y < 0.0) != neg {
            std::mem::swap(&mut start, &mut end);
        }

        let mut srel = (start - self.origin).change_basis(self.field_left, self.field_right);
        let mut erel = (end - self.origin).change_basis(self.field_left, self.field_right);

        if (srel.x <= 0.0 && erel.x <= 0.0) || (srel.y <= 0.0 && erel.y <= 0.0) {
            return None;
        }

        if srel.x < 0.0 || srel.y < 0.0 || erel.x < 0.0 || erel.y < 0.0 {
            let left = Line::from_coords(0.0, 0.0, 1.0, 0.0);
            let right = Line::from_coords(0.0, 0.0, 0.0, 1.0);

            let lrel = Line::new(srel, erel);

            if srel.x < 0.0 || srel.y < 0.0 {
                srel = lrel.find_intersection(&left);
            }
            if erel.x < 0.0 || erel.y < 0.0 {
                erel = lrel.find_intersection(&right);
            }

            if srel.x < 0.0 && erel.y < 0.0 {
                return None;
            }
        }

        let has_clip = self.clip_left > 0.0 && self.clip_right > 0.0;
        let before_clip = |p: DVec2| {
            (has_clip && self.clip_right * (1.0 - p.x / self.clip_left) > p.y) != neg
        };

        let sclp = before_clip(srel);
        let eclp = before_clip(erel);

        if sclp && eclp {
            return None;
        }

        if sclp || eclp {
            let lrel = Line::new(srel, erel);
            let hit = lrel.find_intersection(&Line::from_coords(self.clip_left, 0.0, 0.0, self.clip_right));
            if sclp {
                srel = hit;
            } else {
                erel = hit;
            }
        }

        let no_proj = self.proj_left == 0.0 || self.proj_right == 0.0;
        let beyond_proj = |p: DVec2| {
            (no_proj || self.proj_right * (1.0 - p.x / self.proj_left) < p.y) != neg
        };

        let sprj = beyond_proj(srel);
        let eprj = beyond_proj(erel);

        if sprj && eprj {
            return None;
        }

        if sprj || eprj {
            let lrel = Line::new(srel, erel);
            let hit = lrel.find_intersection(&Line::from_coords(self.proj_left, 0.0, 0.0, self.proj_right));
            if sprj {
                srel = hit;
            } else {
                erel = hit;
            }
        }

        let out = Line::new(srel, erel).revert_basis(self.field_left, self.field_right);

        (out.length > CLIP_EPSILON).then_some(out)
    }

    /// Shrink this sector to the angular extent of `line` (origin-relative,
    /// as returned by [`Sector::find_line_intersection`]) and return seeds
    /// for the uncovered slices either side of it.
    ///
    /// The slices keep this sector's near and far edges: their new boundary
    /// distances are found by intersecting the original edges with the new
    /// boundary direction.
    pub(crate) fn clip(&mut self, line: &Line) -> Vec<SectorSeed> {
        let clip_line = self.clip_line();
        let proj_line = self.proj_line();

        let has_clip = self.clip_left != 0.0 && self.clip_right != 0.0;
        let has_proj = self.proj_left != 0.0 && self.proj_right != 0.0;

        let lrel = line.change_basis(self.field_left, self.field_right);

        let mut seeds = Vec::with_capacity(2);

        if lrel.start.y > CLIP_EPSILON {
            let dir = line.start.normalize();
            let ray = Line::new(DVec2::ZERO, line.start);

            let clip = if has_clip { clip_line.find_intersection(&ray).length() } else { 0.0 };
            let proj = if has_proj { proj_line.find_intersection(&ray).length() } else { self.proj_right };

            seeds.push(self.seed(
                self.field_left,
                dir,
                (self.clip_left, clip),
                (self.proj_left, proj),
            ));
        }

        if lrel.end.x > CLIP_EPSILON {
            let dir = line.end.normalize();
            let ray = Line::new(DVec2::ZERO, line.end);

            let clip = if has_clip { clip_line.find_intersection(&ray).length() } else { 0.0 };
            let proj = if has_proj { proj_line.find_intersection(&ray).length() } else { self.proj_left };

            seeds.push(self.seed(
                dir,
                self.field_right,
                (clip, self.clip_right),
                (proj, self.proj_right),
            ));
        }

        self.update_field(line.start, line.end);

        seeds
    }

    /// Point the boundaries at `left` and `right` (origin-relative) and end
    /// the sector there, re-deriving the near edge if it had one.
    fn update_field(&mut self, left: DVec2, right: DVec2) {
        let clip_line = self.clip_line();

        self.field_left = left.normalize();
        self.field_right = right.normalize();

        self.proj_left = left.length();
        self.proj_right = right.length();

        if self.clip_left != 0.0 && self.clip_right != 0.0 {
            let left_ray = Line::new(DVec2::ZERO, left);
            let right_ray = Line::new(DVec2::ZERO, right);

            self.clip_left = clip_line.find_intersection(&left_ray).length();
            self.clip_right = clip_line.find_intersection(&right_ray).length();
        }
    }

    /// Build the render triangles from the final boundary distances.
    pub(crate) fn find_vertices(&mut self) {
        if self.depth == 0 || (self.clip_left < 0.0 && self.clip_right < 0.0) {
            self.verts.clear();
            return;
        }

        let origin = self.origin;

        let clip_l = origin + self.field_left * self.clip_left;
        let clip_r = origin + self.field_right * self.clip_right;

        let proj_l = origin + self.field_left * self.proj_left;
        let proj_r = origin + self.field_right * self.proj_right;

        self.verts = if self.clip_left == 0.0 || self.clip_right == 0.0 {
            vec![origin, proj_l, proj_r]
        } else if self.proj_left == 0.0 || self.proj_right == 0.0 {
            vec![origin, clip_l, clip_r]
        } else if (self.clip_left > 0.0 && self.clip_right > 0.0)
            || (self.proj_left < 0.0 && self.proj_right < 0.0)
        {
            vec![clip_l, proj_l, proj_r, clip_l, proj_r, clip_r]
        } else {
            vec![origin, proj_l, proj_r, origin, clip_l, clip_r]
        };
    }
}
