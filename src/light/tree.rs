//! The sector tree and the recursive cast that builds it.
//!
//! Sectors live in a flat arena indexed by [`SectorId`]; parent and child
//! links are indices. Each cast throws away everything below the root and
//! rebuilds it from scratch.

use std::f64::consts::PI;
use std::ops::Index;

use glam::DVec2;
use rayon::prelude::*;

use crate::color::RayColor;
use crate::geometry::{VectorExt, angle_dif, from_angle, wrap_angle};
use crate::obstacle::{Obstacle, ObstacleId};
use crate::render::{Primitive, RenderTarget};

use super::sector::{Sector, SectorSeed};
use super::{BEYOND_RANGE, DEFAULT_RANGE, DEPTH_LIMIT, SectorId, VISIBILITY_CUTOFF};

/// How the root's quarter-turn wedges are cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastMode {
    #[default]
    Sequential,
    /// Cast each wedge on the rayon pool. Produces the same tree.
    Parallel,
}

/// A point light and the sectors it lit on the last cast.
#[derive(Debug, Clone)]
pub struct LightTree {
    nodes: Vec<Sector>,
    left_angle: f64,
    right_angle: f64,
    mode: CastMode,
}

impl LightTree {
    /// Light at `origin` facing `direction` (radians) with the given field of view.
    pub fn new(origin: DVec2, direction: f64, field_of_view: f64, color: RayColor) -> Self {
        let root = Sector::root(origin, DVec2::X, DVec2::X, DEFAULT_RANGE, color);
        let mut tree = LightTree {
            nodes: vec![root],
            left_angle: 0.0,
            right_angle: 0.0,
            mode: CastMode::default(),
        };
        tree.set_direction(direction, field_of_view);
        tree
    }

    /// Light at `origin` facing `target`.
    pub fn aimed_at(origin: DVec2, target: DVec2, field_of_view: f64, color: RayColor) -> Self {
        Self::new(origin, (target - origin).angle(), field_of_view, color)
    }

    pub fn with_mode(mut self, mode: CastMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: CastMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> CastMode {
        self.mode
    }

    pub fn origin(&self) -> DVec2 {
        self.nodes[0].origin
    }

    pub fn set_origin(&mut self, origin: DVec2) {
        self.nodes[0].origin = origin;
    }

    pub fn color(&self) -> RayColor {
        self.nodes[0].color
    }

    pub fn set_color(&mut self, color: RayColor) {
        self.nodes[0].color = color;
    }

    /// Angle swept from the left boundary to the right one, in [0, 2pi).
    /// Zero stands for a full turn.
    pub fn field_of_view(&self) -> f64 {
        angle_dif(self.right_angle, self.left_angle, false)
    }

    pub fn set_direction(&mut self, direction: f64, field_of_view: f64) {
        let half_fov = field_of_view / 2.0;

        let root = &mut self.nodes[0];
        root.field_left = from_angle(direction - half_fov);
        root.field_right = from_angle(direction + half_fov);

        self.left_angle = wrap_angle(direction - half_fov);
        self.right_angle = wrap_angle(direction + half_fov);
    }

    /// Point the light along `dir`, keeping the current field of view.
    pub fn aim(&mut self, dir: DVec2) {
        let fov = self.field_of_view();
        self.set_direction(dir.angle(), fov);
    }

    /// Rebuild the sector tree against `obstacles`.
    ///
    /// The slice is read but never modified; [`ObstacleId`]s in the result
    /// index into it.
    pub fn cast(&mut self, obstacles: &[Box<dyn Obstacle>]) {
        self.nodes.truncate(1);

        let root = &mut self.nodes[0];
        root.children.clear();
        root.incident = None;

        let root = &self.nodes[0];
        let all: Vec<usize> = (0..obstacles.len()).collect();
        let order = sort_by_distance(obstacles, &all, root.origin);

        let wedges = self.wedges();

        let subtrees: Vec<Vec<Sector>> = match self.mode {
            CastMode::Sequential => wedges
                .iter()
                .map(|&seed| cast_wedge(root, seed, obstacles, &order))
                .collect(),
            CastMode::Parallel => wedges
                .par_iter()
                .map(|&seed| cast_wedge(root, seed, obstacles, &order))
                .collect(),
        };

        for subtree in subtrees {
            self.graft(subtree);
        }

        self.nodes[0].find_vertices();

        log::debug!(
            "cast {} sectors over {} obstacles (max depth {})",
            self.nodes.len(),
            obstacles.len(),
            self.max_depth()
        );
    }

    /// The root's field of view cut into consecutive wedges of at most a
    /// quarter turn, since the clipping math is only stable within one.
    fn wedges(&self) -> Vec<SectorSeed> {
        let root = &self.nodes[0];

        let mut field = angle_dif(self.right_angle, self.left_angle, true);
        if field == 0.0 {
            field = PI * 2.0;
        }
        let count = (field * 2.0 / PI).ceil() as usize;

        let clip = (root.clip_left, root.clip_right);
        let proj = (root.proj_left, root.proj_right);

        let mut seeds = Vec::with_capacity(count);
        let mut last_angle = self.left_angle;
        let mut last_vec = root.field_left;

        for i in 0..count {
            let (next_angle, next_vec) = if i == count - 1 {
                (self.right_angle, root.field_right)
            } else {
                let angle = last_angle + PI / 2.0;
                (angle, from_angle(angle))
            };

            seeds.push(root.seed(last_vec, next_vec, clip, proj));

            last_angle = next_angle;
            last_vec = next_vec;
        }

        seeds
    }

    /// Append a wedge subtree cast in its own arena, rebasing its links.
    fn graft(&mut self, subtree: Vec<Sector>) {
        let offset = self.nodes.len();

        for (i, mut sector) in subtree.into_iter().enumerate() {
            sector.parent = if i == 0 {
                Some(SectorId::ROOT)
            } else {
                sector.parent.map(|p| SectorId(p.0 + offset))
            };
            for child in &mut sector.children {
                child.0 += offset;
            }
            self.nodes.push(sector);
        }

        self.nodes[0].children.push(SectorId(offset));
    }

    pub fn root(&self) -> &Sector {
        &self.nodes[0]
    }

    pub fn get(&self, id: SectorId) -> Option<&Sector> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: SectorId) -> Option<&Sector> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    pub fn children(&self, id: SectorId) -> impl Iterator<Item = (SectorId, &Sector)> + '_ {
        self.get(id)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&c| (c, &self.nodes[c.0]))
    }

    /// All sectors in creation order, root first.
    pub fn sectors(&self) -> impl Iterator<Item = (SectorId, &Sector)> + '_ {
        self.nodes.iter().enumerate().map(|(i, s)| (SectorId(i), s))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|s| s.depth).max().unwrap_or(0)
    }

    /// Submit every lit sector's triangles to `target`.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        self.visit(|sector| {
            target.submit(
                Primitive::Light { color: sector.color, origin: sector.origin },
                sector.verts(),
            );
        });
    }

    /// Submit every lit sector's outline to `target`.
    pub fn render_outlines<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        self.visit(|sector| target.submit(Primitive::SectorOutline, &sector.edge_verts()));
    }

    /// Drawable sectors, parents before children.
    fn visit(&self, mut f: impl FnMut(&Sector)) {
        let mut stack = vec![SectorId::ROOT];

        while let Some(id) = stack.pop() {
            let sector = &self.nodes[id.0];
            if sector.depth >= DEPTH_LIMIT {
                continue;
            }

            if sector.depth > 0 && !sector.verts().is_empty() {
                f(sector);
            }

            stack.extend(sector.children.iter().rev());
        }
    }
}

impl Index<SectorId> for LightTree {
    type Output = Sector;

    fn index(&self, id: SectorId) -> &Sector {
        &self.nodes[id.0]
    }
}

/// Obstacle indices from `order`, nearest first as seen from `origin`.
/// Equal distances keep their incoming order.
fn sort_by_distance(obstacles: &[Box<dyn Obstacle>], order: &[usize], origin: DVec2) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = order
        .iter()
        .map(|&i| ((obstacles[i].find_closest_point(origin) - origin).length(), i))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Cast one root wedge into a private arena whose first entry is the wedge.
fn cast_wedge(root: &Sector, seed: SectorSeed, obstacles: &[Box<dyn Obstacle>], order: &[usize]) -> Vec<Sector> {
    let wedge = Sector::child(root, SectorId::ROOT, seed, root.source);
    let mut caster = Caster {
        nodes: vec![wedge],
        obstacles,
    };
    caster.cast(SectorId(0), root.origin, order, 0);
    caster.nodes
}

struct Caster<'a> {
    nodes: Vec<Sector>,
    obstacles: &'a [Box<dyn Obstacle>],
}

impl Caster<'_> {
    fn spawn(&mut self, parent: SectorId, seed: SectorSeed, source: Option<ObstacleId>) -> SectorId {
        let child = Sector::child(&self.nodes[parent.0], parent, seed, source);
        let id = SectorId(self.nodes.len());
        self.nodes.push(child);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Cast sector `id`, considering obstacles from `order[first..]`.
    ///
    /// Obstacles before `first` were already found nearer than whatever
    /// produced this sector, so they cannot touch it.
    fn cast(&mut self, id: SectorId, parent_origin: DVec2, order: &[usize], first: usize) {
        let origin = self.nodes[id.0].origin;

        let sorted;
        let order = if origin != parent_origin {
            sorted = sort_by_distance(self.obstacles, order, origin);
            sorted.as_slice()
        } else {
            order
        };

        let sector = &self.nodes[id.0];
        let depth = sector.depth;
        let source = sector.source;

        if sector.clip_left < 0.0 && sector.clip_right < 0.0 {
            if depth < DEPTH_LIMIT {
                self.cast_focus(id, order, first);
            }
        } else if depth < DEPTH_LIMIT {
            for (i, &index) in order.iter().enumerate().skip(first) {
                let obstacle_id = ObstacleId(index);
                if source == Some(obstacle_id) {
                    continue;
                }

                let edge = self.obstacles[index].find_clip_line(&self.nodes[id.0]);
                let Some(hit) = self.nodes[id.0].find_line_intersection(&edge) else {
                    continue;
                };

                let seeds = self.nodes[id.0].clip(&hit);
                let children: Vec<SectorId> = seeds
                    .into_iter()
                    .map(|seed| self.spawn(id, seed, source))
                    .collect();

                for child in children {
                    self.cast(child, origin, order, i + 1);
                }

                self.nodes[id.0].incident = Some(obstacle_id);
            }

            if let Some(incident) = self.nodes[id.0].incident {
                self.cast_interaction(id, incident, order);
            }

            self.cast_beyond(id, order);
        } else {
            log::trace!("sector {} reached the depth limit", id.0);
        }

        self.nodes[id.0].find_vertices();
    }

    /// Both near distances are negative: the light converges behind the
    /// origin. Continue it on the far side.
    fn cast_focus(&mut self, id: SectorId, order: &[usize], first: usize) {
        let sector = &self.nodes[id.0];
        let seed = sector.seed(
            -sector.field_left,
            -sector.field_right,
            (-sector.clip_left, -sector.clip_right),
            ((-sector.proj_left).max(0.0), (-sector.proj_right).max(0.0)),
        );
        let source = sector.source;
        let origin = sector.origin;

        let child = self.spawn(id, seed, source);
        self.cast(child, origin, order, first);
    }

    /// Let the obstacle bounding this sector reflect or filter it.
    fn cast_interaction(&mut self, id: SectorId, incident: ObstacleId, order: &[usize]) {
        let sector = &self.nodes[id.0];
        let origin = sector.origin;

        let seeds: Vec<SectorSeed> = self.obstacles[incident.0]
            .interact(sector)
            .into_iter()
            .filter(|seed| {
                !seed.color.is_black()
                    && (seed.clip_left < VISIBILITY_CUTOFF || seed.clip_right < VISIBILITY_CUTOFF)
            })
            .collect();

        let children: Vec<SectorId> = seeds
            .into_iter()
            .map(|seed| self.spawn(id, seed, Some(incident)))
            .collect();

        for child in children {
            self.cast(child, origin, order, 0);
        }
    }

    /// A sector with a near edge but no far edge also lights the region
    /// behind it: cast that with the boundaries reversed.
    fn cast_beyond(&mut self, id: SectorId, order: &[usize]) {
        let sector = &self.nodes[id.0];
        if !(sector.proj_left == 0.0
            && sector.proj_right == 0.0
            && sector.clip_left > 0.0
            && sector.clip_right > 0.0)
        {
            return;
        }

        let seed = sector.seed(
            -sector.field_right,
            -sector.field_left,
            (0.0, 0.0),
            (BEYOND_RANGE, BEYOND_RANGE),
        );
        let source = sector.source;
        let origin = sector.origin;

        let child = self.spawn(id, seed, source);
        self.cast(child, origin, order, 0);
    }
}
