//! Light propagation: a tree of angular sectors cast from a point light.
//!
//! The root sector is split into quarter-turn wedges, each wedge is clipped
//! against the obstacles nearest-first, and mirrors and filters spawn
//! secondary sectors that are cast in turn. See [`LightTree::cast`].

pub mod sector;
pub mod tree;

pub use sector::{Sector, SectorSeed};
pub use tree::{CastMode, LightTree};

/// Deepest level a sector can be created at.
pub const DEPTH_LIMIT: usize = 256;

/// Far edge distance for a fresh light and for light leaving a mirror or filter.
pub const DEFAULT_RANGE: f64 = 4096.0;

/// Shortest edge (and smallest wedge slice) the clipper will act on.
pub const CLIP_EPSILON: f64 = 1.0 / 65536.0;

/// Secondary sectors whose near edge starts this far out on both sides are dropped.
pub const VISIBILITY_CUTOFF: f64 = 1024.0;

/// Far edge distance of the sector covering the region behind an open-ended one.
pub const BEYOND_RANGE: f64 = 1024.0;

/// Index of a sector in its [`LightTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorId(pub usize);

impl SectorId {
    pub const ROOT: SectorId = SectorId(0);
}
