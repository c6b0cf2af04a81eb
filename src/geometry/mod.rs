//! Geometry kernel: vectors, line segments and circles in double precision.
//!
//! Everything above this layer (obstacles, light sectors) is written in terms
//! of these primitives. Degenerate inputs produce sentinel values (zero-length
//! lines, empty intersection lists, non-finite travel) rather than errors.

pub mod circle;
pub mod line;
pub mod vector;

pub use circle::Circle;
pub use line::Line;
pub use vector::{VectorExt, angle_dif, from_angle, wrap_angle, wrap_angle_about};
