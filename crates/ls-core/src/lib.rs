//! Foundational primitives for layer snapping.
//!
//! ## Pixel Grids
//! [`Image`] is a dense row-major grid. Pixel `(x, y)` is column `x`, row `y`
//! and covers the cell `[x, x + 1] x [y, y + 1]` in grid coordinates. Its
//! center `(x + 0.5, y + 0.5)` is the sample point used by rasterization.
//!
//! ## World Coordinates
//! World `x` maps to grid columns and world `y` to grid rows; there is no axis
//! flip. A [`Bounds`] origin translates grid coordinates back to world space.
//!
//! ## Rings
//! [`Ring`] stores a closed ring without repeating the first vertex. Positive
//! signed area (shoelace) marks exterior rings produced by tracing; holes are
//! negative.

mod bounds;
mod error;
mod geom;
mod image;

pub use bounds::Bounds;
pub use error::Error;
pub use geom::{Point2, Polygon, Polyline, Ring, Vec2, segments_cross};
pub use image::{Image, ImageView};
