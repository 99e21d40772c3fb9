//! Polygon rasterization at a working resolution.
//!
//! A pixel belongs to a polygon iff its center lies inside the polygon under
//! the even-odd rule, applied to the exterior and all holes together. Polygons
//! thinner than a pixel can therefore vanish; this is the discretization
//! policy, and callers report empty planes rather than repairing them.
//!
//! Rows are sampled at `origin.y + row + 0.5`. Edge crossings use the
//! half-open rule `(a.y <= yc) != (b.y <= yc)` so vertices on a scanline are
//! counted exactly once.

mod grid;
mod scanline;
mod stack;

pub use grid::PixelGrid;
pub use scanline::{rasterize_polygon, rasterize_rings};
pub use stack::RasterStack;
