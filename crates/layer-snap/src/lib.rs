//! Umbrella crate for the `layer-snap` workspace.
//!
//! Re-exports the snapping pipeline from `ls-snap` together with the geometry
//! and raster types it exchanges. The building blocks stay reachable under
//! their own crate names.

pub use ls_contour;
pub use ls_core;
pub use ls_label;
pub use ls_raster;

pub use ls_core::{Bounds, Image, ImageView, Point2, Polygon, Polyline, Ring, Vec2};
pub use ls_raster::{PixelGrid, RasterStack, rasterize_rings};
pub use ls_snap::*;
