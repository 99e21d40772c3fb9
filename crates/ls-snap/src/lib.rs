//! Snap hand-drawn layer polygons into a gap-free, non-overlapping
//! tessellation bounded by the pia and white-matter surfaces.
//!
//! The pipeline runs entirely at a working resolution:
//! 1. [`Geometries`] holds the world-space input and is scaled by
//!    [`SnapConfig::working_scale`].
//! 2. Each polygon is rasterized by pixel centers; contested pixels are
//!    resolved per [`OverlapPolicy`].
//! 3. Every pixel inside the envelope takes the label of its nearest claimed
//!    pixel; ties go to the layer ranked first in the layer order.
//! 4. Label regions are traced back to polygons, returned to world
//!    coordinates and clipped to the envelope.
//! 5. Boundaries between neighbors in the layer order come from the raster
//!    edges separating their labels.
//!
//! ```no_run
//! use ls_core::Point2;
//! use ls_snap::{Geometries, SnapConfig, snap_polygons};
//!
//! let p = |x: f64, y: f64| Point2::new(x, y);
//! let mut raw = Geometries::new();
//! raw.register_polygons([
//!     ("A", vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 5.0), p(0.0, 5.0)]),
//!     ("B", vec![p(0.0, 4.0), p(10.0, 4.0), p(10.0, 10.0), p(0.0, 10.0)]),
//! ])?;
//! raw.register_surface("pia", &[p(0.0, 10.0), p(10.0, 10.0)])?;
//! raw.register_surface("wm", &[p(0.0, 0.0), p(10.0, 0.0)])?;
//!
//! let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)?;
//! assert_eq!(result.boundaries.len(), 3);
//! # Ok::<(), ls_snap::Error>(())
//! ```

mod boundaries;
mod clip;
mod config;
mod diagnostics;
mod error;
mod geometries;
mod outputter;
mod pipeline;

pub use boundaries::Boundary;
pub use clip::Envelope;
pub use config::SnapConfig;
pub use diagnostics::Diagnostic;
pub use error::Error;
pub use geometries::{Area, Curve, Geometries, make_scale_transform, make_translate_transform};
pub use ls_label::OverlapPolicy;
pub use outputter::{ImageOutputter, ImageRecord};
pub use pipeline::{LayerPlan, SnapResult, check_inputs, snap_polygons};

/// Name of the upper reference surface.
pub const PIA: &str = "pia";
/// Name of the lower (white matter) reference surface.
pub const WM: &str = "wm";
