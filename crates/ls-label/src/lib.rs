//! Raster label operations for layer snapping.
//!
//! Pipeline order:
//! 1. [`clear_overlaps`] removes contested claims from a [`RasterStack`]
//!    according to an [`OverlapPolicy`].
//! 2. [`tessellate`] assigns every pixel of an envelope mask to the layer with
//!    the nearest surviving claim, using exact squared Euclidean distances.
//!
//! Priority: every plane carries a rank (lower wins). Ranks decide contested
//! pixels under [`OverlapPolicy::Priority`] and break distance ties in
//! [`tessellate`]. Equal ranks fall back to plane index.
//!
//! Labels are plane indices; [`BACKGROUND`] marks pixels outside the mask or
//! out of reach of any claim.
//!
//! [`RasterStack`]: ls_raster::RasterStack

mod edt;
mod label;
mod morph;
mod overlap;
mod tessellate;

pub use edt::squared_edt;
pub use label::{BACKGROUND, Label, LabelImage, label_pixel_counts};
pub use morph::dilate3x3_mask;
pub use overlap::{OverlapPolicy, clear_overlaps};
pub use tessellate::tessellate;
