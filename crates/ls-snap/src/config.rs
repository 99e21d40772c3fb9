use ls_label::OverlapPolicy;

use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapConfig {
    /// Pixels per world unit.
    pub working_scale: f64,
    pub overlap_policy: OverlapPolicy,
    /// Upper bound on working raster pixels.
    pub max_raster_pixels: usize,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            working_scale: 1.0,
            overlap_policy: OverlapPolicy::ClearAll,
            max_raster_pixels: 1 << 28,
        }
    }
}

impl SnapConfig {
    pub fn with_scale(working_scale: f64) -> Self {
        Self {
            working_scale,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.working_scale.is_finite() || self.working_scale <= 0.0 {
            return Err(Error::InvalidScale(self.working_scale));
        }
        Ok(())
    }
}
