use crate::{Error, Point2};

/// Axis-aligned bounding box. `origin()` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Result<Option<Self>, Error> {
        let mut out: Option<Bounds> = None;
        for p in points {
            if !p.is_finite() {
                return Err(Error::NonFiniteCoordinate);
            }
            out = Some(match out {
                None => Bounds { min: p, max: p },
                Some(b) => b.including(p),
            });
        }
        Ok(out)
    }

    pub fn including(self, p: Point2) -> Self {
        Bounds {
            min: Point2::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point2::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    pub fn origin(&self) -> Point2 {
        self.min
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Expands outward to whole pixel coordinates.
    pub fn snapped_to_pixels(&self) -> Self {
        Bounds {
            min: Point2::new(self.min.x.floor(), self.min.y.floor()),
            max: Point2::new(self.max.x.ceil(), self.max.y.ceil()),
        }
    }

    /// Grid dimensions `(width, height)` in whole pixels, at least one pixel on
    /// each axis.
    pub fn pixel_dims(&self) -> (usize, usize) {
        let snapped = self.snapped_to_pixels();
        let w = snapped.width().max(1.0) as usize;
        let h = snapped.height().max(1.0) as usize;
        (w, h)
    }
}
