use ls_core::{Bounds, Error, Image, Point2};

/// Pixel-aligned grid placed in working coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    pub origin: Point2,
    pub width: usize,
    pub height: usize,
}

impl PixelGrid {
    /// Grid covering `bounds` with its origin snapped down to whole pixels.
    /// Fails with [`Error::GridTooLarge`] above `max_pixels`.
    pub fn covering(bounds: &Bounds, max_pixels: usize) -> Result<Self, Error> {
        let snapped = bounds.snapped_to_pixels();
        let (width, height) = bounds.pixel_dims();
        match width.checked_mul(height) {
            Some(n) if n <= max_pixels => Ok(Self {
                origin: snapped.origin(),
                width,
                height,
            }),
            _ => Err(Error::GridTooLarge { width, height }),
        }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center of pixel `(x, y)` in working coordinates.
    pub fn cell_center(&self, x: usize, y: usize) -> Point2 {
        Point2::new(
            self.origin.x + x as f64 + 0.5,
            self.origin.y + y as f64 + 0.5,
        )
    }

    /// Working coordinates to grid-local coordinates.
    pub fn to_local(&self, p: Point2) -> Point2 {
        Point2::new(p.x - self.origin.x, p.y - self.origin.y)
    }

    /// Grid-local coordinates to working coordinates.
    pub fn to_working(&self, p: Point2) -> Point2 {
        Point2::new(p.x + self.origin.x, p.y + self.origin.y)
    }

    /// Pixel containing `p` (working coordinates), clamped into the grid.
    pub fn clamped_pixel(&self, p: Point2) -> (usize, usize) {
        let local = self.to_local(p);
        let x = local.x.floor().clamp(0.0, (self.width.max(1) - 1) as f64) as usize;
        let y = local.y.floor().clamp(0.0, (self.height.max(1) - 1) as f64) as usize;
        (x, y)
    }

    pub fn blank<T: Clone>(&self, value: T) -> Image<T> {
        Image::new_fill(self.width, self.height, value)
    }
}
