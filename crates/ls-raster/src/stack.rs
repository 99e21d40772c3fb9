use ls_core::Image;

use crate::PixelGrid;

/// One boolean plane per layer, all aligned to the same grid.
///
/// Plane `i` belongs to `names[i]`; order is registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStack {
    pub grid: PixelGrid,
    pub names: Vec<String>,
    pub planes: Vec<Image<bool>>,
}

impl RasterStack {
    pub fn new(grid: PixelGrid) -> Self {
        Self {
            grid,
            names: Vec::new(),
            planes: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, plane: Image<bool>) {
        assert_eq!(
            (plane.width(), plane.height()),
            (self.grid.width, self.grid.height),
            "plane dimensions must match the stack grid"
        );
        self.names.push(name.into());
        self.planes.push(plane);
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn plane(&self, name: &str) -> Option<&Image<bool>> {
        self.index_of(name).map(|i| &self.planes[i])
    }

    /// Number of planes claiming each pixel.
    pub fn claim_counts(&self) -> Image<u16> {
        let mut counts = self.grid.blank(0u16);
        for plane in &self.planes {
            for (c, &set) in counts.data_mut().iter_mut().zip(plane.data()) {
                if set {
                    *c = c.saturating_add(1);
                }
            }
        }
        counts
    }

    /// Pixels set in each plane, in plane order.
    pub fn pixel_counts(&self) -> Vec<usize> {
        self.planes.iter().map(Image::count_set).collect()
    }
}

#[cfg(test)]
mod tests {
    use ls_core::{Image, Point2};

    use crate::{PixelGrid, RasterStack};

    #[test]
    fn claim_counts_sum_planes() {
        let grid = PixelGrid {
            origin: Point2::new(0.0, 0.0),
            width: 2,
            height: 1,
        };
        let mut stack = RasterStack::new(grid);
        stack.push("a", Image::from_vec(2, 1, vec![true, true]).expect("valid"));
        stack.push("b", Image::from_vec(2, 1, vec![false, true]).expect("valid"));

        assert_eq!(stack.claim_counts().data(), &[1, 2]);
        assert_eq!(stack.pixel_counts(), vec![2, 1]);
        assert_eq!(stack.index_of("b"), Some(1));
        assert!(stack.plane("c").is_none());
    }
}
