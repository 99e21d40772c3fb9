use ls_core::Image;
use ls_raster::RasterStack;
use rayon::prelude::*;

use crate::{BACKGROUND, Label, LabelImage, squared_edt};

/// Assigns each pixel inside `mask` the label of the nearest claimed pixel.
///
/// Claimed pixels inside the mask keep their own label. Distances are exact
/// squared Euclidean pixel distances; ties go to the lowest `(rank, plane)`.
/// Planes are visited in that order and a later plane only wins on a strictly
/// smaller distance, so the outcome is deterministic under any thread count.
///
/// Pixels outside the mask, or with no claimed pixel anywhere, are
/// [`BACKGROUND`].
pub fn tessellate(stack: &RasterStack, mask: &Image<bool>, ranks: &[usize]) -> LabelImage {
    assert_eq!(ranks.len(), stack.len(), "one rank per plane");
    assert_eq!(
        (mask.width(), mask.height()),
        (stack.grid.width, stack.grid.height),
        "mask must match the stack grid"
    );

    let n = stack.grid.len();
    let mut best_d = vec![f64::INFINITY; n];
    let mut labels = vec![BACKGROUND; n];

    let mut order: Vec<usize> = (0..stack.len()).collect();
    order.sort_by_key(|&i| (ranks[i], i));

    for i in order {
        let plane = &stack.planes[i];
        if plane.count_set() == 0 {
            log::debug!("plane {:?} has no claimed pixels", stack.names[i]);
            continue;
        }
        let dist = squared_edt(&plane.as_view());
        let label = i as Label;

        best_d
            .par_iter_mut()
            .zip(labels.par_iter_mut())
            .zip(dist.data().par_iter())
            .zip(mask.data().par_iter())
            .for_each(|(((best, lab), &d), &inside)| {
                if inside && d < *best {
                    *best = d;
                    *lab = label;
                }
            });
    }

    Image::from_vec(stack.grid.width, stack.grid.height, labels)
        .expect("label buffer matches grid dimensions")
}

#[cfg(test)]
mod tests {
    use ls_core::{Image, Point2};
    use ls_raster::{PixelGrid, RasterStack};

    use crate::{BACKGROUND, OverlapPolicy, clear_overlaps, tessellate};

    fn column_stack(height: usize, rows: &[(&str, std::ops::Range<usize>)]) -> RasterStack {
        let width = 3;
        let mut stack = RasterStack::new(PixelGrid {
            origin: Point2::new(0.0, 0.0),
            width,
            height,
        });
        for (name, range) in rows {
            let data: Vec<bool> = (0..width * height)
                .map(|i| range.contains(&(i / width)))
                .collect();
            stack.push(*name, Image::from_vec(width, height, data).expect("valid"));
        }
        stack
    }

    fn column(labels: &Image<u32>) -> Vec<u32> {
        (0..labels.height())
            .map(|y| *labels.get(1, y).expect("in bounds"))
            .collect()
    }

    #[test]
    fn gap_splits_at_midline() {
        // a: rows 0..4, b: rows 8..12, gap rows 4..8.
        let stack = column_stack(12, &[("a", 0..4), ("b", 8..12)]);
        let mask = Image::new_fill(3, 12, true);

        let labels = tessellate(&stack, &mask, &[0, 1]);
        assert_eq!(column(&labels), vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
        assert!(labels.data().iter().all(|&l| l != BACKGROUND));
    }

    #[test]
    fn ties_follow_rank() {
        // Row 2 is equidistant from both layers.
        let stack = column_stack(5, &[("a", 0..2), ("b", 3..5)]);
        let mask = Image::new_fill(3, 5, true);

        assert_eq!(column(&tessellate(&stack, &mask, &[0, 1]))[2], 0);
        assert_eq!(column(&tessellate(&stack, &mask, &[1, 0]))[2], 1);
    }

    #[test]
    fn overlap_cleared_then_split() {
        // a: rows 0..6, b: rows 4..10, overlap rows 4..6.
        let mut stack = column_stack(10, &[("a", 0..6), ("b", 4..10)]);
        clear_overlaps(&mut stack, OverlapPolicy::ClearAll, &[0, 1]);
        let mask = Image::new_fill(3, 10, true);

        let labels = tessellate(&stack, &mask, &[0, 1]);
        assert_eq!(column(&labels), vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn mask_leaves_background() {
        let stack = column_stack(4, &[("a", 0..1)]);
        let mut mask = Image::new_fill(3, 4, true);
        *mask.get_mut(1, 3).expect("in bounds") = false;

        let labels = tessellate(&stack, &mask, &[0]);
        assert_eq!(column(&labels), vec![0, 0, 0, BACKGROUND]);
    }

    #[test]
    fn empty_stack_is_all_background() {
        let stack = column_stack(4, &[("a", 0..0)]);
        let mask = Image::new_fill(3, 4, true);
        let labels = tessellate(&stack, &mask, &[0]);
        assert!(labels.data().iter().all(|&l| l == BACKGROUND));
    }
}
