use ls_raster::RasterStack;
use rayon::prelude::*;

/// Rule applied to pixels claimed by two or more planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every claimant loses the pixel; the tessellator later splits the
    /// overlap along its medial line.
    #[default]
    ClearAll,
    /// The claimant with the lowest rank keeps the pixel.
    Priority,
}

const NO_WINNER: u32 = u32::MAX;
const CLEARED: u32 = u32::MAX - 1;

/// Resolves contested pixels in place and returns how many there were.
///
/// `ranks[i]` is the priority of plane `i` (lower wins); ties fall back to the
/// plane index. The result does not depend on plane order beyond these ranks.
pub fn clear_overlaps(stack: &mut RasterStack, policy: OverlapPolicy, ranks: &[usize]) -> usize {
    assert_eq!(ranks.len(), stack.len(), "one rank per plane");
    let width = stack.grid.width;
    if stack.len() < 2 || width == 0 {
        return 0;
    }

    // Phase 1: per-pixel winner, read-only over all planes.
    let planes = &stack.planes;
    let mut winner = vec![NO_WINNER; stack.grid.len()];
    let contested: usize = winner
        .par_chunks_mut(width)
        .enumerate()
        .map(|(y, row)| {
            let mut contested = 0;
            for (x, slot) in row.iter_mut().enumerate() {
                let idx = y * width + x;
                let mut claims = 0_usize;
                let mut best: Option<usize> = None;
                for (i, plane) in planes.iter().enumerate() {
                    if !plane.data()[idx] {
                        continue;
                    }
                    claims += 1;
                    best = match best {
                        Some(b) if (ranks[b], b) <= (ranks[i], i) => Some(b),
                        _ => Some(i),
                    };
                }
                if claims < 2 {
                    continue;
                }
                contested += 1;
                *slot = match policy {
                    OverlapPolicy::ClearAll => CLEARED,
                    OverlapPolicy::Priority => best.map_or(CLEARED, |b| b as u32),
                };
            }
            contested
        })
        .sum();

    if contested == 0 {
        return 0;
    }

    // Phase 2: each plane drops the contested pixels it did not win. Rows are
    // disjoint so workers never share a cell.
    for (i, plane) in stack.planes.iter_mut().enumerate() {
        plane
            .data_mut()
            .par_chunks_mut(width)
            .zip(winner.par_chunks(width))
            .for_each(|(row, won)| {
                for (px, &w) in row.iter_mut().zip(won) {
                    if w != NO_WINNER && w != i as u32 {
                        *px = false;
                    }
                }
            });
    }

    log::debug!("cleared {contested} contested pixels ({policy:?})");
    contested
}

#[cfg(test)]
mod tests {
    use ls_core::{Image, Point2};
    use ls_raster::{PixelGrid, RasterStack};

    use crate::{OverlapPolicy, clear_overlaps};

    fn stack(planes: &[(&str, Vec<bool>)], width: usize) -> RasterStack {
        let height = planes[0].1.len() / width;
        let mut stack = RasterStack::new(PixelGrid {
            origin: Point2::new(0.0, 0.0),
            width,
            height,
        });
        for (name, data) in planes {
            stack.push(*name, Image::from_vec(width, height, data.clone()).expect("valid"));
        }
        stack
    }

    #[test]
    fn clear_all_drops_every_claim() {
        let mut s = stack(
            &[
                ("a", vec![true, true, false, false]),
                ("b", vec![false, true, true, false]),
                ("c", vec![false, true, false, false]),
            ],
            4,
        );

        let n = clear_overlaps(&mut s, OverlapPolicy::ClearAll, &[0, 1, 2]);
        assert_eq!(n, 1);
        assert_eq!(s.planes[0].data(), &[true, false, false, false]);
        assert_eq!(s.planes[1].data(), &[false, false, true, false]);
        assert_eq!(s.planes[2].data(), &[false, false, false, false]);
        assert!(s.claim_counts().data().iter().all(|&c| c <= 1));
    }

    #[test]
    fn priority_keeps_lowest_rank() {
        let mut s = stack(
            &[
                ("a", vec![true, true, false]),
                ("b", vec![false, true, true]),
            ],
            3,
        );

        // "b" ranks first even though it was registered second.
        let n = clear_overlaps(&mut s, OverlapPolicy::Priority, &[1, 0]);
        assert_eq!(n, 1);
        assert_eq!(s.planes[0].data(), &[true, false, false]);
        assert_eq!(s.planes[1].data(), &[false, true, true]);
    }

    #[test]
    fn result_is_independent_of_plane_order() {
        let a = vec![true, true, true, false, false, false];
        let b = vec![false, false, true, true, true, false];

        let mut forward = stack(&[("a", a.clone()), ("b", b.clone())], 6);
        let mut backward = stack(&[("b", b), ("a", a)], 6);
        clear_overlaps(&mut forward, OverlapPolicy::Priority, &[0, 1]);
        clear_overlaps(&mut backward, OverlapPolicy::Priority, &[1, 0]);

        assert_eq!(forward.plane("a"), backward.plane("a"));
        assert_eq!(forward.plane("b"), backward.plane("b"));
    }

    #[test]
    fn single_plane_is_untouched() {
        let mut s = stack(&[("a", vec![true, false])], 2);
        assert_eq!(clear_overlaps(&mut s, OverlapPolicy::ClearAll, &[0]), 0);
        assert_eq!(s.planes[0].data(), &[true, false]);
    }
}
