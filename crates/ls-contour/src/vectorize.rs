use ls_core::{Polygon, Ring};
use ls_label::{Label, LabelImage, label_pixel_counts};

use crate::lattice::Lattice;

const NO_COMPONENT: u32 = u32::MAX;

/// Polygons traced from a label image, in grid-local lattice coordinates.
#[derive(Debug, Clone, Default)]
pub struct LabelRegions {
    pub width: usize,
    pub height: usize,
    /// `polygons[l]` holds one polygon per 4-connected region of label `l`,
    /// ordered by the raster position of each region's first pixel.
    pub polygons: Vec<Vec<Polygon>>,
    pub pixel_counts: Vec<usize>,
}

impl LabelRegions {
    pub fn regions(&self, label: Label) -> &[Polygon] {
        self.polygons
            .get(label as usize)
            .map_or(&[], Vec::as_slice)
    }

    pub fn num_regions(&self, label: Label) -> usize {
        self.regions(label).len()
    }
}

/// Traces every region of labels `0..num_labels`.
///
/// Background and out-of-range labels produce nothing. Exterior rings have
/// positive signed area (clockwise on screen), holes negative. A hole touching
/// its exterior at a single vertex stays a separate ring.
pub fn vectorize(labels: &LabelImage, num_labels: usize) -> LabelRegions {
    let (width, height) = (labels.width(), labels.height());
    let mut out = LabelRegions {
        width,
        height,
        polygons: vec![Vec::new(); num_labels],
        pixel_counts: vec![0; num_labels],
    };
    if width == 0 || height == 0 || num_labels == 0 {
        return out;
    }

    let valid = |l: Label| (l as usize) < num_labels;
    let (comp, num_components) = label_components(labels, &valid);
    out.pixel_counts = label_pixel_counts(labels, num_labels);

    let lat = Lattice::new(width, height);
    let mut exists = vec![0_u8; lat.num_vertices()];
    for (v, bits) in exists.iter_mut().enumerate() {
        for dir in 0..4_u8 {
            let Some(r) = lat.right_pixel(v, dir) else {
                continue;
            };
            let inside = labels.data()[r];
            if !valid(inside) {
                continue;
            }
            let outside = lat.left_pixel(v, dir).map(|p| labels.data()[p]);
            if outside != Some(inside) {
                *bits |= 1 << dir;
            }
        }
    }

    let mut used = vec![0_u8; lat.num_vertices()];
    let mut slot: Vec<Option<(usize, usize)>> = vec![None; num_components];
    for y in 0..height {
        for x in 0..width {
            let c = comp[y * width + x];
            if c == NO_COMPONENT {
                continue;
            }
            // Every ring has at least one +x edge, i.e. the top edge of a region pixel.
            let v = lat.vertex(x, y);
            if exists[v] & 1 == 0 || used[v] & 1 != 0 {
                continue;
            }

            let ring = trace_ring(&lat, &exists, &comp, &mut used, v);
            match slot[c as usize] {
                Some((label, i)) => out.polygons[label][i].holes.push(ring),
                None => {
                    let label = labels.data()[y * width + x] as usize;
                    slot[c as usize] = Some((label, out.polygons[label].len()));
                    out.polygons[label].push(Polygon::new(ring, Vec::new()));
                }
            }
        }
    }

    log::debug!(
        "vectorized {width}x{height} labels into {num_components} regions"
    );
    out
}

/// 4-connected components of equal valid labels, numbered in raster order.
fn label_components(labels: &LabelImage, valid: &impl Fn(Label) -> bool) -> (Vec<u32>, usize) {
    let (width, height) = (labels.width(), labels.height());
    let data = labels.data();
    let mut comp = vec![NO_COMPONENT; data.len()];
    let mut stack = Vec::new();
    let mut next = 0_u32;

    for start in 0..data.len() {
        if comp[start] != NO_COMPONENT || !valid(data[start]) {
            continue;
        }
        let label = data[start];
        comp[start] = next;
        stack.push(start);

        while let Some(p) = stack.pop() {
            let (x, y) = (p % width, p / width);
            let neighbors = [
                (x > 0).then(|| p - 1),
                (x + 1 < width).then(|| p + 1),
                (y > 0).then(|| p - width),
                (y + 1 < height).then(|| p + width),
            ];
            for nb in neighbors.into_iter().flatten() {
                if comp[nb] == NO_COMPONENT && data[nb] == label {
                    comp[nb] = next;
                    stack.push(nb);
                }
            }
        }
        next += 1;
    }

    (comp, next as usize)
}

/// Follows directed boundary edges from the +x edge at `start` until it
/// returns, keeping only corner vertices.
fn trace_ring(lat: &Lattice, exists: &[u8], comp: &[u32], used: &mut [u8], start: usize) -> Ring {
    let mut corners = Vec::new();
    let (mut v, mut dir) = (start, 0_u8);

    for _ in 0..exists.len() * 4 {
        used[v] |= 1 << dir;
        let Some(next) = lat.step(v, dir) else {
            break;
        };
        let Some(next_dir) = turn(lat, exists, comp, next, dir) else {
            log::warn!("open boundary at lattice vertex {:?}", lat.coords(next));
            break;
        };
        if next_dir != dir {
            corners.push(lat.point(next));
        }
        if next == start && next_dir == 0 {
            break;
        }
        if used[next] & (1 << next_dir) != 0 {
            log::warn!("boundary revisits lattice vertex {:?}", lat.coords(next));
            break;
        }
        v = next;
        dir = next_dir;
    }

    let origin = lat.point(start);
    if let Some(pos) = corners.iter().position(|&p| p == origin) {
        corners.rotate_left(pos);
    }
    Ring { points: corners }
}

/// Next direction at vertex `v` after arriving along `dir`.
///
/// Turns toward the region first. At a pinch vertex, where the region occupies
/// two diagonal pixels, the ring turns away when both pixels belong to the same
/// region, which splits the pinch into an exterior and a touching hole.
fn turn(lat: &Lattice, exists: &[u8], comp: &[u32], v: usize, dir: u8) -> Option<u8> {
    let has = |d: u8| exists[v] & (1 << d) != 0;
    let inward = (dir + 1) & 3;
    let away = (dir + 3) & 3;

    if has(inward) && has(away) {
        let here = lat.right_pixel(v, inward).map(|p| comp[p]);
        let there = lat.right_pixel(v, away).map(|p| comp[p]);
        return Some(if here == there { away } else { inward });
    }

    [inward, dir, away].into_iter().find(|&d| has(d))
}
