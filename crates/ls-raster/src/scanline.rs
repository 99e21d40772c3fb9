use ls_core::{Image, Point2, Polygon, Ring};

use crate::PixelGrid;

#[derive(Debug, Clone, Copy)]
struct Edge {
    a: Point2,
    b: Point2,
    y_min: f64,
    y_max: f64,
}

/// Rasterizes a polygon (exterior plus holes) by pixel centers.
pub fn rasterize_polygon(polygon: &Polygon, grid: &PixelGrid) -> Image<bool> {
    rasterize_rings(polygon.rings(), grid)
}

/// Rasterizes a set of rings under the even-odd rule.
pub fn rasterize_rings<'a>(rings: impl IntoIterator<Item = &'a Ring>, grid: &PixelGrid) -> Image<bool> {
    let mut out = grid.blank(false);
    if grid.is_empty() {
        return out;
    }

    let mut edges: Vec<Edge> = rings
        .into_iter()
        .flat_map(|ring| ring.edges())
        .filter(|(a, b)| a.y != b.y)
        .map(|(a, b)| Edge {
            a,
            b,
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
        })
        .collect();
    if edges.is_empty() {
        return out;
    }
    edges.sort_by(|l, r| l.y_min.total_cmp(&r.y_min));

    let mut active: Vec<Edge> = Vec::new();
    let mut next_edge = 0_usize;
    let mut crossings: Vec<f64> = Vec::new();

    for y in 0..grid.height {
        let yc = grid.origin.y + y as f64 + 0.5;

        while next_edge < edges.len() && edges[next_edge].y_min <= yc {
            active.push(edges[next_edge]);
            next_edge += 1;
        }
        active.retain(|e| e.y_max > yc);
        if active.is_empty() {
            if next_edge == edges.len() {
                break;
            }
            continue;
        }

        crossings.clear();
        for e in &active {
            if (e.a.y <= yc) != (e.b.y <= yc) {
                let t = (yc - e.a.y) / (e.b.y - e.a.y);
                crossings.push(e.a.x + t * (e.b.x - e.a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);

        let row = out.row_mut(y);
        for span in crossings.chunks_exact(2) {
            let (start, end) = column_span(span[0], span[1], grid);
            row[start..end].fill(true);
        }
    }

    out
}

/// Columns whose centers fall in `[x0, x1)`.
fn column_span(x0: f64, x1: f64, grid: &PixelGrid) -> (usize, usize) {
    let w = grid.width as f64;
    let start = (x0 - grid.origin.x - 0.5).ceil().clamp(0.0, w) as usize;
    let end = (x1 - grid.origin.x - 0.5).ceil().clamp(0.0, w) as usize;
    (start, end.max(start))
}
