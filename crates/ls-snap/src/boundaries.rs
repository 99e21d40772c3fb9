use ls_contour::{BoundarySelector, build_boundary_graph};
use ls_core::{Point2, Polyline};
use ls_label::{BACKGROUND, Label, LabelImage};
use ls_raster::PixelGrid;

use crate::clip::Envelope;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::{Error, PIA, WM};

/// Largest step, in working pixels, between surface samples.
const SAMPLE_STEP: f64 = 0.5;

/// Shared edge between two neighbors in the layer order. The first boundary
/// has `upper == "pia"`, the last `lower == "wm"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub upper: String,
    pub lower: String,
    pub path: Polyline,
}

/// Derives boundaries from a snapped label raster.
pub(crate) struct BoundaryExtractor<'a> {
    pub labels: &'a LabelImage,
    pub grid: &'a PixelGrid,
    pub working_scale: f64,
    pub envelope: &'a Envelope,
    pub pia: &'a Polyline,
    pub wm: &'a Polyline,
}

impl BoundaryExtractor<'_> {
    /// Ordered boundaries from pia to wm for `layers`, given as
    /// `(name, label)` in layer order.
    pub(crate) fn extract(
        &self,
        layers: &[(&str, Label)],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Boundary>, Error> {
        let (Some(&(top, top_label)), Some(&(bottom, bottom_label))) =
            (layers.first(), layers.last())
        else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(layers.len() + 1);
        out.push(self.surface_side(self.pia, PIA, top, top_label, true, diagnostics));

        for pair in layers.windows(2) {
            let ((upper, a), (lower, b)) = (pair[0], pair[1]);
            let path = self.pair_boundary(upper, a, lower, b, diagnostics)?;
            out.push(Boundary {
                upper: upper.to_owned(),
                lower: lower.to_owned(),
                path,
            });
        }

        out.push(self.surface_side(self.wm, WM, bottom, bottom_label, false, diagnostics));
        Ok(out)
    }

    fn to_world(&self, local: Point2) -> Point2 {
        let w = self.grid.to_working(local);
        Point2::new(w.x / self.working_scale, w.y / self.working_scale)
    }

    /// Longest raster boundary piece between labels `a` and `b` inside the
    /// envelope, running the same way as the pia surface.
    fn pair_boundary(
        &self,
        upper: &str,
        a: Label,
        lower: &str,
        b: Label,
        diagnostics: &mut Diagnostics,
    ) -> Result<Polyline, Error> {
        let graph = build_boundary_graph(self.labels, BoundarySelector::Pair(a, b));
        let pieces: Vec<Polyline> = graph
            .iter_edges()
            .flat_map(|e| {
                let world = Polyline::new(e.points.iter().map(|&p| self.to_world(p)).collect());
                self.envelope.clip_path(&world)
            })
            .collect();

        let parts = pieces.len();
        let Some(longest) = longest(pieces) else {
            return Err(Error::MissingBoundary {
                upper: upper.to_owned(),
                lower: lower.to_owned(),
            });
        };
        if parts > 1 {
            diagnostics.report(Diagnostic::FragmentedBoundary {
                upper: upper.to_owned(),
                lower: lower.to_owned(),
                parts,
            });
        }
        log::debug!(
            "boundary {upper}/{lower}: {} vertices, length {:.3}",
            longest.len(),
            longest.length()
        );
        Ok(self.align_with_pia(longest))
    }

    fn align_with_pia(&self, path: Polyline) -> Polyline {
        let (Some(p0), Some(p1), Some(s0), Some(s1)) =
            (self.pia.first(), self.pia.last(), path.first(), path.last())
        else {
            return path;
        };
        if (s1 - s0).dot(p1 - p0) < 0.0 {
            path.reversed()
        } else {
            path
        }
    }

    /// Stretch of `surface` bordering `label`, in the surface's own direction.
    /// Falls back to the whole surface when the layer never reaches it.
    fn surface_side(
        &self,
        surface: &Polyline,
        surface_name: &str,
        layer: &str,
        label: Label,
        surface_is_upper: bool,
        diagnostics: &mut Diagnostics,
    ) -> Boundary {
        let runs = self.surface_runs(surface, label);
        let parts = runs.len();
        let path = match longest(runs) {
            Some(path) => path,
            None => {
                diagnostics.report(Diagnostic::DetachedSurface {
                    layer: layer.to_owned(),
                    surface: surface_name.to_owned(),
                });
                surface.clone()
            }
        };

        let (upper, lower) = if surface_is_upper {
            (surface_name.to_owned(), layer.to_owned())
        } else {
            (layer.to_owned(), surface_name.to_owned())
        };
        if parts > 1 {
            diagnostics.report(Diagnostic::FragmentedBoundary {
                upper: upper.clone(),
                lower: lower.clone(),
                parts,
            });
        }
        Boundary { upper, lower, path }
    }

    /// Runs of densely sampled surface points whose pixel carries `label`.
    /// Each run keeps the original vertices it spans plus its two end samples.
    fn surface_runs(&self, surface: &Polyline, label: Label) -> Vec<Polyline> {
        let mut runs = Vec::new();
        let mut current: Vec<Point2> = Vec::new();
        let mut pending_end: Option<Point2> = None;

        let mut close = |current: &mut Vec<Point2>, pending_end: &mut Option<Point2>| {
            if let Some(end) = pending_end.take() {
                current.push(end);
            }
            let run = Polyline::new(core::mem::take(current));
            if run.distinct_len() >= 2 {
                runs.push(Polyline::new(dedup(&run.points)));
            }
        };

        for (p, is_vertex) in self.samples(surface) {
            if self.label_near(p) != label {
                close(&mut current, &mut pending_end);
                continue;
            }
            if current.is_empty() || is_vertex {
                pending_end = None;
                current.push(p);
            } else {
                pending_end = Some(p);
            }
        }
        close(&mut current, &mut pending_end);
        runs
    }

    /// World-space samples along `surface` no more than [`SAMPLE_STEP`]
    /// working pixels apart, flagged when they are original vertices.
    fn samples(&self, surface: &Polyline) -> Vec<(Point2, bool)> {
        let mut out = Vec::new();
        for w in surface.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let steps = ((a.distance(b) * self.working_scale) / SAMPLE_STEP).ceil().max(1.0) as usize;
            out.push((a, true));
            for k in 1..steps {
                out.push((a.lerp(b, k as f64 / steps as f64), false));
            }
        }
        if let Some(last) = surface.last() {
            out.push((last, true));
        }
        out
    }

    /// Label of the pixel under world point `p`; background pixels defer to
    /// the closest labeled 8-neighbor.
    fn label_near(&self, p: Point2) -> Label {
        let working = Point2::new(p.x * self.working_scale, p.y * self.working_scale);
        let (x, y) = self.grid.clamped_pixel(working);
        let at = |dx: isize, dy: isize| -> Option<Label> {
            let (nx, ny) = (x as isize + dx, y as isize + dy);
            if nx < 0 || ny < 0 {
                return None;
            }
            self.labels
                .get(nx as usize, ny as usize)
                .copied()
                .filter(|&l| l != BACKGROUND)
        };

        const NEIGHBORS: [(isize, isize); 9] = [
            (0, 0),
            (0, -1),
            (-1, 0),
            (1, 0),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];
        NEIGHBORS
            .iter()
            .find_map(|&(dx, dy)| at(dx, dy))
            .unwrap_or(BACKGROUND)
    }
}

/// Longest path; the first one wins ties.
fn longest(paths: Vec<Polyline>) -> Option<Polyline> {
    paths.into_iter().fold(None, |best, p| match best {
        Some(b) if b.length() >= p.length() => Some(b),
        _ => Some(p),
    })
}

fn dedup(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}
