use ls_contour::vectorize;
use ls_core::{Point2, Polygon, Ring, Vec2};
use ls_label::{Label, clear_overlaps, dilate3x3_mask, tessellate};
use ls_raster::rasterize_rings;
use rayon::prelude::*;

use crate::boundaries::{Boundary, BoundaryExtractor};
use crate::clip::Envelope;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geometries::{Area, Curve, Geometries, make_scale_transform, make_translate_transform};
use crate::outputter::{ImageOutputter, ImageRecord};
use crate::{Error, PIA, SnapConfig, WM};

/// Validated layer order, indexed by polygon registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPlan {
    /// Tie-break rank of every polygon; lower wins.
    pub ranks: Vec<usize>,
    /// Polygon index of each entry in the layer order.
    pub order: Vec<usize>,
}

/// Output of [`snap_polygons`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Snapped layers under their input names, plus `{layer}_pia` and
    /// `{layer}_wm` surfaces for every ordered layer.
    pub geometries: Geometries,
    /// Pia side, each neighbor pair, then the wm side.
    pub boundaries: Vec<Boundary>,
    pub diagnostics: Vec<Diagnostic>,
    pub images: Vec<ImageRecord>,
    /// Working pixels claimed by more than one polygon.
    pub contested_pixels: usize,
}

impl SnapResult {
    pub fn polygon(&self, name: &str) -> Option<&Area> {
        self.geometries.polygon(name)
    }

    pub fn boundary(&self, upper: &str, lower: &str) -> Option<&Boundary> {
        self.boundaries
            .iter()
            .find(|b| b.upper == upper && b.lower == lower)
    }
}

/// Inputs that passed [`check_inputs`].
struct Checked<'a> {
    plan: LayerPlan,
    pia: &'a Curve,
    wm: &'a Curve,
    envelope: Envelope,
}

/// Checks everything [`snap_polygons`] needs before any raster is built.
///
/// Polygons missing from `layer_order` rank after all listed ones, in
/// registration order.
pub fn check_inputs<S: AsRef<str>>(
    raw: &Geometries,
    layer_order: &[S],
    config: &SnapConfig,
) -> Result<LayerPlan, Error> {
    checked_inputs(raw, layer_order, config).map(|c| c.plan)
}

fn reference_surface<'a>(raw: &'a Geometries, name: &str) -> Result<&'a Curve, Error> {
    raw.surface(name)
        .ok_or_else(|| Error::MissingSurface(name.to_owned()))
}

/// Rejects an envelope ring that crosses itself or encloses no area.
fn check_envelope(envelope: &Envelope) -> Result<(), Error> {
    if let Some(edges) = envelope.ring().find_self_intersection() {
        return Err(Error::InvalidEnvelope { edges: Some(edges) });
    }
    if envelope.area() == 0.0 {
        return Err(Error::InvalidEnvelope { edges: None });
    }
    Ok(())
}

fn checked_inputs<'a, S: AsRef<str>>(
    raw: &'a Geometries,
    layer_order: &[S],
    config: &SnapConfig,
) -> Result<Checked<'a>, Error> {
    config.validate()?;
    let pia = reference_surface(raw, PIA)?;
    let wm = reference_surface(raw, WM)?;
    let envelope = Envelope::from_surfaces(pia, wm);
    check_envelope(&envelope)?;

    let names: Vec<&str> = raw.polygon_names().collect();
    let mut order = Vec::with_capacity(layer_order.len());
    for layer in layer_order {
        let layer = layer.as_ref();
        let Some(index) = names.iter().position(|&n| n == layer) else {
            return Err(Error::UnknownLayer(layer.to_owned()));
        };
        if order.contains(&index) {
            return Err(Error::DuplicateLayer(layer.to_owned()));
        }
        order.push(index);
    }

    let ranks = (0..names.len())
        .map(|i| {
            order
                .iter()
                .position(|&o| o == i)
                .unwrap_or(order.len() + i)
        })
        .collect();
    Ok(Checked {
        plan: LayerPlan { ranks, order },
        pia,
        wm,
        envelope,
    })
}

/// Snaps the polygons of `raw` into a tessellation of the pia/wm envelope.
///
/// `raw` must hold the `pia` and `wm` surfaces. `layer_order` lists layers
/// from pia to wm; an empty order yields snapped polygons but no boundaries.
pub fn snap_polygons<S: AsRef<str>>(
    raw: &Geometries,
    layer_order: &[S],
    config: &SnapConfig,
    images: Option<&mut dyn ImageOutputter>,
) -> Result<SnapResult, Error> {
    let Checked {
        plan,
        pia,
        wm,
        envelope,
    } = checked_inputs(raw, layer_order, config)?;
    let scale = config.working_scale;
    log::info!(
        "snapping {} polygons ({} ordered) at working scale {scale}",
        plan.ranks.len(),
        plan.order.len()
    );

    let working = raw.transform(make_scale_transform(scale));
    let mut stack = working.rasterize(config.max_raster_pixels)?;
    let grid = stack.grid;

    let mut diagnostics = Diagnostics::default();
    for (name, area) in raw.polygons() {
        if let Some(edges) = area.rings().find_map(Ring::find_self_intersection) {
            diagnostics.report(Diagnostic::SelfIntersectingLayer {
                layer: name.to_owned(),
                edges,
            });
        }
    }
    for (name, count) in stack.names.iter().zip(stack.pixel_counts()) {
        if count == 0 {
            diagnostics.report(Diagnostic::EmptyLayer {
                layer: name.clone(),
            });
        }
    }

    let contested = clear_overlaps(&mut stack, config.overlap_policy, &plan.ranks);
    log::debug!("{contested} contested pixels under {:?}", config.overlap_policy);
    if stack.pixel_counts().iter().all(|&c| c == 0) {
        return Err(Error::NoClaimedPixels);
    }

    let working_envelope = envelope.ring().map(make_scale_transform(scale));
    let mask = dilate3x3_mask(&rasterize_rings([&working_envelope], &grid).as_view());
    let labels = tessellate(&stack, &mask, &plan.ranks);
    let regions = vectorize(&labels, stack.len());

    let to_working = make_translate_transform(Vec2 {
        x: grid.origin.x,
        y: grid.origin.y,
    });
    let to_world = make_scale_transform(1.0 / scale);
    let snapped: Vec<Vec<Polygon>> = (0..stack.len())
        .into_par_iter()
        .map(|i| {
            let parts: Vec<Polygon> = regions
                .regions(i as Label)
                .iter()
                .map(|p| p.map(|q: Point2| to_world(to_working(q))))
                .collect();
            envelope.clip_polygons(&parts)
        })
        .collect();

    let mut geometries = Geometries::new();
    for (name, parts) in stack.names.iter().zip(snapped) {
        let empty = Diagnostic::EmptyLayer {
            layer: name.clone(),
        };
        if parts.is_empty() && !diagnostics.contains(&empty) {
            diagnostics.report(empty);
        } else if parts.len() > 1 {
            diagnostics.report(Diagnostic::FragmentedLayer {
                layer: name.clone(),
                parts: parts.len(),
            });
        }
        geometries.register_polygon(name.clone(), Area::from_parts(parts))?;
    }

    let layers: Vec<(&str, Label)> = plan
        .order
        .iter()
        .map(|&i| (stack.names[i].as_str(), i as Label))
        .collect();
    let boundaries = if layers.is_empty() {
        log::warn!("empty layer order; no boundaries extracted");
        Vec::new()
    } else {
        let extractor = BoundaryExtractor {
            labels: &labels,
            grid: &grid,
            working_scale: scale,
            envelope: &envelope,
            pia,
            wm,
        };
        extractor.extract(&layers, &mut diagnostics)?
    };

    for (i, &(name, _)) in layers.iter().enumerate() {
        geometries.register_surface(format!("{name}_{PIA}"), &boundaries[i].path.points)?;
        geometries.register_surface(format!("{name}_{WM}"), &boundaries[i + 1].path.points)?;
    }

    let images = match images {
        Some(out) => out.write_images(raw, &geometries)?,
        None => Vec::new(),
    };

    let diagnostics = diagnostics.into_vec();
    log::info!(
        "snapped {} layers into {} boundaries with {} diagnostics",
        stack.len(),
        boundaries.len(),
        diagnostics.len()
    );
    Ok(SnapResult {
        geometries,
        boundaries,
        diagnostics,
        images,
        contested_pixels: contested,
    })
}

#[cfg(test)]
mod tests {
    use geo::{Area as _, BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
    use ls_core::{Point2, Ring};

    use crate::{
        Area, Diagnostic, Error, Geometries, ImageOutputter, ImageRecord, OverlapPolicy,
        SnapConfig, check_inputs, snap_polygons,
    };

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        pts(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    /// Two 10-wide layers between wm at y = 0 and pia at y = 10.
    fn two_layers(a: (f64, f64), b: (f64, f64)) -> Geometries {
        let mut g = Geometries::new();
        g.register_polygons([
            ("A", rect(0.0, a.0, 10.0, a.1)),
            ("B", rect(0.0, b.0, 10.0, b.1)),
        ])
        .expect("valid layers");
        g.register_surface("pia", &pts(&[(0.0, 10.0), (10.0, 10.0)]))
            .expect("valid pia");
        g.register_surface("wm", &pts(&[(0.0, 0.0), (10.0, 0.0)]))
            .expect("valid wm");
        g
    }

    /// Three sloped layers with overlaps, gaps and overshoot.
    fn sloped_layers() -> Geometries {
        let mut g = Geometries::new();
        g.register_polygons([
            ("L1", pts(&[(-1.0, -1.0), (21.0, -1.0), (21.0, 4.0), (10.0, 5.0), (-1.0, 4.0)])),
            ("L2", pts(&[(0.0, 3.5), (20.0, 3.2), (20.0, 8.0), (0.0, 7.5)])),
            ("L3", pts(&[(0.0, 9.0), (20.0, 8.8), (20.0, 13.5), (0.0, 13.5)])),
        ])
        .expect("valid layers");
        g.register_surface("pia", &pts(&[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0)]))
            .expect("valid pia");
        g.register_surface("wm", &pts(&[(0.0, 12.0), (10.0, 13.0), (20.0, 12.0)]))
            .expect("valid wm");
        g
    }

    fn to_geo(area: &Area) -> MultiPolygon<f64> {
        let ring = |r: &Ring| {
            LineString::new(
                r.to_closed_path()
                    .into_iter()
                    .map(|p| Coord { x: p.x, y: p.y })
                    .collect(),
            )
        };
        MultiPolygon::new(
            area.parts()
                .iter()
                .map(|p| GeoPolygon::new(ring(&p.exterior), p.holes.iter().map(ring).collect()))
                .collect(),
        )
    }

    fn area_of(result: &crate::SnapResult, name: &str) -> f64 {
        result.polygon(name).expect("snapped layer").area()
    }

    #[test]
    fn overlap_is_split_down_the_middle() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        assert_eq!(result.contested_pixels, 4 * 40);
        assert!((area_of(&result, "A") - 45.0).abs() < 1e-9);
        assert!((area_of(&result, "B") - 55.0).abs() < 1e-9);

        let ab = result.boundary("A", "B").expect("pair boundary");
        assert!(ab.path.points.iter().all(|p| (p.y - 4.5).abs() < 1e-9));
        assert!((ab.path.length() - 10.0).abs() < 1e-9);
        assert_eq!(result.boundaries.len(), 3);
        assert_eq!(result.boundaries[0].upper, "pia");
        assert_eq!(result.boundaries[2].lower, "wm");
    }

    #[test]
    fn gap_is_split_down_the_middle() {
        let raw = two_layers((0.0, 4.0), (6.0, 10.0));
        let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        assert_eq!(result.contested_pixels, 0);
        assert!((area_of(&result, "A") - 50.0).abs() < 1e-9);
        assert!((area_of(&result, "B") - 50.0).abs() < 1e-9);
        let ab = result.boundary("A", "B").expect("pair boundary");
        assert!(ab.path.points.iter().all(|p| (p.y - 5.0).abs() < 1e-9));
    }

    #[test]
    fn priority_policy_keeps_overlap_for_first_layer() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let config = SnapConfig {
            overlap_policy: OverlapPolicy::Priority,
            ..SnapConfig::with_scale(4.0)
        };
        let result = snap_polygons(&raw, &["A", "B"], &config, None).expect("snaps");

        assert!((area_of(&result, "A") - 50.0).abs() < 1e-9);
        let ab = result.boundary("A", "B").expect("pair boundary");
        assert!(ab.path.points.iter().all(|p| (p.y - 5.0).abs() < 1e-9));
    }

    #[test]
    fn layer_sides_are_registered_as_surfaces() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        let g = &result.geometries;
        assert_eq!(g.surface("A_pia"), Some(&result.boundaries[0].path));
        assert_eq!(g.surface("A_wm"), Some(&result.boundaries[1].path));
        assert_eq!(g.surface("B_pia"), Some(&result.boundaries[1].path));
        assert_eq!(g.surface("B_wm"), Some(&result.boundaries[2].path));
        // A sits against wm here, so neither reference surface touches its
        // outermost layer.
        assert!(result.diagnostics.contains(&Diagnostic::DetachedSurface {
            layer: "A".into(),
            surface: "pia".into(),
        }));
    }

    #[test]
    fn inputs_are_checked_before_rasterizing() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let tiny = SnapConfig {
            max_raster_pixels: 1,
            ..SnapConfig::with_scale(4.0)
        };

        assert_eq!(
            snap_polygons(&raw, &["A", "Z"], &tiny, None),
            Err(Error::UnknownLayer("Z".into()))
        );
        assert_eq!(
            snap_polygons(&raw, &["A", "pia"], &tiny, None),
            Err(Error::UnknownLayer("pia".into()))
        );
        assert_eq!(
            snap_polygons(&raw, &["A", "A"], &tiny, None),
            Err(Error::DuplicateLayer("A".into()))
        );
        assert!(matches!(
            snap_polygons(&raw, &["A", "B"], &tiny, None),
            Err(Error::RasterTooLarge { .. })
        ));
        assert_eq!(
            snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(0.0), None),
            Err(Error::InvalidScale(0.0))
        );

        let mut no_wm = Geometries::new();
        no_wm
            .register_surface("pia", &pts(&[(0.0, 0.0), (1.0, 0.0)]))
            .expect("valid pia");
        assert_eq!(
            check_inputs(&no_wm, &[] as &[&str], &SnapConfig::default()),
            Err(Error::MissingSurface("wm".into()))
        );
        assert_eq!(
            snap_polygons(&no_wm, &[] as &[&str], &SnapConfig::default(), None),
            Err(Error::MissingSurface("wm".into()))
        );

        let mut no_pia = Geometries::new();
        no_pia
            .register_surface("wm", &pts(&[(0.0, 0.0), (1.0, 0.0)]))
            .expect("valid wm");
        assert_eq!(
            snap_polygons(&no_pia, &[] as &[&str], &SnapConfig::default(), None),
            Err(Error::MissingSurface("pia".into()))
        );
    }

    #[test]
    fn opposed_surfaces_are_rejected() {
        let mut raw = Geometries::new();
        raw.register_polygons([("A", rect(0.0, 0.0, 10.0, 5.0)), ("B", rect(0.0, 4.0, 10.0, 10.0))])
            .expect("valid layers");
        raw.register_surface("pia", &pts(&[(0.0, 10.0), (10.0, 10.0)]))
            .expect("valid pia");
        raw.register_surface("wm", &pts(&[(10.0, 0.0), (0.0, 0.0)]))
            .expect("valid wm");
        let tiny = SnapConfig {
            max_raster_pixels: 1,
            ..SnapConfig::with_scale(4.0)
        };

        assert!(matches!(
            snap_polygons(&raw, &["A", "B"], &tiny, None),
            Err(Error::InvalidEnvelope { edges: Some(_) })
        ));

        let mut flat = Geometries::new();
        flat.register_surface("pia", &pts(&[(0.0, 0.0), (10.0, 0.0)]))
            .expect("valid pia");
        flat.register_surface("wm", &pts(&[(0.0, 0.0), (10.0, 0.0)]))
            .expect("valid wm");
        assert_eq!(
            check_inputs(&flat, &[] as &[&str], &SnapConfig::default()),
            Err(Error::InvalidEnvelope { edges: None })
        );
    }

    #[test]
    fn crossing_layer_snaps_to_simple_polygons() {
        let mut raw = Geometries::new();
        let looped = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (8.0, 5.0),
            (8.5, 4.0),
            (9.0, 5.5),
            (0.0, 5.0),
        ]);
        raw.register_polygons([("A", looped), ("B", rect(0.0, 4.0, 10.0, 10.0))])
            .expect("crossing ring is accepted");
        raw.register_surface("pia", &pts(&[(0.0, 10.0), (10.0, 10.0)]))
            .expect("valid pia");
        raw.register_surface("wm", &pts(&[(0.0, 0.0), (10.0, 0.0)]))
            .expect("valid wm");

        let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        assert!(result.diagnostics.contains(&Diagnostic::SelfIntersectingLayer {
            layer: "A".into(),
            edges: (2, 4),
        }));
        for name in ["A", "B"] {
            let area = result.polygon(name).expect("snapped layer");
            assert!(!area.is_empty());
            assert!(area.rings().all(|r| r.find_self_intersection().is_none()));
        }
        let total = area_of(&result, "A") + area_of(&result, "B");
        assert!((total - 100.0).abs() < 1e-6, "total {total}");
        let shared = to_geo(result.polygon("A").expect("snapped layer"))
            .intersection(&to_geo(result.polygon("B").expect("snapped layer")))
            .unsigned_area();
        assert!(shared < 1e-6);
    }

    #[test]
    fn split_layer_is_reported_as_fragmented() {
        let mut raw = Geometries::new();
        raw.register_polygons([("A", rect(4.0, 0.0, 6.0, 10.0)), ("B", rect(0.0, 0.0, 10.0, 10.0))])
            .expect("valid layers");
        raw.register_surface("pia", &pts(&[(0.0, 10.0), (10.0, 10.0)]))
            .expect("valid pia");
        raw.register_surface("wm", &pts(&[(0.0, 0.0), (10.0, 0.0)]))
            .expect("valid wm");
        let config = SnapConfig {
            overlap_policy: OverlapPolicy::Priority,
            ..SnapConfig::with_scale(2.0)
        };

        let result = snap_polygons(&raw, &["A", "B"], &config, None).expect("snaps");

        assert_eq!(result.contested_pixels, 4 * 20);
        assert!(result.diagnostics.contains(&Diagnostic::FragmentedLayer {
            layer: "B".into(),
            parts: 2,
        }));
        let b = result.polygon("B").expect("snapped layer");
        assert_eq!(b.num_parts(), 2);
        assert!((b.area() - 80.0).abs() < 1e-9);
        assert!((area_of(&result, "A") - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unlisted_layers_rank_last() {
        let raw = sloped_layers();
        let plan = check_inputs(&raw, &["L3", "L1"], &SnapConfig::default()).expect("valid");
        assert_eq!(plan.order, vec![2, 0]);
        assert_eq!(plan.ranks, vec![1, 3, 0]);
    }

    #[test]
    fn snapped_layers_tile_the_envelope() {
        let raw = sloped_layers();
        let result = snap_polygons(&raw, &["L1", "L2", "L3"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        let envelope = pts(&[
            (20.0, 0.0),
            (10.0, 1.0),
            (0.0, 0.0),
            (0.0, 12.0),
            (10.0, 13.0),
            (20.0, 12.0),
        ]);
        let expected = Ring::from_path(&envelope).signed_area().abs();
        let total: f64 = ["L1", "L2", "L3"].iter().map(|n| area_of(&result, n)).sum();
        assert!((total - expected).abs() < 1e-6 * expected);

        let shapes: Vec<MultiPolygon<f64>> = ["L1", "L2", "L3"]
            .iter()
            .map(|n| to_geo(result.polygon(n).expect("snapped layer")))
            .collect();
        for i in 0..shapes.len() {
            for j in i + 1..shapes.len() {
                let shared = shapes[i].intersection(&shapes[j]).unsigned_area();
                assert!(shared < 1e-6, "layers {i} and {j} overlap by {shared}");
            }
        }

        assert_eq!(result.boundaries.len(), 4);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| !matches!(d, Diagnostic::DetachedSurface { .. })));
    }

    #[test]
    fn snapping_is_deterministic() {
        let raw = sloped_layers();
        let order = ["L1", "L2", "L3"];
        let config = SnapConfig::with_scale(3.0);
        let first = snap_polygons(&raw, &order, &config, None).expect("snaps");
        let second = snap_polygons(&raw, &order, &config, None).expect("snaps");
        assert_eq!(first, second);
    }

    #[test]
    fn adjacency_holds_across_scales() {
        let raw = sloped_layers();
        for scale in [2.0, 4.0, 8.0] {
            let result = snap_polygons(&raw, &["L1", "L2", "L3"], &SnapConfig::with_scale(scale), None)
                .expect("snaps");
            let pairs: Vec<(&str, &str)> = result
                .boundaries
                .iter()
                .map(|b| (b.upper.as_str(), b.lower.as_str()))
                .collect();
            assert_eq!(
                pairs,
                vec![("pia", "L1"), ("L1", "L2"), ("L2", "L3"), ("L3", "wm")],
                "scale {scale}"
            );
        }
    }

    #[test]
    fn empty_order_skips_boundaries() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let result = snap_polygons(&raw, &[] as &[&str], &SnapConfig::with_scale(2.0), None)
            .expect("snaps");
        assert!(result.boundaries.is_empty());
        assert_eq!(result.geometries.surfaces().count(), 0);
        assert!(result.polygon("A").is_some_and(|a| !a.is_empty()));
    }

    #[test]
    fn vanished_layer_is_reported_once() {
        let mut raw = two_layers((0.0, 5.0), (4.0, 10.0));
        raw.register_polygons([("dot", pts(&[(5.0, 6.0), (5.1, 6.0), (5.0, 6.1)]))])
            .expect("valid sliver");
        let result = snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(4.0), None)
            .expect("snaps");

        let reports = result
            .diagnostics
            .iter()
            .filter(|d| **d == Diagnostic::EmptyLayer { layer: "dot".into() })
            .count();
        assert_eq!(reports, 1);
        assert!(result.polygon("dot").is_some_and(Area::is_empty));
    }

    #[test]
    fn fully_contested_input_has_no_claimed_pixels() {
        let raw = two_layers((0.0, 10.0), (0.0, 10.0));
        assert_eq!(
            snap_polygons(&raw, &["A", "B"], &SnapConfig::with_scale(1.0), None),
            Err(Error::NoClaimedPixels)
        );
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(usize, bool)>,
    }

    impl ImageOutputter for Recorder {
        fn write_images(&mut self, raw: &Geometries, snapped: &Geometries) -> Result<Vec<ImageRecord>, Error> {
            self.calls
                .push((raw.polygon_names().count(), snapped.surface("A_pia").is_some()));
            Ok(vec![ImageRecord {
                name: "after".into(),
                path: "after.png".into(),
                width: 40,
                height: 40,
            }])
        }
    }

    #[test]
    fn outputter_sees_raw_and_snapped() {
        let raw = two_layers((0.0, 5.0), (4.0, 10.0));
        let mut recorder = Recorder::default();
        let result = snap_polygons(
            &raw,
            &["A", "B"],
            &SnapConfig::with_scale(4.0),
            Some(&mut recorder),
        )
        .expect("snaps");

        assert_eq!(recorder.calls, vec![(2, true)]);
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].path, "after.png");
    }
}
