//! World-space clipping against the pia/white-matter envelope.
//!
//! Conversions to and from `geo` types follow the usual pattern: rings are
//! closed explicitly on the way in and the closing vertex is dropped on the
//! way out.

use geo::{BooleanOps, Coord, LineString, MultiLineString, MultiPolygon, Polygon as GeoPolygon};
use ls_core::{Point2, Polygon, Polyline, Ring};

/// Area below which clipped fragments are dropped, in squared world units.
const MIN_PART_AREA: f64 = 1e-12;

fn to_coord(p: Point2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn ring_to_geo(ring: &Ring) -> LineString<f64> {
    LineString::new(ring.to_closed_path().into_iter().map(to_coord).collect())
}

fn polygon_to_geo(poly: &Polygon) -> GeoPolygon<f64> {
    GeoPolygon::new(
        ring_to_geo(&poly.exterior),
        poly.holes.iter().map(ring_to_geo).collect(),
    )
}

fn geo_to_ring(ls: &LineString<f64>) -> Ring {
    let path: Vec<Point2> = ls.coords().map(|c| Point2::new(c.x, c.y)).collect();
    Ring::from_path(&path)
}

fn geo_to_polygon(poly: &GeoPolygon<f64>) -> Polygon {
    Polygon::new(
        geo_to_ring(poly.exterior()),
        poly.interiors().iter().map(geo_to_ring).collect(),
    )
}

/// Closed region between the pia and white-matter surfaces.
#[derive(Debug, Clone)]
pub struct Envelope {
    ring: Ring,
    shape: MultiPolygon<f64>,
}

impl Envelope {
    /// Pia path reversed, followed by the white-matter path.
    pub fn from_surfaces(pia: &Polyline, wm: &Polyline) -> Self {
        let path: Vec<Point2> = pia
            .points
            .iter()
            .rev()
            .chain(wm.points.iter())
            .copied()
            .collect();
        Self::from_ring(Ring::from_path(&path))
    }

    pub fn from_ring(ring: Ring) -> Self {
        let shape = MultiPolygon::new(vec![GeoPolygon::new(ring_to_geo(&ring), Vec::new())]);
        Self { ring, shape }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn area(&self) -> f64 {
        self.ring.signed_area().abs()
    }

    /// Intersection of `parts` with the envelope. Slivers with no area are
    /// dropped.
    pub fn clip_polygons(&self, parts: &[Polygon]) -> Vec<Polygon> {
        if parts.is_empty() {
            return Vec::new();
        }
        let subject = MultiPolygon::new(parts.iter().map(polygon_to_geo).collect());
        subject
            .intersection(&self.shape)
            .iter()
            .map(geo_to_polygon)
            .filter(|p| p.exterior.len() >= 3 && p.area() > MIN_PART_AREA)
            .collect()
    }

    /// Pieces of `path` inside the envelope, in path order.
    pub fn clip_path(&self, path: &Polyline) -> Vec<Polyline> {
        if path.len() < 2 {
            return Vec::new();
        }
        let lines = MultiLineString::new(vec![LineString::new(
            path.points.iter().copied().map(to_coord).collect(),
        )]);
        self.shape
            .clip(&lines, false)
            .iter()
            .map(|ls| Polyline::new(ls.coords().map(|c| Point2::new(c.x, c.y)).collect()))
            .filter(|p| p.distinct_len() >= 2)
            .collect()
    }
}
