use ls_core::{Bounds, Point2, Polygon, Polyline, Ring, Vec2};
use ls_raster::{PixelGrid, RasterStack, rasterize_rings};
use rayon::prelude::*;

use crate::Error;

/// Open curve with significant orientation.
pub type Curve = Polyline;

/// Closed areal geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    Polygon(Polygon),
    /// Disjoint parts; may be empty when a layer vanished.
    MultiPolygon(Vec<Polygon>),
}

impl Area {
    /// Wraps parts, collapsing a single part to [`Area::Polygon`].
    pub fn from_parts(mut parts: Vec<Polygon>) -> Self {
        if parts.len() == 1 {
            if let Some(p) = parts.pop() {
                return Self::Polygon(p);
            }
        }
        Self::MultiPolygon(parts)
    }

    pub fn parts(&self) -> &[Polygon] {
        match self {
            Self::Polygon(p) => core::slice::from_ref(p),
            Self::MultiPolygon(parts) => parts,
        }
    }

    pub fn num_parts(&self) -> usize {
        self.parts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts().is_empty()
    }

    pub fn area(&self) -> f64 {
        self.parts().iter().map(Polygon::area).sum()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.parts().iter().flat_map(Polygon::rings)
    }

    pub fn map(&self, f: impl Fn(Point2) -> Point2) -> Area {
        match self {
            Self::Polygon(p) => Self::Polygon(p.map(&f)),
            Self::MultiPolygon(parts) => Self::MultiPolygon(parts.iter().map(|p| p.map(&f)).collect()),
        }
    }

    fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.rings().flat_map(|r| r.points.iter().copied())
    }
}

/// Named polygons and surfaces, kept in registration order.
///
/// Names are unique across both kinds. Values are only ever extended by
/// `register_*`; [`Geometries::transform`] returns a new registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometries {
    polygons: Vec<(String, Area)>,
    surfaces: Vec<(String, Curve)>,
}

impl Geometries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.polygons.len() + self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.polygon(name).is_some() || self.surface(name).is_some()
    }

    /// Registers a batch of polygons given as vertex paths. An explicit
    /// closing vertex is optional. Rings may cross themselves; the enclosed
    /// area then follows the even-odd rule.
    ///
    /// The batch is atomic: if any entry fails validation nothing is added.
    pub fn register_polygons<I, S, P>(&mut self, batch: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<[Point2]>,
    {
        let mut staged: Vec<(String, Area)> = Vec::new();
        for (name, path) in batch {
            let name = name.into();
            self.check_name(&name, staged.iter().map(|(n, _)| n))?;
            let ring = validate_ring(&name, path.as_ref())?;
            staged.push((name, Area::Polygon(Polygon::new(ring, Vec::new()))));
        }
        self.polygons.extend(staged);
        Ok(())
    }

    /// Registers an already built area, such as a snapped layer.
    pub fn register_polygon(&mut self, name: impl Into<String>, area: Area) -> Result<(), Error> {
        let name = name.into();
        self.check_name(&name, core::iter::empty())?;
        if !area.points().all(Point2::is_finite) {
            return Err(Error::NonFiniteCoordinate(name));
        }
        self.polygons.push((name, area));
        Ok(())
    }

    pub fn register_surface(&mut self, name: impl Into<String>, path: &[Point2]) -> Result<(), Error> {
        self.register_surfaces([(name, path)])
    }

    /// Registers open curves; atomic like [`Geometries::register_polygons`].
    pub fn register_surfaces<I, S, P>(&mut self, batch: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<[Point2]>,
    {
        let mut staged: Vec<(String, Curve)> = Vec::new();
        for (name, path) in batch {
            let name = name.into();
            self.check_name(&name, staged.iter().map(|(n, _)| n))?;
            let curve = validate_curve(&name, path.as_ref())?;
            staged.push((name, curve));
        }
        self.surfaces.extend(staged);
        Ok(())
    }

    fn check_name<'a>(&self, name: &str, mut staged: impl Iterator<Item = &'a String>) -> Result<(), Error> {
        if self.contains(name) || staged.any(|n| n == name) {
            return Err(Error::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    pub fn polygon(&self, name: &str) -> Option<&Area> {
        self.polygons.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    pub fn surface(&self, name: &str) -> Option<&Curve> {
        self.surfaces.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn polygons(&self) -> impl Iterator<Item = (&str, &Area)> {
        self.polygons.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn surfaces(&self) -> impl Iterator<Item = (&str, &Curve)> {
        self.surfaces.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn polygon_names(&self) -> impl Iterator<Item = &str> {
        self.polygons.iter().map(|(n, _)| n.as_str())
    }

    /// New registry with every vertex mapped through `f`. Vertex order and
    /// ring closure are preserved.
    pub fn transform(&self, f: impl Fn(Point2) -> Point2) -> Geometries {
        Geometries {
            polygons: self
                .polygons
                .iter()
                .map(|(n, a)| (n.clone(), a.map(&f)))
                .collect(),
            surfaces: self
                .surfaces
                .iter()
                .map(|(n, c)| (n.clone(), c.map(&f)))
                .collect(),
        }
    }

    /// Smallest box around all polygons and surfaces; `None` when empty.
    pub fn bounds(&self) -> Result<Option<Bounds>, Error> {
        let points = self
            .polygons
            .iter()
            .flat_map(|(_, a)| a.points())
            .chain(self.surfaces.iter().flat_map(|(_, c)| c.points.iter().copied()));
        Ok(Bounds::from_points(points)?)
    }

    /// [`Geometries::bounds`] expanded outward to whole pixel coordinates.
    pub fn close_bounds(&self) -> Result<Option<Bounds>, Error> {
        Ok(self.bounds()?.map(|b| b.snapped_to_pixels()))
    }

    /// Rasterizes every polygon onto the grid spanned by
    /// [`Geometries::close_bounds`], one plane per polygon in registration
    /// order.
    pub fn rasterize(&self, max_pixels: usize) -> Result<RasterStack, Error> {
        let bounds = self.close_bounds()?.ok_or(Error::EmptyBounds)?;
        let grid = PixelGrid::covering(&bounds, max_pixels)?;
        log::debug!(
            "rasterizing {} polygons on a {}x{} grid at {:?}",
            self.polygons.len(),
            grid.width,
            grid.height,
            grid.origin
        );

        let planes: Vec<_> = self
            .polygons
            .par_iter()
            .map(|(_, area)| rasterize_rings(area.rings(), &grid))
            .collect();

        let mut stack = RasterStack::new(grid);
        for ((name, _), plane) in self.polygons.iter().zip(planes) {
            stack.push(name.clone(), plane);
        }
        Ok(stack)
    }
}

fn validate_ring(name: &str, path: &[Point2]) -> Result<Ring, Error> {
    if !path.iter().all(|p| p.is_finite()) {
        return Err(Error::NonFiniteCoordinate(name.to_owned()));
    }
    let ring = Ring::from_path(path);
    if ring.len() < 3 {
        return Err(Error::DegeneratePolygon(name.to_owned()));
    }
    // Crossing rings are rasterized even-odd; their lobes can cancel in the
    // signed area without leaving the ring empty.
    if ring.signed_area() == 0.0 && ring.find_self_intersection().is_none() {
        return Err(Error::DegeneratePolygon(name.to_owned()));
    }
    Ok(ring)
}

fn validate_curve(name: &str, path: &[Point2]) -> Result<Curve, Error> {
    if !path.iter().all(|p| p.is_finite()) {
        return Err(Error::NonFiniteCoordinate(name.to_owned()));
    }
    let curve = Polyline::new(path.to_vec());
    if curve.distinct_len() < 2 {
        return Err(Error::DegenerateSurface(name.to_owned()));
    }
    Ok(curve)
}

/// Uniform scaling about the world origin.
pub fn make_scale_transform(scale: f64) -> impl Fn(Point2) -> Point2 + Copy {
    move |p| Point2::new(p.x * scale, p.y * scale)
}

pub fn make_translate_transform(offset: Vec2) -> impl Fn(Point2) -> Point2 + Copy {
    move |p| p + offset
}
