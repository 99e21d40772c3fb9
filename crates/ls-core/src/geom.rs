use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(self, other: Point2) -> f64 {
        (other - self).norm()
    }

    /// Point at parameter `t` on the segment `self -> other`.
    pub fn lerp(self, other: Point2, t: f64) -> Point2 {
        self + (other - self) * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl Add<Vec2> for Point2 {
    type Output = Point2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Point2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Point2> for Point2 {
    type Output = Vec2;

    fn sub(self, rhs: Point2) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Self::Output {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Open curve; vertex order is significant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<Point2>,
}

impl Polyline {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    pub fn first(&self) -> Option<Point2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline { points }
    }

    pub fn map(&self, f: impl Fn(Point2) -> Point2) -> Polyline {
        Polyline {
            points: self.points.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Number of distinct consecutive vertices.
    pub fn distinct_len(&self) -> usize {
        dedup_consecutive(&self.points).len()
    }
}

/// Closed ring stored without repeating the first vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    pub points: Vec<Point2>,
}

impl Ring {
    /// Builds a ring from a vertex path, dropping consecutive duplicates and an
    /// explicit closing vertex.
    pub fn from_path(path: &[Point2]) -> Self {
        let mut points = dedup_consecutive(path);
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let twice: f64 = self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        0.5 * twice
    }

    /// Returns the first pair of non-adjacent edges that properly cross.
    pub fn find_self_intersection(&self) -> Option<(usize, usize)> {
        let n = self.points.len();
        if n < 4 {
            return None;
        }
        for i in 0..n {
            let (a0, a1) = (self.points[i], self.points[(i + 1) % n]);
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (b0, b1) = (self.points[j], self.points[(j + 1) % n]);
                if segments_cross(a0, a1, b0, b1) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    pub fn map(&self, f: impl Fn(Point2) -> Point2) -> Ring {
        Ring {
            points: self.points.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Closed vertex path with the first vertex repeated at the end.
    pub fn to_closed_path(&self) -> Vec<Point2> {
        let mut out = self.points.clone();
        if let Some(&first) = self.points.first() {
            out.push(first);
        }
        out
    }
}

/// Ring with optional holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        self.exterior.signed_area().abs() - holes
    }

    pub fn map(&self, f: impl Fn(Point2) -> Point2) -> Polygon {
        Polygon {
            exterior: self.exterior.map(&f),
            holes: self.holes.iter().map(|h| h.map(&f)).collect(),
        }
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        core::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

/// True when the open segments `a0-a1` and `b0-b1` cross at a single interior
/// point. Touching endpoints and collinear overlaps do not count.
pub fn segments_cross(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> bool {
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn orient(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).cross(c - a)
}

fn dedup_consecutive(path: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(path.len());
    for &p in path {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}
