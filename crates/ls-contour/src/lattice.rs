use ls_core::Point2;

/// Axis directions in clockwise screen order: +x, +y, -x, -y.
pub(crate) const DX: [isize; 4] = [1, 0, -1, 0];
pub(crate) const DY: [isize; 4] = [0, 1, 0, -1];

/// Offsets from a segment's start vertex to the pixel on its right-hand side
/// (screen orientation, y down) and on its left-hand side.
const RIGHT: [(isize, isize); 4] = [(0, 0), (-1, 0), (-1, -1), (0, -1)];
const LEFT: [(isize, isize); 4] = [(0, -1), (0, 0), (-1, 0), (-1, -1)];

/// Vertex lattice of a `width x height` pixel image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lattice {
    width: usize,
    height: usize,
}

impl Lattice {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub(crate) fn num_vertices(self) -> usize {
        (self.width + 1) * (self.height + 1)
    }

    #[inline]
    pub(crate) fn vertex(self, x: usize, y: usize) -> usize {
        y * (self.width + 1) + x
    }

    #[inline]
    pub(crate) fn coords(self, v: usize) -> (usize, usize) {
        (v % (self.width + 1), v / (self.width + 1))
    }

    pub(crate) fn point(self, v: usize) -> Point2 {
        let (x, y) = self.coords(v);
        Point2::new(x as f64, y as f64)
    }

    /// Neighbor vertex one step along `dir`, if it is on the lattice.
    #[inline]
    pub(crate) fn step(self, v: usize, dir: u8) -> Option<usize> {
        let (x, y) = self.coords(v);
        let nx = x as isize + DX[dir as usize];
        let ny = y as isize + DY[dir as usize];
        if nx < 0 || ny < 0 || nx as usize > self.width || ny as usize > self.height {
            return None;
        }
        Some(self.vertex(nx as usize, ny as usize))
    }

    #[inline]
    pub(crate) fn pixel(self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Pixel on the right of the segment leaving `v` along `dir`.
    #[inline]
    pub(crate) fn right_pixel(self, v: usize, dir: u8) -> Option<usize> {
        self.offset_pixel(v, RIGHT[dir as usize])
    }

    #[inline]
    pub(crate) fn left_pixel(self, v: usize, dir: u8) -> Option<usize> {
        self.offset_pixel(v, LEFT[dir as usize])
    }

    /// Pixels sharing vertex `v`, ordered NW, NE, SW, SE.
    pub(crate) fn corner_pixels(self, v: usize) -> [Option<usize>; 4] {
        [(-1, -1), (0, -1), (-1, 0), (0, 0)].map(|off| self.offset_pixel(v, off))
    }

    fn offset_pixel(self, v: usize, (dx, dy): (isize, isize)) -> Option<usize> {
        let (x, y) = self.coords(v);
        self.pixel(x as isize + dx, y as isize + dy)
    }
}

#[inline]
pub(crate) fn opposite_dir(dir: u8) -> u8 {
    (dir + 2) & 3
}

#[cfg(test)]
mod tests {
    use super::Lattice;

    #[test]
    fn segment_sides() {
        let lat = Lattice::new(3, 2);
        let v = lat.vertex(1, 1);

        // +x segment from (1, 1): pixel (1, 0) above, (1, 1) below.
        assert_eq!(lat.left_pixel(v, 0), Some(1));
        assert_eq!(lat.right_pixel(v, 0), Some(4));
        // +y segment from (1, 1): pixel (0, 1) on screen right when heading down.
        assert_eq!(lat.right_pixel(v, 1), Some(3));
        assert_eq!(lat.left_pixel(v, 1), Some(4));
    }

    #[test]
    fn steps_stay_on_lattice() {
        let lat = Lattice::new(2, 2);
        assert_eq!(lat.num_vertices(), 9);
        assert_eq!(lat.step(lat.vertex(2, 0), 0), None);
        assert_eq!(lat.step(lat.vertex(2, 0), 1), Some(lat.vertex(2, 1)));
        assert_eq!(lat.step(lat.vertex(0, 0), 3), None);
        assert_eq!(lat.corner_pixels(lat.vertex(0, 0)), [None, None, None, Some(0)]);
    }
}
