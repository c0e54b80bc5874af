use crate::util::indexing::*;
use crate::util::*;

/// Index-space bounding box of a regular grid.
/// Each instance is inclusive of both corners,
/// one row per axis in `bounds`: `[min, max]`.
/// An axis with `max < min` makes the extent empty.
///
/// Point ids and cell ids are linear offsets relative to `min()`,
/// X fastest, then Y, then Z.
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Extent {
    pub bounds: Bounds,
}

impl std::fmt::Display for Extent {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        let e = self.as_array();
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            e[0], e[1], e[2], e[3], e[4], e[5]
        )
    }
}

impl Default for Extent {
    fn default() -> Self {
        Extent::empty()
    }
}

impl Extent {
    /// Create extent from raw bounds.
    #[inline]
    pub fn new(bounds: Bounds) -> Self {
        Extent { bounds }
    }

    /// Create extent from corners.
    pub fn from_mm(min: Coord, max: Coord) -> Self {
        Extent {
            bounds: Bounds::from_columns(&[min, max]),
        }
    }

    /// Create extent from `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn from_array(e: [i32; 6]) -> Self {
        Extent::new(matrix![e[0], e[1]; e[2], e[3]; e[4], e[5]])
    }

    /// Extent `[0, i-1, 0, j-1, 0, k-1]`.
    pub fn from_dimensions(i: i32, j: i32, k: i32) -> Self {
        Extent::new(matrix![0, i - 1; 0, j - 1; 0, k - 1])
    }

    /// The canonical empty extent `[0, -1, 0, -1, 0, -1]`.
    pub fn empty() -> Self {
        Extent::new(matrix![0, -1; 0, -1; 0, -1])
    }

    pub fn as_array(&self) -> [i32; 6] {
        [
            self.bounds[(0, 0)],
            self.bounds[(0, 1)],
            self.bounds[(1, 0)],
            self.bounds[(1, 1)],
            self.bounds[(2, 0)],
            self.bounds[(2, 1)],
        ]
    }

    /// Return min corner.
    pub fn min(&self) -> Coord {
        self.bounds.column(0).into()
    }

    /// Return max corner.
    pub fn max(&self) -> Coord {
        self.bounds.column(1).into()
    }

    /// `max - min + 1` along axis `d`, without overflow.
    fn span(&self, d: usize) -> i64 {
        self.bounds[(d, 1)] as i64 - self.bounds[(d, 0)] as i64 + 1
    }

    /// `max - min + 1` per axis, may be zero or negative for empty axes.
    /// Spans outside the `i32` range saturate.
    pub fn exclusive_bounds(&self) -> Coord {
        Coord::from_fn(|d, _| {
            self.span(d).clamp(i32::MIN as i64, i32::MAX as i64) as i32
        })
    }

    /// Samples per axis, clamped to zero.
    pub fn dimensions(&self) -> Coord {
        self.exclusive_bounds().map(|d| d.max(0))
    }

    /// Cells per axis. Axes with a single sample still contribute
    /// one cell layer.
    pub fn cell_dims(&self) -> Coord {
        self.dimensions().map(|d| (d - 1).max(1))
    }

    /// True when any axis has `max < min`.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|d| self.bounds[(d, 1)] < self.bounds[(d, 0)])
    }

    /// A grid may hold an extent whose axes are either all non-inverted,
    /// or all inverted (empty), and whose sample counts fit in an `i32`.
    pub fn is_consistent(&self) -> bool {
        let inverted = (0..3)
            .filter(|d| self.bounds[(*d, 1)] < self.bounds[(*d, 0)])
            .count();
        let too_wide = (0..3).any(|d| self.span(d) > i32::MAX as i64);
        (inverted == 0 || inverted == 3) && !too_wide
    }

    /// Return the number of points contained in the instance.
    #[inline]
    pub fn number_of_points(&self) -> usize {
        real_buffer_size(&self.exclusive_bounds())
    }

    /// Product of `max(dim - 1, 1)` per axis, zero when empty.
    pub fn number_of_cells(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        real_buffer_size(&self.cell_dims())
    }

    /// Which of the empty / point / line / plane / volume shapes this is.
    pub fn description(&self) -> DataDescription {
        let spans = [
            self.bounds[(0, 0)] < self.bounds[(0, 1)],
            self.bounds[(1, 0)] < self.bounds[(1, 1)],
            self.bounds[(2, 0)] < self.bounds[(2, 1)],
        ];
        DataDescription::classify(self.is_empty(), spans)
    }

    /// Return the point id for an absolute coordinate in the instance.
    pub fn coord_to_linear(&self, coord: &Coord) -> usize {
        coord_to_linear(&(coord - self.min()), &self.exclusive_bounds())
    }

    /// Return the absolute coordinate for a point id.
    pub fn linear_to_coord(&self, index: usize) -> Coord {
        linear_to_coord(index, &self.exclusive_bounds()) + self.min()
    }

    /// Return the cell id for the absolute min corner of a cell.
    pub fn cell_coord_to_linear(&self, coord: &Coord) -> usize {
        coord_to_linear(&(coord - self.min()), &self.cell_dims())
    }

    /// Check whether the instance contains a coordinate.
    pub fn contains(&self, coord: &Coord) -> bool {
        for d in 0..3 {
            if coord[d] < self.bounds[(d, 0)] || coord[d] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    /// Check whether another extent is contained in the instance.
    pub fn contains_extent(&self, other: &Self) -> bool {
        for d in 0..3 {
            if other.bounds[(d, 0)] < self.bounds[(d, 0)]
                || other.bounds[(d, 1)] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    /// Clamp the instance to lie within `other`.
    pub fn trim_to_extent(&mut self, other: &Self) {
        for d in 0..3 {
            self.bounds[(d, 0)] = self.bounds[(d, 0)].max(other.bounds[(d, 0)]);
            self.bounds[(d, 1)] = self.bounds[(d, 1)].min(other.bounds[(d, 1)]);
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = *self;
        result.trim_to_extent(other);
        result
    }

    /// Return iterator over contained coords in point id order.
    pub fn coord_iter(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.number_of_points()).map(|i| self.linear_to_coord(i))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn dimensions_test() {
        {
            let e = Extent::new(matrix![0, 3; 0, 2; 0, 1]);
            assert_eq!(e.dimensions(), vector![4, 3, 2]);
            assert_eq!(e.cell_dims(), vector![3, 2, 1]);
            assert_eq!(e.number_of_points(), 24);
            assert_eq!(e.number_of_cells(), 6);
        }

        {
            let e = Extent::new(matrix![2, 2; 5, 9; 1, 1]);
            assert_eq!(e.dimensions(), vector![1, 5, 1]);
            assert_eq!(e.cell_dims(), vector![1, 4, 1]);
            assert_eq!(e.number_of_cells(), 4);
        }
    }

    #[test]
    fn cell_count_test() {
        assert_eq!(Extent::empty().number_of_cells(), 0);
        let e = Extent::new(matrix![0, 4; 0, -1; 0, 4]);
        assert_eq!(e.number_of_cells(), 0);
        let e = Extent::new(matrix![0, 0; 0, 0; 0, 0]);
        assert_eq!(e.number_of_cells(), 1);
        assert_eq!(e.number_of_points(), 1);
    }

    #[test]
    fn empty_and_consistency_test() {
        {
            let e = Extent::empty();
            assert!(e.is_empty());
            assert!(e.is_consistent());
            assert_eq!(e.dimensions(), vector![0, 0, 0]);
            assert_eq!(e.description(), DataDescription::Empty);
        }

        {
            let e = Extent::from_array([0, 4, 3, 1, 0, 4]);
            assert!(e.is_empty());
            assert!(!e.is_consistent());
        }

        {
            let e = Extent::from_dimensions(10, 1, 1);
            assert!(!e.is_empty());
            assert!(e.is_consistent());
            assert_eq!(e.description(), DataDescription::XLine);
        }
    }

    #[test]
    fn extreme_bounds_test() {
        {
            let e = Extent::from_array([i32::MIN, i32::MAX, 0, 0, 0, 0]);
            assert_eq!(e.exclusive_bounds()[0], i32::MAX);
            assert!(!e.is_empty());
            assert!(!e.is_consistent());
        }

        {
            // The widest span that still fits.
            let e = Extent::from_array([0, 0, -1, i32::MAX - 2, 0, 0]);
            assert_eq!(e.dimensions(), vector![1, i32::MAX, 1]);
            assert!(e.is_consistent());
        }

        {
            let e = Extent::from_array([i32::MAX, i32::MIN, 1, 0, 5, -5]);
            assert!(e.is_empty());
            assert!(e.is_consistent());
            assert_eq!(e.exclusive_bounds()[0], i32::MIN);
            assert_eq!(e.dimensions(), vector![0, 0, 0]);
            assert_eq!(e.number_of_points(), 0);
        }
    }

    #[test]
    fn linear_round_trip_test() {
        let e = Extent::new(matrix![-2, 1; 3, 5; 10, 11]);
        for (i, c) in e.coord_iter().enumerate() {
            assert!(e.contains(&c));
            assert_eq!(e.coord_to_linear(&c), i);
        }
        assert_eq!(e.linear_to_coord(0), vector![-2, 3, 10]);
        assert_eq!(e.linear_to_coord(1), vector![-1, 3, 10]);
        assert_eq!(e.linear_to_coord(4), vector![-2, 4, 10]);
    }

    #[test]
    fn cell_linear_test() {
        let e = Extent::new(matrix![1, 4; 0, 0; 2, 4]);
        // cell dims (3, 1, 2)
        assert_eq!(e.cell_coord_to_linear(&vector![1, 0, 2]), 0);
        assert_eq!(e.cell_coord_to_linear(&vector![3, 0, 2]), 2);
        assert_eq!(e.cell_coord_to_linear(&vector![1, 0, 3]), 3);
    }

    #[test]
    fn intersection_test() {
        let a = Extent::new(matrix![0, 9; 0, 9; 0, 9]);
        let b = Extent::new(matrix![-5, 4; 3, 20; 9, 9]);
        let c = a.intersection(&b);
        assert_eq!(c, Extent::new(matrix![0, 4; 3, 9; 9, 9]));
        assert!(a.contains_extent(&c));
        assert!(!c.contains_extent(&a));
    }

    #[test]
    fn display_test() {
        let e = Extent::from_array([0, 3, 0, 2, 0, 1]);
        assert_eq!(format!("{e}"), "(0, 3, 0, 2, 0, 1)");
        assert_eq!(e.as_array(), [0, 3, 0, 2, 0, 1]);
    }
}
