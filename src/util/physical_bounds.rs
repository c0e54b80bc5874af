use crate::util::*;

/// Axis-aligned physical box, `min` and `max` per axis.
/// The uninitialized value has `min > max` on every axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicalBounds {
    pub min: Point3,
    pub max: Point3,
}

impl Default for PhysicalBounds {
    fn default() -> Self {
        PhysicalBounds::uninitialized()
    }
}

impl PhysicalBounds {
    /// `[1, -1, 1, -1, 1, -1]`.
    pub fn uninitialized() -> Self {
        PhysicalBounds {
            min: vector![1.0, 1.0, 1.0],
            max: vector![-1.0, -1.0, -1.0],
        }
    }

    pub fn from_mm(min: Point3, max: Point3) -> Self {
        PhysicalBounds { min, max }
    }

    /// Smallest box holding every point, uninitialized when there are none.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return PhysicalBounds::uninitialized();
        };
        let mut result = PhysicalBounds {
            min: first,
            max: first,
        };
        for p in iter {
            result.add_point(&p);
        }
        result
    }

    pub fn add_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn is_initialized(&self) -> bool {
        (0..3).all(|d| self.min[d] <= self.max[d])
    }

    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.min[0],
            self.max[0],
            self.min[1],
            self.max[1],
            self.min[2],
            self.max[2],
        ]
    }

    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|d| self.min[d] <= p[d] && p[d] <= self.max[d])
    }
}
