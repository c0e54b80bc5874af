//! Affine mapping between continuous index space and physical space.
//!
//! The forward matrix is `[D * diag(spacing) | origin; 0 0 0 1]`.
//! Both matrices are only ever derived from origin, spacing and direction,
//! and are recomputed as soon as any of the three changes.

use crate::util::*;
use nalgebra::{Matrix3, Matrix4, Vector4};

/// Orientation of the index axes in physical space.
/// Column `c` is the physical direction of index axis `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(pub Matrix3<f64>);

impl Default for Direction {
    fn default() -> Self {
        Direction::identity()
    }
}

impl Direction {
    pub fn identity() -> Self {
        Direction(Matrix3::identity())
    }

    /// Create from nine row-major elements.
    pub fn from_row_slice(elements: &[f64; 9]) -> Self {
        Direction(Matrix3::from_row_slice(elements))
    }

    /// Nine row-major elements.
    pub fn as_array(&self) -> [f64; 9] {
        let m = &self.0;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ]
    }

    /// Exact comparison, this selects the fast paths.
    pub fn is_identity(&self) -> bool {
        self.0 == Matrix3::identity()
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }
}

/// Cached index <-> physical transforms of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexTransform {
    origin: Point3,
    spacing: Point3,
    direction: Direction,
    forward: Matrix4<f64>,
    inverse: Matrix4<f64>,
}

impl Default for IndexTransform {
    fn default() -> Self {
        IndexTransform::new(
            Point3::zeros(),
            vector![1.0, 1.0, 1.0],
            Direction::identity(),
        )
    }
}

impl IndexTransform {
    pub fn new(origin: Point3, spacing: Point3, direction: Direction) -> Self {
        let mut result = IndexTransform {
            origin,
            spacing,
            direction,
            forward: Matrix4::identity(),
            inverse: Matrix4::identity(),
        };
        result.recompute();
        result
    }

    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    pub fn spacing(&self) -> &Point3 {
        &self.spacing
    }

    pub fn direction(&self) -> &Direction {
        &self.direction
    }

    /// Index to physical.
    pub fn forward(&self) -> &Matrix4<f64> {
        &self.forward
    }

    /// Physical to index.
    pub fn inverse(&self) -> &Matrix4<f64> {
        &self.inverse
    }

    /// Returns true when the value changed.
    pub fn set_origin(&mut self, origin: Point3) -> bool {
        if self.origin == origin {
            return false;
        }
        self.origin = origin;
        self.recompute();
        true
    }

    /// Returns true when the value changed.
    pub fn set_spacing(&mut self, spacing: Point3) -> bool {
        if self.spacing == spacing {
            return false;
        }
        self.spacing = spacing;
        self.recompute();
        true
    }

    /// Returns true when the value changed.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction == direction {
            return false;
        }
        self.direction = direction;
        self.recompute();
        true
    }

    /// Rebuild both matrices from origin, spacing and direction.
    pub fn recompute(&mut self) {
        self.forward = if self.direction.is_identity() {
            let mut m = Matrix4::zeros();
            m[(0, 0)] = self.spacing[0];
            m[(1, 1)] = self.spacing[1];
            m[(2, 2)] = self.spacing[2];
            m[(3, 3)] = 1.0;
            m[(0, 3)] = self.origin[0];
            m[(1, 3)] = self.origin[1];
            m[(2, 3)] = self.origin[2];
            m
        } else {
            index_to_physical_matrix(
                &self.origin,
                &self.spacing,
                &self.direction,
            )
        };

        self.inverse = match self.forward.try_inverse() {
            Some(inverse) => inverse,
            None => {
                tracing::warn!(
                    "Singular index to physical matrix (spacing {:?}), \
                     using pseudo-inverse",
                    self.spacing.as_slice()
                );
                self.forward
                    .pseudo_inverse(1e-12)
                    .unwrap_or_else(|_| Matrix4::zeros())
            }
        };
    }

    /// Map a continuous index to its physical location.
    #[inline]
    pub fn index_to_physical(&self, ijk: &Point3) -> Point3 {
        apply_affine(&self.forward, ijk)
    }

    /// Map an integer index to its physical location.
    #[inline]
    pub fn coord_to_physical(&self, ijk: &Coord) -> Point3 {
        apply_affine(&self.forward, &ijk.cast::<f64>())
    }

    /// Map a physical point to its continuous index.
    #[inline]
    pub fn physical_to_index(&self, xyz: &Point3) -> Point3 {
        apply_affine(&self.inverse, xyz)
    }

    /// Map a physical normal into index space.
    ///
    /// Normals transform with the inverse transpose of the point transform.
    /// The point transform into index space is the inverse matrix, so its
    /// inverse transpose is the transpose of the *forward* matrix, the
    /// opposite matrix from `physical_to_index`.
    /// The result is not normalized.
    pub fn normal_to_index(&self, normal: &Point3) -> Point3 {
        self.forward.fixed_view::<3, 3>(0, 0).transpose() * normal
    }

    /// Map a physical plane `a x + b y + c z + d = 0`, with unit `(a, b, c)`,
    /// into index space. The returned normal is unit length.
    pub fn plane_to_index(&self, plane: &Vector4<f64>) -> Vector4<f64> {
        let normal = vector![plane[0], plane[1], plane[2]];
        let index_normal = self.normal_to_index(&normal).normalize();

        // Point on the plane closest to the physical origin.
        let on_plane = normal * -plane[3];
        let index_point = self.physical_to_index(&on_plane);

        Vector4::new(
            index_normal[0],
            index_normal[1],
            index_normal[2],
            -index_normal.dot(&index_point),
        )
    }
}

/// Forward matrix for the given geometry, usable without a grid.
pub fn index_to_physical_matrix(
    origin: &Point3,
    spacing: &Point3,
    direction: &Direction,
) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    let linear = direction.matrix() * Matrix3::from_diagonal(spacing);
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&linear);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(origin);
    m
}

#[inline]
fn apply_affine(m: &Matrix4<f64>, p: &Point3) -> Point3 {
    m.fixed_view::<3, 3>(0, 0) * p + m.fixed_view::<3, 1>(0, 3)
}
