//! Physical point to cell and point queries.

use super::ImageData;
use crate::cell::Cell;
use crate::error::*;
use crate::util::*;

/// Squared tolerance, in index units, for snapping a continuous index
/// onto the extent boundary.
pub const BOUNDARY_TOLERANCE2: f64 = 1e-12;

/// Containing cell of a continuous index location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StructuredCoordinates {
    /// Absolute min corner of the cell.
    pub ijk: Coord,
    /// Position inside the cell per axis, NaN where the continuous
    /// index is not finite.
    pub pcoords: Point3,
    pub in_bounds: bool,
}

/// Result of a successful `find_cell`.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLocation {
    pub cell_id: usize,
    /// Absolute min corner of the cell.
    pub ijk: Coord,
    /// Parametric coordinates in the cell's own parametrization:
    /// spanned axes first, in increasing order, unused entries zero.
    pub pcoords: Point3,
    /// One weight per cell corner.
    pub weights: Vec<f64>,
}

impl ImageData {
    /// Cell containing `x` and the position inside it.
    ///
    /// `ijk` and `pcoords` are returned even when out of bounds.
    pub fn compute_structured_coordinates(
        &self,
        x: &Point3,
    ) -> StructuredCoordinates {
        let location = self.physical_to_index(x);
        let mut ijk = Coord::zeros();
        let mut pcoords = Point3::zeros();
        let mut in_bounds = true;

        for d in 0..3 {
            let floor = location[d].floor();
            ijk[d] = floor as i32;
            pcoords[d] = location[d] - floor;
            if !location[d].is_finite() {
                in_bounds = false;
                continue;
            }

            let min = self.extent.bounds[(d, 0)];
            let max = self.extent.bounds[(d, 1)];
            let axis_in_bounds = if min == max || ijk[d] < min {
                let dist = location[d] - min as f64;
                if dist * dist <= BOUNDARY_TOLERANCE2 {
                    ijk[d] = min;
                    pcoords[d] = 0.0;
                    true
                } else {
                    false
                }
            } else if ijk[d] >= max {
                let dist = location[d] - max as f64;
                if dist * dist <= BOUNDARY_TOLERANCE2 {
                    ijk[d] = max - 1;
                    pcoords[d] = 1.0;
                    true
                } else {
                    false
                }
            } else {
                true
            };
            in_bounds &= axis_in_bounds;
        }

        StructuredCoordinates {
            ijk,
            pcoords,
            in_bounds,
        }
    }

    /// Cell containing `x`, accepting points outside the grid whose
    /// squared physical distance to it is at most `tol2`.
    pub fn find_cell(&self, x: &Point3, tol2: f64) -> Option<CellLocation> {
        if self.extent.is_empty() {
            return None;
        }
        let StructuredCoordinates {
            mut ijk,
            mut pcoords,
            in_bounds,
        } = self.compute_structured_coordinates(x);
        if pcoords.iter().any(|v| !v.is_finite()) {
            return None;
        }

        if !in_bounds {
            let spacing = self.spacing();
            let mut dist2 = 0.0;
            for d in 0..3 {
                let min = self.extent.bounds[(d, 0)];
                let max = self.extent.bounds[(d, 1)];
                if ijk[d] < min {
                    let dist =
                        (ijk[d] as f64 + pcoords[d] - min as f64) * spacing[d];
                    ijk[d] = min;
                    pcoords[d] = 0.0;
                    dist2 += dist * dist;
                } else if ijk[d] >= max {
                    let dist =
                        (ijk[d] as f64 + pcoords[d] - max as f64) * spacing[d];
                    if max == min {
                        ijk[d] = min;
                        pcoords[d] = 0.0;
                    } else {
                        ijk[d] = max - 1;
                        pcoords[d] = 1.0;
                    }
                    dist2 += dist * dist;
                }
            }
            if dist2 > tol2 {
                return None;
            }
        }

        let mut cell_pcoords = Point3::zeros();
        for (n, &d) in self.description.active_axes().iter().enumerate() {
            cell_pcoords[n] = pcoords[d];
        }
        let weights = self
            .description
            .cell_type()
            .interpolation_weights(&cell_pcoords);
        let cell_id = self.compute_cell_id(&ijk)?;

        Some(CellLocation {
            cell_id,
            ijk,
            pcoords: cell_pcoords,
            weights,
        })
    }

    /// `find_cell`, also returning the filled cell.
    pub fn find_and_get_cell(
        &self,
        x: &Point3,
        tol2: f64,
    ) -> Option<(Cell, CellLocation)> {
        let location = self.find_cell(x, tol2)?;
        let mut cell = Cell::default();
        self.cell_into(location.cell_id, &mut cell).ok()?;
        Some((cell, location))
    }

    /// Id of the grid point nearest to `x`.
    pub fn find_point(&self, x: &Point3) -> Result<usize> {
        let spacing = self.spacing();
        let dims = self.dimensions();
        for axis in Axis::ALL {
            let d = axis.index();
            if spacing[d] == 0.0 && dims[d] > 1 {
                tracing::warn!("Spacing along the {} axis is 0.", axis);
                return Err(GridError::ZeroSpacing(axis));
            }
        }

        let location = self.physical_to_index(x);
        if location.iter().any(|v| !v.is_finite()) {
            return Err(GridError::PointOutside);
        }
        let nearest: Coord = location.map(|v| (v + 0.5).floor() as i32);
        self.compute_point_id(&nearest).ok_or(GridError::PointOutside)
    }
}
