use super::ImageData;
use crate::cell::{Cell, CellType};
use crate::error::*;
use crate::util::indexing::coord_to_linear;
use crate::util::*;

impl ImageData {
    /// Cell id to the cell's min corner, relative to the extent minimum.
    pub fn ijk_min_for_cell_id(&self, cell_id: usize) -> Result<Coord> {
        let cells = self.number_of_cells();
        if cells == 0 {
            return Err(GridError::EmptyImage);
        }
        if cell_id >= cells {
            return Err(GridError::CellIdOutOfRange { cell_id, cells });
        }
        let dims = self.cell_dims().map(|d| d as usize);
        let mut result = Coord::zeros();
        for &d in self.description.active_axes() {
            result[d] = match d {
                0 => cell_id % dims[0],
                1 => (cell_id / dims[0]) % dims[1],
                _ => cell_id / (dims[0] * dims[1]),
            } as i32;
        }
        Ok(result)
    }

    /// The opposite cell corner: one step along every spanned axis.
    pub fn ijk_max_for_ijk_min(&self, ijk_min: &Coord) -> Coord {
        let mut result = *ijk_min;
        for &d in self.description.active_axes() {
            result[d] += 1;
        }
        result
    }

    /// Write point ids and physical locations of the corners spanning
    /// `ijk_min..=ijk_max` (relative coordinates) into `cell`.
    fn fill_cell_corners(
        &self,
        cell: &mut Cell,
        ijk_min: &Coord,
        ijk_max: &Coord,
    ) {
        let min = self.extent.min();
        let dims = self.dimensions();
        let (ids, points) = cell.corners_mut();
        let mut n = 0;
        for k in ijk_min[2]..=ijk_max[2] {
            for j in ijk_min[1]..=ijk_max[1] {
                for i in ijk_min[0]..=ijk_max[0] {
                    let local = vector![i, j, k];
                    ids[n] = coord_to_linear(&local, &dims);
                    points[n] = self.coord_to_physical(&(local + min));
                    n += 1;
                }
            }
        }
        debug_assert_eq!(n, ids.len());
    }

    /// Fill the reusable cell template for `cell_id` and return it.
    ///
    /// The reference is only valid until the next call.
    /// Returns `None` for empty grids and out of range ids.
    pub fn cell(&mut self, cell_id: usize) -> Option<&Cell> {
        let ijk_min = match self.ijk_min_for_cell_id(cell_id) {
            Ok(ijk) => ijk,
            Err(e) => {
                tracing::debug!("{}", e);
                return None;
            }
        };
        self.cell_from_ijk_min(&ijk_min)
    }

    /// Same as `cell`, addressing the cell by its min corner relative to
    /// the extent minimum.
    pub fn cell_at(&mut self, ijk_min: &Coord) -> Option<&Cell> {
        if self.description == DataDescription::Empty {
            tracing::debug!("{}", GridError::EmptyImage);
            return None;
        }
        let dims = self.cell_dims();
        if (0..3).any(|d| ijk_min[d] < 0 || ijk_min[d] >= dims[d]) {
            return None;
        }
        self.cell_from_ijk_min(ijk_min)
    }

    fn cell_from_ijk_min(&mut self, ijk_min: &Coord) -> Option<&Cell> {
        let ijk_max = self.ijk_max_for_ijk_min(ijk_min);
        let mut template = std::mem::take(&mut self.template);
        self.fill_cell_corners(&mut template, ijk_min, &ijk_max);
        self.template = template;
        Some(&self.template)
    }

    /// Fill a caller-owned cell, switching its kind as needed.
    pub fn cell_into(&self, cell_id: usize, cell: &mut Cell) -> Result<()> {
        let ijk_min = self.ijk_min_for_cell_id(cell_id)?;
        let ijk_max = self.ijk_max_for_ijk_min(&ijk_min);
        let cell_type = self.description.cell_type();
        if cell.cell_type() != cell_type {
            *cell = Cell::template(cell_type);
        }
        self.fill_cell_corners(cell, &ijk_min, &ijk_max);
        Ok(())
    }

    /// Physical bounds of one cell, uninitialized on failure.
    pub fn cell_bounds(&self, cell_id: usize) -> PhysicalBounds {
        let Ok(ijk_min) = self.ijk_min_for_cell_id(cell_id) else {
            return PhysicalBounds::uninitialized();
        };
        let ijk_max = self.ijk_max_for_ijk_min(&ijk_min);
        let min = self.extent.min();
        let mut corners = Vec::with_capacity(8);
        for k in ijk_min[2]..=ijk_max[2] {
            for j in ijk_min[1]..=ijk_max[1] {
                for i in ijk_min[0]..=ijk_max[0] {
                    let coord = vector![i, j, k] + min;
                    corners.push(self.coord_to_physical(&coord));
                }
            }
        }
        PhysicalBounds::from_points(corners)
    }

    /// Every cell of the grid has the same primitive kind.
    pub fn cell_type(&self, _cell_id: usize) -> CellType {
        self.description.cell_type()
    }

    /// Physical location of a point.
    pub fn point(&self, point_id: usize) -> Result<Point3> {
        let points = self.number_of_points();
        if point_id >= points {
            return Err(GridError::PointIdOutOfRange { point_id, points });
        }
        Ok(self.coord_to_physical(&self.extent.linear_to_coord(point_id)))
    }

    /// Point id of an absolute coordinate, `None` outside the extent.
    pub fn compute_point_id(&self, ijk: &Coord) -> Option<usize> {
        if !self.extent.contains(ijk) {
            return None;
        }
        Some(self.extent.coord_to_linear(ijk))
    }

    /// Cell id of the cell whose min corner is the absolute coordinate
    /// `ijk`, `None` if there is no such cell.
    pub fn compute_cell_id(&self, ijk: &Coord) -> Option<usize> {
        if self.extent.is_empty() {
            return None;
        }
        let local = ijk - self.extent.min();
        let dims = self.cell_dims();
        if (0..3).any(|d| local[d] < 0 || local[d] >= dims[d]) {
            return None;
        }
        Some(self.extent.cell_coord_to_linear(ijk))
    }
}
