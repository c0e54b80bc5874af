//! Whole-grid and sub-extent operations.

use super::ImageData;
use crate::array::{Attributes, DataArray};
use crate::error::*;
use crate::util::indexing::coord_to_linear;
use crate::util::*;

impl ImageData {
    /// Physical bounds of the grid, uninitialized when empty.
    pub fn bounds(&self) -> &PhysicalBounds {
        &self.bounds
    }

    /// Refresh the cached bounds if the grid changed since they were last
    /// computed. Returns true when they were recomputed.
    pub fn compute_bounds(&mut self) -> bool {
        if self.mtime <= self.bounds_time {
            return false;
        }
        profiling::scope!("compute_bounds");
        self.bounds = if self.extent.is_empty() {
            PhysicalBounds::uninitialized()
        } else if self.direction().is_identity() {
            let origin = self.origin();
            let spacing = self.spacing();
            let mut min = Point3::zeros();
            let mut max = Point3::zeros();
            for d in 0..3 {
                let (lo, hi) = if spacing[d] < 0.0 {
                    (self.extent.bounds[(d, 1)], self.extent.bounds[(d, 0)])
                } else {
                    (self.extent.bounds[(d, 0)], self.extent.bounds[(d, 1)])
                };
                min[d] = origin[d] + lo as f64 * spacing[d];
                max[d] = origin[d] + hi as f64 * spacing[d];
            }
            PhysicalBounds::from_mm(min, max)
        } else {
            let lo = self.extent.min();
            let hi = self.extent.max();
            let corners = (0..8).map(|c| {
                let ijk = vector![
                    if c & 1 == 0 { lo[0] } else { hi[0] },
                    if c & 2 == 0 { lo[1] } else { hi[1] },
                    if c & 4 == 0 { lo[2] } else { hi[2] }
                ];
                self.coord_to_physical(&ijk)
            });
            PhysicalBounds::from_points(corners)
        };
        self.bounds_time = self.mtime;
        true
    }

    /// Gradient of the first component of `scalars` at the absolute point
    /// `ijk`, in physical axes.
    ///
    /// Central differences inside, one-sided differences on the first and
    /// last sample of an axis, zero along axes with a single sample.
    /// Points outside the extent get a zero gradient.
    pub fn point_gradient(&self, ijk: &Coord, scalars: &DataArray) -> Point3 {
        if !self.extent.contains(ijk) {
            return Point3::zeros();
        }
        let points = self.number_of_points();
        if scalars.number_of_tuples() < points {
            tracing::error!(
                "Gradient of an array with {} tuples on a grid with {} points",
                scalars.number_of_tuples(),
                points
            );
            return Point3::zeros();
        }

        let local = ijk - self.extent.min();
        let dims = self.dimensions();
        let spacing = self.spacing();
        let value = |offset: &Coord| {
            scalars.component(coord_to_linear(&(local + offset), &dims), 0)
        };

        let mut g = Point3::zeros();
        for d in 0..3 {
            if dims[d] == 1 {
                continue;
            }
            let mut step = Coord::zeros();
            step[d] = 1;
            g[d] = if local[d] == 0 {
                (value(&step) - value(&Coord::zeros())) / spacing[d]
            } else if local[d] == dims[d] - 1 {
                (value(&Coord::zeros()) - value(&-step)) / spacing[d]
            } else {
                (value(&step) - value(&-step)) / (2.0 * spacing[d])
            };
        }

        self.direction().matrix() * g
    }

    /// Point gradients at the eight corners of the voxel whose min corner
    /// is the absolute point `ijk`, in voxel corner order.
    pub fn voxel_gradient(
        &self,
        ijk: &Coord,
        scalars: &DataArray,
    ) -> [Point3; 8] {
        let mut result = [Point3::zeros(); 8];
        let mut n = 0;
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    let corner = ijk + vector![i, j, k];
                    result[n] = self.point_gradient(&corner, scalars);
                    n += 1;
                }
            }
        }
        result
    }

    /// Shrink the grid to its intersection with `target`, keeping every
    /// point and cell tuple attached to the same sample.
    ///
    /// An empty intersection leaves an empty grid with empty arrays.
    pub fn crop(&mut self, target: &Extent) {
        profiling::scope!("crop");
        if self.extent.is_empty() {
            tracing::debug!("Refusing to crop empty grid");
            return;
        }
        if *target == self.extent {
            return;
        }
        let new_extent = self.extent.intersection(target);
        if new_extent == self.extent {
            tracing::debug!("Extents already match");
            return;
        }

        if new_extent.is_empty() {
            self.point_data = self.point_data.copy_allocate(0);
            self.cell_data = self.cell_data.copy_allocate(0);
            self.replace_extent(Extent::empty());
            return;
        }

        let old = self.extent;
        let mut point_data =
            self.point_data.copy_allocate(new_extent.number_of_points());
        if covers(&self.point_data, old.number_of_points()) {
            for (out_id, coord) in new_extent.coord_iter().enumerate() {
                let in_id = old.coord_to_linear(&coord);
                point_data.copy_data(&self.point_data, in_id, out_id);
            }
        } else {
            tracing::warn!(
                "Point data smaller than the grid, not copied by crop"
            );
        }

        let mut cell_data =
            self.cell_data.copy_allocate(new_extent.number_of_cells());
        if covers(&self.cell_data, old.number_of_cells()) {
            let old_cells = old.cell_dims();
            let new_cells = new_extent.cell_dims();
            let offset = new_extent.min() - old.min();
            let cell_region =
                Extent::from_mm(Coord::zeros(), new_cells.add_scalar(-1));
            for (out_id, local) in cell_region.coord_iter().enumerate() {
                // Slices taken at the far face of an axis reuse its last
                // cell layer.
                let source = (local + offset)
                    .zip_map(&old_cells, |c, n| c.min(n - 1));
                let in_id = coord_to_linear(&source, &old_cells);
                cell_data.copy_data(&self.cell_data, in_id, out_id);
            }
        } else {
            tracing::warn!(
                "Cell data smaller than the grid, not copied by crop"
            );
        }

        self.point_data = point_data;
        self.cell_data = cell_data;
        self.replace_extent(new_extent);
    }

    /// Copy the active scalars of `input` over `extent` into the active
    /// scalars of self, casting to the element type of self.
    ///
    /// `extent` must lie within both grids.
    pub fn copy_and_cast_from(
        &mut self,
        input: &ImageData,
        extent: &Extent,
    ) -> Result<()> {
        profiling::scope!("copy_and_cast_from");
        let in_scalars =
            input.point_data.scalars().ok_or(GridError::NoScalars)?;
        let out_scalars =
            self.point_data.scalars().ok_or(GridError::NoScalars)?;
        let components = in_scalars.number_of_components();
        if out_scalars.number_of_components() != components {
            return Err(GridError::ComponentMismatch {
                expected: out_scalars.number_of_components(),
                actual: components,
            });
        }
        if extent.is_empty() {
            return Ok(());
        }
        for grid in [&input.extent, &self.extent] {
            if !grid.contains_extent(extent) {
                return Err(GridError::CoordinateOutOfExtent {
                    coord: extent.max(),
                    extent: *grid,
                });
            }
        }
        // Both ends of the region must be addressable.
        input.array_offset(in_scalars, &extent.max())?;
        self.array_offset(out_scalars, &extent.max())?;

        let mut in_ptr =
            input.array_offset_for_extent(in_scalars, extent)? as i64;
        let mut out_ptr =
            self.array_offset_for_extent(out_scalars, extent)? as i64;
        let in_inc = input.array_continuous_increments(in_scalars, extent);
        let out_inc = self.array_continuous_increments(out_scalars, extent);
        let dims = extent.dimensions();
        let row_length = dims[0] as usize * components;

        let out_scalars =
            self.point_data.scalars_mut().ok_or(GridError::NoScalars)?;
        for _ in 0..dims[2] {
            for _ in 0..dims[1] {
                out_scalars.copy_values(
                    in_scalars,
                    in_ptr as usize,
                    out_ptr as usize,
                    row_length,
                );
                in_ptr += row_length as i64 + in_inc[1];
                out_ptr += row_length as i64 + out_inc[1];
            }
            in_ptr += in_inc[2];
            out_ptr += out_inc[2];
        }
        Ok(())
    }

    /// Shrink `target` so that a stencil reaching `boundary` samples
    /// below and above, `[xlo, xhi, ylo, yhi, zlo, zhi]`, stays inside
    /// the grid.
    pub fn compute_internal_extent(
        &self,
        target: &Extent,
        boundary: &[i32; 6],
    ) -> Extent {
        let mut result = *target;
        for d in 0..3 {
            let lo = boundary[2 * d];
            let hi = boundary[2 * d + 1];
            if result.bounds[(d, 0)] - lo < self.extent.bounds[(d, 0)] {
                result.bounds[(d, 0)] = self.extent.bounds[(d, 0)] + lo;
            }
            if result.bounds[(d, 1)] + hi > self.extent.bounds[(d, 1)] {
                result.bounds[(d, 1)] = self.extent.bounds[(d, 1)] - hi;
            }
        }
        result
    }
}

/// `update` with the range along `axis` replaced by `min..=max`.
pub fn set_axis_update_extent(
    axis: Axis,
    min: i32,
    max: i32,
    update: &Extent,
) -> Extent {
    let mut result = *update;
    result.bounds[(axis.index(), 0)] = min;
    result.bounds[(axis.index(), 1)] = max;
    result
}

/// Range of `update` along `axis`.
pub fn axis_update_extent(axis: Axis, update: &Extent) -> (i32, i32) {
    (
        update.bounds[(axis.index(), 0)],
        update.bounds[(axis.index(), 1)],
    )
}

fn covers(attributes: &Attributes, tuples: usize) -> bool {
    attributes.arrays().iter().all(|a| a.number_of_tuples() >= tuples)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::array::ScalarType;
    use crate::transform::Direction;
    use float_cmp::assert_approx_eq;

    fn filled(extent: Extent) -> ImageData {
        let mut image = ImageData::with_extent(extent).unwrap();
        image.allocate_scalars(ScalarType::F64, 1).unwrap();
        for coord in extent.coord_iter() {
            let v = (coord[0] + 10 * coord[1] + 100 * coord[2]) as f64;
            image.set_scalar_component(&coord, 0, v).unwrap();
        }
        image
    }

    #[test]
    fn bounds_test() {
        {
            let mut image = ImageData::new();
            assert!(!image.bounds().is_initialized());
            image.set_extent(Extent::from_array([0, 4, 1, 2, -1, 1])).unwrap();
            image.set_origin(vector![1.0, 0.0, 0.0]);
            image.set_spacing(vector![-2.0, 1.0, 0.5]);
            assert_eq!(
                image.bounds().as_array(),
                [-7.0, 1.0, 1.0, 2.0, -0.5, 0.5]
            );
        }

        {
            let mut image =
                ImageData::with_extent(Extent::from_array([0, 2, 0, 1, 0, 0]))
                    .unwrap();
            image.set_direction(Direction::from_row_slice(&[
                0.0, -1.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0,
            ]));
            let b = image.bounds().as_array();
            let expected = [-1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
            for d in 0..6 {
                assert_approx_eq!(f64, b[d], expected[d], epsilon = 1e-12);
            }
        }

        {
            let mut image =
                ImageData::with_extent(Extent::from_dimensions(2, 2, 2))
                    .unwrap();
            assert!(!image.compute_bounds());
            image.set_extent(Extent::empty()).unwrap();
            assert!(!image.bounds().is_initialized());
        }
    }

    #[test]
    fn point_gradient_test() {
        let mut image = filled(Extent::from_array([0, 3, 0, 2, 0, 0]));
        image.set_spacing(vector![0.5, 2.0, 1.0]);
        let s = image.point_data().scalars().unwrap().clone();

        let g = image.point_gradient(&vector![1, 1, 0], &s);
        assert_approx_eq!(f64, g[0], 2.0);
        assert_approx_eq!(f64, g[1], 5.0);
        assert_approx_eq!(f64, g[2], 0.0);

        // One-sided at both ends.
        let g = image.point_gradient(&vector![0, 2, 0], &s);
        assert_approx_eq!(f64, g[0], 2.0);
        assert_approx_eq!(f64, g[1], 5.0);
        let g = image.point_gradient(&vector![3, 0, 0], &s);
        assert_approx_eq!(f64, g[0], 2.0);
        assert_approx_eq!(f64, g[1], 5.0);

        let outside = image.point_gradient(&vector![4, 0, 0], &s);
        assert_eq!(outside, Point3::zeros());
    }

    #[test]
    fn gradient_rotated_test() {
        let mut image = filled(Extent::from_array([0, 2, 0, 2, 0, 2]));
        image.set_direction(Direction::from_row_slice(&[
            0.0, -1.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        ]));
        let s = image.point_data().scalars().unwrap().clone();
        let g = image.point_gradient(&vector![1, 1, 1], &s);
        // Index gradient (1, 10, 100) rotated into physical axes.
        assert_approx_eq!(f64, g[0], -10.0, epsilon = 1e-12);
        assert_approx_eq!(f64, g[1], 1.0, epsilon = 1e-12);
        assert_approx_eq!(f64, g[2], 100.0, epsilon = 1e-12);

        let v = image.voxel_gradient(&vector![0, 0, 0], &s);
        assert_eq!(v[7], image.point_gradient(&vector![1, 1, 1], &s));
    }

    #[test]
    fn crop_test() {
        let extent = Extent::from_array([0, 4, 0, 3, 0, 2]);
        let mut image = filled(extent);
        let cells = DataArray::new(
            ScalarType::I32,
            "cell_ids",
            1,
            extent.number_of_cells(),
        );
        image.cell_data_mut().set_scalars(cells);
        for id in 0..extent.number_of_cells() {
            image
                .cell_data_mut()
                .scalars_mut()
                .unwrap()
                .set_component(id, 0, id as f64);
        }
        let original = image.clone();

        image.crop(&Extent::from_array([1, 3, -5, 2, 1, 9]));
        assert_eq!(*image.extent(), Extent::from_array([1, 3, 0, 2, 1, 2]));
        assert_eq!(image.number_of_points(), 18);
        for coord in image.extent().coord_iter() {
            assert_eq!(
                image.scalar_component(&coord, 0).unwrap(),
                original.scalar_component(&coord, 0).unwrap()
            );
        }

        let cell_scalars = image.cell_data().scalars().unwrap();
        assert_eq!(cell_scalars.number_of_tuples(), 4);
        for id in 0..4 {
            let ijk =
                image.ijk_min_for_cell_id(id).unwrap() + image.extent().min();
            let old_id = original.compute_cell_id(&ijk).unwrap();
            assert_eq!(cell_scalars.component(id, 0), old_id as f64);
        }
    }

    #[test]
    fn crop_to_far_slice_test() {
        let extent = Extent::from_array([0, 2, 0, 2, 0, 2]);
        let mut image = filled(extent);
        image
            .cell_data_mut()
            .set_scalars(DataArray::new(ScalarType::F32, "c", 1, 8));
        image.crop(&Extent::from_array([0, 2, 0, 2, 2, 2]));
        assert_eq!(image.description(), DataDescription::XYPlane);
        assert_eq!(image.cell_data().scalars().unwrap().number_of_tuples(), 4);
        let v = image.scalar_component(&vector![2, 2, 2], 0).unwrap();
        assert_eq!(v, 222.0);
    }

    #[test]
    fn crop_noop_and_empty_test() {
        let extent = Extent::from_array([0, 2, 0, 2, 0, 0]);
        let mut image = filled(extent);
        let mtime = image.mtime();
        image.crop(&Extent::from_array([-1, 5, -1, 5, -1, 5]));
        assert_eq!(*image.extent(), extent);
        assert_eq!(image.mtime(), mtime);

        image.crop(&Extent::from_array([5, 6, 0, 2, 0, 0]));
        assert_eq!(image.description(), DataDescription::Empty);
        assert_eq!(image.point_data().scalars().unwrap().number_of_tuples(), 0);
    }

    #[test]
    fn copy_and_cast_test() {
        let input = filled(Extent::from_array([0, 3, 0, 3, 0, 1]));
        let mut output =
            ImageData::with_extent(Extent::from_array([1, 4, 1, 2, 0, 1]))
                .unwrap();
        output.allocate_scalars(ScalarType::I16, 1).unwrap();

        let region = Extent::from_array([1, 3, 1, 2, 1, 1]);
        output.copy_and_cast_from(&input, &region).unwrap();
        for coord in output.extent().coord_iter() {
            let v = output.scalar_component(&coord, 0).unwrap();
            if region.contains(&coord) {
                assert_eq!(v, input.scalar_component(&coord, 0).unwrap());
            } else {
                assert_eq!(v, 0.0);
            }
        }

        let outside = Extent::from_array([0, 3, 1, 2, 1, 1]);
        assert!(output.copy_and_cast_from(&input, &outside).is_err());
    }

    #[test]
    fn copy_and_cast_wide_integers_test() {
        let big = (1i64 << 60) + 1;
        let extent = Extent::from_array([0, 1, 0, 0, 0, 0]);
        let mut input = ImageData::with_extent(extent).unwrap();
        input.allocate_scalars(ScalarType::I64, 1).unwrap();
        input
            .point_data_mut()
            .scalars_mut()
            .unwrap()
            .as_typed_mut::<i64>()
            .unwrap()
            .values_mut()
            .copy_from_slice(&[big, -big]);

        {
            let mut output = ImageData::with_extent(extent).unwrap();
            output.allocate_scalars(ScalarType::I64, 1).unwrap();
            output.copy_and_cast_from(&input, &extent).unwrap();
            let values = output.point_data().scalars().unwrap();
            let values = values.as_typed::<i64>().unwrap().values();
            assert_eq!(values, &[big, -big]);
        }

        {
            let mut output = ImageData::with_extent(extent).unwrap();
            output.allocate_scalars(ScalarType::U64, 1).unwrap();
            output.copy_and_cast_from(&input, &extent).unwrap();
            let values = output.point_data().scalars().unwrap();
            let values = values.as_typed::<u64>().unwrap().values();
            assert_eq!(values, &[big as u64, 0]);
        }
    }

    #[test]
    fn internal_extent_test() {
        let image =
            ImageData::with_extent(Extent::from_array([0, 9, 0, 9, 0, 0]))
                .unwrap();
        let internal = image.compute_internal_extent(
            &Extent::from_array([0, 9, 2, 5, 0, 0]),
            &[1, 1, 1, 1, 0, 0],
        );
        assert_eq!(internal, Extent::from_array([1, 8, 2, 5, 0, 0]));

        let update = Extent::from_array([0, 9, 0, 9, 0, 0]);
        let axis = set_axis_update_extent(Axis::J, 3, 4, &update);
        assert_eq!(axis, Extent::from_array([0, 9, 3, 4, 0, 0]));
        assert_eq!(axis_update_extent(Axis::J, &axis), (3, 4));
        assert_eq!(axis_update_extent(Axis::I, &axis), (0, 9));
    }
}
