//! A regular grid of samples in 3D.
//!
//! `ImageData` ties an index-space `Extent` to physical space through an
//! `IndexTransform` and carries the point and cell attribute arrays.
//! Point ids and cell ids are relative to the extent minimum, X fastest.
//!
//! The implementation is split by concern:
//! * `geometry`: cell ids, cell corners and point lookup,
//! * `locate`: physical point to cell / point queries,
//! * `scalars`: addressing into the active scalar array,
//! * `region`: bounds, gradients, cropping and copying sub-extents,
//! * `pipeline`: metadata exchange and structure copies.

mod geometry;
mod locate;
mod pipeline;
mod region;
mod scalars;

pub use locate::*;
pub use pipeline::*;
pub use region::{axis_update_extent, set_axis_update_extent};
pub use scalars::IMAGE_SCALARS_NAME;

use crate::array::{Attributes, Scalar};
use crate::cell::Cell;
use crate::error::*;
use crate::transform::{Direction, IndexTransform};
use crate::util::*;
use nalgebra::Vector4;

#[derive(Clone, Debug)]
pub struct ImageData {
    extent: Extent,
    description: DataDescription,
    transform: IndexTransform,

    /// Reused by `cell`, always matches `description`.
    template: Cell,

    point_data: Attributes,
    cell_data: Attributes,

    mtime: u64,
    bounds: PhysicalBounds,
    bounds_time: u64,
}

impl Default for ImageData {
    fn default() -> Self {
        ImageData::new()
    }
}

impl ImageData {
    /// Empty grid with unit spacing, zero origin and identity direction.
    pub fn new() -> Self {
        ImageData {
            extent: Extent::empty(),
            description: DataDescription::Empty,
            transform: IndexTransform::default(),
            template: Cell::Empty,
            point_data: Attributes::new(),
            cell_data: Attributes::new(),
            mtime: 0,
            bounds: PhysicalBounds::uninitialized(),
            bounds_time: 0,
        }
    }

    /// Grid over `extent`, see `set_extent`.
    pub fn with_extent(extent: Extent) -> Result<Self> {
        let mut result = ImageData::new();
        result.set_extent(extent)?;
        Ok(result)
    }

    /// Replace the extent.
    ///
    /// Extents with some, but not all, axes inverted, or too wide to
    /// count in an `i32`, are rejected and the previous extent is kept.
    /// Attribute arrays are not resized.
    pub fn set_extent(&mut self, extent: Extent) -> Result<()> {
        if !extent.is_consistent() {
            tracing::error!("Bad extent {}, retaining previous values", extent);
            return Err(GridError::InvalidExtent(extent));
        }
        if extent == self.extent {
            return Ok(());
        }
        self.replace_extent(extent);
        Ok(())
    }

    /// Same as `set_extent(Extent::from_dimensions(i, j, k))`.
    pub fn set_dimensions(&mut self, i: i32, j: i32, k: i32) -> Result<()> {
        self.set_extent(Extent::from_dimensions(i, j, k))
    }

    /// Install an extent already known to be consistent.
    pub(crate) fn replace_extent(&mut self, extent: Extent) {
        self.extent = extent;
        let description = extent.description();
        if description != self.description {
            self.description = description;
            self.template = Cell::template(description.cell_type());
        }
        self.modified();
    }

    pub fn set_spacing(&mut self, spacing: Point3) {
        if self.transform.set_spacing(spacing) {
            self.modified();
        }
    }

    pub fn set_origin(&mut self, origin: Point3) {
        if self.transform.set_origin(origin) {
            self.modified();
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.transform.set_direction(direction) {
            self.modified();
        }
    }

    /// Bump the modification time and refresh anything derived from
    /// the geometry.
    pub fn modified(&mut self) {
        self.mtime += 1;
        self.compute_bounds();
    }

    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn description(&self) -> DataDescription {
        self.description
    }

    pub fn data_dimension(&self) -> usize {
        self.description.data_dimension()
    }

    pub fn dimensions(&self) -> Coord {
        self.extent.dimensions()
    }

    pub fn cell_dims(&self) -> Coord {
        self.extent.cell_dims()
    }

    pub fn number_of_points(&self) -> usize {
        self.extent.number_of_points()
    }

    pub fn number_of_cells(&self) -> usize {
        self.extent.number_of_cells()
    }

    pub fn spacing(&self) -> &Point3 {
        self.transform.spacing()
    }

    pub fn origin(&self) -> &Point3 {
        self.transform.origin()
    }

    pub fn direction(&self) -> &Direction {
        self.transform.direction()
    }

    pub fn transform(&self) -> &IndexTransform {
        &self.transform
    }

    pub fn point_data(&self) -> &Attributes {
        &self.point_data
    }

    pub fn point_data_mut(&mut self) -> &mut Attributes {
        &mut self.point_data
    }

    pub fn cell_data(&self) -> &Attributes {
        &self.cell_data
    }

    pub fn cell_data_mut(&mut self) -> &mut Attributes {
        &mut self.cell_data
    }

    pub fn index_to_physical(&self, ijk: &Point3) -> Point3 {
        self.transform.index_to_physical(ijk)
    }

    pub fn coord_to_physical(&self, ijk: &Coord) -> Point3 {
        self.transform.coord_to_physical(ijk)
    }

    pub fn physical_to_index(&self, xyz: &Point3) -> Point3 {
        self.transform.physical_to_index(xyz)
    }

    pub fn physical_to_index_normal(&self, normal: &Point3) -> Point3 {
        self.transform.normal_to_index(normal)
    }

    pub fn physical_to_index_plane(
        &self,
        plane: &Vector4<f64>,
    ) -> Vector4<f64> {
        self.transform.plane_to_index(plane)
    }

    /// Fill the active point scalars in parallel, `f` receives the absolute
    /// coordinate of each point and its tuple.
    pub fn par_set_scalars<T, F>(
        &mut self,
        f: F,
        chunk_size: usize,
    ) -> Result<()>
    where
        T: Scalar,
        F: Fn(Coord, &mut [T]) + Send + Sync,
    {
        profiling::scope!("par_set_scalars");
        let extent = self.extent;
        let scalars =
            self.point_data.scalars_mut().ok_or(GridError::NoScalars)?;
        let actual = scalars.scalar_type();
        let typed = scalars.as_typed_mut::<T>().ok_or(
            GridError::ScalarTypeMismatch {
                actual,
                requested: T::SCALAR_TYPE,
            },
        )?;
        typed.par_set_tuples(
            |id, tuple| f(extent.linear_to_coord(id), tuple),
            chunk_size,
        );
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::array::ScalarType;
    use crate::cell::CellType;

    #[test]
    fn set_extent_test() {
        {
            let mut image = ImageData::new();
            assert_eq!(image.description(), DataDescription::Empty);
            assert_eq!(image.number_of_points(), 0);
            assert_eq!(image.number_of_cells(), 0);

            image.set_extent(Extent::from_array([0, 3, 0, 2, 0, 1])).unwrap();
            assert_eq!(image.description(), DataDescription::XYZGrid);
            assert_eq!(image.dimensions(), vector![4, 3, 2]);
            assert_eq!(image.number_of_points(), 24);
            assert_eq!(image.number_of_cells(), 6);
        }

        {
            let mut image = ImageData::new();
            image.set_dimensions(5, 1, 3).unwrap();
            assert_eq!(image.description(), DataDescription::XZPlane);
            assert_eq!(image.data_dimension(), 2);
            assert_eq!(image.number_of_cells(), 8);
        }
    }

    #[test]
    fn mixed_extent_rejected_test() {
        let mut image = ImageData::new();
        let good = Extent::from_array([0, 2, 0, 2, 0, 0]);
        image.set_extent(good).unwrap();
        let mtime = image.mtime();

        let bad = Extent::from_array([0, 2, 3, 1, 0, 0]);
        assert_eq!(image.set_extent(bad), Err(GridError::InvalidExtent(bad)));
        assert_eq!(*image.extent(), good);
        assert_eq!(image.mtime(), mtime);

        let too_wide = Extent::from_array([i32::MIN, i32::MAX, 0, 0, 0, 0]);
        assert_eq!(
            image.set_extent(too_wide),
            Err(GridError::InvalidExtent(too_wide))
        );
        assert_eq!(*image.extent(), good);

        // All axes inverted is the empty grid, not an error.
        image.set_extent(Extent::empty()).unwrap();
        assert_eq!(image.description(), DataDescription::Empty);
    }

    #[test]
    fn setters_bump_mtime_test() {
        let mut image = ImageData::new();
        image.set_dimensions(2, 2, 2).unwrap();
        let t0 = image.mtime();
        image.set_spacing(vector![1.0, 1.0, 1.0]);
        assert_eq!(image.mtime(), t0);
        image.set_spacing(vector![2.0, 1.0, 1.0]);
        assert!(image.mtime() > t0);
        let t1 = image.mtime();
        image.set_origin(vector![0.0, 0.0, 1.0]);
        assert!(image.mtime() > t1);
        let t2 = image.mtime();
        image.set_extent(Extent::from_dimensions(2, 2, 2)).unwrap();
        assert_eq!(image.mtime(), t2);
    }

    #[test]
    fn template_follows_description_test() {
        let mut image = ImageData::new();
        image.set_dimensions(3, 1, 1).unwrap();
        assert_eq!(image.template.cell_type(), CellType::Line);
        image.set_dimensions(3, 3, 1).unwrap();
        assert_eq!(image.template.cell_type(), CellType::Pixel);
        image.set_dimensions(1, 1, 1).unwrap();
        assert_eq!(image.template.cell_type(), CellType::Vertex);
    }

    #[test]
    fn par_set_scalars_test() {
        let mut image =
            ImageData::with_extent(Extent::from_array([1, 4, -1, 1, 2, 3]))
                .unwrap();
        image.allocate_scalars(ScalarType::I32, 1).unwrap();
        image
            .par_set_scalars::<i32, _>(
                |coord, tuple| {
                    tuple[0] = coord[0] + 10 * coord[1] + 100 * coord[2]
                },
                5,
            )
            .unwrap();
        for coord in image.extent().coord_iter() {
            let v = image.scalar_component(&coord, 0).unwrap();
            assert_eq!(v, (coord[0] + 10 * coord[1] + 100 * coord[2]) as f64);
        }

        assert!(matches!(
            image.par_set_scalars::<f32, _>(|_, _| {}, 5),
            Err(GridError::ScalarTypeMismatch { .. })
        ));
    }

    #[test]
    fn plane_to_index_test() {
        let mut image =
            ImageData::with_extent(Extent::from_dimensions(4, 4, 4)).unwrap();
        image.set_spacing(vector![2.0, 1.0, 1.0]);
        image.set_origin(vector![1.0, 0.0, 0.0]);

        // x = 5 lies on i = 2.
        let plane =
            image.physical_to_index_plane(&Vector4::new(1.0, 0.0, 0.0, -5.0));
        let expected = [1.0, 0.0, 0.0, -2.0];
        for (a, b) in plane.iter().zip(expected) {
            float_cmp::assert_approx_eq!(f64, *a, b, epsilon = 1e-12);
        }
        assert_eq!(
            image.physical_to_index_normal(&vector![1.0, 0.0, 0.0]),
            vector![2.0, 0.0, 0.0]
        );
    }
}
