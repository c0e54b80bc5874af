//! Addressing into point attribute arrays by grid coordinate.
//!
//! Tuple indices count tuples, offsets count individual components.
//! Increments are recomputed from the current extent on every call.

use super::ImageData;
use crate::array::{DataArray, ScalarType};
use crate::error::*;
use crate::util::indexing::component_increments;
use crate::util::*;

/// Name given to scalar arrays created by `allocate_scalars`.
pub const IMAGE_SCALARS_NAME: &str = "ImageScalars";

impl ImageData {
    /// Component count of the active scalars, 1 when there are none.
    pub fn number_of_scalar_components(&self) -> usize {
        self.point_data
            .scalars()
            .map(|s| s.number_of_components())
            .unwrap_or(1)
    }

    /// Element type of the active scalars, `F64` when there are none.
    pub fn scalar_type(&self) -> ScalarType {
        self.point_data
            .scalars()
            .map(|s| s.scalar_type())
            .unwrap_or(ScalarType::F64)
    }

    pub fn scalar_size(&self) -> usize {
        self.scalar_type().size()
    }

    pub fn scalar_type_min(&self) -> f64 {
        self.scalar_type().min()
    }

    pub fn scalar_type_max(&self) -> f64 {
        self.scalar_type().max()
    }

    /// Component offsets between neighbours along x, y and z
    /// for an array with `components` components.
    pub fn compute_increments(&self, components: usize) -> [i64; 3] {
        component_increments(components, &self.extent.exclusive_bounds())
    }

    /// Increments of the active scalars.
    pub fn increments(&self) -> [i64; 3] {
        match self.point_data.scalars() {
            Some(scalars) => self.array_increments(scalars),
            None => {
                tracing::error!(
                    "No scalar field has been specified, assuming 1 component"
                );
                self.compute_increments(1)
            }
        }
    }

    pub fn array_increments(&self, array: &DataArray) -> [i64; 3] {
        self.compute_increments(array.number_of_components())
    }

    /// Offsets to skip at the end of each row and each slice when walking
    /// `sub_extent` of the active scalars, the x increment is always 0.
    /// `sub_extent` is clamped to the grid in x and y.
    pub fn continuous_increments(&self, sub_extent: &Extent) -> [i64; 3] {
        let increments = self.increments();
        self.continuous_increments_for(increments, sub_extent)
    }

    pub fn array_continuous_increments(
        &self,
        array: &DataArray,
        sub_extent: &Extent,
    ) -> [i64; 3] {
        let increments = self.array_increments(array);
        self.continuous_increments_for(increments, sub_extent)
    }

    fn continuous_increments_for(
        &self,
        increments: [i64; 3],
        sub_extent: &Extent,
    ) -> [i64; 3] {
        let e0 = sub_extent.bounds[(0, 0)].max(self.extent.bounds[(0, 0)]);
        let e1 = sub_extent.bounds[(0, 1)].min(self.extent.bounds[(0, 1)]);
        let e2 = sub_extent.bounds[(1, 0)].max(self.extent.bounds[(1, 0)]);
        let e3 = sub_extent.bounds[(1, 1)].min(self.extent.bounds[(1, 1)]);
        [
            0,
            increments[1] - (e1 - e0 + 1) as i64 * increments[0],
            increments[2] - (e3 - e2 + 1) as i64 * increments[1],
        ]
    }

    /// Tuple index of an absolute coordinate in `array`.
    pub fn tuple_index(
        &self,
        array: &DataArray,
        coord: &Coord,
    ) -> Result<usize> {
        if !self.extent.contains(coord) {
            let e = GridError::CoordinateOutOfExtent {
                coord: *coord,
                extent: self.extent,
            };
            tracing::error!("{}", e);
            return Err(e);
        }
        let index = self.extent.coord_to_linear(coord);
        let tuples = array.number_of_tuples();
        if index >= tuples {
            let e = GridError::ArrayTooShort {
                coord: *coord,
                index,
                tuples,
            };
            tracing::error!("{}", e);
            return Err(e);
        }
        Ok(index)
    }

    /// Offset of the first component of `coord` in `array`.
    pub fn array_offset(
        &self,
        array: &DataArray,
        coord: &Coord,
    ) -> Result<usize> {
        Ok(self.tuple_index(array, coord)? * array.number_of_components())
    }

    /// `array_offset` of the min corner of `extent`.
    pub fn array_offset_for_extent(
        &self,
        array: &DataArray,
        extent: &Extent,
    ) -> Result<usize> {
        self.array_offset(array, &extent.min())
    }

    fn active_scalars(&self) -> Result<&DataArray> {
        self.point_data.scalars().ok_or(GridError::NoScalars)
    }

    /// Tuple index of `coord` in the active scalars.
    pub fn scalar_index(&self, coord: &Coord) -> Result<usize> {
        let scalars = self.active_scalars()?;
        self.tuple_index(scalars, coord)
    }

    pub fn scalar_index_for_extent(&self, extent: &Extent) -> Result<usize> {
        self.scalar_index(&extent.min())
    }

    /// Raw bytes of the scalar tuple at `coord`.
    pub fn scalar_bytes(&self, coord: &Coord) -> Result<&[u8]> {
        let scalars = self.active_scalars()?;
        let index = self.tuple_index(scalars, coord)?;
        Ok(scalars.tuple_bytes(index))
    }

    fn check_component(&self, component: usize) -> Result<()> {
        let components = self.number_of_scalar_components();
        if component >= components {
            let e = GridError::BadComponent {
                component,
                components,
            };
            tracing::error!("{}", e);
            return Err(e);
        }
        Ok(())
    }

    /// One component of the scalars at `coord`, as `f64`.
    pub fn scalar_component(
        &self,
        coord: &Coord,
        component: usize,
    ) -> Result<f64> {
        self.check_component(component)?;
        let scalars = self.active_scalars()?;
        let index = self.tuple_index(scalars, coord)?;
        Ok(scalars.component(index, component))
    }

    /// Set one component of the scalars at `coord`, saturating to the
    /// element type.
    pub fn set_scalar_component(
        &mut self,
        coord: &Coord,
        component: usize,
        value: f64,
    ) -> Result<()> {
        self.check_component(component)?;
        let index = self.scalar_index(coord)?;
        let scalars =
            self.point_data.scalars_mut().ok_or(GridError::NoScalars)?;
        scalars.set_component(index, component, value);
        Ok(())
    }

    /// Size the active point scalars for the current extent.
    ///
    /// Scalars of the same element type are resized in place, anything
    /// else is replaced by a new zero filled array.
    pub fn allocate_scalars(
        &mut self,
        scalar_type: ScalarType,
        components: usize,
    ) -> Result<()> {
        if components == 0 {
            tracing::error!("{}", GridError::ZeroComponents);
            return Err(GridError::ZeroComponents);
        }
        let tuples = self.number_of_points();
        if let Some(scalars) = self.point_data.scalars_mut() {
            if scalars.scalar_type() == scalar_type {
                scalars.set_number_of_components(components);
                scalars.set_number_of_tuples(tuples);
                return Ok(());
            }
        }
        self.point_data.set_scalars(DataArray::new(
            scalar_type,
            IMAGE_SCALARS_NAME,
            components,
            tuples,
        ));
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn image() -> ImageData {
        ImageData::with_extent(Extent::from_array([1, 4, -1, 1, 2, 3])).unwrap()
    }

    #[test]
    fn increments_test() {
        let mut image = image();
        assert_eq!(image.increments(), [1, 4, 12]);
        image.allocate_scalars(ScalarType::U8, 3).unwrap();
        assert_eq!(image.increments(), [3, 12, 36]);

        let sub = Extent::from_array([2, 3, 0, 1, 2, 3]);
        assert_eq!(
            image.continuous_increments(&sub),
            [0, 12 - 2 * 3, 36 - 2 * 12]
        );

        // Clamped to the grid in x and y.
        let wide = Extent::from_array([-10, 10, -10, 10, 2, 3]);
        assert_eq!(image.continuous_increments(&wide), [0, 0, 0]);
    }

    #[test]
    fn tuple_index_test() {
        let mut image = image();
        image.allocate_scalars(ScalarType::F32, 2).unwrap();
        assert_eq!(image.scalar_index(&vector![1, -1, 2]).unwrap(), 0);
        assert_eq!(image.scalar_index(&vector![4, 1, 3]).unwrap(), 23);
        let scalars = image.point_data().scalars().unwrap().clone();
        let offset = image.array_offset(&scalars, &vector![2, 0, 2]);
        assert_eq!(offset.unwrap(), 10);
        let sub = Extent::from_array([2, 3, 0, 1, 3, 3]);
        assert_eq!(image.scalar_index_for_extent(&sub).unwrap(), 17);

        assert!(matches!(
            image.scalar_index(&vector![5, 0, 2]),
            Err(GridError::CoordinateOutOfExtent { .. })
        ));

        let short = DataArray::new(ScalarType::F32, "short", 1, 10);
        assert_eq!(
            image.tuple_index(&short, &vector![4, 1, 3]),
            Err(GridError::ArrayTooShort {
                coord: vector![4, 1, 3],
                index: 23,
                tuples: 10
            })
        );
    }

    #[test]
    fn no_scalars_test() {
        let image = image();
        assert_eq!(
            image.scalar_index(&vector![1, -1, 2]),
            Err(GridError::NoScalars)
        );
        assert_eq!(image.scalar_type(), ScalarType::F64);
        assert_eq!(image.number_of_scalar_components(), 1);
        assert_eq!(image.scalar_size(), 8);
    }

    #[test]
    fn scalar_component_test() {
        let mut image = image();
        image.allocate_scalars(ScalarType::U8, 2).unwrap();
        let c = vector![3, 0, 3];
        image.set_scalar_component(&c, 1, 300.0).unwrap();
        assert_eq!(image.scalar_component(&c, 1).unwrap(), 255.0);
        assert_eq!(image.scalar_component(&c, 0).unwrap(), 0.0);
        assert_eq!(image.scalar_bytes(&c).unwrap(), &[0u8, 255]);
        assert_eq!(
            image.scalar_component(&c, 2),
            Err(GridError::BadComponent {
                component: 2,
                components: 2
            })
        );
        assert_eq!(image.scalar_type_max(), 255.0);
    }

    #[test]
    fn allocate_scalars_test() {
        let mut image = image();
        image.allocate_scalars(ScalarType::I16, 1).unwrap();
        {
            let scalars = image.point_data().scalars().unwrap();
            assert_eq!(scalars.name(), IMAGE_SCALARS_NAME);
            assert_eq!(scalars.number_of_tuples(), 24);
        }

        // Same type: resized in place, name kept.
        image
            .point_data_mut()
            .scalars_mut()
            .unwrap()
            .set_name("density");
        image.set_extent(Extent::from_dimensions(2, 2, 2)).unwrap();
        image.allocate_scalars(ScalarType::I16, 3).unwrap();
        {
            let scalars = image.point_data().scalars().unwrap();
            assert_eq!(scalars.name(), "density");
            assert_eq!(scalars.number_of_components(), 3);
            assert_eq!(scalars.number_of_tuples(), 8);
        }

        // Different type: replaced.
        image.allocate_scalars(ScalarType::F64, 1).unwrap();
        {
            let scalars = image.point_data().scalars().unwrap();
            assert_eq!(scalars.name(), IMAGE_SCALARS_NAME);
            assert_eq!(scalars.scalar_type(), ScalarType::F64);
        }
        assert_eq!(image.point_data().number_of_arrays(), 1);

        assert_eq!(
            image.allocate_scalars(ScalarType::F64, 0),
            Err(GridError::ZeroComponents)
        );
    }
}
