//! Geometry and scalar metadata exchanged with whatever produces or
//! consumes a grid, without the data itself.

use super::ImageData;
use crate::array::ScalarType;
use crate::error::*;
use crate::transform::Direction;
use crate::util::*;

/// Description of the active point scalars.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScalarInfo {
    pub scalar_type: Option<ScalarType>,
    pub components: Option<usize>,
}

/// Metadata describing a grid. Absent entries are left untouched when
/// copied onto a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineInfo {
    pub spacing: Option<Point3>,
    pub origin: Option<Point3>,
    pub direction: Option<Direction>,
    pub scalar_info: Option<ScalarInfo>,
}

impl PipelineInfo {
    pub fn new() -> Self {
        PipelineInfo::default()
    }

    pub fn set_scalar_type(&mut self, scalar_type: ScalarType) {
        self.scalar_info
            .get_or_insert_with(ScalarInfo::default)
            .scalar_type = Some(scalar_type);
    }

    pub fn set_number_of_scalar_components(&mut self, components: usize) {
        self.scalar_info
            .get_or_insert_with(ScalarInfo::default)
            .components = Some(components);
    }

    pub fn has_scalar_type(&self) -> bool {
        self.scalar_info
            .is_some_and(|info| info.scalar_type.is_some())
    }

    pub fn has_number_of_scalar_components(&self) -> bool {
        self.scalar_info
            .is_some_and(|info| info.components.is_some())
    }

    /// Scalar type, `F64` when not described.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_info
            .and_then(|info| info.scalar_type)
            .unwrap_or(ScalarType::F64)
    }

    /// Component count, 1 when not described.
    pub fn number_of_scalar_components(&self) -> usize {
        self.scalar_info
            .and_then(|info| info.components)
            .unwrap_or(1)
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
}

impl ImageData {
    /// Apply the spacing, origin and direction present in `info`.
    pub fn copy_information_from_pipeline(&mut self, info: &PipelineInfo) {
        if let Some(spacing) = info.spacing {
            self.set_spacing(spacing);
        }
        if let Some(origin) = info.origin {
            self.set_origin(origin);
        }
        if let Some(direction) = info.direction {
            self.set_direction(direction);
        }
    }

    /// Describe this grid's geometry and active scalars in `info`.
    pub fn copy_information_to_pipeline(&self, info: &mut PipelineInfo) {
        info.spacing = Some(*self.spacing());
        info.origin = Some(*self.origin());
        info.direction = Some(*self.direction());
        info.scalar_info = Some(ScalarInfo {
            scalar_type: Some(self.scalar_type()),
            components: Some(self.number_of_scalar_components()),
        });
    }

    /// Allocate scalars as described by `info`, `F64` with one component
    /// when there is no scalar description at all.
    pub fn allocate_scalars_from_info(
        &mut self,
        info: Option<&PipelineInfo>,
    ) -> Result<()> {
        let (scalar_type, components) = match info.and_then(|i| i.scalar_info) {
            Some(scalar_info) => (
                scalar_info.scalar_type,
                scalar_info.components.unwrap_or(1),
            ),
            None => (Some(ScalarType::F64), 1),
        };
        let Some(scalar_type) = scalar_type else {
            tracing::error!("{}", GridError::ScalarTypeNotSet);
            return Err(GridError::ScalarTypeNotSet);
        };
        self.allocate_scalars(scalar_type, components)
    }

    /// Take the geometry of `other`: extent, spacing, origin and direction.
    /// Attribute data is cleared.
    pub fn copy_structure(&mut self, other: &ImageData) {
        self.point_data.clear();
        self.cell_data.clear();
        self.transform = *other.transform();
        if other.extent != self.extent {
            self.replace_extent(other.extent);
        } else {
            self.modified();
        }
    }
}
