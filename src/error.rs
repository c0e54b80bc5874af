//! Error types for grid operations.
//!
//! Every failure the grid can report is non-fatal: the grid keeps its
//! previous valid state and the caller decides what to do.

use crate::array::ScalarType;
use crate::util::{Axis, Coord, Extent};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Extent with some, but not all, axes inverted, or an axis with
    /// more samples than fit in an `i32`.
    #[error("Bad extent {0}, retaining previous values")]
    InvalidExtent(Extent),

    /// Coordinate outside the current extent.
    #[error(
        "Pixel ({}, {}, {}) not in current extent {extent}",
        .coord[0], .coord[1], .coord[2]
    )]
    CoordinateOutOfExtent { coord: Coord, extent: Extent },

    /// The extent implies more tuples than the array holds.
    #[error(
        "Coordinate ({}, {}, {}) outside of array \
         (tuple {index}, tuples {tuples})",
        .coord[0], .coord[1], .coord[2]
    )]
    ArrayTooShort {
        coord: Coord,
        index: usize,
        tuples: usize,
    },

    #[error("Bad component index {component} (components {components})")]
    BadComponent { component: usize, components: usize },

    #[error("Component count mismatch: expected {expected}, got {actual}")]
    ComponentMismatch { expected: usize, actual: usize },

    #[error(
        "Scalar type mismatch: array holds {actual:?}, \
         requested {requested:?}"
    )]
    ScalarTypeMismatch {
        actual: ScalarType,
        requested: ScalarType,
    },

    #[error("No scalar array has been allocated")]
    NoScalars,

    #[error("Attempt to allocate scalars before scalar type was set")]
    ScalarTypeNotSet,

    #[error("Cannot allocate scalars with zero components")]
    ZeroComponents,

    /// Zero spacing on an axis holding more than one sample.
    #[error("Spacing along the {0} axis is 0")]
    ZeroSpacing(Axis),

    #[error("Requesting a cell from an empty image")]
    EmptyImage,

    #[error("Cell id {cell_id} out of range (cells {cells})")]
    CellIdOutOfRange { cell_id: usize, cells: usize },

    #[error("Point id {point_id} out of range (points {points})")]
    PointIdOutOfRange { point_id: usize, points: usize },

    #[error("Point is outside the grid")]
    PointOutside,

    #[error("Output error: {0}")]
    Output(String),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Create an output error.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}
