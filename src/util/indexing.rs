//! Conversions between index-space coordinates and linear offsets.
//!
//! All linear orderings here put X fastest, then Y, then Z.
//! Sizes are "exclusive bounds", i.e. the number of samples per axis.

use crate::util::*;

/// Number of samples in a box of the given exclusive bounds.
/// Any non-positive axis makes the box empty.
pub fn real_buffer_size(exclusive_bounds: &Coord) -> usize {
    let mut accumulator = 1;
    for d in exclusive_bounds {
        if *d <= 0 {
            return 0;
        }
        accumulator *= *d as usize;
    }
    accumulator
}

/// Per-axis tuple strides `(1, nx, nx * ny)`.
pub fn tuple_strides(exclusive_bounds: &Coord) -> [usize; 3] {
    let nx = exclusive_bounds[0].max(0) as usize;
    let ny = exclusive_bounds[1].max(0) as usize;
    [1, nx, nx * ny]
}

/// Per-axis strides into a component-major flattened array.
/// `inc[0] = components`, `inc[d] = inc[d - 1] * size[d - 1]`.
pub fn component_increments(
    components: usize,
    exclusive_bounds: &Coord,
) -> [i64; 3] {
    let mut result = [0; 3];
    let mut accumulator = components as i64;
    for d in 0..3 {
        result[d] = accumulator;
        accumulator *= exclusive_bounds[d] as i64;
    }
    result
}

/// Linear offset of a coordinate relative to the box minimum.
pub fn coord_to_linear(coord: &Coord, exclusive_bounds: &Coord) -> usize {
    debug_assert!(coord.iter().all(|c| *c >= 0));
    let strides = tuple_strides(exclusive_bounds);
    coord[0] as usize * strides[0]
        + coord[1] as usize * strides[1]
        + coord[2] as usize * strides[2]
}

/// Inverse of `coord_to_linear`.
pub fn linear_to_coord(linear_index: usize, exclusive_bounds: &Coord) -> Coord {
    let nx = exclusive_bounds[0] as usize;
    let ny = exclusive_bounds[1] as usize;
    debug_assert!(nx > 0 && ny > 0);
    vector![
        (linear_index % nx) as i32,
        ((linear_index / nx) % ny) as i32,
        (linear_index / (nx * ny)) as i32
    ]
}
