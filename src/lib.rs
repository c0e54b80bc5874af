pub mod array;
pub mod cell;
pub mod error;
pub mod grid_args;
pub mod image;
pub mod slice_image;
pub mod transform;
pub mod util;
pub mod vtk;
