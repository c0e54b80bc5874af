mod description;
mod extent;
pub mod indexing;
mod physical_bounds;

pub use description::*;
pub use extent::*;
pub use physical_bounds::*;

pub use nalgebra::{matrix, vector};
pub use num_traits::Num;

/// Integer index-space coordinate, `(i, j, k)`.
pub type Coord = nalgebra::Vector3<i32>;

/// Inclusive index bounds, one row per axis: `[min, max]`.
pub type Bounds = nalgebra::SMatrix<i32, 3, 2>;

/// Continuous coordinate, used both for physical points
/// and for continuous index locations.
pub type Point3 = nalgebra::Vector3<f64>;

pub trait NumTrait: Num + Copy + Send + Sync {}

impl<T: Num + Copy + Send + Sync> NumTrait for T {}

/// One of the three grid axes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    I,
    J,
    K,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
            Axis::K => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        let label = match self {
            Axis::I => "I",
            Axis::J => "J",
            Axis::K => "K",
        };
        write!(f, "{label}")
    }
}
