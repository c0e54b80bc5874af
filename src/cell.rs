//! The four primitives a regular grid is made of.
//!
//! Corner order always puts X fastest, then Y, then Z:
//! ```text
//!  Pixel:        Voxel:
//!                       6 ________ 7
//!                       /|       /|
//!                     /  |     /  |
//!                 4 /_______ /5   |
//!  2 _____ 3        |     |  |    |
//!   |     |         |    2|__|____|3
//!   |     |         |    /   |    /
//!   |_____|         |  /     |  /
//!  0       1        |/_______|/
//!                  0          1
//! ```

use crate::util::*;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CellType {
    #[default]
    Empty,
    Vertex,
    Line,
    Pixel,
    Voxel,
}

impl CellType {
    pub fn number_of_points(&self) -> usize {
        match self {
            CellType::Empty => 0,
            CellType::Vertex => 1,
            CellType::Line => 2,
            CellType::Pixel => 4,
            CellType::Voxel => 8,
        }
    }

    /// Interpolation weights for the cell corners at the given
    /// parametric coordinates. Only the first `dimension` coordinates
    /// are used.
    pub fn interpolation_weights(&self, pcoords: &Point3) -> Vec<f64> {
        let r = pcoords[0];
        let s = pcoords[1];
        let t = pcoords[2];
        let rm = 1.0 - r;
        let sm = 1.0 - s;
        let tm = 1.0 - t;
        match self {
            CellType::Empty => vec![],
            CellType::Vertex => vec![1.0],
            CellType::Line => vec![rm, r],
            CellType::Pixel => vec![rm * sm, r * sm, rm * s, r * s],
            CellType::Voxel => vec![
                rm * sm * tm,
                r * sm * tm,
                rm * s * tm,
                r * s * tm,
                rm * sm * t,
                r * sm * t,
                rm * s * t,
                r * s * t,
            ],
        }
    }
}

/// Point ids and physical corner locations of one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Primitive<const N: usize> {
    pub point_ids: [usize; N],
    pub points: [Point3; N],
}

impl<const N: usize> Default for Primitive<N> {
    fn default() -> Self {
        Primitive {
            point_ids: [0; N],
            points: [Point3::zeros(); N],
        }
    }
}

/// A grid cell, one variant per primitive kind.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Vertex(Primitive<1>),
    Line(Primitive<2>),
    Pixel(Primitive<4>),
    Voxel(Primitive<8>),
}

impl Cell {
    /// A fresh cell of the given kind with zeroed corners.
    pub fn template(cell_type: CellType) -> Self {
        match cell_type {
            CellType::Empty => Cell::Empty,
            CellType::Vertex => Cell::Vertex(Primitive::default()),
            CellType::Line => Cell::Line(Primitive::default()),
            CellType::Pixel => Cell::Pixel(Primitive::default()),
            CellType::Voxel => Cell::Voxel(Primitive::default()),
        }
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::Empty => CellType::Empty,
            Cell::Vertex(_) => CellType::Vertex,
            Cell::Line(_) => CellType::Line,
            Cell::Pixel(_) => CellType::Pixel,
            Cell::Voxel(_) => CellType::Voxel,
        }
    }

    pub fn point_ids(&self) -> &[usize] {
        match self {
            Cell::Empty => &[],
            Cell::Vertex(p) => &p.point_ids,
            Cell::Line(p) => &p.point_ids,
            Cell::Pixel(p) => &p.point_ids,
            Cell::Voxel(p) => &p.point_ids,
        }
    }

    pub fn points(&self) -> &[Point3] {
        match self {
            Cell::Empty => &[],
            Cell::Vertex(p) => &p.points,
            Cell::Line(p) => &p.points,
            Cell::Pixel(p) => &p.points,
            Cell::Voxel(p) => &p.points,
        }
    }

    /// Mutable access to both corner lists at once.
    pub fn corners_mut(&mut self) -> (&mut [usize], &mut [Point3]) {
        match self {
            Cell::Empty => (&mut [], &mut []),
            Cell::Vertex(p) => (&mut p.point_ids, &mut p.points),
            Cell::Line(p) => (&mut p.point_ids, &mut p.points),
            Cell::Pixel(p) => (&mut p.point_ids, &mut p.points),
            Cell::Voxel(p) => (&mut p.point_ids, &mut p.points),
        }
    }

    pub fn interpolation_weights(&self, pcoords: &Point3) -> Vec<f64> {
        self.cell_type().interpolation_weights(pcoords)
    }

    /// Physical location at the given parametric coordinates.
    pub fn evaluate_location(&self, pcoords: &Point3) -> Point3 {
        let weights = self.interpolation_weights(pcoords);
        self.points()
            .iter()
            .zip(weights.iter())
            .fold(Point3::zeros(), |acc, (p, w)| acc + p * *w)
    }
}
