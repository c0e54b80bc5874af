use crate::cell::CellType;

/// Shape of a grid, derived only from which axes span more than one sample.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DataDescription {
    #[default]
    Empty,
    SinglePoint,
    XLine,
    YLine,
    ZLine,
    XYPlane,
    YZPlane,
    XZPlane,
    XYZGrid,
}

impl DataDescription {
    /// Classify from the per-axis "spans more than one sample" flags.
    /// `empty` wins over everything else.
    pub fn classify(empty: bool, spans: [bool; 3]) -> Self {
        if empty {
            return DataDescription::Empty;
        }
        match spans {
            [false, false, false] => DataDescription::SinglePoint,
            [true, false, false] => DataDescription::XLine,
            [false, true, false] => DataDescription::YLine,
            [false, false, true] => DataDescription::ZLine,
            [true, true, false] => DataDescription::XYPlane,
            [false, true, true] => DataDescription::YZPlane,
            [true, false, true] => DataDescription::XZPlane,
            [true, true, true] => DataDescription::XYZGrid,
        }
    }

    /// Number of axes the grid spans.
    pub fn data_dimension(&self) -> usize {
        match self {
            DataDescription::Empty | DataDescription::SinglePoint => 0,
            DataDescription::XLine
            | DataDescription::YLine
            | DataDescription::ZLine => 1,
            DataDescription::XYPlane
            | DataDescription::YZPlane
            | DataDescription::XZPlane => 2,
            DataDescription::XYZGrid => 3,
        }
    }

    /// The axes spanned, in increasing axis order.
    pub fn active_axes(&self) -> &'static [usize] {
        match self {
            DataDescription::Empty | DataDescription::SinglePoint => &[],
            DataDescription::XLine => &[0],
            DataDescription::YLine => &[1],
            DataDescription::ZLine => &[2],
            DataDescription::XYPlane => &[0, 1],
            DataDescription::YZPlane => &[1, 2],
            DataDescription::XZPlane => &[0, 2],
            DataDescription::XYZGrid => &[0, 1, 2],
        }
    }

    /// The primitive every cell of such a grid has.
    pub fn cell_type(&self) -> CellType {
        match self {
            DataDescription::Empty => CellType::Empty,
            DataDescription::SinglePoint => CellType::Vertex,
            DataDescription::XLine
            | DataDescription::YLine
            | DataDescription::ZLine => CellType::Line,
            DataDescription::XYPlane
            | DataDescription::YZPlane
            | DataDescription::XZPlane => CellType::Pixel,
            DataDescription::XYZGrid => CellType::Voxel,
        }
    }
}
