use crate::array::DataArray;
use crate::cell::{Cell, CellType};
use crate::error::*;
use crate::image::ImageData;
use vtkio::model;

fn vtk_cell_type(cell_type: CellType) -> Option<model::CellType> {
    match cell_type {
        CellType::Empty => None,
        CellType::Vertex => Some(model::CellType::Vertex),
        CellType::Line => Some(model::CellType::Line),
        CellType::Pixel => Some(model::CellType::Pixel),
        CellType::Voxel => Some(model::CellType::Voxel),
    }
}

fn vtk_attribute(array: &DataArray, active: bool) -> model::Attribute {
    let components = array.number_of_components();
    let values = (0..array.number_of_tuples() * components)
        .map(|i| array.value(i))
        .collect::<Vec<f64>>();
    let elem = if active && components <= 4 {
        model::ElementType::Scalars {
            num_comp: components as u32,
            lookup_table: None,
        }
    } else {
        model::ElementType::Generic(components as u32)
    };
    model::Attribute::DataArray(model::DataArray {
        name: array.name().to_string(),
        elem,
        data: model::IOBuffer::F64(values),
    })
}

fn vtk_attributes(
    attributes: &crate::array::Attributes,
) -> Vec<model::Attribute> {
    let active = attributes.scalars().map(|s| s.name().to_string());
    attributes
        .arrays()
        .iter()
        .map(|a| vtk_attribute(a, active.as_deref() == Some(a.name())))
        .collect()
}

/// Write the grid as an unstructured grid with physical point locations,
/// so rotated grids keep their orientation.
pub fn write_vtk<F: AsRef<std::path::Path>>(
    image: &ImageData,
    s: &F,
) -> Result<()> {
    profiling::scope!("write_vtk");
    tracing::info!("Writing vtk: {:?}", s.as_ref());

    // Collect the grid points as vertices in mesh
    let n_points = image.number_of_points();
    let mut points = Vec::with_capacity(3 * n_points);
    for coord in image.extent().coord_iter() {
        let p = image.coord_to_physical(&coord);
        points.extend_from_slice(p.as_slice());
    }
    debug_assert_eq!(points.len(), n_points * 3);

    // One primitive per cell, corners already in vtk order
    let n_cells = image.number_of_cells();
    let mut connectivity = Vec::new();
    let mut offsets = Vec::with_capacity(n_cells);
    let mut cell_types = Vec::with_capacity(n_cells);
    if let Some(vtk_type) = vtk_cell_type(image.description().cell_type()) {
        let mut cell = Cell::default();
        for cell_id in 0..n_cells {
            image.cell_into(cell_id, &mut cell)?;
            connectivity.extend(cell.point_ids().iter().map(|id| *id as u64));
            offsets.push(connectivity.len() as u64);
            cell_types.push(vtk_type);
        }
    }

    model::Vtk {
        version: model::Version::Auto,
        title: String::new(),
        byte_order: model::ByteOrder::LittleEndian,
        file_path: None,
        data: model::DataSet::inline(model::UnstructuredGridPiece {
            points: model::IOBuffer::F64(points),
            cells: model::Cells {
                cell_verts: model::VertexNumbers::XML {
                    connectivity,
                    offsets,
                },
                types: cell_types,
            },
            data: model::Attributes {
                point: vtk_attributes(image.point_data()),
                cell: vtk_attributes(image.cell_data()),
            },
        }),
    }
    .export(s)
    .map_err(|e| GridError::output(format!("{:?}", e)))
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::array::ScalarType;
    use crate::util::*;

    #[test]
    fn attribute_test() {
        let mut array = DataArray::new(ScalarType::U8, "rgb", 3, 2);
        array.set_component(1, 2, 7.0);
        let model::Attribute::DataArray(a) = vtk_attribute(&array, true) else {
            panic!("expected a data array");
        };
        assert_eq!(a.name, "rgb");
        assert!(matches!(
            a.elem,
            model::ElementType::Scalars { num_comp: 3, .. }
        ));
        match a.data {
            model::IOBuffer::F64(v) => {
                assert_eq!(v, vec![0.0, 0.0, 0.0, 0.0, 0.0, 7.0])
            }
            _ => panic!("expected f64 buffer"),
        }
    }

    #[test]
    fn write_test() {
        let mut image =
            ImageData::with_extent(Extent::from_array([0, 2, 0, 1, 0, 1]))
                .unwrap();
        image.allocate_scalars(ScalarType::F32, 1).unwrap();
        let path = std::env::temp_dir().join("imagegrid_write_test.vtu");
        write_vtk(&image, &path).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
