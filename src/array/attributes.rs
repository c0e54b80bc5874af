use super::DataArray;

/// Arrays associated with the points, or with the cells, of a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    arrays: Vec<DataArray>,
    scalars: Option<usize>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    pub fn number_of_arrays(&self) -> usize {
        self.arrays.len()
    }

    pub fn array(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    pub fn array_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        self.arrays.iter_mut().find(|a| a.name() == name)
    }

    /// Add a non-scalar array, replacing any array with the same name.
    pub fn add_array(&mut self, array: DataArray) -> usize {
        match self.arrays.iter().position(|a| a.name() == array.name()) {
            Some(i) => {
                self.arrays[i] = array;
                i
            }
            None => {
                self.arrays.push(array);
                self.arrays.len() - 1
            }
        }
    }

    /// The active scalars.
    pub fn scalars(&self) -> Option<&DataArray> {
        self.scalars.map(|i| &self.arrays[i])
    }

    pub fn scalars_mut(&mut self) -> Option<&mut DataArray> {
        match self.scalars {
            Some(i) => Some(&mut self.arrays[i]),
            None => None,
        }
    }

    /// Replace the active scalars, or add and activate the array.
    pub fn set_scalars(&mut self, array: DataArray) {
        match self.scalars {
            Some(i) => {
                self.arrays[i] = array;
                // Keep names unique.
                let name = self.arrays[i].name().to_string();
                let mut j = 0;
                self.arrays.retain(|a| {
                    let keep = j == i || a.name() != name;
                    j += 1;
                    keep
                });
                self.scalars =
                    self.arrays.iter().position(|a| a.name() == name);
            }
            None => {
                let i = self.add_array(array);
                self.scalars = Some(i);
            }
        }
    }

    /// Same arrays, same active scalars, every array sized for `tuples`
    /// zeroed tuples.
    pub fn copy_allocate(&self, tuples: usize) -> Self {
        Attributes {
            arrays: self.arrays.iter().map(|a| a.new_like(tuples)).collect(),
            scalars: self.scalars,
        }
    }

    /// Copy tuple `in_id` of every array of `source` into tuple `out_id`
    /// of the matching array of self. Both must share a layout, as produced
    /// by `copy_allocate`.
    #[track_caller]
    pub fn copy_data(
        &mut self,
        source: &Attributes,
        in_id: usize,
        out_id: usize,
    ) {
        debug_assert_eq!(self.arrays.len(), source.arrays.len());
        for (out, input) in self.arrays.iter_mut().zip(source.arrays.iter()) {
            out.copy_tuple(input, in_id, out_id);
        }
    }

    pub fn clear(&mut self) {
        self.arrays.clear();
        self.scalars = None;
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::array::ScalarType;

    #[test]
    fn scalars_test() {
        let mut attributes = Attributes::new();
        assert!(attributes.scalars().is_none());

        attributes.add_array(DataArray::new(ScalarType::F32, "normals", 3, 4));
        attributes.set_scalars(DataArray::new(ScalarType::U8, "s", 1, 4));
        assert_eq!(attributes.number_of_arrays(), 2);
        assert_eq!(attributes.scalars().map(|a| a.name()), Some("s"));

        attributes.set_scalars(DataArray::new(ScalarType::I16, "t", 1, 4));
        assert_eq!(attributes.number_of_arrays(), 2);
        assert_eq!(
            attributes.scalars().map(|a| a.scalar_type()),
            Some(ScalarType::I16)
        );
        assert!(attributes.array("normals").is_some());
    }

    #[test]
    fn set_scalars_renames_onto_existing_test() {
        let mut attributes = Attributes::new();
        attributes.set_scalars(DataArray::new(ScalarType::U8, "s", 1, 4));
        attributes.add_array(DataArray::new(ScalarType::F32, "other", 1, 4));
        attributes.set_scalars(DataArray::new(ScalarType::F64, "other", 1, 4));
        assert_eq!(attributes.number_of_arrays(), 1);
        assert_eq!(
            attributes.scalars().map(|a| a.scalar_type()),
            Some(ScalarType::F64)
        );
    }

    #[test]
    fn copy_allocate_test() {
        let mut attributes = Attributes::new();
        attributes.set_scalars(DataArray::new(ScalarType::F64, "s", 2, 6));
        attributes
            .scalars_mut()
            .unwrap()
            .set_component(5, 1, 3.0);

        let mut copy = attributes.copy_allocate(2);
        assert_eq!(copy.scalars().unwrap().number_of_tuples(), 2);
        copy.copy_data(&attributes, 5, 1);
        assert_eq!(copy.scalars().unwrap().component(1, 1), 3.0);
        assert_eq!(copy.scalars().unwrap().component(0, 1), 0.0);
    }
}
