//! Attribute storage the grid indexes into.
//!
//! A `DataArray` holds one value per point (or cell) tuple,
//! each tuple having a fixed number of components stored contiguously.
//! `Attributes` is the set of arrays associated with points or with cells,
//! one of which may be marked as the active scalars.

mod attributes;
mod typed;

pub use attributes::*;
pub use typed::*;

/// Element type of an attribute array.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarType {
    /// Bytes per element.
    pub fn size(&self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::I64 | ScalarType::U64 | ScalarType::F64 => 8,
        }
    }

    /// Smallest representable value.
    pub fn min(&self) -> f64 {
        match self {
            ScalarType::I8 => i8::MIN as f64,
            ScalarType::U8 => 0.0,
            ScalarType::I16 => i16::MIN as f64,
            ScalarType::U16 => 0.0,
            ScalarType::I32 => i32::MIN as f64,
            ScalarType::U32 => 0.0,
            ScalarType::I64 => i64::MIN as f64,
            ScalarType::U64 => 0.0,
            ScalarType::F32 => f32::MIN as f64,
            ScalarType::F64 => f64::MIN,
        }
    }

    /// Largest representable value.
    pub fn max(&self) -> f64 {
        match self {
            ScalarType::I8 => i8::MAX as f64,
            ScalarType::U8 => u8::MAX as f64,
            ScalarType::I16 => i16::MAX as f64,
            ScalarType::U16 => u16::MAX as f64,
            ScalarType::I32 => i32::MAX as f64,
            ScalarType::U32 => u32::MAX as f64,
            ScalarType::I64 => i64::MAX as f64,
            ScalarType::U64 => u64::MAX as f64,
            ScalarType::F32 => f32::MAX as f64,
            ScalarType::F64 => f64::MAX,
        }
    }
}

macro_rules! dispatch {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            DataArray::I8($a) => $body,
            DataArray::U8($a) => $body,
            DataArray::I16($a) => $body,
            DataArray::U16($a) => $body,
            DataArray::I32($a) => $body,
            DataArray::U32($a) => $body,
            DataArray::I64($a) => $body,
            DataArray::U64($a) => $body,
            DataArray::F32($a) => $body,
            DataArray::F64($a) => $body,
        }
    };
}

/// An attribute array of any element type.
#[derive(Clone, Debug, PartialEq)]
pub enum DataArray {
    I8(TypedArray<i8>),
    U8(TypedArray<u8>),
    I16(TypedArray<i16>),
    U16(TypedArray<u16>),
    I32(TypedArray<i32>),
    U32(TypedArray<u32>),
    I64(TypedArray<i64>),
    U64(TypedArray<u64>),
    F32(TypedArray<f32>),
    F64(TypedArray<f64>),
}

impl DataArray {
    /// Zero filled array.
    pub fn new(
        scalar_type: ScalarType,
        name: &str,
        components: usize,
        tuples: usize,
    ) -> Self {
        match scalar_type {
            ScalarType::I8 => {
                DataArray::I8(TypedArray::new(name, components, tuples))
            }
            ScalarType::U8 => {
                DataArray::U8(TypedArray::new(name, components, tuples))
            }
            ScalarType::I16 => {
                DataArray::I16(TypedArray::new(name, components, tuples))
            }
            ScalarType::U16 => {
                DataArray::U16(TypedArray::new(name, components, tuples))
            }
            ScalarType::I32 => {
                DataArray::I32(TypedArray::new(name, components, tuples))
            }
            ScalarType::U32 => {
                DataArray::U32(TypedArray::new(name, components, tuples))
            }
            ScalarType::I64 => {
                DataArray::I64(TypedArray::new(name, components, tuples))
            }
            ScalarType::U64 => {
                DataArray::U64(TypedArray::new(name, components, tuples))
            }
            ScalarType::F32 => {
                DataArray::F32(TypedArray::new(name, components, tuples))
            }
            ScalarType::F64 => {
                DataArray::F64(TypedArray::new(name, components, tuples))
            }
        }
    }

    /// Empty array of the same type, name and component count,
    /// sized for `tuples`.
    pub fn new_like(&self, tuples: usize) -> Self {
        DataArray::new(
            self.scalar_type(),
            self.name(),
            self.number_of_components(),
            tuples,
        )
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            DataArray::I8(_) => ScalarType::I8,
            DataArray::U8(_) => ScalarType::U8,
            DataArray::I16(_) => ScalarType::I16,
            DataArray::U16(_) => ScalarType::U16,
            DataArray::I32(_) => ScalarType::I32,
            DataArray::U32(_) => ScalarType::U32,
            DataArray::I64(_) => ScalarType::I64,
            DataArray::U64(_) => ScalarType::U64,
            DataArray::F32(_) => ScalarType::F32,
            DataArray::F64(_) => ScalarType::F64,
        }
    }

    pub fn name(&self) -> &str {
        dispatch!(self, a => a.name())
    }

    pub fn set_name(&mut self, name: &str) {
        dispatch!(self, a => a.set_name(name))
    }

    pub fn number_of_components(&self) -> usize {
        dispatch!(self, a => a.number_of_components())
    }

    pub fn number_of_tuples(&self) -> usize {
        dispatch!(self, a => a.number_of_tuples())
    }

    #[track_caller]
    pub fn component(&self, tuple: usize, component: usize) -> f64 {
        dispatch!(self, a => a.component(tuple, component))
    }

    #[track_caller]
    pub fn set_component(
        &mut self,
        tuple: usize,
        component: usize,
        value: f64,
    ) {
        dispatch!(self, a => a.set_component(tuple, component, value))
    }

    /// Value at a flat component offset, `tuple * components + component`.
    #[track_caller]
    pub fn value(&self, index: usize) -> f64 {
        dispatch!(self, a => a.value(index))
    }

    #[track_caller]
    pub fn set_value(&mut self, index: usize, value: f64) {
        dispatch!(self, a => a.set_value(index, value))
    }

    /// Resize to hold `tuples` tuples, keeping existing values.
    pub fn set_number_of_tuples(&mut self, tuples: usize) {
        dispatch!(self, a => a.set_number_of_tuples(tuples))
    }

    /// Change the tuple width. Values are kept as a flat buffer.
    pub fn set_number_of_components(&mut self, components: usize) {
        dispatch!(self, a => a.set_number_of_components(components))
    }

    /// Copy tuple `in_id` of `source` into tuple `out_id` of self,
    /// casting when the element types differ.
    #[track_caller]
    pub fn copy_tuple(
        &mut self,
        source: &DataArray,
        in_id: usize,
        out_id: usize,
    ) {
        let components = self.number_of_components();
        debug_assert_eq!(components, source.number_of_components());
        self.copy_values(
            source,
            in_id * components,
            out_id * components,
            components,
        );
    }

    /// Copy `count` flat values of `source` from `in_offset` to
    /// `out_offset` of self, see `TypedArray::cast_values_from`.
    #[track_caller]
    pub fn copy_values(
        &mut self,
        source: &DataArray,
        in_offset: usize,
        out_offset: usize,
        count: usize,
    ) {
        dispatch!(self, out => dispatch!(source, input => {
            out.cast_values_from(input, in_offset, out_offset, count)
        }))
    }

    /// The whole buffer as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        dispatch!(self, a => a.as_bytes())
    }

    /// Raw bytes of one tuple.
    #[track_caller]
    pub fn tuple_bytes(&self, tuple: usize) -> &[u8] {
        dispatch!(self, a => a.tuple_bytes(tuple))
    }

    /// Downcast to a concrete element type.
    pub fn as_typed<T: Scalar>(&self) -> Option<&TypedArray<T>> {
        T::unwrap_ref(self)
    }

    pub fn as_typed_mut<T: Scalar>(&mut self) -> Option<&mut TypedArray<T>> {
        T::unwrap_mut(self)
    }
}

impl<T: Scalar> From<TypedArray<T>> for DataArray {
    fn from(array: TypedArray<T>) -> Self {
        T::wrap(array)
    }
}
