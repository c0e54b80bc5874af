use super::{DataArray, ScalarType};
use crate::util::NumTrait;
use num_traits::{Bounded, NumCast, ToPrimitive};
use rayon::prelude::*;

/// Element types an attribute array can hold.
pub trait Scalar:
    NumTrait
    + NumCast
    + ToPrimitive
    + Bounded
    + PartialOrd
    + Default
    + std::fmt::Debug
    + bytemuck::Pod
{
    const SCALAR_TYPE: ScalarType;

    fn wrap(array: TypedArray<Self>) -> DataArray;

    fn unwrap_ref(array: &DataArray) -> Option<&TypedArray<Self>>;

    fn unwrap_mut(array: &mut DataArray) -> Option<&mut TypedArray<Self>>;

    /// Exact when `value` fits, saturating otherwise. NaN becomes zero.
    fn cast_from<S: Scalar>(value: S) -> Self {
        match <Self as NumCast>::from(value) {
            Some(v) => v,
            None => {
                let v = value.to_f64_lossy();
                if v.is_nan() {
                    Self::zero()
                } else if v < 0.0 {
                    Self::min_value()
                } else {
                    Self::max_value()
                }
            }
        }
    }

    /// Saturating conversion from `f64`, NaN becomes zero.
    fn from_f64(value: f64) -> Self {
        Self::cast_from(value)
    }

    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

macro_rules! impl_scalar {
    ($t:ty, $variant:ident) => {
        impl Scalar for $t {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;

            fn wrap(array: TypedArray<Self>) -> DataArray {
                DataArray::$variant(array)
            }

            fn unwrap_ref(array: &DataArray) -> Option<&TypedArray<Self>> {
                match array {
                    DataArray::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn unwrap_mut(
                array: &mut DataArray,
            ) -> Option<&mut TypedArray<Self>> {
                match array {
                    DataArray::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar!(i8, I8);
impl_scalar!(u8, U8);
impl_scalar!(i16, I16);
impl_scalar!(u16, U16);
impl_scalar!(i32, I32);
impl_scalar!(u32, U32);
impl_scalar!(i64, I64);
impl_scalar!(u64, U64);
impl_scalar!(f32, F32);
impl_scalar!(f64, F64);

/// Contiguous tuples of `components` values of type `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedArray<T> {
    name: String,
    components: usize,
    values: Vec<T>,
}

impl<T: Scalar> TypedArray<T> {
    /// Zero filled array.
    pub fn new(name: &str, components: usize, tuples: usize) -> Self {
        debug_assert!(components > 0);
        TypedArray {
            name: name.to_string(),
            components,
            values: vec![T::zero(); components * tuples],
        }
    }

    pub fn from_vec(name: &str, components: usize, values: Vec<T>) -> Self {
        debug_assert!(components > 0);
        debug_assert_eq!(values.len() % components, 0);
        TypedArray {
            name: name.to_string(),
            components,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn number_of_components(&self) -> usize {
        self.components
    }

    pub fn number_of_tuples(&self) -> usize {
        self.values.len() / self.components
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    #[track_caller]
    pub fn tuple(&self, tuple: usize) -> &[T] {
        let start = tuple * self.components;
        &self.values[start..start + self.components]
    }

    #[track_caller]
    pub fn tuple_mut(&mut self, tuple: usize) -> &mut [T] {
        let start = tuple * self.components;
        &mut self.values[start..start + self.components]
    }

    #[track_caller]
    pub fn component(&self, tuple: usize, component: usize) -> f64 {
        debug_assert!(component < self.components);
        self.values[tuple * self.components + component].to_f64_lossy()
    }

    #[track_caller]
    pub fn set_component(
        &mut self,
        tuple: usize,
        component: usize,
        value: f64,
    ) {
        debug_assert!(component < self.components);
        self.values[tuple * self.components + component] = T::from_f64(value);
    }

    /// Value at a flat component offset.
    #[track_caller]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index].to_f64_lossy()
    }

    #[track_caller]
    pub fn set_value(&mut self, index: usize, value: f64) {
        self.values[index] = T::from_f64(value);
    }

    /// Copy `count` values of `source` starting at the flat offset
    /// `in_offset` to `out_offset`. Matching element types are copied
    /// bit for bit, others go through `Scalar::cast_from`.
    #[track_caller]
    pub fn cast_values_from<S: Scalar>(
        &mut self,
        source: &TypedArray<S>,
        in_offset: usize,
        out_offset: usize,
        count: usize,
    ) {
        let input = &source.values[in_offset..in_offset + count];
        let output = &mut self.values[out_offset..out_offset + count];
        if S::SCALAR_TYPE == T::SCALAR_TYPE {
            output.copy_from_slice(bytemuck::cast_slice(input));
        } else {
            for (o, i) in output.iter_mut().zip(input) {
                *o = T::cast_from(*i);
            }
        }
    }

    /// Resize to hold `tuples` tuples. Existing values are kept,
    /// new values are zero. Matching sizes do not reallocate.
    pub fn set_number_of_tuples(&mut self, tuples: usize) {
        let len = tuples * self.components;
        if len != self.values.len() {
            self.values.resize(len, T::zero());
        }
    }

    pub fn set_number_of_components(&mut self, components: usize) {
        debug_assert!(components > 0);
        let tuples = self.number_of_tuples();
        self.components = components;
        self.set_number_of_tuples(tuples);
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }

    #[track_caller]
    pub fn tuple_bytes(&self, tuple: usize) -> &[u8] {
        bytemuck::cast_slice(self.tuple(tuple))
    }

    /// Set every tuple from its id, in parallel.
    pub fn par_set_tuples<F: Fn(usize, &mut [T]) + Send + Sync>(
        &mut self,
        f: F,
        chunk_size: usize,
    ) {
        let components = self.components;
        let tuples_per_chunk = chunk_size.max(1);
        self.values
            .par_chunks_mut(tuples_per_chunk * components)
            .enumerate()
            .for_each(|(i, buffer_chunk): (usize, &mut [T])| {
                let offset = i * tuples_per_chunk;
                for (t, tuple) in
                    buffer_chunk.chunks_mut(components).enumerate()
                {
                    f(offset + t, tuple);
                }
            });
    }
}
