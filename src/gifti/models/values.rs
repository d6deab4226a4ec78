//! Typed flat value buffers
//!
//! A DataArray's payload is held as one `Vec` of its declared element type.
//! The flattening is always row-major (last dimension varies fastest),
//! whatever order the file stored it in.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use byteorder::{ByteOrder, NativeEndian};

use crate::vocabulary::DataType;

/// Primitive element types that can be stored in a DataArray
pub trait Element: Copy + Default + PartialEq + Debug + Display + FromStr + 'static {
    /// The GIFTI datatype corresponding to `Self`
    const DATA_TYPE: DataType;

    /// Fill `dst` from native-order bytes; `src.len()` must be `dst.len() * size_of::<Self>()`
    fn read_native(src: &[u8], dst: &mut [Self]);

    /// Write `src` as native-order bytes; `dst.len()` must be `src.len() * size_of::<Self>()`
    fn write_native(src: &[Self], dst: &mut [u8]);

    /// Lossy widening to `f64`
    fn to_f64(self) -> f64;

    /// Wrap a vector of this type into [`ArrayValues`]
    fn wrap(values: Vec<Self>) -> ArrayValues;
}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::UInt8;

    fn read_native(src: &[u8], dst: &mut [Self]) {
        dst.copy_from_slice(src);
    }

    fn write_native(src: &[Self], dst: &mut [u8]) {
        dst.copy_from_slice(src);
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn wrap(values: Vec<Self>) -> ArrayValues {
        ArrayValues::UInt8(values)
    }
}

impl Element for i8 {
    const DATA_TYPE: DataType = DataType::Int8;

    fn read_native(src: &[u8], dst: &mut [Self]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s as i8;
        }
    }

    fn write_native(src: &[Self], dst: &mut [u8]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s as u8;
        }
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn wrap(values: Vec<Self>) -> ArrayValues {
        ArrayValues::Int8(values)
    }
}

macro_rules! impl_multibyte_element {
    ($ty:ty, $variant:ident, $read:ident, $write:ident) => {
        impl Element for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn read_native(src: &[u8], dst: &mut [Self]) {
                NativeEndian::$read(src, dst);
            }

            fn write_native(src: &[Self], dst: &mut [u8]) {
                NativeEndian::$write(src, dst);
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn wrap(values: Vec<Self>) -> ArrayValues {
                ArrayValues::$variant(values)
            }
        }
    };
}

impl_multibyte_element!(i16, Int16, read_i16_into, write_i16_into);
impl_multibyte_element!(u16, UInt16, read_u16_into, write_u16_into);
impl_multibyte_element!(i32, Int32, read_i32_into, write_i32_into);
impl_multibyte_element!(u32, UInt32, read_u32_into, write_u32_into);
impl_multibyte_element!(i64, Int64, read_i64_into, write_i64_into);
impl_multibyte_element!(u64, UInt64, read_u64_into, write_u64_into);
impl_multibyte_element!(f32, Float32, read_f32_into, write_f32_into);
impl_multibyte_element!(f64, Float64, read_f64_into, write_f64_into);

/// Run `$body` with `$t` bound to the Rust element type of `$dt`
macro_rules! with_element_type {
    ($dt:expr, $t:ident => $body:expr) => {
        match $dt {
            $crate::vocabulary::DataType::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::vocabulary::DataType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::vocabulary::DataType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::vocabulary::DataType::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::vocabulary::DataType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::vocabulary::DataType::UInt32 => {
                type $t = u32;
                $body
            }
            $crate::vocabulary::DataType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::vocabulary::DataType::UInt64 => {
                type $t = u64;
                $body
            }
            $crate::vocabulary::DataType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::vocabulary::DataType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}
pub(crate) use with_element_type;

/// Run `$body` with `$v` bound to the inner vector of an [`ArrayValues`]
macro_rules! for_each_variant {
    ($values:expr, $v:ident => $body:expr) => {
        match $values {
            $crate::gifti::models::ArrayValues::UInt8($v) => $body,
            $crate::gifti::models::ArrayValues::Int8($v) => $body,
            $crate::gifti::models::ArrayValues::Int16($v) => $body,
            $crate::gifti::models::ArrayValues::UInt16($v) => $body,
            $crate::gifti::models::ArrayValues::Int32($v) => $body,
            $crate::gifti::models::ArrayValues::UInt32($v) => $body,
            $crate::gifti::models::ArrayValues::Int64($v) => $body,
            $crate::gifti::models::ArrayValues::UInt64($v) => $body,
            $crate::gifti::models::ArrayValues::Float32($v) => $body,
            $crate::gifti::models::ArrayValues::Float64($v) => $body,
        }
    };
}
pub(crate) use for_each_variant;

/// Decoded payload of a DataArray, one variant per datatype
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl ArrayValues {
    /// An empty buffer of the given datatype
    pub fn empty(data_type: DataType) -> Self {
        with_element_type!(data_type, T => T::wrap(Vec::new()))
    }

    /// A zero-filled buffer of the given datatype and length
    pub fn zeros(data_type: DataType, len: usize) -> Self {
        with_element_type!(data_type, T => T::wrap(vec![T::default(); len]))
    }

    /// Datatype of the stored elements
    pub fn data_type(&self) -> DataType {
        match self {
            ArrayValues::UInt8(_) => DataType::UInt8,
            ArrayValues::Int8(_) => DataType::Int8,
            ArrayValues::Int16(_) => DataType::Int16,
            ArrayValues::UInt16(_) => DataType::UInt16,
            ArrayValues::Int32(_) => DataType::Int32,
            ArrayValues::UInt32(_) => DataType::UInt32,
            ArrayValues::Int64(_) => DataType::Int64,
            ArrayValues::UInt64(_) => DataType::UInt64,
            ArrayValues::Float32(_) => DataType::Float32,
            ArrayValues::Float64(_) => DataType::Float64,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        for_each_variant!(self, v => v.len())
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at flat position `index`, widened to `f64`
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        for_each_variant!(self, v => v.get(index).map(|x| x.to_f64()))
    }

    /// All elements widened to `f64`
    pub fn to_f64_vec(&self) -> Vec<f64> {
        for_each_variant!(self, v => v.iter().map(|x| x.to_f64()).collect())
    }

    /// Typed view, if the buffer holds `u8`
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            ArrayValues::UInt8(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view, if the buffer holds `i32`
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            ArrayValues::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view, if the buffer holds `f32`
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            ArrayValues::Float32(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view, if the buffer holds `f64`
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ArrayValues::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Reorder a column-major buffer of shape `dims` into row-major order
    pub fn column_major_to_row_major(&self, dims: &[usize]) -> Self {
        for_each_variant!(self, v => ArrayValues::from(column_major_to_row_major(v, dims)))
    }

    /// Reorder a row-major buffer of shape `dims` into column-major order
    pub fn row_major_to_column_major(&self, dims: &[usize]) -> Self {
        for_each_variant!(self, v => ArrayValues::from(row_major_to_column_major(v, dims)))
    }
}

impl<T: Element> From<Vec<T>> for ArrayValues {
    fn from(values: Vec<T>) -> Self {
        T::wrap(values)
    }
}

// =============================================================================
// Index layout
// =============================================================================

/// Number of elements in an array of shape `dims`, saturating at `usize::MAX`
pub fn element_count(dims: &[usize]) -> usize {
    checked_element_count(dims).unwrap_or(usize::MAX)
}

/// Number of elements in an array of shape `dims`, `None` on overflow
pub fn checked_element_count(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |count, &d| count.checked_mul(d))
}

/// Size in bytes of an array of shape `dims` and type `data_type`, `None` on overflow
pub fn checked_byte_len(dims: &[usize], data_type: DataType) -> Option<usize> {
    checked_element_count(dims)?.checked_mul(data_type.byte_size())
}

/// Row-major flat offset of `index` within shape `dims`
pub fn row_major_offset(dims: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != dims.len() {
        return None;
    }
    let mut offset = 0usize;
    for (&i, &d) in index.iter().zip(dims) {
        if i >= d {
            return None;
        }
        offset = offset * d + i;
    }
    Some(offset)
}

/// Inverse of [`row_major_offset`]
pub fn row_major_index(dims: &[usize], mut offset: usize) -> Option<Vec<usize>> {
    if offset >= element_count(dims) {
        return None;
    }
    let mut index = vec![0; dims.len()];
    for (slot, &d) in index.iter_mut().zip(dims).rev() {
        *slot = offset % d;
        offset /= d;
    }
    Some(index)
}

/// Column-major stride of every dimension
fn column_major_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut stride = 1;
    for &d in dims {
        strides.push(stride);
        stride *= d;
    }
    strides
}

/// Visit each multi-index in row-major order with its column-major offset
fn for_each_column_major_offset(dims: &[usize], mut visit: impl FnMut(usize, usize)) {
    let count = element_count(dims);
    if count == 0 {
        return;
    }
    let strides = column_major_strides(dims);
    let mut index = vec![0usize; dims.len()];
    let mut column_offset = 0usize;
    for row_offset in 0..count {
        visit(row_offset, column_offset);
        for axis in (0..dims.len()).rev() {
            index[axis] += 1;
            column_offset += strides[axis];
            if index[axis] < dims[axis] {
                break;
            }
            column_offset -= strides[axis] * dims[axis];
            index[axis] = 0;
        }
    }
}

/// Permute column-major `values` of shape `dims` into row-major order
pub fn column_major_to_row_major<T: Copy>(values: &[T], dims: &[usize]) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for_each_column_major_offset(dims, |_, column_offset| out.push(values[column_offset]));
    out
}

/// Permute row-major `values` of shape `dims` into column-major order
pub fn row_major_to_column_major<T: Copy>(values: &[T], dims: &[usize]) -> Vec<T> {
    let mut out = values.to_vec();
    for_each_column_major_offset(dims, |row_offset, column_offset| {
        out[column_offset] = values[row_offset]
    });
    out
}
