//! Data models for GIFTI structures
//!
//! These models represent a parsed GIFTI document in a Rust-native form,
//! and are also what the writer serializes.

mod data_array;
mod file;
mod label_table;
mod matrix;
mod metadata;
pub(crate) mod values;

pub use data_array::DataArray;
pub use file::{DataArraySummary, FileSummary, GiftiFile, MetaDataEntry};
pub use label_table::{Label, LabelTable};
pub use matrix::{CoordinateTransform, XFORM_UNKNOWN};
pub use metadata::{names as metadata_names, MetaData};
pub use values::{
    checked_byte_len, checked_element_count, column_major_to_row_major, element_count,
    row_major_index, row_major_offset, row_major_to_column_major, ArrayValues, Element,
};
