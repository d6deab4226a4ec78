//! GIFTI surface and overlay files
//!
//! - [`reader`]: streaming parser built on quick-xml events
//! - [`binary`]: payload decode/encode for all four encodings
//! - [`writer`]: serializer with atomic file output
//! - [`models`]: the in-memory file, arrays, metadata and label table

pub mod binary;
pub mod error;
pub mod external;
pub mod models;
pub mod reader;
pub mod writer;
pub mod xml_elements;

pub use binary::{swap_byte_order, PayloadCodec, PayloadError, PayloadLayout, PayloadSource};
pub use error::{ErrorKind, GiftiError};
pub use models::{
    ArrayValues, CoordinateTransform, DataArray, Element, GiftiFile, Label, LabelTable, MetaData,
};
pub use reader::GiftiReader;
pub use writer::{GiftiWriter, WriteStats, WriterConfig, WriterError};
