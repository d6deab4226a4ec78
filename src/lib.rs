//! # gifti - Streaming GIFTI Reader and Writer
//!
//! `gifti` reads and writes GIFTI (`.gii`) files, the XML container used in
//! neuroimaging for cortical surfaces, per-vertex shape/functional overlays
//! and label maps.
//!
//! ## Key Features
//!
//! - **Streaming parser**: quick-xml pull events drive an explicit state
//!   machine; `MetaData` and `LabelTable` blocks go to their own sub-parsers.
//!
//! - **All payload encodings**: `ASCII`, `Base64Binary`, `GZipBase64Binary`
//!   and `ExternalFileBinary`, in either byte order and either indexing order.
//!
//! - **Typed arrays**: payloads decode into [`ArrayValues`](gifti::ArrayValues),
//!   one variant per NIfTI datatype, always held in row-major order.
//!
//! - **Fail-closed validation**: unknown vocabulary values, missing required
//!   attributes and wrong payload sizes are errors, never defaults.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gifti::prelude::*;
//!
//! let file = GiftiFile::read("lh.pial.surf.gii")?;
//! for array in file.data_arrays_with_intent(Intent::PointSet) {
//!     println!("{} vertices", array.dimensions()[0]);
//! }
//! # Ok::<(), gifti::gifti::GiftiError>(())
//! ```
//!
//! ## Writing
//!
//! ```rust,no_run
//! use gifti::prelude::*;
//!
//! let mut file = GiftiFile::new();
//! file.add_data_array(DataArray::new(Intent::Shape, vec![0.5f32, 1.5, 2.5], vec![3])?);
//!
//! let writer = GiftiWriter::new(WriterConfig::max_compression());
//! let stats = writer.write_file(&file, "thickness.shape.gii")?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Document Layout
//!
//! ```text
//! GIFTI (Version, NumberOfDataArrays)
//! ├── MetaData > MD > {Name, Value}
//! ├── LabelTable > Label (Key, Red, Green, Blue, Alpha)
//! └── DataArray (Intent, DataType, Dimensionality, Dim0.., Encoding, Endian, ...)
//!     ├── MetaData
//!     ├── CoordinateSystemTransformMatrix > {DataSpace, TransformedSpace, MatrixData}
//!     └── Data
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod gifti;
pub mod vocabulary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::gifti::models::{
        ArrayValues, CoordinateTransform, DataArray, FileSummary, GiftiFile, Label, LabelTable,
        MetaData,
    };
    pub use crate::gifti::{
        ErrorKind, GiftiError, GiftiReader, GiftiWriter, WriteStats, WriterConfig, WriterError,
    };
    pub use crate::vocabulary::{DataType, Encoding, Endian, IndexingOrder, Intent, Vocabulary};
}
