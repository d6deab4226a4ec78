//! # GIFTI Writer Module
//!
//! Serializes a [`GiftiFile`](crate::gifti::models::GiftiFile) back to GIFTI
//! XML. Every array is written in row-major memory order and re-encoded
//! according to its own encoding/endian/indexing order, or the overrides in
//! [`WriterConfig`].
//!
//! `ExternalFileBinary` arrays are concatenated into a companion file named
//! after the output file plus [`WriterConfig::external_file_suffix`].

mod config;
mod error;
mod stats;
mod writer_impl;


pub use config::{WriterConfig, DEFAULT_COMPRESSION_LEVEL, DEFAULT_EXTERNAL_FILE_SUFFIX};
pub use error::WriterError;
pub use stats::WriteStats;
pub use writer_impl::GiftiWriter;
