use crate::gifti::binary::PayloadError;
use crate::gifti::error::GiftiError;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the XML serializer
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// The file failed validation before anything was written
    #[error("Invalid GIFTI file: {0}")]
    Validation(#[from] GiftiError),

    /// A DataArray payload could not be encoded
    #[error("DataArray {array_index}: {source}")]
    Payload {
        /// Zero-based index of the array
        array_index: usize,
        /// Underlying encode failure
        #[source]
        source: PayloadError,
    },

    /// Invalid data or output target provided to the writer
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
