use serde::{Deserialize, Serialize};

use crate::gifti::binary::PayloadLayout;
use crate::gifti::models::DataArray;
use crate::vocabulary::{Encoding, Endian, IndexingOrder};

/// Default zlib level for `GZipBase64Binary`
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Default suffix appended to the output file name for external payloads
pub const DEFAULT_EXTERNAL_FILE_SUFFIX: &str = ".dat";

/// Configuration for the GIFTI writer
///
/// The `encoding`, `endian` and `indexing_order` overrides apply to every
/// array; `None` keeps each array's own setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Encoding for all arrays
    pub encoding: Option<Encoding>,

    /// Byte order for binary encodings
    pub endian: Option<Endian>,

    /// Subscript order of written payloads
    pub indexing_order: Option<IndexingOrder>,

    /// zlib level (0-9) for `GZipBase64Binary`
    pub compression_level: u32,

    /// Appended to the output file name to name the companion file
    pub external_file_suffix: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            encoding: None,
            endian: None,
            indexing_order: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            external_file_suffix: DEFAULT_EXTERNAL_FILE_SUFFIX.to_string(),
        }
    }
}

impl WriterConfig {
    /// Compressed payloads at the highest zlib level
    pub fn max_compression() -> Self {
        Self {
            encoding: Some(Encoding::GZipBase64Binary),
            compression_level: 9,
            ..Self::default()
        }
    }

    /// Plain text payloads, readable without decoding
    pub fn human_readable() -> Self {
        Self {
            encoding: Some(Encoding::Ascii),
            ..Self::default()
        }
    }

    /// Uncompressed base64 in host byte order
    pub fn fast_write() -> Self {
        Self {
            encoding: Some(Encoding::Base64Binary),
            endian: Some(Endian::native()),
            ..Self::default()
        }
    }

    /// Effective payload layout of `array` under this configuration
    pub fn layout_for(&self, array: &DataArray) -> PayloadLayout {
        PayloadLayout {
            encoding: self.encoding.unwrap_or(array.encoding()),
            endian: self.endian.unwrap_or(array.endian()),
            indexing_order: self.indexing_order.unwrap_or(array.indexing_order()),
        }
    }
}
