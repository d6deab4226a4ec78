//! TOML configuration file support for `gifti convert`.
//!
//! ```toml
//! # gifti.toml
//! [write]
//! encoding = "GZipBase64Binary"
//! endian = "LittleEndian"
//! indexing_order = "RowMajorOrder"
//! compression_level = 9
//! external_file_suffix = ".bin"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use gifti::gifti::WriterConfig;
use gifti::vocabulary::{Encoding, Endian, IndexingOrder};

/// Root configuration structure for gifti.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Writer settings.
    #[serde(default)]
    pub write: WriteConfig,
}

/// Configuration for the convert command.
#[derive(Debug, Default, Deserialize)]
pub struct WriteConfig {
    /// Encoding for all arrays.
    pub encoding: Option<Encoding>,

    /// Byte order of binary payloads.
    pub endian: Option<Endian>,

    /// Indexing order of written payloads.
    pub indexing_order: Option<IndexingOrder>,

    /// zlib level (0-9).
    pub compression_level: Option<u32>,

    /// Suffix of the companion file for external payloads.
    pub external_file_suffix: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl WriteConfig {
    /// Copy every value set in the file onto `config`
    pub fn apply_to(&self, config: &mut WriterConfig) {
        if let Some(encoding) = self.encoding {
            config.encoding = Some(encoding);
        }
        if let Some(endian) = self.endian {
            config.endian = Some(endian);
        }
        if let Some(order) = self.indexing_order {
            config.indexing_order = Some(order);
        }
        if let Some(level) = self.compression_level {
            config.compression_level = level;
        }
        if let Some(suffix) = &self.external_file_suffix {
            config.external_file_suffix = suffix.clone();
        }
    }
}
