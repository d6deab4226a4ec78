use std::fmt;
use std::path::PathBuf;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Number of DataArrays written
    pub data_arrays_written: usize,
    /// Size of the XML document in bytes
    pub document_bytes: u64,
    /// Bytes written to the companion file
    pub external_bytes: u64,
    /// Companion file, when any array used `ExternalFileBinary`
    pub external_file: Option<PathBuf>,
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} data arrays ({} bytes of XML)",
            self.data_arrays_written, self.document_bytes
        )?;
        if let Some(path) = &self.external_file {
            write!(f, " and {} bytes to {}", self.external_bytes, path.display())?;
        }
        Ok(())
    }
}
