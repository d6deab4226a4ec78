//! Companion binary files for `ExternalFileBinary` arrays

use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Reader for raw array payloads stored outside the XML document
pub struct ExternalBinaryReader {
    file: File,
}

impl ExternalBinaryReader {
    /// Open an external binary file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }

    /// Read exactly `length` bytes starting at `offset`.
    ///
    /// Fails with `UnexpectedEof` before allocating when the file is too
    /// short to hold the requested range.
    pub fn read_bytes(&mut self, offset: u64, length: usize) -> std::io::Result<Vec<u8>> {
        let file_len = self.file.metadata()?.len();
        let fits = u64::try_from(length)
            .ok()
            .and_then(|length| offset.checked_add(length))
            .is_some_and(|end| end <= file_len);
        if !fits {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "{} bytes requested at offset {}, file holds {} bytes",
                    length, offset, file_len
                ),
            ));
        }

        self.file.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; length];
        self.file.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

/// Appends payloads to a companion file, handing out their offsets
///
/// Bytes go to a temporary file next to `target` and only replace it on
/// [`ExternalBinaryWriter::persist`].
pub struct ExternalBinaryWriter {
    target: PathBuf,
    file: BufWriter<NamedTempFile>,
    offset: u64,
}

impl ExternalBinaryWriter {
    /// Start a companion file that will be persisted to `target`
    pub fn create<P: AsRef<Path>>(target: P) -> std::io::Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = NamedTempFile::new_in(dir)?;
        Ok(Self {
            target,
            file: BufWriter::new(file),
            offset: 0,
        })
    }

    /// Append `bytes`, returning the offset they start at
    pub fn append(&mut self, bytes: &[u8]) -> std::io::Result<u64> {
        let start = self.offset;
        self.file.write_all(bytes)?;
        self.offset += bytes.len() as u64;
        Ok(start)
    }

    /// Total bytes appended so far
    pub fn bytes_written(&self) -> u64 {
        self.offset
    }

    /// Final location of the companion file
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush buffered bytes and sync them to disk without moving the file
    pub fn sync(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        self.file.get_ref().as_file().sync_all()
    }

    /// Flush and atomically move the data into place
    pub fn persist(self) -> std::io::Result<PathBuf> {
        let file = self.file.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.target).map_err(|e| e.error)?;
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("surface.gii.dat");

        let mut writer = ExternalBinaryWriter::create(&target).unwrap();
        assert_eq!(writer.append(&[1, 2, 3, 4]).unwrap(), 0);
        assert_eq!(writer.append(&[9, 8]).unwrap(), 4);
        assert_eq!(writer.bytes_written(), 6);
        assert!(!target.exists());
        writer.persist().unwrap();

        let mut reader = ExternalBinaryReader::open(&target).unwrap();
        assert_eq!(reader.read_bytes(4, 2).unwrap(), vec![9, 8]);
        assert_eq!(reader.read_bytes(1, 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_short_read_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.dat");
        std::fs::write(&path, [0u8; 3]).unwrap();

        let mut reader = ExternalBinaryReader::open(&path).unwrap();
        let err = reader.read_bytes(0, 8).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_huge_request_fails_without_allocating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.dat");
        std::fs::write(&path, [0u8; 4]).unwrap();

        let mut reader = ExternalBinaryReader::open(&path).unwrap();
        let err = reader.read_bytes(0, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
        let err = reader.read_bytes(u64::MAX, 1).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
        assert_eq!(reader.read_bytes(0, 4).unwrap(), vec![0; 4]);
    }
}
