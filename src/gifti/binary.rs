//! Payload decoding and encoding for GIFTI DataArrays
//!
//! A `Data` element carries the array values in one of four encodings:
//!
//! 1. `ASCII`: whitespace separated numbers
//! 2. `Base64Binary`: base64 text of the raw element bytes
//! 3. `GZipBase64Binary`: base64 text of a zlib stream of the raw bytes
//! 4. `ExternalFileBinary`: raw bytes at an offset in a companion file
//!
//! Binary payloads are stored in the declared byte order and are swapped
//! when it differs from the host. Column-major payloads are permuted into
//! row-major order on decode and back on encode.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use base64::prelude::*;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::gifti::error::ErrorKind;
use crate::gifti::external::ExternalBinaryReader;
use crate::gifti::models::values::{for_each_variant, with_element_type};
use crate::gifti::models::{checked_byte_len, ArrayValues, Element};
use crate::vocabulary::{DataType, Encoding, Endian, IndexingOrder};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur while decoding or encoding a payload
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Decompression error: {0}")]
    DecompressionError(#[source] std::io::Error),

    #[error("Compression error: {0}")]
    CompressionError(#[source] std::io::Error),

    #[error("Invalid data length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Expected {expected} ASCII values, got {actual}")]
    TokenCount { expected: usize, actual: usize },

    #[error("Cannot parse \"{token}\" as {data_type}")]
    InvalidToken { token: String, data_type: DataType },

    #[error("Cannot read external data from {} at offset {offset}: {source}", path.display())]
    ExternalFile {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Shape {dims:?} holds {expected} values, buffer has {actual}")]
    ShapeMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Shape {dims:?} of {data_type} exceeds the addressable size")]
    SizeOverflow { dims: Vec<usize>, data_type: DataType },

    #[error("{0} payloads are not stored inside the document")]
    NotInline(Encoding),

    #[error("{0} payload cannot be read from the given source")]
    SourceMismatch(Encoding),
}

impl PayloadError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayloadError::ExternalFile { .. } => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }
}

/// How a payload is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLayout {
    /// Encoding of the payload
    pub encoding: Encoding,
    /// Byte order of binary encodings
    pub endian: Endian,
    /// Subscript order of the stored elements
    pub indexing_order: IndexingOrder,
}

impl PayloadLayout {
    /// Layout with the given encoding in native byte order and row-major order
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            endian: Endian::native(),
            indexing_order: IndexingOrder::RowMajor,
        }
    }
}

/// Where the encoded payload comes from
#[derive(Debug, Clone, Copy)]
pub enum PayloadSource<'a> {
    /// Character data of the `Data` element
    Inline(&'a str),
    /// A companion file and the byte offset of the array in it
    External { path: &'a Path, offset: u64 },
}

/// Reverse the bytes of every `width`-byte element in place
///
/// Applying it twice restores the input.
pub fn swap_byte_order(bytes: &mut [u8], width: usize) {
    if width < 2 {
        return;
    }
    for chunk in bytes.chunks_exact_mut(width) {
        chunk.reverse();
    }
}

/// Stateless codec between encoded payloads and [`ArrayValues`]
pub struct PayloadCodec;

impl PayloadCodec {
    /// Decode a payload into row-major values of shape `dims`
    pub fn decode(
        source: PayloadSource<'_>,
        data_type: DataType,
        dims: &[usize],
        layout: &PayloadLayout,
    ) -> Result<ArrayValues, PayloadError> {
        let width = data_type.byte_size();
        let byte_len = Self::byte_len(dims, data_type)?;
        let count = byte_len / width;

        let stored = match (layout.encoding, source) {
            (Encoding::Ascii, PayloadSource::Inline(text)) => Self::parse_ascii(text, data_type, count)?,
            (Encoding::Base64Binary, PayloadSource::Inline(text)) => {
                let bytes = Self::decode_base64(text)?;
                Self::bytes_to_values(bytes, data_type, count, layout.endian)?
            }
            (Encoding::GZipBase64Binary, PayloadSource::Inline(text)) => {
                let compressed = Self::decode_base64(text)?;
                let bytes = Self::inflate(&compressed)?;
                Self::bytes_to_values(bytes, data_type, count, layout.endian)?
            }
            (Encoding::ExternalFileBinary, PayloadSource::External { path, offset }) => {
                let bytes = Self::read_external(path, offset, byte_len)?;
                Self::bytes_to_values(bytes, data_type, count, layout.endian)?
            }
            (encoding, _) => return Err(PayloadError::SourceMismatch(encoding)),
        };

        Ok(match layout.indexing_order {
            IndexingOrder::RowMajor => stored,
            IndexingOrder::ColumnMajor => stored.column_major_to_row_major(dims),
        })
    }

    /// Encode row-major values as the character data of a `Data` element
    pub fn encode_inline(
        values: &ArrayValues,
        dims: &[usize],
        layout: &PayloadLayout,
        compression_level: u32,
    ) -> Result<String, PayloadError> {
        Self::check_shape(values, dims)?;
        match layout.encoding {
            Encoding::Ascii => {
                let stored = Self::to_stored_order(values, dims, layout.indexing_order);
                Ok(Self::format_ascii(&stored, dims, layout.indexing_order))
            }
            Encoding::Base64Binary => {
                let bytes = Self::encode_binary(values, dims, layout)?;
                Ok(BASE64_STANDARD.encode(bytes))
            }
            Encoding::GZipBase64Binary => {
                let bytes = Self::encode_binary(values, dims, layout)?;
                let mut encoder =
                    ZlibEncoder::new(Vec::new(), Compression::new(compression_level.min(9)));
                encoder
                    .write_all(&bytes)
                    .map_err(PayloadError::CompressionError)?;
                let compressed = encoder.finish().map_err(PayloadError::CompressionError)?;
                Ok(BASE64_STANDARD.encode(compressed))
            }
            Encoding::ExternalFileBinary => Err(PayloadError::NotInline(layout.encoding)),
        }
    }

    /// Raw on-disk bytes of the values: stored order, declared byte order
    pub fn encode_binary(
        values: &ArrayValues,
        dims: &[usize],
        layout: &PayloadLayout,
    ) -> Result<Vec<u8>, PayloadError> {
        Self::check_shape(values, dims)?;
        let stored = Self::to_stored_order(values, dims, layout.indexing_order);
        let width = stored.data_type().byte_size();
        let mut bytes = vec![0u8; stored.len() * width];
        for_each_variant!(&stored, v => Element::write_native(v.as_slice(), &mut bytes));
        if layout.endian != Endian::native() {
            swap_byte_order(&mut bytes, width);
        }
        Ok(bytes)
    }

    fn byte_len(dims: &[usize], data_type: DataType) -> Result<usize, PayloadError> {
        checked_byte_len(dims, data_type).ok_or_else(|| PayloadError::SizeOverflow {
            dims: dims.to_vec(),
            data_type,
        })
    }

    fn check_shape(values: &ArrayValues, dims: &[usize]) -> Result<(), PayloadError> {
        let data_type = values.data_type();
        let expected = Self::byte_len(dims, data_type)? / data_type.byte_size();
        if values.len() != expected {
            return Err(PayloadError::ShapeMismatch {
                dims: dims.to_vec(),
                expected,
                actual: values.len(),
            });
        }
        Ok(())
    }

    fn to_stored_order(
        values: &ArrayValues,
        dims: &[usize],
        order: IndexingOrder,
    ) -> ArrayValues {
        match order {
            IndexingOrder::RowMajor => values.clone(),
            IndexingOrder::ColumnMajor => values.row_major_to_column_major(dims),
        }
    }

    fn decode_base64(text: &str) -> Result<Vec<u8>, PayloadError> {
        let compact: String = text.split_ascii_whitespace().collect();
        Ok(BASE64_STANDARD.decode(compact)?)
    }

    fn inflate(compressed: &[u8]) -> Result<Vec<u8>, PayloadError> {
        let mut out = Vec::new();
        let result = if compressed.starts_with(&GZIP_MAGIC) {
            GzDecoder::new(compressed).read_to_end(&mut out)
        } else {
            ZlibDecoder::new(compressed).read_to_end(&mut out)
        };
        result.map_err(PayloadError::DecompressionError)?;
        Ok(out)
    }

    fn read_external(path: &Path, offset: u64, length: usize) -> Result<Vec<u8>, PayloadError> {
        let to_error = |source| PayloadError::ExternalFile {
            path: path.to_path_buf(),
            offset,
            source,
        };
        let mut reader = ExternalBinaryReader::open(path).map_err(to_error)?;
        reader.read_bytes(offset, length).map_err(to_error)
    }

    fn bytes_to_values(
        mut bytes: Vec<u8>,
        data_type: DataType,
        count: usize,
        endian: Endian,
    ) -> Result<ArrayValues, PayloadError> {
        let width = data_type.byte_size();
        let expected = count * width;
        if bytes.len() != expected {
            return Err(PayloadError::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }
        if endian != Endian::native() {
            swap_byte_order(&mut bytes, width);
        }
        Ok(with_element_type!(data_type, T => {
            let mut values = vec![T::default(); count];
            T::read_native(&bytes, &mut values);
            ArrayValues::from(values)
        }))
    }

    fn parse_ascii(
        text: &str,
        data_type: DataType,
        count: usize,
    ) -> Result<ArrayValues, PayloadError> {
        with_element_type!(data_type, T => {
            // At most one token per two bytes of text
            let mut values: Vec<T> = Vec::with_capacity(count.min(text.len() / 2 + 1));
            for token in text.split_ascii_whitespace() {
                let value = token.parse::<T>().map_err(|_| PayloadError::InvalidToken {
                    token: token.to_string(),
                    data_type,
                })?;
                values.push(value);
            }
            if values.len() != count {
                return Err(PayloadError::TokenCount {
                    expected: count,
                    actual: values.len(),
                });
            }
            Ok(ArrayValues::from(values))
        })
    }

    /// One line per run of the fastest varying stored dimension
    fn format_ascii(stored: &ArrayValues, dims: &[usize], order: IndexingOrder) -> String {
        let row = match (dims.len(), order) {
            (0 | 1, _) => 1,
            (_, IndexingOrder::RowMajor) => dims[dims.len() - 1],
            (_, IndexingOrder::ColumnMajor) => dims[0],
        };
        for_each_variant!(stored, v => {
            let mut out = String::with_capacity(v.len() * 8);
            for line in v.chunks(row.max(1)) {
                let tokens: Vec<String> = line.iter().map(|x| x.to_string()).collect();
                out.push_str(&tokens.join(" "));
                out.push('\n');
            }
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, ByteOrder, LittleEndian};

    fn big_endian_layout(encoding: Encoding) -> PayloadLayout {
        PayloadLayout {
            encoding,
            endian: Endian::Big,
            indexing_order: IndexingOrder::RowMajor,
        }
    }

    #[test]
    fn test_decode_ascii_float32() {
        let values = PayloadCodec::decode(
            PayloadSource::Inline("1.0 2.0\n 3.0 "),
            DataType::Float32,
            &[3],
            &PayloadLayout::new(Encoding::Ascii),
        )
        .unwrap();
        assert_eq!(values, ArrayValues::Float32(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_decode_ascii_token_count() {
        let err = PayloadCodec::decode(
            PayloadSource::Inline("1 2"),
            DataType::Int32,
            &[3],
            &PayloadLayout::new(Encoding::Ascii),
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::TokenCount { expected: 3, actual: 2 }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decode_ascii_bad_token() {
        let err = PayloadCodec::decode(
            PayloadSource::Inline("1 x 3"),
            DataType::UInt8,
            &[3],
            &PayloadLayout::new(Encoding::Ascii),
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::InvalidToken { ref token, .. } if token == "x"));
    }

    #[test]
    fn test_decode_base64_big_endian() {
        let mut bytes = vec![0u8; 12];
        BigEndian::write_f32_into(&[1.5, -2.0, 100.25], &mut bytes);
        let text = BASE64_STANDARD.encode(&bytes);

        let values = PayloadCodec::decode(
            PayloadSource::Inline(&text),
            DataType::Float32,
            &[3],
            &big_endian_layout(Encoding::Base64Binary),
        )
        .unwrap();
        assert_eq!(values, ArrayValues::Float32(vec![1.5, -2.0, 100.25]));
    }

    #[test]
    fn test_decode_base64_ignores_line_breaks() {
        let mut bytes = vec![0u8; 16];
        LittleEndian::write_i32_into(&[1, 2, 3, 4], &mut bytes);
        let encoded = BASE64_STANDARD.encode(&bytes);
        let wrapped = format!("\n  {}\n  {}\n", &encoded[..8], &encoded[8..]);

        let layout = PayloadLayout {
            encoding: Encoding::Base64Binary,
            endian: Endian::Little,
            indexing_order: IndexingOrder::RowMajor,
        };
        let values =
            PayloadCodec::decode(PayloadSource::Inline(&wrapped), DataType::Int32, &[4], &layout)
                .unwrap();
        assert_eq!(values.as_i32(), Some(&[1, 2, 3, 4][..]));
    }

    #[test]
    fn test_decode_base64_wrong_length() {
        let text = BASE64_STANDARD.encode([0u8; 10]);
        let err = PayloadCodec::decode(
            PayloadSource::Inline(&text),
            DataType::Float32,
            &[3],
            &PayloadLayout::new(Encoding::Base64Binary),
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::InvalidLength { expected: 12, actual: 10 }));
    }

    #[test]
    fn test_decode_zlib_and_gzip_streams() {
        let mut raw = vec![0u8; 16];
        LittleEndian::write_f64_into(&[0.5, 42.0], &mut raw);
        let layout = PayloadLayout {
            encoding: Encoding::GZipBase64Binary,
            endian: Endian::Little,
            indexing_order: IndexingOrder::RowMajor,
        };

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(&raw).unwrap();
        let zlib_text = BASE64_STANDARD.encode(zlib.finish().unwrap());

        let mut gzip = flate2::write::GzEncoder::new(Vec::new(), Compression::default());
        gzip.write_all(&raw).unwrap();
        let gzip_text = BASE64_STANDARD.encode(gzip.finish().unwrap());

        for text in [zlib_text, gzip_text] {
            let values =
                PayloadCodec::decode(PayloadSource::Inline(&text), DataType::Float64, &[2], &layout)
                    .unwrap();
            assert_eq!(values.as_f64(), Some(&[0.5, 42.0][..]));
        }
    }

    #[test]
    fn test_column_major_decode() {
        // 2x3 array [[1,2,3],[4,5,6]] stored column-major
        let layout = PayloadLayout {
            encoding: Encoding::Ascii,
            endian: Endian::native(),
            indexing_order: IndexingOrder::ColumnMajor,
        };
        let values = PayloadCodec::decode(
            PayloadSource::Inline("1 4 2 5 3 6"),
            DataType::Int32,
            &[2, 3],
            &layout,
        )
        .unwrap();
        assert_eq!(values.as_i32(), Some(&[1, 2, 3, 4, 5, 6][..]));

        let text = PayloadCodec::encode_inline(&values, &[2, 3], &layout, 6).unwrap();
        assert_eq!(text, "1 4\n2 5\n3 6\n");
    }

    #[test]
    fn test_encode_binary_applies_byte_order() {
        let values = ArrayValues::UInt16(vec![0x0102, 0x0304]);
        let bytes =
            PayloadCodec::encode_binary(&values, &[2], &big_endian_layout(Encoding::ExternalFileBinary))
                .unwrap();
        assert_eq!(bytes, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_encode_rejects_shape_mismatch() {
        let values = ArrayValues::Float32(vec![1.0, 2.0]);
        let err = PayloadCodec::encode_inline(
            &values,
            &[3],
            &PayloadLayout::new(Encoding::Base64Binary),
            6,
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::ShapeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_ascii_formats_rows() {
        let values = ArrayValues::Float32(vec![0.1, 1.0, -2.5, 3.0]);
        let text =
            PayloadCodec::encode_inline(&values, &[2, 2], &PayloadLayout::new(Encoding::Ascii), 6)
                .unwrap();
        assert_eq!(text, "0.1 1\n-2.5 3\n");
    }

    #[test]
    fn test_external_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dat");
        let err = PayloadCodec::decode(
            PayloadSource::External { path: &path, offset: 0 },
            DataType::Float32,
            &[4],
            &PayloadLayout::new(Encoding::ExternalFileBinary),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("missing.dat"));
    }

    #[test]
    fn test_external_reads_at_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.dat");
        let mut bytes = vec![0xAAu8; 4];
        let mut payload = vec![0u8; 8];
        BigEndian::write_i32_into(&[7, -7], &mut payload);
        bytes.extend_from_slice(&payload);
        std::fs::write(&path, &bytes).unwrap();

        let values = PayloadCodec::decode(
            PayloadSource::External { path: &path, offset: 4 },
            DataType::Int32,
            &[2],
            &big_endian_layout(Encoding::ExternalFileBinary),
        )
        .unwrap();
        assert_eq!(values.as_i32(), Some(&[7, -7][..]));
    }

    #[test]
    fn test_decode_rejects_unaddressable_shape() {
        let err = PayloadCodec::decode(
            PayloadSource::Inline(""),
            DataType::Float32,
            &[1 << 32, 1 << 32],
            &PayloadLayout::new(Encoding::Ascii),
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::SizeOverflow { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decode_huge_declared_count_without_payload() {
        let err = PayloadCodec::decode(
            PayloadSource::Inline("1 2 3"),
            DataType::Float64,
            &[1 << 40],
            &PayloadLayout::new(Encoding::Ascii),
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::TokenCount { actual: 3, .. }));
    }

    #[test]
    fn test_external_huge_declared_count_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.dat");
        std::fs::write(&path, [0u8; 4]).unwrap();

        let err = PayloadCodec::decode(
            PayloadSource::External { path: &path, offset: 0 },
            DataType::Float32,
            &[1 << 61],
            &PayloadLayout::new(Encoding::ExternalFileBinary),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("tiny.dat"));
    }

    #[test]
    fn test_swap_byte_order() {
        let mut bytes = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        swap_byte_order(&mut bytes, 4);
        assert_eq!(bytes, vec![4, 3, 2, 1, 8, 7, 6, 5]);
        swap_byte_order(&mut bytes, 1);
        assert_eq!(bytes, vec![4, 3, 2, 1, 8, 7, 6, 5]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn swap_is_an_involution(bytes in proptest::collection::vec(any::<u8>(), 0..64),
                                     width in prop::sample::select(vec![1usize, 2, 4, 8])) {
                let mut swapped = bytes.clone();
                swap_byte_order(&mut swapped, width);
                swap_byte_order(&mut swapped, width);
                prop_assert_eq!(swapped, bytes);
            }

            #[test]
            fn base64_round_trip_in_both_orders(
                values in proptest::collection::vec(any::<i64>(), 1..40),
                big in any::<bool>(),
                column_major in any::<bool>(),
            ) {
                let dims = if values.len() % 2 == 0 { vec![2, values.len() / 2] } else { vec![values.len()] };
                let layout = PayloadLayout {
                    encoding: Encoding::GZipBase64Binary,
                    endian: if big { Endian::Big } else { Endian::Little },
                    indexing_order: if column_major { IndexingOrder::ColumnMajor } else { IndexingOrder::RowMajor },
                };
                let original = ArrayValues::Int64(values);
                let text = PayloadCodec::encode_inline(&original, &dims, &layout, 6).unwrap();
                let decoded = PayloadCodec::decode(PayloadSource::Inline(&text), DataType::Int64, &dims, &layout).unwrap();
                prop_assert_eq!(decoded, original);
            }
        }
    }
}
