use crate::gifti::error::GiftiError;
use crate::gifti::xml_elements::MAX_DIMENSIONS;
use crate::vocabulary::{DataType, Encoding, Endian, IndexingOrder, Intent, Vocabulary};

use super::matrix::CoordinateTransform;
use super::metadata::MetaData;
use super::values::{
    checked_byte_len, element_count, row_major_index, row_major_offset, ArrayValues,
};

/// One typed, multi-dimensional array of a GIFTI file
///
/// Values are held in row-major order. `indexing_order`, `encoding` and
/// `endian` describe how the array was stored on disk and how it will be
/// written back; changing them never reorders the in-memory values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    intent: Intent,
    data_type: DataType,
    encoding: Encoding,
    endian: Endian,
    indexing_order: IndexingOrder,
    dimensions: Vec<usize>,
    external_file_name: Option<String>,
    external_file_offset: u64,
    matrices: Vec<CoordinateTransform>,
    metadata: MetaData,
    values: ArrayValues,
}

impl DataArray {
    /// Create an array from values and a shape
    ///
    /// The datatype follows the values. Encoding defaults to
    /// `Base64Binary` in native byte order and row-major indexing.
    pub fn new(
        intent: Intent,
        values: impl Into<ArrayValues>,
        dimensions: Vec<usize>,
    ) -> Result<Self, GiftiError> {
        let values = values.into();
        check_shape(&dimensions, values.data_type(), values.len())?;
        Ok(Self {
            intent,
            data_type: values.data_type(),
            encoding: Encoding::Base64Binary,
            endian: Endian::native(),
            indexing_order: IndexingOrder::RowMajor,
            dimensions,
            external_file_name: None,
            external_file_offset: 0,
            matrices: Vec::new(),
            metadata: MetaData::new(),
            values,
        })
    }

    /// Descriptor-only array awaiting its payload
    pub(crate) fn unpopulated(
        intent: Intent,
        data_type: DataType,
        encoding: Encoding,
        endian: Endian,
        indexing_order: IndexingOrder,
        dimensions: Vec<usize>,
        external_file_name: Option<String>,
        external_file_offset: u64,
    ) -> Self {
        Self {
            intent,
            data_type,
            encoding,
            endian,
            indexing_order,
            dimensions,
            external_file_name,
            external_file_offset,
            matrices: Vec::new(),
            metadata: MetaData::new(),
            values: ArrayValues::empty(data_type),
        }
    }

    /// Attach the decoded payload to a descriptor-only array
    pub(crate) fn attach_values(&mut self, values: ArrayValues) -> Result<(), GiftiError> {
        if values.data_type() != self.data_type {
            return Err(GiftiError::InternalConsistency(format!(
                "decoded {} values for a {} array",
                values.data_type(),
                self.data_type
            )));
        }
        check_shape(&self.dimensions, self.data_type, values.len())?;
        self.values = values;
        Ok(())
    }

    /// Whether a payload has been attached
    pub(crate) fn is_populated(&self) -> bool {
        self.values.len() == self.element_count() && !self.values.is_empty()
    }

    /// Semantic intent
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Element datatype
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Payload encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte order of binary payloads
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// On-disk subscript ordering
    pub fn indexing_order(&self) -> IndexingOrder {
        self.indexing_order
    }

    /// Size of every dimension
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Number of dimensions
    pub fn dimensionality(&self) -> usize {
        self.dimensions.len()
    }

    /// Product of the dimensions
    pub fn element_count(&self) -> usize {
        element_count(&self.dimensions)
    }

    /// Companion file name, for arrays read from `ExternalFileBinary`
    pub fn external_file_name(&self) -> Option<&str> {
        self.external_file_name.as_deref()
    }

    /// Byte offset into the companion file
    pub fn external_file_offset(&self) -> u64 {
        self.external_file_offset
    }

    /// Coordinate transforms
    pub fn matrices(&self) -> &[CoordinateTransform] {
        &self.matrices
    }

    /// Mutable coordinate transforms
    pub fn matrices_mut(&mut self) -> &mut Vec<CoordinateTransform> {
        &mut self.matrices
    }

    /// Append a coordinate transform
    pub fn add_matrix(&mut self, matrix: CoordinateTransform) {
        self.matrices.push(matrix);
    }

    /// Array-level metadata
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Mutable array-level metadata
    pub fn metadata_mut(&mut self) -> &mut MetaData {
        &mut self.metadata
    }

    /// Decoded values in row-major order
    pub fn values(&self) -> &ArrayValues {
        &self.values
    }

    /// Replace values and shape together; the datatype follows the values
    pub fn set_values(
        &mut self,
        values: impl Into<ArrayValues>,
        dimensions: Vec<usize>,
    ) -> Result<(), GiftiError> {
        let values = values.into();
        check_shape(&dimensions, values.data_type(), values.len())?;
        self.data_type = values.data_type();
        self.dimensions = dimensions;
        self.values = values;
        Ok(())
    }

    /// Change the intent
    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    /// Change the encoding used when writing
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Change the byte order used when writing binary encodings
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Change the subscript order used when writing
    pub fn set_indexing_order(&mut self, indexing_order: IndexingOrder) {
        self.indexing_order = indexing_order;
    }

    /// Row-major flat position of a multi-dimensional index
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        row_major_offset(&self.dimensions, index)
    }

    /// Multi-dimensional index of a row-major flat position
    pub fn unflatten_index(&self, flat: usize) -> Option<Vec<usize>> {
        row_major_index(&self.dimensions, flat)
    }

    /// Element at a multi-dimensional index, widened to `f64`
    pub fn value_f64(&self, index: &[usize]) -> Option<f64> {
        self.values.get_f64(self.flat_index(index)?)
    }

    /// Check shape and datatype invariants
    pub fn validate(&self) -> Result<(), GiftiError> {
        check_shape(&self.dimensions, self.data_type, self.values.len())?;
        if self.values.data_type() != self.data_type {
            return Err(GiftiError::FormatError(format!(
                "values are {} but the array declares {}",
                self.values.data_type().name(),
                self.data_type.name()
            )));
        }
        Ok(())
    }
}

/// Shape rules: 1..=6 positive dimensions whose product is `len`
fn check_shape(dimensions: &[usize], data_type: DataType, len: usize) -> Result<(), GiftiError> {
    if dimensions.is_empty() || dimensions.len() > MAX_DIMENSIONS {
        return Err(GiftiError::FormatError(format!(
            "dimensionality must be between 1 and {}, got {}",
            MAX_DIMENSIONS,
            dimensions.len()
        )));
    }
    if dimensions.contains(&0) {
        return Err(GiftiError::FormatError(format!(
            "dimensions must be positive, got {:?}",
            dimensions
        )));
    }
    if checked_byte_len(dimensions, data_type).is_none() {
        return Err(GiftiError::FormatError(format!(
            "dimensions {:?} of {} exceed the addressable size",
            dimensions, data_type
        )));
    }
    let expected = element_count(dimensions);
    if expected != len {
        return Err(GiftiError::FormatError(format!(
            "dimensions {:?} require {} values, got {}",
            dimensions, expected, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gifti::error::ErrorKind;

    #[test]
    fn test_new_checks_shape() {
        let array = DataArray::new(Intent::PointSet, vec![0.0f32; 6], vec![2, 3]).unwrap();
        assert_eq!(array.data_type(), DataType::Float32);
        assert_eq!(array.element_count(), 6);
        assert_eq!(array.dimensionality(), 2);

        let err = DataArray::new(Intent::PointSet, vec![0.0f32; 5], vec![2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = DataArray::new(Intent::Shape, vec![1u8], vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let err = DataArray::new(Intent::Shape, vec![1.0f32], vec![usize::MAX / 2, 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let mut array = DataArray::new(Intent::Shape, vec![1.0f64], vec![1]).unwrap();
        assert!(array
            .set_values(vec![1.0f64], vec![usize::MAX / 8 + 1])
            .is_err());
        assert_eq!(array.dimensions(), &[1]);
    }

    #[test]
    fn test_multi_dimensional_access() {
        let array =
            DataArray::new(Intent::Triangle, vec![0i32, 1, 2, 2, 1, 3], vec![2, 3]).unwrap();
        assert_eq!(array.value_f64(&[1, 2]), Some(3.0));
        assert_eq!(array.value_f64(&[2, 0]), None);
        assert_eq!(array.flat_index(&[1, 0]), Some(3));
        assert_eq!(array.unflatten_index(4), Some(vec![1, 1]));
    }

    #[test]
    fn test_set_values_changes_datatype() {
        let mut array = DataArray::new(Intent::Shape, vec![1.0f32, 2.0], vec![2]).unwrap();
        array.set_values(vec![1.0f64, 2.0, 3.0], vec![3]).unwrap();
        assert_eq!(array.data_type(), DataType::Float64);
        assert_eq!(array.dimensions(), &[3]);
        assert!(array.set_values(vec![1u8], vec![2]).is_err());
        assert_eq!(array.dimensions(), &[3]);
    }

    #[test]
    fn test_attach_values_rejects_wrong_type() {
        let mut array = DataArray::unpopulated(
            Intent::Shape,
            DataType::Float32,
            Encoding::Ascii,
            Endian::Little,
            IndexingOrder::RowMajor,
            vec![2],
            None,
            0,
        );
        assert!(!array.is_populated());
        let err = array.attach_values(ArrayValues::Int32(vec![1, 2])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
        array.attach_values(ArrayValues::Float32(vec![1.0, 2.0])).unwrap();
        assert!(array.is_populated());
    }
}
