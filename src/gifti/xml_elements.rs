//! Element and attribute names of the GIFTI XML schema

/// Tag names
#[allow(missing_docs)]
pub mod tags {
    pub const GIFTI: &str = "GIFTI";
    pub const META_DATA: &str = "MetaData";
    pub const MD: &str = "MD";
    pub const NAME: &str = "Name";
    pub const VALUE: &str = "Value";
    pub const LABEL_TABLE: &str = "LabelTable";
    pub const LABEL: &str = "Label";
    pub const DATA_ARRAY: &str = "DataArray";
    pub const COORDINATE_TRANSFORM_MATRIX: &str = "CoordinateSystemTransformMatrix";
    pub const DATA_SPACE: &str = "DataSpace";
    pub const TRANSFORMED_SPACE: &str = "TransformedSpace";
    pub const MATRIX_DATA: &str = "MatrixData";
    pub const DATA: &str = "Data";
}

/// Attribute names
#[allow(missing_docs)]
pub mod attributes {
    pub const VERSION: &str = "Version";
    pub const NUMBER_OF_DATA_ARRAYS: &str = "NumberOfDataArrays";

    pub const INTENT: &str = "Intent";
    pub const DATA_TYPE: &str = "DataType";
    pub const ARRAY_INDEXING_ORDER: &str = "ArrayIndexingOrder";
    pub const DIMENSIONALITY: &str = "Dimensionality";
    pub const ENCODING: &str = "Encoding";
    pub const ENDIAN: &str = "Endian";
    pub const EXTERNAL_FILE_NAME: &str = "ExternalFileName";
    pub const EXTERNAL_FILE_OFFSET: &str = "ExternalFileOffset";

    pub const KEY: &str = "Key";
    /// Pre-1.0 spelling of [`KEY`]
    pub const INDEX: &str = "Index";
    pub const RED: &str = "Red";
    pub const GREEN: &str = "Green";
    pub const BLUE: &str = "Blue";
    pub const ALPHA: &str = "Alpha";

    /// Name of the size attribute for dimension `index` (`Dim0`, `Dim1`, ...)
    pub fn dimension(index: usize) -> String {
        format!("Dim{}", index)
    }
}

/// Highest GIFTI version this crate reads and the version it writes
pub const GIFTI_SUPPORTED_VERSION: f32 = 1.0;

/// Lowest GIFTI version accepted on read
pub const GIFTI_MINIMUM_VERSION: f32 = 1.0;

/// Maximum number of dimensions a DataArray may declare
pub const MAX_DIMENSIONS: usize = 6;

/// DOCTYPE system identifier written at the top of every file
pub const GIFTI_DTD_URL: &str = "http://www.nitrc.org/frs/download.php/115/gifti.dtd";
