//! # GIFTI / NIfTI Enumerated Vocabularies
//!
//! Every enumerated attribute of a GIFTI `DataArray` draws its value from a
//! closed vocabulary. This module holds those vocabularies as static tables
//! with bidirectional name/code lookup.
//!
//! Lookups fail closed: an unknown name yields `None`, and the parser turns
//! that into an `InvalidValue` error. Nothing is ever silently defaulted.
//!
//! ## Reference
//! - GIFTI 1.0 format specification: https://www.nitrc.org/projects/gifti/
//! - NIfTI-1 header (`nifti1.h`) for intent and datatype codes

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// One row of a vocabulary table
#[derive(Debug, Clone, Copy)]
pub struct VocabularyEntry<T: 'static> {
    /// The enum value
    pub value: T,
    /// Name as written in the XML attribute
    pub name: &'static str,
    /// Numeric code (NIfTI code where one exists, otherwise the table position)
    pub code: i32,
}

/// Error returned when a name is not part of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{name}\" is not a valid {vocabulary} name")]
pub struct UnknownName {
    /// Vocabulary that was searched
    pub vocabulary: &'static str,
    /// The rejected name
    pub name: String,
}

/// A closed vocabulary backed by a static table
pub trait Vocabulary: Copy + PartialEq + Sized + 'static {
    /// Human-readable vocabulary name used in error messages
    const VOCABULARY: &'static str;

    /// The full table of valid entries
    fn table() -> &'static [VocabularyEntry<Self>];

    /// Look up a value by its XML name; `None` if the name is unknown
    fn from_name(name: &str) -> Option<Self> {
        Self::table()
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value)
    }

    /// Look up a value by its numeric code; `None` if the code is unknown
    fn from_code(code: i32) -> Option<Self> {
        Self::table()
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.value)
    }

    /// The XML name of this value
    fn name(&self) -> &'static str {
        self.entry().name
    }

    /// The numeric code of this value
    fn code(&self) -> i32 {
        self.entry().code
    }

    /// All XML names, in table order
    fn names() -> Vec<&'static str> {
        Self::table().iter().map(|entry| entry.name).collect()
    }

    /// The table entry for this value
    fn entry(&self) -> &'static VocabularyEntry<Self> {
        Self::table()
            .iter()
            .find(|entry| entry.value == *self)
            .unwrap_or_else(|| unreachable!("{} table is missing a variant", Self::VOCABULARY))
    }
}

macro_rules! impl_name_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Vocabulary>::from_name(s).ok_or_else(|| UnknownName {
                    vocabulary: <$ty as Vocabulary>::VOCABULARY,
                    name: s.to_string(),
                })
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                name.trim().parse().map_err(de::Error::custom)
            }
        }
    };
}

// =============================================================================
// Intent
// =============================================================================

/// Semantic meaning of an array's contents (NIfTI intent codes)
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    None,
    Correl,
    TTest,
    FTest,
    ZScore,
    ChiSq,
    Beta,
    Binom,
    Gamma,
    Poisson,
    Normal,
    FTestNonc,
    ChiSqNonc,
    Logistic,
    Laplace,
    Uniform,
    TTestNonc,
    Weibull,
    Chi,
    InvGauss,
    ExtVal,
    PVal,
    LogPVal,
    Log10PVal,
    Estimate,
    Label,
    NeuroName,
    GenMatrix,
    SymMatrix,
    DispVect,
    Vector,
    PointSet,
    Triangle,
    Quaternion,
    Dimless,
    TimeSeries,
    NodeIndex,
    RgbVector,
    RgbaVector,
    Shape,
}

static INTENT_TABLE: &[VocabularyEntry<Intent>] = &[
    VocabularyEntry { value: Intent::None, name: "NIFTI_INTENT_NONE", code: 0 },
    VocabularyEntry { value: Intent::Correl, name: "NIFTI_INTENT_CORREL", code: 2 },
    VocabularyEntry { value: Intent::TTest, name: "NIFTI_INTENT_TTEST", code: 3 },
    VocabularyEntry { value: Intent::FTest, name: "NIFTI_INTENT_FTEST", code: 4 },
    VocabularyEntry { value: Intent::ZScore, name: "NIFTI_INTENT_ZSCORE", code: 5 },
    VocabularyEntry { value: Intent::ChiSq, name: "NIFTI_INTENT_CHISQ", code: 6 },
    VocabularyEntry { value: Intent::Beta, name: "NIFTI_INTENT_BETA", code: 7 },
    VocabularyEntry { value: Intent::Binom, name: "NIFTI_INTENT_BINOM", code: 8 },
    VocabularyEntry { value: Intent::Gamma, name: "NIFTI_INTENT_GAMMA", code: 9 },
    VocabularyEntry { value: Intent::Poisson, name: "NIFTI_INTENT_POISSON", code: 10 },
    VocabularyEntry { value: Intent::Normal, name: "NIFTI_INTENT_NORMAL", code: 11 },
    VocabularyEntry { value: Intent::FTestNonc, name: "NIFTI_INTENT_FTEST_NONC", code: 12 },
    VocabularyEntry { value: Intent::ChiSqNonc, name: "NIFTI_INTENT_CHISQ_NONC", code: 13 },
    VocabularyEntry { value: Intent::Logistic, name: "NIFTI_INTENT_LOGISTIC", code: 14 },
    VocabularyEntry { value: Intent::Laplace, name: "NIFTI_INTENT_LAPLACE", code: 15 },
    VocabularyEntry { value: Intent::Uniform, name: "NIFTI_INTENT_UNIFORM", code: 16 },
    VocabularyEntry { value: Intent::TTestNonc, name: "NIFTI_INTENT_TTEST_NONC", code: 17 },
    VocabularyEntry { value: Intent::Weibull, name: "NIFTI_INTENT_WEIBULL", code: 18 },
    VocabularyEntry { value: Intent::Chi, name: "NIFTI_INTENT_CHI", code: 19 },
    VocabularyEntry { value: Intent::InvGauss, name: "NIFTI_INTENT_INVGAUSS", code: 20 },
    VocabularyEntry { value: Intent::ExtVal, name: "NIFTI_INTENT_EXTVAL", code: 21 },
    VocabularyEntry { value: Intent::PVal, name: "NIFTI_INTENT_PVAL", code: 22 },
    VocabularyEntry { value: Intent::LogPVal, name: "NIFTI_INTENT_LOGPVAL", code: 23 },
    VocabularyEntry { value: Intent::Log10PVal, name: "NIFTI_INTENT_LOG10PVAL", code: 24 },
    VocabularyEntry { value: Intent::Estimate, name: "NIFTI_INTENT_ESTIMATE", code: 1001 },
    VocabularyEntry { value: Intent::Label, name: "NIFTI_INTENT_LABEL", code: 1002 },
    VocabularyEntry { value: Intent::NeuroName, name: "NIFTI_INTENT_NEURONAME", code: 1003 },
    VocabularyEntry { value: Intent::GenMatrix, name: "NIFTI_INTENT_GENMATRIX", code: 1004 },
    VocabularyEntry { value: Intent::SymMatrix, name: "NIFTI_INTENT_SYMMATRIX", code: 1005 },
    VocabularyEntry { value: Intent::DispVect, name: "NIFTI_INTENT_DISPVECT", code: 1006 },
    VocabularyEntry { value: Intent::Vector, name: "NIFTI_INTENT_VECTOR", code: 1007 },
    VocabularyEntry { value: Intent::PointSet, name: "NIFTI_INTENT_POINTSET", code: 1008 },
    VocabularyEntry { value: Intent::Triangle, name: "NIFTI_INTENT_TRIANGLE", code: 1009 },
    VocabularyEntry { value: Intent::Quaternion, name: "NIFTI_INTENT_QUATERNION", code: 1010 },
    VocabularyEntry { value: Intent::Dimless, name: "NIFTI_INTENT_DIMLESS", code: 1011 },
    VocabularyEntry { value: Intent::TimeSeries, name: "NIFTI_INTENT_TIME_SERIES", code: 2001 },
    VocabularyEntry { value: Intent::NodeIndex, name: "NIFTI_INTENT_NODE_INDEX", code: 2002 },
    VocabularyEntry { value: Intent::RgbVector, name: "NIFTI_INTENT_RGB_VECTOR", code: 2003 },
    VocabularyEntry { value: Intent::RgbaVector, name: "NIFTI_INTENT_RGBA_VECTOR", code: 2004 },
    VocabularyEntry { value: Intent::Shape, name: "NIFTI_INTENT_SHAPE", code: 2005 },
];

impl Vocabulary for Intent {
    const VOCABULARY: &'static str = "intent";

    fn table() -> &'static [VocabularyEntry<Self>] {
        INTENT_TABLE
    }
}

impl_name_traits!(Intent);

// =============================================================================
// Data type
// =============================================================================

/// Numeric element type of an array (NIfTI datatype codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
}

static DATA_TYPE_TABLE: &[VocabularyEntry<DataType>] = &[
    VocabularyEntry { value: DataType::UInt8, name: "NIFTI_TYPE_UINT8", code: 2 },
    VocabularyEntry { value: DataType::Int16, name: "NIFTI_TYPE_INT16", code: 4 },
    VocabularyEntry { value: DataType::Int32, name: "NIFTI_TYPE_INT32", code: 8 },
    VocabularyEntry { value: DataType::Float32, name: "NIFTI_TYPE_FLOAT32", code: 16 },
    VocabularyEntry { value: DataType::Float64, name: "NIFTI_TYPE_FLOAT64", code: 64 },
    VocabularyEntry { value: DataType::Int8, name: "NIFTI_TYPE_INT8", code: 256 },
    VocabularyEntry { value: DataType::UInt16, name: "NIFTI_TYPE_UINT16", code: 512 },
    VocabularyEntry { value: DataType::UInt32, name: "NIFTI_TYPE_UINT32", code: 768 },
    VocabularyEntry { value: DataType::Int64, name: "NIFTI_TYPE_INT64", code: 1024 },
    VocabularyEntry { value: DataType::UInt64, name: "NIFTI_TYPE_UINT64", code: 1280 },
];

impl Vocabulary for DataType {
    const VOCABULARY: &'static str = "datatype";

    fn table() -> &'static [VocabularyEntry<Self>] {
        DATA_TYPE_TABLE
    }
}

impl DataType {
    /// Size in bytes of one element
    pub fn byte_size(&self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }

    /// Whether this is a floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

impl_name_traits!(DataType);

// =============================================================================
// Encoding
// =============================================================================

/// Representation of an array payload inside or alongside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Whitespace-separated decimal text
    Ascii,
    /// Base64 of the raw element bytes
    Base64Binary,
    /// Base64 of the zlib-compressed element bytes
    GZipBase64Binary,
    /// Raw element bytes in a companion file
    ExternalFileBinary,
}

static ENCODING_TABLE: &[VocabularyEntry<Encoding>] = &[
    VocabularyEntry { value: Encoding::Ascii, name: "ASCII", code: 1 },
    VocabularyEntry { value: Encoding::Base64Binary, name: "Base64Binary", code: 2 },
    VocabularyEntry { value: Encoding::GZipBase64Binary, name: "GZipBase64Binary", code: 3 },
    VocabularyEntry { value: Encoding::ExternalFileBinary, name: "ExternalFileBinary", code: 4 },
];

impl Vocabulary for Encoding {
    const VOCABULARY: &'static str = "encoding";

    fn table() -> &'static [VocabularyEntry<Self>] {
        ENCODING_TABLE
    }
}

impl Encoding {
    /// Whether the payload is raw element bytes (and therefore byte-order sensitive)
    pub fn is_binary(&self) -> bool {
        !matches!(self, Encoding::Ascii)
    }
}

impl_name_traits!(Encoding);

// =============================================================================
// Endian
// =============================================================================

/// Byte order of binary payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

static ENDIAN_TABLE: &[VocabularyEntry<Endian>] = &[
    VocabularyEntry { value: Endian::Big, name: "BigEndian", code: 1 },
    VocabularyEntry { value: Endian::Little, name: "LittleEndian", code: 2 },
];

impl Vocabulary for Endian {
    const VOCABULARY: &'static str = "endian";

    fn table() -> &'static [VocabularyEntry<Self>] {
        ENDIAN_TABLE
    }
}

impl Endian {
    /// Byte order of the running machine
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

impl_name_traits!(Endian);

// =============================================================================
// Indexing order
// =============================================================================

/// Which dimension varies fastest in the flattened payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexingOrder {
    /// Last dimension varies fastest (C order)
    RowMajor,
    /// First dimension varies fastest (Fortran order)
    ColumnMajor,
}

static INDEXING_ORDER_TABLE: &[VocabularyEntry<IndexingOrder>] = &[
    VocabularyEntry { value: IndexingOrder::RowMajor, name: "RowMajorOrder", code: 1 },
    VocabularyEntry { value: IndexingOrder::ColumnMajor, name: "ColumnMajorOrder", code: 2 },
];

impl Vocabulary for IndexingOrder {
    const VOCABULARY: &'static str = "array indexing order";

    fn table() -> &'static [VocabularyEntry<Self>] {
        INDEXING_ORDER_TABLE
    }
}

impl_name_traits!(IndexingOrder);
