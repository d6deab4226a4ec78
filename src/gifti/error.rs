use crate::gifti::binary::PayloadError;

/// Broad category of a [`GiftiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Illegal nesting, unexpected child element or malformed XML
    Structure,
    /// A required attribute (or required child element) is absent
    MissingAttribute,
    /// An attribute value is outside its vocabulary or not a valid number
    InvalidValue,
    /// The document version is older or newer than supported
    UnsupportedVersion,
    /// Payload token/byte counts do not match the declared shape
    Format,
    /// Reading the document or an external payload file failed
    Io,
    /// The parser state machine reached an impossible state
    InternalConsistency,
}

/// Errors that can occur while reading a GIFTI document
#[derive(Debug, thiserror::Error)]
pub enum GiftiError {
    /// Error reported by the XML tokenizer
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Element name, attribute or text is not valid UTF-8
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// I/O error while reading the document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Illegal element nesting or document structure
    #[error("Invalid GIFTI structure: {0}")]
    InvalidStructure(String),

    /// Required attribute is missing
    #[error("Missing required attribute {attribute} on {element}")]
    MissingAttribute {
        /// Element the attribute belongs to
        element: String,
        /// Name of the missing attribute
        attribute: String,
    },

    /// Attribute value is not in its vocabulary or cannot be parsed
    #[error("Invalid value \"{value}\" for attribute {attribute}")]
    InvalidAttributeValue {
        /// Name of the offending attribute
        attribute: String,
        /// The rejected value
        value: String,
    },

    /// Document version outside the supported range
    #[error("GIFTI version {found} is not supported (supported: {minimum:.1} to {maximum:.1})")]
    UnsupportedVersion {
        /// Version string found in the document
        found: String,
        /// Lowest supported version
        minimum: f32,
        /// Highest supported version
        maximum: f32,
    },

    /// Malformed content (matrix values, array shape)
    #[error("Format error: {0}")]
    FormatError(String),

    /// Payload of a DataArray could not be decoded
    #[error("DataArray {array_index}: {source}")]
    Payload {
        /// Zero-based index of the array in the document
        array_index: usize,
        /// Underlying decode failure
        #[source]
        source: PayloadError,
    },

    /// Parser state machine inconsistency (driver bug, not bad input)
    #[error("Internal parser error: {0}")]
    InternalConsistency(String),
}

impl GiftiError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GiftiError::XmlError(_) | GiftiError::Utf8Error(_) | GiftiError::InvalidStructure(_) => {
                ErrorKind::Structure
            }
            GiftiError::FormatError(_) => ErrorKind::Format,
            GiftiError::IoError(_) => ErrorKind::Io,
            GiftiError::MissingAttribute { .. } => ErrorKind::MissingAttribute,
            GiftiError::InvalidAttributeValue { .. } => ErrorKind::InvalidValue,
            GiftiError::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            GiftiError::Payload { source, .. } => source.kind(),
            GiftiError::InternalConsistency(_) => ErrorKind::InternalConsistency,
        }
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        GiftiError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn invalid_value(attribute: &str, value: &str) -> Self {
        GiftiError::InvalidAttributeValue {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}
