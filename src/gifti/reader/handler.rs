//! Event seam between the XML tokenizer and the GIFTI parsers

use quick_xml::events::BytesStart;

use super::GiftiError;

/// Attributes of one start element, unescaped and owned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlAttributes {
    entries: Vec<(String, String)>,
}

impl XmlAttributes {
    /// Collect the attributes of a start tag
    pub fn from_start(e: &BytesStart) -> Result<Self, GiftiError> {
        let mut entries = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| GiftiError::XmlError(quick_xml::Error::from(e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    /// Raw value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed value of `name`; empty values count as absent
    pub fn get_trimmed(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Trimmed value of `name` or a `MissingAttribute` error naming it
    pub fn require(&self, element: &str, name: &str) -> Result<&str, GiftiError> {
        self.get_trimmed(name)
            .ok_or_else(|| GiftiError::missing_attribute(element, name))
    }

    /// Whether no attributes were given
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for XmlAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Receiver of start/characters/end events
///
/// The file parser and its sub-parsers all implement this, so the file
/// parser can forward events to whichever sub-parser is active.
pub trait SaxHandler {
    /// An element opened
    fn start_element(&mut self, name: &str, attributes: &XmlAttributes) -> Result<(), GiftiError>;

    /// Character data inside the current element; may arrive in pieces
    fn characters(&mut self, text: &str) -> Result<(), GiftiError>;

    /// An element closed
    fn end_element(&mut self, name: &str) -> Result<(), GiftiError>;
}
