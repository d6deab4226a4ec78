//! Sub-parser for `MetaData` blocks
//!
//! Handles `MetaData > MD > {Name, Value}` and produces a [`MetaData`].

use crate::gifti::models::MetaData;
use crate::gifti::xml_elements::tags;

use super::handler::{SaxHandler, XmlAttributes};
use super::GiftiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaDataState {
    MetaData,
    Md,
    Name,
    Value,
}

/// Event-driven reader for one `MetaData` element
#[derive(Debug, Default)]
pub struct MetaDataSaxReader {
    states: Vec<MetaDataState>,
    metadata: MetaData,
    name: Option<String>,
    value: Option<String>,
    text: String,
    complete: bool,
}

impl MetaDataSaxReader {
    /// Create a reader awaiting the `MetaData` start tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the closing `MetaData` tag has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The collected entries
    pub fn into_metadata(self) -> MetaData {
        self.metadata
    }

    fn commit_entry(&mut self) -> Result<(), GiftiError> {
        let name = self
            .name
            .take()
            .ok_or_else(|| GiftiError::missing_attribute(tags::MD, tags::NAME))?;
        let value = self.value.take().unwrap_or_default();
        if let Some(previous) = self.metadata.set(name.clone(), value) {
            log::debug!("metadata key {} repeated, replacing value {:?}", name, previous);
        }
        Ok(())
    }
}

impl SaxHandler for MetaDataSaxReader {
    fn start_element(&mut self, name: &str, _attributes: &XmlAttributes) -> Result<(), GiftiError> {
        let next = match (self.states.last(), name) {
            (None, tags::META_DATA) if !self.complete => MetaDataState::MetaData,
            (Some(MetaDataState::MetaData), tags::MD) => {
                self.name = None;
                self.value = None;
                MetaDataState::Md
            }
            (Some(MetaDataState::Md), tags::NAME) => MetaDataState::Name,
            (Some(MetaDataState::Md), tags::VALUE) => MetaDataState::Value,
            (state, _) => {
                let expected = match state {
                    None => tags::META_DATA,
                    Some(MetaDataState::MetaData) => tags::MD,
                    Some(MetaDataState::Md) => "Name, Value",
                    Some(MetaDataState::Name) | Some(MetaDataState::Value) => "no child elements",
                };
                return Err(GiftiError::InvalidStructure(format!(
                    "unexpected element {} in metadata, expected {}",
                    name, expected
                )));
            }
        };
        self.states.push(next);
        self.text.clear();
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), GiftiError> {
        match self.states.last() {
            Some(MetaDataState::Name) | Some(MetaDataState::Value) => self.text.push_str(text),
            _ if !text.trim().is_empty() => {
                log::warn!("ignoring unexpected text in metadata: {:?}", text.trim());
            }
            _ => {}
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), GiftiError> {
        let state = self.states.pop().ok_or_else(|| {
            GiftiError::InternalConsistency(format!(
                "metadata reader received </{}> with no open element",
                name
            ))
        })?;
        match state {
            MetaDataState::Name => self.name = Some(self.text.trim().to_string()),
            MetaDataState::Value => self.value = Some(std::mem::take(&mut self.text)),
            MetaDataState::Md => self.commit_entry()?,
            MetaDataState::MetaData => self.complete = true,
        }
        self.text.clear();
        Ok(())
    }
}
