//! Sub-parser for `LabelTable` blocks

use crate::gifti::models::{Label, LabelTable};
use crate::gifti::xml_elements::{attributes, tags};

use super::handler::{SaxHandler, XmlAttributes};
use super::GiftiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelTableState {
    LabelTable,
    Label,
}

/// Event-driven reader for one `LabelTable` element
#[derive(Debug, Default)]
pub struct LabelTableSaxReader {
    states: Vec<LabelTableState>,
    table: LabelTable,
    pending: Option<Label>,
    text: String,
    complete: bool,
}

impl LabelTableSaxReader {
    /// Create a reader awaiting the `LabelTable` start tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the closing `LabelTable` tag has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The collected labels
    pub fn into_label_table(self) -> LabelTable {
        self.table
    }
}

/// Build a label from its attributes; the name arrives later as text
fn label_from_attributes(attrs: &XmlAttributes) -> Result<Label, GiftiError> {
    let (key_attribute, key) = match attrs.get_trimmed(attributes::KEY) {
        Some(key) => (attributes::KEY, key),
        None => match attrs.get_trimmed(attributes::INDEX) {
            Some(index) => (attributes::INDEX, index),
            None => return Err(GiftiError::missing_attribute(tags::LABEL, attributes::KEY)),
        },
    };
    let key = key
        .parse::<i32>()
        .map_err(|_| GiftiError::invalid_value(key_attribute, key))?;

    let mut rgba = [1.0f32; 4];
    let names = [
        attributes::RED,
        attributes::GREEN,
        attributes::BLUE,
        attributes::ALPHA,
    ];
    for (slot, attribute) in rgba.iter_mut().zip(names) {
        if let Some(text) = attrs.get_trimmed(attribute) {
            *slot = text
                .parse::<f32>()
                .ok()
                .filter(|c| (0.0..=1.0).contains(c))
                .ok_or_else(|| GiftiError::invalid_value(attribute, text))?;
        }
    }
    Ok(Label::new(key, String::new()).with_color(rgba[0], rgba[1], rgba[2], rgba[3]))
}

impl SaxHandler for LabelTableSaxReader {
    fn start_element(&mut self, name: &str, attributes: &XmlAttributes) -> Result<(), GiftiError> {
        let next = match (self.states.last(), name) {
            (None, tags::LABEL_TABLE) if !self.complete => LabelTableState::LabelTable,
            (Some(LabelTableState::LabelTable), tags::LABEL) => {
                self.pending = Some(label_from_attributes(attributes)?);
                LabelTableState::Label
            }
            (state, _) => {
                let expected = match state {
                    None => tags::LABEL_TABLE,
                    Some(LabelTableState::LabelTable) => tags::LABEL,
                    Some(LabelTableState::Label) => "no child elements",
                };
                return Err(GiftiError::InvalidStructure(format!(
                    "unexpected element {} in label table, expected {}",
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
            Some(LabelTableState::Label) => self.text.push_str(text),
            _ if !text.trim().is_empty() => {
                log::warn!("ignoring unexpected text in label table: {:?}", text.trim());
            }
            _ => {}
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), GiftiError> {
        let state = self.states.pop().ok_or_else(|| {
            GiftiError::InternalConsistency(format!(
                "label table reader received </{}> with no open element",
                name
            ))
        })?;
        match state {
            LabelTableState::Label => {
                let mut label = self.pending.take().ok_or_else(|| {
                    GiftiError::InternalConsistency("label closed before it was opened".to_string())
                })?;
                label.name = self.text.trim().to_string();
                if let Some(previous) = self.table.insert(label) {
                    log::debug!("label key {} repeated, replacing {:?}", previous.key, previous.name);
                }
            }
            LabelTableState::LabelTable => self.complete = true,
        }
        self.text.clear();
        Ok(())
    }
}
