//! Document-level GIFTI state machine
//!
//! Tracks the open elements on an explicit stack, assembles DataArrays and
//! their matrices, and hands `MetaData` and `LabelTable` blocks to their
//! own sub-parsers until those blocks close.

use std::path::{Path, PathBuf};

use crate::gifti::binary::{PayloadCodec, PayloadLayout, PayloadSource};
use crate::gifti::models::{CoordinateTransform, DataArray, GiftiFile};
use crate::gifti::xml_elements::{
    attributes, tags, GIFTI_MINIMUM_VERSION, GIFTI_SUPPORTED_VERSION,
};

use super::descriptor::ArrayDescriptor;
use super::handler::{SaxHandler, XmlAttributes};
use super::label_table::LabelTableSaxReader;
use super::metadata::MetaDataSaxReader;
use super::GiftiError;

/// Elements the file parser tracks itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Gifti,
    MetaData,
    LabelTable,
    DataArray,
    Data,
    Matrix,
    DataSpace,
    TransformedSpace,
    MatrixData,
}

impl ParseState {
    fn tag(self) -> &'static str {
        match self {
            ParseState::Gifti => tags::GIFTI,
            ParseState::MetaData => tags::META_DATA,
            ParseState::LabelTable => tags::LABEL_TABLE,
            ParseState::DataArray => tags::DATA_ARRAY,
            ParseState::Data => tags::DATA,
            ParseState::Matrix => tags::COORDINATE_TRANSFORM_MATRIX,
            ParseState::DataSpace => tags::DATA_SPACE,
            ParseState::TransformedSpace => tags::TRANSFORMED_SPACE,
            ParseState::MatrixData => tags::MATRIX_DATA,
        }
    }

    /// Children legal inside this element, for error messages
    fn expected_children(state: Option<Self>) -> &'static str {
        match state {
            None => tags::GIFTI,
            Some(ParseState::Gifti) => "MetaData, LabelTable, DataArray",
            Some(ParseState::DataArray) => "MetaData, Data, CoordinateSystemTransformMatrix",
            Some(ParseState::Matrix) => "DataSpace, TransformedSpace, MatrixData",
            Some(_) => "no child elements",
        }
    }

    fn holds_text(self) -> bool {
        matches!(
            self,
            ParseState::Data
                | ParseState::DataSpace
                | ParseState::TransformedSpace
                | ParseState::MatrixData
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaDataOwner {
    File,
    DataArray,
}

enum ActiveSubParser {
    MetaData {
        reader: MetaDataSaxReader,
        owner: MetaDataOwner,
    },
    LabelTable(LabelTableSaxReader),
}

impl ActiveSubParser {
    fn handler(&mut self) -> &mut dyn SaxHandler {
        match self {
            ActiveSubParser::MetaData { reader, .. } => reader,
            ActiveSubParser::LabelTable(reader) => reader,
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            ActiveSubParser::MetaData { reader, .. } => reader.is_complete(),
            ActiveSubParser::LabelTable(reader) => reader.is_complete(),
        }
    }
}

/// A DataArray between its start and end tags
struct PendingArray {
    array: DataArray,
    layout: PayloadLayout,
}

/// Event-driven reader assembling a [`GiftiFile`]
pub struct GiftiFileSaxReader {
    states: Vec<ParseState>,
    base_dir: PathBuf,
    file: GiftiFile,
    declared_array_count: Option<usize>,
    sub_parser: Option<ActiveSubParser>,
    pending: Option<PendingArray>,
    text: String,
    finished: bool,
}

impl GiftiFileSaxReader {
    /// External payload paths are resolved against `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            states: Vec::new(),
            base_dir: base_dir.as_ref().to_path_buf(),
            file: GiftiFile::new(),
            declared_array_count: None,
            sub_parser: None,
            pending: None,
            text: String::new(),
            finished: false,
        }
    }

    /// The assembled file, once the root element has closed
    pub fn finish(self) -> Result<GiftiFile, GiftiError> {
        if !self.finished {
            let open = self
                .states
                .last()
                .map(|s| s.tag())
                .unwrap_or(tags::GIFTI);
            return Err(GiftiError::InvalidStructure(format!(
                "document ended inside {} before </{}>",
                open,
                tags::GIFTI
            )));
        }
        Ok(self.file)
    }

    fn pending_array(&mut self) -> Result<&mut PendingArray, GiftiError> {
        self.pending.as_mut().ok_or_else(|| {
            GiftiError::InternalConsistency("no DataArray is open".to_string())
        })
    }

    fn current_matrix(&mut self) -> Result<&mut CoordinateTransform, GiftiError> {
        self.pending_array()?
            .array
            .matrices_mut()
            .last_mut()
            .ok_or_else(|| {
                GiftiError::InternalConsistency("no coordinate transform is open".to_string())
            })
    }

    fn start_root(&mut self, attrs: &XmlAttributes) -> Result<(), GiftiError> {
        let text = attrs.require(tags::GIFTI, attributes::VERSION)?;
        let version = text
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GiftiError::invalid_value(attributes::VERSION, text))?;
        if !(GIFTI_MINIMUM_VERSION..=GIFTI_SUPPORTED_VERSION).contains(&version) {
            return Err(GiftiError::UnsupportedVersion {
                found: text.to_string(),
                minimum: GIFTI_MINIMUM_VERSION,
                maximum: GIFTI_SUPPORTED_VERSION,
            });
        }
        self.file.set_version(version);

        if let Some(text) = attrs.get_trimmed(attributes::NUMBER_OF_DATA_ARRAYS) {
            let count = text.parse::<usize>().map_err(|_| {
                GiftiError::invalid_value(attributes::NUMBER_OF_DATA_ARRAYS, text)
            })?;
            self.declared_array_count = Some(count);
        }
        log::debug!("GIFTI version {} document", version);
        Ok(())
    }

    fn start_sub_parser(
        &mut self,
        mut sub_parser: ActiveSubParser,
        name: &str,
        attrs: &XmlAttributes,
    ) -> Result<(), GiftiError> {
        sub_parser.handler().start_element(name, attrs)?;
        self.sub_parser = Some(sub_parser);
        Ok(())
    }

    /// Forward an end tag to the active sub-parser, detaching it once done
    fn end_sub_parser_element(&mut self, name: &str) -> Result<(), GiftiError> {
        let Some(mut sub_parser) = self.sub_parser.take() else {
            return Err(GiftiError::InternalConsistency(
                "no sub-parser is active".to_string(),
            ));
        };
        sub_parser.handler().end_element(name)?;
        if !sub_parser.is_complete() {
            self.sub_parser = Some(sub_parser);
            return Ok(());
        }

        let expected = match sub_parser {
            ActiveSubParser::MetaData { reader, owner } => {
                let metadata = reader.into_metadata();
                match owner {
                    MetaDataOwner::File => self.file.metadata_mut().extend(metadata),
                    MetaDataOwner::DataArray => {
                        self.pending_array()?.array.metadata_mut().extend(metadata)
                    }
                }
                ParseState::MetaData
            }
            ActiveSubParser::LabelTable(reader) => {
                self.file.set_label_table(Some(reader.into_label_table()));
                ParseState::LabelTable
            }
        };
        match self.states.pop() {
            Some(state) if state == expected => Ok(()),
            other => Err(GiftiError::InternalConsistency(format!(
                "sub-parser for {} finished while the state stack held {:?}",
                expected.tag(),
                other
            ))),
        }
    }

    fn decode_data(&mut self) -> Result<(), GiftiError> {
        let array_index = self.file.number_of_data_arrays();
        let text = std::mem::take(&mut self.text);
        let base_dir = self.base_dir.clone();
        let pending = self.pending_array()?;

        let external_path = pending
            .array
            .external_file_name()
            .map(|name| base_dir.join(name));
        let source = match &external_path {
            Some(path) => PayloadSource::External {
                path,
                offset: pending.array.external_file_offset(),
            },
            None => PayloadSource::Inline(&text),
        };
        let values = PayloadCodec::decode(
            source,
            pending.array.data_type(),
            pending.array.dimensions(),
            &pending.layout,
        )
        .map_err(|source| GiftiError::Payload {
            array_index,
            source,
        })?;
        pending.array.attach_values(values)?;
        Ok(())
    }

    fn parse_matrix_data(&mut self) -> Result<(), GiftiError> {
        let mut values = [0.0f64; 16];
        let mut count = 0usize;
        for token in self.text.split_ascii_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                GiftiError::FormatError(format!("matrix entry \"{}\" is not a number", token))
            })?;
            if count < values.len() {
                values[count] = value;
            }
            count += 1;
        }
        if count < values.len() {
            return Err(GiftiError::FormatError(format!(
                "MatrixData holds {} values, expected 16",
                count
            )));
        }
        if count > values.len() {
            log::warn!("MatrixData holds {} values, using the first 16", count);
        }
        self.current_matrix()?.matrix = CoordinateTransform::from_row_major("", "", values).matrix;
        Ok(())
    }

    fn finish_data_array(&mut self) -> Result<(), GiftiError> {
        let pending = self.pending.take().ok_or_else(|| {
            GiftiError::InternalConsistency("DataArray closed before it was opened".to_string())
        })?;
        if !pending.array.is_populated() {
            return Err(GiftiError::FormatError(format!(
                "DataArray {} has no Data element",
                self.file.number_of_data_arrays()
            )));
        }
        log::debug!(
            "DataArray {}: {} {:?}",
            self.file.number_of_data_arrays(),
            pending.array.data_type(),
            pending.array.dimensions()
        );
        self.file.add_data_array(pending.array);
        Ok(())
    }

    fn finish_root(&mut self) {
        self.finished = true;
        let actual = self.file.number_of_data_arrays();
        if let Some(declared) = self.declared_array_count {
            if declared != actual {
                log::warn!(
                    "NumberOfDataArrays is {} but the document contains {} arrays",
                    declared,
                    actual
                );
            }
        }
    }
}

impl SaxHandler for GiftiFileSaxReader {
    fn start_element(&mut self, name: &str, attributes: &XmlAttributes) -> Result<(), GiftiError> {
        if let Some(sub_parser) = self.sub_parser.as_mut() {
            return sub_parser.handler().start_element(name, attributes);
        }
        self.text.clear();

        let top = self.states.last().copied();
        let next = match (top, name) {
            (None, tags::GIFTI) if !self.finished => {
                self.start_root(attributes)?;
                ParseState::Gifti
            }
            (Some(ParseState::Gifti), tags::META_DATA) => {
                let sub_parser = ActiveSubParser::MetaData {
                    reader: MetaDataSaxReader::new(),
                    owner: MetaDataOwner::File,
                };
                self.start_sub_parser(sub_parser, name, attributes)?;
                ParseState::MetaData
            }
            (Some(ParseState::Gifti), tags::LABEL_TABLE) => {
                let sub_parser = ActiveSubParser::LabelTable(LabelTableSaxReader::new());
                self.start_sub_parser(sub_parser, name, attributes)?;
                ParseState::LabelTable
            }
            (Some(ParseState::Gifti), tags::DATA_ARRAY) => {
                let descriptor = ArrayDescriptor::from_attributes(attributes)?;
                let layout = descriptor.layout();
                self.pending = Some(PendingArray {
                    array: descriptor.into_data_array(),
                    layout,
                });
                ParseState::DataArray
            }
            (Some(ParseState::DataArray), tags::META_DATA) => {
                let sub_parser = ActiveSubParser::MetaData {
                    reader: MetaDataSaxReader::new(),
                    owner: MetaDataOwner::DataArray,
                };
                self.start_sub_parser(sub_parser, name, attributes)?;
                ParseState::MetaData
            }
            (Some(ParseState::DataArray), tags::DATA) => {
                if self.pending_array()?.array.is_populated() {
                    return Err(GiftiError::InvalidStructure(format!(
                        "DataArray {} has more than one Data element",
                        self.file.number_of_data_arrays()
                    )));
                }
                ParseState::Data
            }
            (Some(ParseState::DataArray), tags::COORDINATE_TRANSFORM_MATRIX) => {
                self.pending_array()?
                    .array
                    .add_matrix(CoordinateTransform::default());
                ParseState::Matrix
            }
            (Some(ParseState::Matrix), tags::DATA_SPACE) => ParseState::DataSpace,
            (Some(ParseState::Matrix), tags::TRANSFORMED_SPACE) => ParseState::TransformedSpace,
            (Some(ParseState::Matrix), tags::MATRIX_DATA) => ParseState::MatrixData,
            (None, _) if self.finished => {
                return Err(GiftiError::InvalidStructure(format!(
                    "element {} after the closing GIFTI tag",
                    name
                )));
            }
            (state, _) => {
                let inside = state.map_or("the document root", ParseState::tag);
                return Err(GiftiError::InvalidStructure(format!(
                    "unexpected element {} inside {}, expected {}",
                    name,
                    inside,
                    ParseState::expected_children(state)
                )));
            }
        };
        self.states.push(next);
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), GiftiError> {
        if let Some(sub_parser) = self.sub_parser.as_mut() {
            return sub_parser.handler().characters(text);
        }
        match self.states.last() {
            Some(state) if state.holds_text() => self.text.push_str(text),
            state => {
                if !text.trim().is_empty() {
                    log::warn!(
                        "ignoring unexpected text inside {}",
                        state.map_or("the document", |s| s.tag())
                    );
                }
            }
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), GiftiError> {
        if self.sub_parser.is_some() {
            return self.end_sub_parser_element(name);
        }

        let state = self.states.pop().ok_or_else(|| {
            GiftiError::InternalConsistency(format!("</{}> with no open element", name))
        })?;
        if state.tag() != name {
            return Err(GiftiError::InvalidStructure(format!(
                "</{}> does not close <{}>",
                name,
                state.tag()
            )));
        }

        match state {
            ParseState::Data => self.decode_data()?,
            ParseState::DataSpace => {
                let space = self.text.trim().to_string();
                self.current_matrix()?.data_space = space;
            }
            ParseState::TransformedSpace => {
                let space = self.text.trim().to_string();
                self.current_matrix()?.transformed_space = space;
            }
            ParseState::MatrixData => self.parse_matrix_data()?,
            ParseState::DataArray => self.finish_data_array()?,
            ParseState::Gifti => self.finish_root(),
            ParseState::Matrix | ParseState::MetaData | ParseState::LabelTable => {}
        }
        self.text.clear();
        Ok(())
    }
}
