use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use serde::Serialize;

use crate::gifti::error::GiftiError;
use crate::gifti::reader::GiftiReader;
use crate::gifti::writer::{GiftiWriter, WriteStats, WriterError};
use crate::gifti::xml_elements::GIFTI_SUPPORTED_VERSION;
use crate::vocabulary::{Intent, Vocabulary};

use super::data_array::DataArray;
use super::label_table::LabelTable;
use super::metadata::MetaData;

/// An in-memory GIFTI file
#[derive(Debug, Clone, PartialEq)]
pub struct GiftiFile {
    version: f32,
    metadata: MetaData,
    label_table: Option<LabelTable>,
    data_arrays: Vec<DataArray>,
}

impl Default for GiftiFile {
    fn default() -> Self {
        Self {
            version: GIFTI_SUPPORTED_VERSION,
            metadata: MetaData::new(),
            label_table: None,
            data_arrays: Vec::new(),
        }
    }
}

impl GiftiFile {
    /// Create an empty file at the current format version
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `.gii` file; external payloads resolve relative to its directory
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, GiftiError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        GiftiReader::new(BufReader::new(file))
            .with_base_dir(base_dir)
            .read()
    }

    /// Parse a document held in memory; external payloads resolve against the working directory
    pub fn parse_str(xml: &str) -> Result<Self, GiftiError> {
        GiftiReader::new(Cursor::new(xml.as_bytes())).read()
    }

    /// Write to `path` with the default writer configuration
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<WriteStats, WriterError> {
        GiftiWriter::default().write_file(self, path)
    }

    /// Format version
    pub fn version(&self) -> f32 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: f32) {
        self.version = version;
    }

    /// File-level metadata
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Mutable file-level metadata
    pub fn metadata_mut(&mut self) -> &mut MetaData {
        &mut self.metadata
    }

    /// Label table, if present
    pub fn label_table(&self) -> Option<&LabelTable> {
        self.label_table.as_ref()
    }

    /// Mutable label table, if present
    pub fn label_table_mut(&mut self) -> Option<&mut LabelTable> {
        self.label_table.as_mut()
    }

    /// Replace or remove the label table
    pub fn set_label_table(&mut self, label_table: Option<LabelTable>) {
        self.label_table = label_table;
    }

    /// All arrays in document order
    pub fn data_arrays(&self) -> &[DataArray] {
        &self.data_arrays
    }

    /// Array at `index`
    pub fn data_array(&self, index: usize) -> Option<&DataArray> {
        self.data_arrays.get(index)
    }

    /// Mutable array at `index`
    pub fn data_array_mut(&mut self, index: usize) -> Option<&mut DataArray> {
        self.data_arrays.get_mut(index)
    }

    /// Number of arrays
    pub fn number_of_data_arrays(&self) -> usize {
        self.data_arrays.len()
    }

    /// Arrays with the given intent
    pub fn data_arrays_with_intent(&self, intent: Intent) -> impl Iterator<Item = &DataArray> {
        self.data_arrays.iter().filter(move |a| a.intent() == intent)
    }

    /// Append an array
    pub fn add_data_array(&mut self, array: DataArray) {
        self.data_arrays.push(array);
    }

    /// Replace the array at `index`, returning the old one
    pub fn replace_data_array(
        &mut self,
        index: usize,
        array: DataArray,
    ) -> Result<DataArray, GiftiError> {
        let count = self.data_arrays.len();
        let slot = self.data_arrays.get_mut(index).ok_or_else(|| {
            GiftiError::FormatError(format!(
                "cannot replace DataArray {}: file has {} arrays",
                index, count
            ))
        })?;
        Ok(std::mem::replace(slot, array))
    }

    /// Remove and return the array at `index`
    pub fn remove_data_array(&mut self, index: usize) -> Option<DataArray> {
        (index < self.data_arrays.len()).then(|| self.data_arrays.remove(index))
    }

    /// Check every array's invariants and the label colours
    pub fn validate(&self) -> Result<(), GiftiError> {
        for (index, array) in self.data_arrays.iter().enumerate() {
            array.validate().map_err(|e| {
                GiftiError::FormatError(format!("DataArray {}: {}", index, e))
            })?;
        }
        if let Some(table) = &self.label_table {
            if let Some(label) = table.iter().find(|l| !l.has_valid_color()) {
                return Err(GiftiError::FormatError(format!(
                    "label {} ({}) has a colour component outside [0, 1]",
                    label.key, label.name
                )));
            }
        }
        Ok(())
    }

    /// Compact description of the file contents
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            version: self.version,
            metadata: self
                .metadata
                .iter()
                .map(|(key, value)| MetaDataEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            label_count: self.label_table.as_ref().map_or(0, |t| t.len()),
            data_arrays: self
                .data_arrays
                .iter()
                .enumerate()
                .map(|(index, array)| DataArraySummary::new(index, array))
                .collect(),
        }
    }
}

/// Serializable overview of a [`GiftiFile`]
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// Format version
    pub version: f32,
    /// File-level metadata
    pub metadata: Vec<MetaDataEntry>,
    /// Number of labels in the label table
    pub label_count: usize,
    /// One entry per array
    pub data_arrays: Vec<DataArraySummary>,
}

/// A single metadata entry
#[derive(Debug, Clone, Serialize)]
pub struct MetaDataEntry {
    /// Key
    pub key: String,
    /// Value
    pub value: String,
}

/// Serializable overview of one [`DataArray`]
#[derive(Debug, Clone, Serialize)]
pub struct DataArraySummary {
    /// Position in the file
    pub index: usize,
    /// Intent name
    pub intent: String,
    /// Datatype name
    pub data_type: String,
    /// Encoding name
    pub encoding: String,
    /// Endian name
    pub endian: String,
    /// Indexing order name
    pub indexing_order: String,
    /// Shape
    pub dimensions: Vec<usize>,
    /// Number of coordinate transforms
    pub matrix_count: usize,
    /// Number of array metadata entries
    pub metadata_count: usize,
    /// Smallest value (NaN ignored)
    pub min: Option<f64>,
    /// Largest value (NaN ignored)
    pub max: Option<f64>,
}

impl DataArraySummary {
    fn new(index: usize, array: &DataArray) -> Self {
        let values = array.values().to_f64_vec();
        let finite = values.iter().copied().filter(|v| !v.is_nan());
        let min = finite.clone().reduce(f64::min);
        let max = finite.reduce(f64::max);
        Self {
            index,
            intent: array.intent().name().to_string(),
            data_type: array.data_type().name().to_string(),
            encoding: array.encoding().name().to_string(),
            endian: array.endian().name().to_string(),
            indexing_order: array.indexing_order().name().to_string(),
            dimensions: array.dimensions().to_vec(),
            matrix_count: array.matrices().len(),
            metadata_count: array.metadata().len(),
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gifti::models::Label;

    fn sample_file() -> GiftiFile {
        let mut file = GiftiFile::new();
        file.add_data_array(
            DataArray::new(Intent::Shape, vec![3.0f32, -1.0, 2.0], vec![3]).unwrap(),
        );
        file.add_data_array(DataArray::new(Intent::Label, vec![0i32, 1, 1], vec![3]).unwrap());
        file
    }

    #[test]
    fn test_array_management() {
        let mut file = sample_file();
        assert_eq!(file.number_of_data_arrays(), 2);
        assert_eq!(file.data_arrays_with_intent(Intent::Label).count(), 1);

        let replacement = DataArray::new(Intent::Shape, vec![9.0f32], vec![1]).unwrap();
        let old = file.replace_data_array(0, replacement).unwrap();
        assert_eq!(old.element_count(), 3);
        assert_eq!(file.data_array(0).map(|a| a.element_count()), Some(1));

        let extra = DataArray::new(Intent::Shape, vec![1.0f32], vec![1]).unwrap();
        assert!(file.replace_data_array(5, extra).is_err());

        assert!(file.remove_data_array(1).is_some());
        assert!(file.remove_data_array(1).is_none());
    }

    #[test]
    fn test_summary() {
        let mut file = sample_file();
        file.metadata_mut().set("Name", "demo");
        let summary = file.summary();
        assert_eq!(summary.data_arrays.len(), 2);
        assert_eq!(summary.data_arrays[0].intent, "NIFTI_INTENT_SHAPE");
        assert_eq!(summary.data_arrays[0].min, Some(-1.0));
        assert_eq!(summary.data_arrays[0].max, Some(3.0));
        assert_eq!(summary.metadata[0].value, "demo");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"data_type\":\"NIFTI_TYPE_INT32\""));
    }

    #[test]
    fn test_validate_rejects_bad_label_colour() {
        let mut file = sample_file();
        assert!(file.validate().is_ok());
        let table = [Label::new(0, "bad").with_color(2.0, 0.0, 0.0, 1.0)]
            .into_iter()
            .collect();
        file.set_label_table(Some(table));
        assert!(file.validate().is_err());
    }
}
