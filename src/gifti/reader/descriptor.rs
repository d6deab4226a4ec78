//! Builds an unpopulated [`DataArray`] from `DataArray` start-tag attributes

use std::str::FromStr;

use crate::gifti::binary::PayloadLayout;
use crate::gifti::models::DataArray;
use crate::gifti::xml_elements::{attributes, tags, MAX_DIMENSIONS};
use crate::vocabulary::{DataType, Encoding, Endian, IndexingOrder, Intent};

use super::handler::XmlAttributes;
use super::GiftiError;

/// Validated attributes of a `DataArray` element
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArrayDescriptor {
    pub(crate) intent: Intent,
    pub(crate) data_type: DataType,
    pub(crate) encoding: Encoding,
    pub(crate) endian: Endian,
    pub(crate) indexing_order: IndexingOrder,
    pub(crate) dimensions: Vec<usize>,
    pub(crate) external_file_name: Option<String>,
    pub(crate) external_file_offset: u64,
}

/// Look up a required vocabulary attribute
fn vocabulary_attribute<T: FromStr>(attrs: &XmlAttributes, name: &str) -> Result<T, GiftiError> {
    let text = attrs.require(tags::DATA_ARRAY, name)?;
    text.parse::<T>()
        .map_err(|_| GiftiError::invalid_value(name, text))
}

impl ArrayDescriptor {
    /// Check and convert the attributes of a `DataArray` start tag
    pub(crate) fn from_attributes(attrs: &XmlAttributes) -> Result<Self, GiftiError> {
        let intent = vocabulary_attribute::<Intent>(attrs, attributes::INTENT)?;
        let data_type = vocabulary_attribute::<DataType>(attrs, attributes::DATA_TYPE)?;
        let encoding = vocabulary_attribute::<Encoding>(attrs, attributes::ENCODING)?;
        let endian = vocabulary_attribute::<Endian>(attrs, attributes::ENDIAN)?;

        let text = attrs.require(tags::DATA_ARRAY, attributes::DIMENSIONALITY)?;
        let dimensionality = text
            .parse::<usize>()
            .ok()
            .filter(|d| (1..=MAX_DIMENSIONS).contains(d))
            .ok_or_else(|| GiftiError::invalid_value(attributes::DIMENSIONALITY, text))?;

        // Payload size in bytes must stay addressable
        let mut byte_len = data_type.byte_size();
        let mut dimensions = Vec::with_capacity(dimensionality);
        for i in 0..dimensionality {
            let name = attributes::dimension(i);
            let text = attrs.require(tags::DATA_ARRAY, &name)?;
            let dim = text
                .parse::<usize>()
                .ok()
                .filter(|&d| d > 0)
                .ok_or_else(|| GiftiError::invalid_value(&name, text))?;
            byte_len = byte_len
                .checked_mul(dim)
                .ok_or_else(|| GiftiError::invalid_value(&name, text))?;
            dimensions.push(dim);
        }

        let indexing_order =
            vocabulary_attribute::<IndexingOrder>(attrs, attributes::ARRAY_INDEXING_ORDER)?;

        let (external_file_name, external_file_offset) = if encoding == Encoding::ExternalFileBinary {
            let file_name = attrs.require(tags::DATA_ARRAY, attributes::EXTERNAL_FILE_NAME)?;
            let offset = match attrs.get_trimmed(attributes::EXTERNAL_FILE_OFFSET) {
                Some(text) => text
                    .parse::<u64>()
                    .map_err(|_| GiftiError::invalid_value(attributes::EXTERNAL_FILE_OFFSET, text))?,
                None => 0,
            };
            (Some(file_name.to_string()), offset)
        } else {
            (None, 0)
        };

        Ok(Self {
            intent,
            data_type,
            encoding,
            endian,
            indexing_order,
            dimensions,
            external_file_name,
            external_file_offset,
        })
    }

    /// Payload layout described by these attributes
    pub(crate) fn layout(&self) -> PayloadLayout {
        PayloadLayout {
            encoding: self.encoding,
            endian: self.endian,
            indexing_order: self.indexing_order,
        }
    }

    /// An array carrying this descriptor and no values yet
    pub(crate) fn into_data_array(self) -> DataArray {
        DataArray::unpopulated(
            self.intent,
            self.data_type,
            self.encoding,
            self.endian,
            self.indexing_order,
            self.dimensions,
            self.external_file_name,
            self.external_file_offset,
        )
    }
}
