use std::ffi::OsString;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;

use crate::gifti::binary::{PayloadCodec, PayloadLayout};
use crate::gifti::external::ExternalBinaryWriter;
use crate::gifti::models::{CoordinateTransform, DataArray, GiftiFile, LabelTable, MetaData};
use crate::gifti::xml_elements::{attributes, tags, GIFTI_DTD_URL};
use crate::vocabulary::{Encoding, Vocabulary};

use super::{WriteStats, WriterConfig, WriterError};

/// Companion file being filled while the document is written
struct ExternalTarget<'a> {
    writer: &'a mut ExternalBinaryWriter,
    /// Name recorded in `ExternalFileName`, relative to the document
    file_name: String,
}

/// Serializes a [`GiftiFile`] to GIFTI XML
#[derive(Debug, Clone, Default)]
pub struct GiftiWriter {
    config: WriterConfig,
}

impl GiftiWriter {
    /// Create a writer with the given configuration
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write `file` to `path`
    ///
    /// The document (and the companion file, when an array is written as
    /// `ExternalFileBinary`) is first written to a temporary file in the
    /// destination directory and renamed into place once complete. The
    /// companion is renamed first, so a document is never published
    /// before the data it points at.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        file: &GiftiFile,
        path: P,
    ) -> Result<WriteStats, WriterError> {
        let path = path.as_ref();
        file.validate()?;

        let file_name = path.file_name().ok_or_else(|| {
            WriterError::InvalidData(format!("{} is not a file path", path.display()))
        })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let needs_external = file
            .data_arrays()
            .iter()
            .any(|a| self.config.layout_for(a).encoding == Encoding::ExternalFileBinary);
        let mut external = if needs_external {
            let mut companion = OsString::from(file_name);
            companion.push(&self.config.external_file_suffix);
            Some(ExternalBinaryWriter::create(dir.join(&companion))?)
        } else {
            None
        };

        let temp = NamedTempFile::new_in(&dir)?;
        let mut out = BufWriter::new(temp);
        let mut stats = {
            let target = external.as_mut().map(|writer| ExternalTarget {
                file_name: writer
                    .target()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                writer,
            });
            self.write_document(file, &mut out, target)?
        };
        let temp = out.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        stats.document_bytes = temp.as_file().metadata()?.len();

        // Both files are synced before either is renamed; the companion is
        // removed again if the document rename fails.
        match external {
            Some(mut writer) => {
                writer.sync()?;
                stats.external_bytes = writer.bytes_written();
                let companion = writer.persist()?;
                if let Err(e) = temp.persist(path) {
                    if let Err(remove_error) = std::fs::remove_file(&companion) {
                        log::warn!(
                            "could not remove {} after a failed write: {}",
                            companion.display(),
                            remove_error
                        );
                    }
                    return Err(e.error.into());
                }
                stats.external_file = Some(companion);
            }
            None => {
                temp.persist(path).map_err(|e| e.error)?;
            }
        }

        log::info!("{} to {}", stats, path.display());
        Ok(stats)
    }

    /// Serialize `file` into a string
    ///
    /// Arrays configured for `ExternalFileBinary` cannot be written this
    /// way; use [`GiftiWriter::write_file`].
    pub fn write_to_string(&self, file: &GiftiFile) -> Result<String, WriterError> {
        file.validate()?;
        let mut buffer = Vec::new();
        let stats = self.write_document(file, &mut buffer, None)?;
        log::debug!("{}", stats);
        String::from_utf8(buffer).map_err(|e| WriterError::InvalidData(e.to_string()))
    }

    fn write_document<W: Write>(
        &self,
        file: &GiftiFile,
        out: W,
        mut external: Option<ExternalTarget<'_>>,
    ) -> Result<WriteStats, WriterError> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::DocType(BytesText::from_escaped(format!(
            "{} SYSTEM \"{}\"",
            tags::GIFTI,
            GIFTI_DTD_URL
        ))))?;

        let version = format!("{:.1}", file.version());
        let count = file.number_of_data_arrays().to_string();
        let mut root = BytesStart::new(tags::GIFTI);
        root.push_attribute((attributes::VERSION, version.as_str()));
        root.push_attribute((attributes::NUMBER_OF_DATA_ARRAYS, count.as_str()));
        writer.write_event(Event::Start(root))?;

        write_metadata(&mut writer, file.metadata())?;
        if let Some(table) = file.label_table() {
            write_label_table(&mut writer, table)?;
        }
        for (index, array) in file.data_arrays().iter().enumerate() {
            self.write_data_array(&mut writer, index, array, external.as_mut())?;
        }

        writer.write_event(Event::End(BytesEnd::new(tags::GIFTI)))?;
        writer.get_mut().flush()?;

        Ok(WriteStats {
            data_arrays_written: file.number_of_data_arrays(),
            ..WriteStats::default()
        })
    }

    fn write_data_array<W: Write>(
        &self,
        writer: &mut Writer<W>,
        index: usize,
        array: &DataArray,
        external: Option<&mut ExternalTarget<'_>>,
    ) -> Result<(), WriterError> {
        let layout = self.config.layout_for(array);
        let payload_error = |source| WriterError::Payload {
            array_index: index,
            source,
        };

        let (payload, external_name, external_offset) = match layout.encoding {
            Encoding::ExternalFileBinary => {
                let target = external.ok_or_else(|| {
                    WriterError::InvalidData(format!(
                        "DataArray {} uses ExternalFileBinary, which needs a file destination",
                        index
                    ))
                })?;
                let bytes = PayloadCodec::encode_binary(array.values(), array.dimensions(), &layout)
                    .map_err(payload_error)?;
                let offset = target.writer.append(&bytes)?;
                (None, target.file_name.clone(), offset.to_string())
            }
            _ => {
                let text = PayloadCodec::encode_inline(
                    array.values(),
                    array.dimensions(),
                    &layout,
                    self.config.compression_level,
                )
                .map_err(payload_error)?;
                (Some(text), String::new(), String::new())
            }
        };

        let start = data_array_start(array, &layout, &external_name, &external_offset);
        writer.write_event(Event::Start(start))?;
        write_metadata(writer, array.metadata())?;
        for matrix in array.matrices() {
            write_matrix(writer, matrix)?;
        }
        match payload {
            Some(text) => write_text_element(writer, tags::DATA, &text)?,
            None => writer.write_event(Event::Empty(BytesStart::new(tags::DATA)))?,
        }
        writer.write_event(Event::End(BytesEnd::new(tags::DATA_ARRAY)))?;
        Ok(())
    }
}

fn data_array_start<'a>(
    array: &DataArray,
    layout: &PayloadLayout,
    external_name: &str,
    external_offset: &str,
) -> BytesStart<'a> {
    let mut start = BytesStart::new(tags::DATA_ARRAY);
    start.push_attribute((attributes::INTENT, array.intent().name()));
    start.push_attribute((attributes::DATA_TYPE, array.data_type().name()));
    start.push_attribute((
        attributes::ARRAY_INDEXING_ORDER,
        layout.indexing_order.name(),
    ));
    let dimensionality = array.dimensionality().to_string();
    start.push_attribute((attributes::DIMENSIONALITY, dimensionality.as_str()));
    for (i, dim) in array.dimensions().iter().enumerate() {
        let name = attributes::dimension(i);
        let value = dim.to_string();
        start.push_attribute((name.as_str(), value.as_str()));
    }
    start.push_attribute((attributes::ENCODING, layout.encoding.name()));
    start.push_attribute((attributes::ENDIAN, layout.endian.name()));
    start.push_attribute((attributes::EXTERNAL_FILE_NAME, external_name));
    start.push_attribute((attributes::EXTERNAL_FILE_OFFSET, external_offset));
    start
}

/// `<tag>text</tag>` with the text as CDATA where possible
fn write_cdata_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), WriterError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), WriterError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_metadata<W: Write>(writer: &mut Writer<W>, metadata: &MetaData) -> Result<(), WriterError> {
    if metadata.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tags::META_DATA)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(tags::META_DATA)))?;
    for (name, value) in metadata.iter() {
        writer.write_event(Event::Start(BytesStart::new(tags::MD)))?;
        write_cdata_element(writer, tags::NAME, name)?;
        write_cdata_element(writer, tags::VALUE, value)?;
        writer.write_event(Event::End(BytesEnd::new(tags::MD)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tags::META_DATA)))?;
    Ok(())
}

fn write_label_table<W: Write>(
    writer: &mut Writer<W>,
    table: &LabelTable,
) -> Result<(), WriterError> {
    writer.write_event(Event::Start(BytesStart::new(tags::LABEL_TABLE)))?;
    for label in table.iter() {
        let key = label.key.to_string();
        let colours = label.rgba().map(|c| c.to_string());
        let mut start = BytesStart::new(tags::LABEL);
        start.push_attribute((attributes::KEY, key.as_str()));
        for (name, value) in [
            attributes::RED,
            attributes::GREEN,
            attributes::BLUE,
            attributes::ALPHA,
        ]
        .into_iter()
        .zip(&colours)
        {
            start.push_attribute((name, value.as_str()));
        }
        writer.write_event(Event::Start(start))?;
        if label.name.contains("]]>") {
            writer.write_event(Event::Text(BytesText::new(&label.name)))?;
        } else {
            writer.write_event(Event::CData(BytesCData::new(label.name.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(tags::LABEL)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tags::LABEL_TABLE)))?;
    Ok(())
}

fn write_matrix<W: Write>(
    writer: &mut Writer<W>,
    matrix: &CoordinateTransform,
) -> Result<(), WriterError> {
    writer.write_event(Event::Start(BytesStart::new(tags::COORDINATE_TRANSFORM_MATRIX)))?;
    write_cdata_element(writer, tags::DATA_SPACE, &matrix.data_space)?;
    write_cdata_element(writer, tags::TRANSFORMED_SPACE, &matrix.transformed_space)?;
    let rows: Vec<String> = matrix
        .matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    write_text_element(writer, tags::MATRIX_DATA, &rows.join("\n"))?;
    writer.write_event(Event::End(BytesEnd::new(tags::COORDINATE_TRANSFORM_MATRIX)))?;
    Ok(())
}
