//! Streaming GIFTI reader using quick-xml
//!
//! The tokenizer loop in [`drive_events`] turns quick-xml pull events into
//! [`SaxHandler`] calls. [`GiftiFileSaxReader`] consumes them and assembles
//! a [`GiftiFile`], delegating `MetaData` and `LabelTable` blocks to their
//! sub-parsers.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::gifti::models::GiftiFile;

pub use crate::gifti::error::GiftiError;
pub use file_sax::GiftiFileSaxReader;
pub use handler::{SaxHandler, XmlAttributes};
pub use label_table::LabelTableSaxReader;
pub use metadata::MetaDataSaxReader;

mod descriptor;
mod file_sax;
mod handler;
mod label_table;
mod metadata;


/// Reads one GIFTI document from a `BufRead` source
pub struct GiftiReader<R: BufRead> {
    reader: Reader<R>,
    base_dir: PathBuf,
}

impl<R: BufRead> GiftiReader<R> {
    /// Create a reader; external payloads resolve against the working directory
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        Self {
            reader: xml_reader,
            base_dir: PathBuf::from("."),
        }
    }

    /// Directory `ExternalFileName` paths are relative to
    pub fn with_base_dir<P: AsRef<Path>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    /// Parse the whole document
    pub fn read(mut self) -> Result<GiftiFile, GiftiError> {
        let mut handler = GiftiFileSaxReader::new(&self.base_dir);
        drive_events(&mut self.reader, &mut handler)?;
        let file = handler.finish()?;
        log::debug!("read GIFTI file with {} data arrays", file.number_of_data_arrays());
        Ok(file)
    }
}

/// Pull every event from `reader` and dispatch it to `handler`
///
/// Empty elements are reported as a start followed by an end, and CDATA
/// sections as character data. Declarations, comments, processing
/// instructions and DOCTYPE are skipped.
pub fn drive_events<R: BufRead, H: SaxHandler + ?Sized>(
    reader: &mut Reader<R>,
    handler: &mut H,
) -> Result<(), GiftiError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())?;
                let attributes = XmlAttributes::from_start(&e)?;
                handler.start_element(name, &attributes)?;
            }
            Event::Empty(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())?;
                let attributes = XmlAttributes::from_start(&e)?;
                handler.start_element(name, &attributes)?;
                handler.end_element(name)?;
            }
            Event::End(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())?;
                handler.end_element(name)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                handler.characters(&text)?;
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c)?;
                handler.characters(text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
