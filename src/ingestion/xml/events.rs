//! XML Event Source
//!
//! Flattens `quick-xml` events into the three callbacks the content-tree
//! builder understands. CDATA is delivered as characters; comments,
//! processing instructions and the declaration are dropped.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::builder::{Result, TreeBuildError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    StartElement(String),
    Characters(String),
    EndElement(String),
}

/// Pull-based event reader over an in-memory document.
pub struct XmlEventReader<'a> {
    reader: Reader<&'a [u8]>,
    finished: bool,
}

impl<'a> XmlEventReader<'a> {
    pub fn new(xml: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(xml);
        let config = reader.config_mut();
        // `<b/>` arrives as a Start/End pair, so `Event::Empty` never shows up
        config.expand_empty_elements = true;
        // Mismatched end tags are reported by the builder, which knows the schema
        config.check_end_names = false;
        config.trim_text(false);

        Self {
            reader,
            finished: false,
        }
    }

    /// Next event, or `None` once the document is exhausted.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let event = self.reader.read_event().map_err(|e| {
                TreeBuildError::Xml(format!(
                    "Error at position {}: {}",
                    self.reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => {
                    return Ok(Some(XmlEvent::StartElement(element_name(e.name().as_ref()))));
                }
                Event::End(e) => {
                    return Ok(Some(XmlEvent::EndElement(element_name(e.name().as_ref()))));
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| TreeBuildError::Xml(e.to_string()))?;
                    return Ok(Some(XmlEvent::Characters(text.into_owned())));
                }
                Event::CData(e) => {
                    return Ok(Some(XmlEvent::Characters(String::from_utf8_lossy(&e).into_owned())));
                }
                Event::Eof => {
                    self.finished = true;
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
