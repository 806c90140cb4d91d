use std::io::BufRead;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::category::Category;
use crate::error::{Error, Result};

/// Iterator yielding every `category` element of an ATOM document.
///
/// Elements are matched on local name, so both `<category>` and
/// `<atom:category>` are picked up. A category nested in another category is
/// captured as part of the outer one.
pub struct CategoryIterator<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    element_buf: Vec<u8>,
    done: bool,
}

fn is_category(tag: &BytesStart) -> bool {
    tag.local_name().as_ref() == b"category"
}

impl<R: BufRead> CategoryIterator<R> {
    /// Create a new iterator from an XML source.
    pub fn new(xml_stream: R) -> Self {
        CategoryIterator {
            reader: Reader::from_reader(xml_stream),
            buf: vec![],
            element_buf: vec![],
            done: false,
        }
    }

    /// Echo a category element back to text, from its start tag up to the
    /// matching end tag.
    fn capture(&mut self, start: BytesStart<'static>) -> Result<String> {
        let mut echo = Writer::new(vec![]);
        echo.write_event(Event::Start(start))?;
        let mut depth = 1usize;
        while depth > 0 {
            self.element_buf.clear();
            let event = self.reader.read_event_into(&mut self.element_buf)?;
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(Error::Parse("unclosed category element".to_owned())),
                _ => (),
            }
            echo.write_event(event)?;
        }
        String::from_utf8(echo.into_inner()).map_err(|err| Error::Parse(err.to_string()))
    }

    fn echo_empty(start: BytesStart<'static>) -> Result<String> {
        let mut echo = Writer::new(vec![]);
        echo.write_event(Event::Empty(start))?;
        String::from_utf8(echo.into_inner()).map_err(|err| Error::Parse(err.to_string()))
    }
}

impl<R: BufRead> Iterator for CategoryIterator<R> {
    type Item = Result<Category>;

    fn next(&mut self) -> Option<Self::Item> {
        enum Tag {
            Open(BytesStart<'static>),
            Empty(BytesStart<'static>),
            Failed(Error),
            Eof,
            None,
        }
        if self.done {
            return None;
        }
        loop {
            self.buf.clear();
            let action = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(ref tag)) if is_category(tag) => Tag::Open(tag.clone().into_owned()),
                Ok(Event::Empty(ref tag)) if is_category(tag) => Tag::Empty(tag.clone().into_owned()),
                Ok(Event::Eof) => Tag::Eof,
                Ok(_) => Tag::None,
                Err(err) => Tag::Failed(err.into()),
            };
            let raw = match action {
                Tag::Open(start) => self.capture(start),
                Tag::Empty(start) => CategoryIterator::<R>::echo_empty(start),
                Tag::Failed(err) => Err(err),
                Tag::Eof => {
                    self.done = true;
                    return None;
                }
                Tag::None => continue,
            };
            let category = raw.and_then(|raw| {
                debug!("Captured category element {}", raw);
                Category::from_xml(&raw)
            });
            if let Err(ref err) = category {
                warn!(
                    "Stopping at byte {}: {}",
                    self.reader.buffer_position(),
                    err
                );
                self.done = true;
            }
            return Some(category);
        }
    }
}
