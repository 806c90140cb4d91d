//! XML capabilities used by the ATOM entities.
//!
//! Parsing turns a fragment into an attribute-bearing [`XmlNode`] that also
//! keeps the exact source text of the element. Writing goes through the
//! [`XmlSink`] trait, implemented over `quick_xml::Writer` by [`XmlWriter`].
use std::fmt;
use std::io::Write;
use std::str;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

/// A single parsed element: its name, attributes and full source text.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    raw: String,
}

impl XmlNode {
    /// Parse a fragment holding exactly one root element.
    ///
    /// Declarations, comments, processing instructions and whitespace may
    /// surround the root; anything else outside it is an error. A leading
    /// byte order mark is skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = Reader::from_str(text);
        let mut root: Option<(String, Vec<(String, String)>, usize)> = None;
        let mut end = None;
        let mut depth = 0usize;
        loop {
            let offset = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(ref tag) => {
                    if depth == 0 {
                        if root.is_some() {
                            return Err(Error::Parse("more than one root element".to_owned()));
                        }
                        root = Some(XmlNode::open(tag, offset)?);
                    } else {
                        decode_attributes(tag)?;
                    }
                    depth += 1;
                }
                Event::Empty(ref tag) => {
                    if depth == 0 {
                        if root.is_some() {
                            return Err(Error::Parse("more than one root element".to_owned()));
                        }
                        root = Some(XmlNode::open(tag, offset)?);
                        end = Some(reader.buffer_position());
                    } else {
                        decode_attributes(tag)?;
                    }
                }
                Event::End(ref tag) => {
                    depth = match depth.checked_sub(1) {
                        Some(depth) => depth,
                        None => {
                            return Err(Error::Parse(format!(
                                "unexpected closing tag `{}`",
                                String::from_utf8_lossy(tag.name().as_ref())
                            )))
                        }
                    };
                    if depth == 0 {
                        end = Some(reader.buffer_position());
                    }
                }
                Event::Text(ref text) => {
                    let text = text.unescape()?;
                    if depth == 0 && !text.trim().is_empty() {
                        return Err(Error::Parse("text outside of the root element".to_owned()));
                    }
                }
                Event::CData(_) if depth == 0 => {
                    return Err(Error::Parse("CDATA outside of the root element".to_owned()));
                }
                Event::Eof => break,
                _ => (),
            }
        }
        match (root, end) {
            (Some((name, attributes, start)), Some(end)) => Ok(XmlNode {
                name,
                attributes,
                raw: text[start..end].to_owned(),
            }),
            (Some((name, ..)), None) => Err(Error::Parse(format!("unclosed element `{}`", name))),
            (None, _) => Err(Error::Parse("no element found".to_owned())),
        }
    }

    /// Decode the name and attributes of the root start tag.
    fn open(tag: &BytesStart, offset: usize) -> Result<(String, Vec<(String, String)>, usize)> {
        let name = str::from_utf8(tag.name().as_ref())?.to_owned();
        Ok((name, decode_attributes(tag)?, offset))
    }

    /// Qualified element name, as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute name/value pairs in source order, values unescaped.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The element's exact source text, from `<` to the end of its closing tag.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Decode attribute name/value pairs, rejecting a raw `<` in any value.
fn decode_attributes(tag: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = vec![];
    for attr in tag.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?.to_owned();
        if attr.value.contains(&b'<') {
            return Err(Error::Parse(format!("`<` in value of attribute `{}`", key)));
        }
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Streaming element writer.
pub trait XmlSink {
    /// Open a new element; attributes may follow until content or `end_element`.
    fn start_element(&mut self, name: &str) -> Result<()>;
    /// Add an attribute to the element opened last.
    fn write_attribute(&mut self, name: &str, value: &str) -> Result<()>;
    /// Write text verbatim, without escaping.
    fn write_raw(&mut self, text: &str) -> Result<()>;
    /// Close the element opened last.
    fn end_element(&mut self) -> Result<()>;
}

/// `XmlSink` over any `io::Write`.
///
/// Elements closed without content are written self-closing.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
    pending: Option<BytesStart<'static>>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        XmlWriter {
            writer: Writer::new(inner),
            open: vec![],
            pending: None,
        }
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn emit(&mut self, event: Event) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|err| Error::Write(err.to_string()))
    }

    /// Write out a start tag still waiting for attributes.
    fn flush_pending(&mut self) -> Result<()> {
        match self.pending.take() {
            Some(tag) => self.emit(Event::Start(tag)),
            None => Ok(()),
        }
    }
}

impl<W: Write> XmlSink for XmlWriter<W> {
    fn start_element(&mut self, name: &str) -> Result<()> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_owned()));
        self.open.push(name.to_owned());
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        match self.pending.as_mut() {
            Some(tag) => {
                tag.push_attribute((name, value));
                Ok(())
            }
            None => Err(Error::Write(format!(
                "attribute `{}` written outside of a start tag",
                name
            ))),
        }
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.flush_pending()?;
        self.emit(Event::Text(BytesText::from_escaped(text)))
    }

    fn end_element(&mut self) -> Result<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| Error::Write("no open element to end".to_owned()))?;
        match self.pending.take() {
            Some(tag) => self.emit(Event::Empty(tag)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io;

    fn written<F: FnOnce(&mut XmlWriter<Vec<u8>>) -> Result<()>>(f: F) -> String {
        let mut writer = XmlWriter::new(vec![]);
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_parse_reads_name_and_attributes() {
        let node = XmlNode::parse(r#"<atom:category term="a&amp;b" scheme="s"/>"#).unwrap();
        assert_eq!(node.name(), "atom:category");
        assert_eq!(node.attribute("term"), Some("a&b"));
        assert_eq!(node.attribute("scheme"), Some("s"));
        assert_eq!(node.attribute("label"), None);
        assert_eq!(node.attributes().len(), 2);
    }

    #[test]
    fn test_parse_keeps_exact_element_text() {
        let xml = "<?xml version=\"1.0\"?>\n  <category term='t'>inner <b>bold</b></category>\n";
        let node = XmlNode::parse(xml).unwrap();
        assert_eq!(
            node.as_str(),
            "<category term='t'>inner <b>bold</b></category>"
        );
        assert_eq!(node.to_string(), node.as_str());

        let node = XmlNode::parse("\u{feff}<category term='t'/>").unwrap();
        assert_eq!(node.as_str(), "<category term='t'/>");
        assert_eq!(node.attribute("term"), Some("t"));

        let node = XmlNode::parse("\u{feff}<x€ term='t'></x€>").unwrap();
        assert_eq!(node.name(), "x€");
        assert_eq!(node.as_str(), "<x€ term='t'></x€>");
    }

    #[test]
    fn test_parse_accepts_escaped_text_and_attributes() {
        let node = XmlNode::parse(r#"<category term="a&lt;b">x &amp; y &#169;</category>"#).unwrap();
        assert_eq!(node.attribute("term"), Some("a<b"));
    }

    #[test]
    fn test_parse_allows_comments_around_root() {
        let node = XmlNode::parse("<!-- a --><category/><!-- b -->").unwrap();
        assert_eq!(node.as_str(), "<category/>");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for xml in &[
            "",
            "   ",
            "not xml",
            "<category>",
            "<category></label>",
            "<category/><category/>",
            "<category/>trailing",
            r#"<category term="a" term="b"/>"#,
            "<category term=unquoted/>",
            "</category>",
            r#"<category term="t">&nbsp;</category>"#,
            r#"<category term="t">a & b</category>"#,
            r#"<category term="a<b"/>"#,
            r#"<feed><category term="a<b"/></feed>"#,
        ] {
            match XmlNode::parse(xml) {
                Err(Error::Parse(_)) => (),
                other => panic!("{:?} parsed as {:?}", xml, other),
            }
        }
    }

    #[test]
    fn test_writer_self_closes_empty_elements() {
        let out = written(|w| {
            w.start_element("atom:category")?;
            w.write_attribute("label", "x")?;
            w.end_element()
        });
        assert_eq!(out, r#"<atom:category label="x"/>"#);
    }

    #[test]
    fn test_writer_escapes_attributes_but_not_raw_text() {
        let out = written(|w| {
            w.start_element("c")?;
            w.write_attribute("term", "a<b & \"c\"")?;
            w.write_raw("<raw/>&amp;")?;
            w.end_element()
        });
        assert_eq!(
            out,
            r#"<c term="a&lt;b &amp; &quot;c&quot;"><raw/>&amp;</c>"#
        );
    }

    #[test]
    fn test_writer_nests_elements() {
        let out = written(|w| {
            w.start_element("feed")?;
            w.start_element("entry")?;
            w.end_element()?;
            w.end_element()
        });
        assert_eq!(out, "<feed><entry/></feed>");
    }

    #[test]
    fn test_writer_rejects_misuse() {
        let mut writer = XmlWriter::new(vec![]);
        assert!(writer.write_attribute("term", "t").is_err());
        assert!(writer.end_element().is_err());
        writer.start_element("c").unwrap();
        writer.write_raw("x").unwrap();
        assert!(writer.write_attribute("term", "t").is_err());
    }

    struct ClosedSink;

    impl io::Write for ClosedSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_surfaces_sink_failure() {
        let mut writer = XmlWriter::new(ClosedSink);
        writer.start_element("c").unwrap();
        match writer.end_element() {
            Err(Error::Write(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
