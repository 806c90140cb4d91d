//! The ATOM `category` element.
//!
//! A category is modelled in two overlapping parts: the typed `term`,
//! `scheme` and `label` attributes, and `undefined_content`, the raw text of
//! whatever element the category was last parsed from. Parsing extracts the
//! attributes in addition to capturing them in the raw text; it does not
//! remove them from it.
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::xml::{XmlNode, XmlSink, XmlWriter};

/// Element name written by [`Category::write_xml`].
pub const ELEMENT_NAME: &str = "atom:category";

/// An ATOM category.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    undefined_content: String,
    /// Inner content written verbatim by `write_xml`. Never set by parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

/// Overwrite `slot` with `value` only when `value` is present and non-empty.
///
/// A blank or missing attribute never clears data already held.
pub fn merge_if_present(slot: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *slot = Some(value.to_owned());
    }
}

/// Treat empty strings as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

impl Category {
    /// Create a category with no attributes and empty undefined content.
    pub fn new() -> Self {
        Category::default()
    }

    /// Create a category holding the given undefined content.
    pub fn with_undefined_content<S: Into<String>>(undefined_content: S) -> Self {
        Category {
            undefined_content: undefined_content.into(),
            ..Category::default()
        }
    }

    /// Parse a new category from an XML fragment.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut category = Category::new();
        category.parse_xml(xml)?;
        Ok(category)
    }

    /// Update this category from an XML fragment.
    ///
    /// `term`, `scheme` and `label` are taken from the root element's
    /// attributes of the same name when non-empty, and left untouched
    /// otherwise. The element name is not checked. `undefined_content` is
    /// always replaced by the full text of the parsed element.
    ///
    /// On error the category is left unchanged.
    pub fn parse_xml(&mut self, xml: &str) -> Result<()> {
        let node = XmlNode::parse(xml)?;
        merge_if_present(&mut self.term, node.attribute("term"));
        merge_if_present(&mut self.scheme, node.attribute("scheme"));
        merge_if_present(&mut self.label, node.attribute("label"));
        self.undefined_content = node.to_string();
        Ok(())
    }

    /// Write this category as an `atom:category` element.
    pub fn write_xml<S: XmlSink>(&self, sink: &mut S) -> Result<()> {
        sink.start_element(ELEMENT_NAME)?;
        self.write_inner_xml(sink)?;
        sink.end_element()
    }

    /// Write the attributes, then the raw content, into an already opened
    /// element. Empty fields are skipped.
    pub fn write_inner_xml<S: XmlSink>(&self, sink: &mut S) -> Result<()> {
        let attributes = [
            ("term", &self.term),
            ("scheme", &self.scheme),
            ("label", &self.label),
        ];
        for (name, value) in attributes.iter() {
            if let Some(value) = non_empty(value) {
                sink.write_attribute(name, value)?;
            }
        }
        if let Some(content) = non_empty(&self.content) {
            sink.write_raw(content)?;
        }
        Ok(())
    }

    /// Serialize to a standalone `atom:category` element.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = XmlWriter::new(vec![]);
        self.write_xml(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn set_term<S: Into<Option<String>>>(&mut self, term: S) {
        self.term = term.into();
    }

    pub fn with_term(self, term: &str) -> Self {
        Category {
            term: Some(term.to_owned()),
            ..self
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn set_scheme<S: Into<Option<String>>>(&mut self, scheme: S) {
        self.scheme = scheme.into();
    }

    pub fn with_scheme(self, scheme: &str) -> Self {
        Category {
            scheme: Some(scheme.to_owned()),
            ..self
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<S: Into<Option<String>>>(&mut self, label: S) {
        self.label = label.into();
    }

    pub fn with_label(self, label: &str) -> Self {
        Category {
            label: Some(label.to_owned()),
            ..self
        }
    }

    /// Raw text of the element this category was last parsed from, or the
    /// value it was constructed with.
    pub fn undefined_content(&self) -> &str {
        &self.undefined_content
    }

    pub fn set_undefined_content<S: Into<String>>(&mut self, undefined_content: S) {
        self.undefined_content = undefined_content.into();
    }

    /// Inner content emitted unescaped by `write_xml`.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_content<S: Into<Option<String>>>(&mut self, content: S) {
        self.content = content.into();
    }
}
