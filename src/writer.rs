use std::io::{self, Write};
use std::str::FromStr;

use atom::{Category, XmlWriter};

/// Write one Category per line.
pub trait CategoryWriter {
    fn write<W: Write>(category: &Category, writer: &mut W) -> io::Result<()>;
}

/// `term`, `scheme` and `label`, tab-separated.
pub struct CategoryWriterTSV;
/// One JSON object per category.
pub struct CategoryWriterJSONL;
/// One `atom:category` element per category.
pub struct CategoryWriterXML;

/// Output formats selectable from settings or the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Tsv,
    Jsonl,
    Xml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(format!(
                "unsupported output format `{}`; expected tsv|jsonl|xml",
                other
            )),
        }
    }
}

/// Keep a field on one TSV cell.
fn tsv_field(value: Option<&str>) -> String {
    value.unwrap_or("").replace(|c: char| c == '\t' || c == '\n' || c == '\r', " ")
}

impl CategoryWriter for CategoryWriterTSV {
    fn write<W: Write>(category: &Category, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "{}\t{}\t{}",
            tsv_field(category.term()),
            tsv_field(category.scheme()),
            tsv_field(category.label())
        )
    }
}

impl CategoryWriter for CategoryWriterJSONL {
    fn write<W: Write>(category: &Category, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer(&mut *writer, category)?;
        writeln!(writer)
    }
}

impl CategoryWriter for CategoryWriterXML {
    fn write<W: Write>(category: &Category, writer: &mut W) -> io::Result<()> {
        let mut sink = XmlWriter::new(&mut *writer);
        category.write_xml(&mut sink)?;
        writeln!(writer)
    }
}
