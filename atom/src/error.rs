use std::io;
use std::str::Utf8Error;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Failures surfaced by the XML capabilities.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not a well-formed XML element.
    #[error("malformed XML: {0}")]
    Parse(String),
    /// The underlying sink rejected a write, or was driven out of order.
    #[error("failed to write XML: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<AttrError> for Error {
    fn from(err: AttrError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Write(err.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Parse(_) => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::Write(_) => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}
