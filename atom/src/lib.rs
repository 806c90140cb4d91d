//! ATOM `category` elements: the typed entity, its XML mapping, and a
//! streaming extractor for whole feeds.
pub mod category;
pub mod error;
pub mod iter;
pub mod xml;

pub use self::{
    category::Category,
    error::{Error, Result},
    iter::CategoryIterator,
    xml::{XmlNode, XmlSink, XmlWriter},
};
