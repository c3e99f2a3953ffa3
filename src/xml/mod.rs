//! XML codec for the Route53 REST API.
//!
//! Request and response documents are described as serde shapes in
//! [`shapes`] and (de)serialized with quick-xml. The functions in
//! [`request`] and [`response`] convert between those documents and the
//! [`crate::model`] types, validating enumerated values on the way in.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub mod request;
pub mod response;
pub(crate) mod shapes;

pub use request::*;
pub use response::*;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Errors raised while reading or writing Route53 XML documents.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The document is not well-formed or does not match the expected shape.
    #[error("malformed XML document: {0}")]
    Deserialize(#[from] quick_xml::de::DeError),

    /// A document could not be written.
    #[error("failed to write XML document: {0}")]
    Serialize(#[from] quick_xml::se::SeError),

    /// The low-level reader failed.
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// The root element is not the one the operation expects.
    #[error("expected <{expected}> document, found <{found}>")]
    UnexpectedRoot {
        /// Expected root element name.
        expected: &'static str,
        /// Root element actually found.
        found: String,
    },

    /// A required element is missing or empty.
    #[error("missing required element <{0}>")]
    MissingElement(&'static str),

    /// An element holds a value outside its allowed set.
    #[error("invalid value {value:?} for <{element}>")]
    InvalidValue {
        /// Element name.
        element: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Returns the local name of the document's root element.
pub fn root_element_name(xml: &str) -> Result<Option<String>, XmlError> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = e.local_name();
                return Ok(Some(String::from_utf8_lossy(name.as_ref()).into_owned()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Checks that the document's root element is `expected`.
pub fn expect_root(xml: &str, expected: &'static str) -> Result<(), XmlError> {
    match root_element_name(xml)? {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(XmlError::UnexpectedRoot { expected, found }),
        None => Err(XmlError::UnexpectedRoot {
            expected,
            found: String::new(),
        }),
    }
}

/// Serializes a document shape under the given root element, prefixed with
/// the XML declaration.
pub(crate) fn to_document<T: Serialize>(root: &str, doc: &T) -> Result<String, XmlError> {
    let body = quick_xml::se::to_string_with_root(root, doc)?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Deserializes a document shape after checking its root element.
pub(crate) fn from_document<T: DeserializeOwned>(
    xml: &str,
    root: &'static str,
) -> Result<T, XmlError> {
    expect_root(xml, root)?;
    Ok(quick_xml::de::from_str(xml)?)
}

/// Trims a value and maps empty strings to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Returns a required, non-empty element value.
pub(crate) fn required<'a>(value: &'a str, element: &'static str) -> Result<&'a str, XmlError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(XmlError::MissingElement(element))
    } else {
        Ok(trimmed)
    }
}
