//! Error types for METS parsing

use std::io;
use thiserror::Error;

/// The structural document violates a required invariant.
///
/// Every variant names the document it was raised for, so a batch log line is
/// enough to find the offending file.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The document could not be read
    #[error("I/O error reading {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML
    #[error("XML parsing error in {document}: {source}")]
    Xml {
        document: String,
        #[source]
        source: roxmltree::Error,
    },

    /// A required element is absent
    #[error("no {element} in {document}")]
    Missing { element: String, document: String },

    /// A required-unique element occurs more than once
    #[error("more than one {element} in {document}")]
    Duplicate { element: String, document: String },

    /// A required attribute is absent
    #[error("{element} {subject} in {document} has no {attribute} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        subject: String,
        document: String,
    },

    /// A text section has no `TextContent` div in the structural map
    #[error("section {section_id} in {document} doesn't have a div with text content")]
    MissingTextContent { section_id: String, document: String },

    /// Sub-type names outside the known vocabulary
    #[error("div of type {names:?} in section {section_id} of {document} not known")]
    UnknownSubTypes {
        names: Vec<String>,
        section_id: String,
        document: String,
    },

    /// A section nested two levels inside other sections
    #[error("unsupported double nesting in section {section_id}, {document}")]
    DoubleNesting { section_id: String, document: String },
}

/// Result type for METS operations
pub type Result<T> = std::result::Result<T, StructureError>;
