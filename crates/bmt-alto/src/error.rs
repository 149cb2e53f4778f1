//! Error types for ALTO lookup and text extraction

use std::io;
use thiserror::Error;

/// An OCR document or a location inside it could not be resolved
/// unambiguously.
#[derive(Debug, Error)]
pub enum ContentError {
    /// I/O error (unreadable file or directory)
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// XML parsing error
    #[error("XML parsing error in {document}: {source}")]
    Xml {
        document: String,
        #[source]
        source: quick_xml::Error,
    },

    /// The file id carries no usable numeric part
    #[error("no numeric id in file id {target_file}")]
    NoNumericId { target_file: String },

    /// No file in the directory carries the file id
    #[error("file for {target_file} not found in {directory}")]
    FileNotFound {
        target_file: String,
        directory: String,
    },

    /// More than one file in the directory carries the file id
    #[error("multiple files for {target_file} found: {candidates:?}")]
    AmbiguousFile {
        target_file: String,
        candidates: Vec<String>,
    },

    /// No text block with the requested id
    #[error("no TextBlock for {location_id} in {document}")]
    MissingBlock {
        location_id: String,
        document: String,
    },

    /// More than one text block with the requested id
    #[error("more than one TextBlock for {location_id} in {document} ({count} found)")]
    DuplicateBlock {
        location_id: String,
        document: String,
        count: usize,
    },

    /// Hyphenation marker other than first/second half of a pair
    #[error("unsupported split arity {subs_type:?} in {location_id} of {document}. String: {content}")]
    UnsupportedHyphenation {
        subs_type: String,
        content: String,
        location_id: String,
        document: String,
    },

    /// A word string lacks an attribute needed to rebuild the text
    #[error("String without {attribute} in {location_id} of {document}")]
    MissingAttribute {
        attribute: &'static str,
        location_id: String,
        document: String,
    },
}

impl ContentError {
    /// Whether the error concerns one location of an otherwise readable file.
    #[must_use]
    pub const fn is_location_error(&self) -> bool {
        matches!(
            self,
            Self::MissingBlock { .. }
                | Self::DuplicateBlock { .. }
                | Self::UnsupportedHyphenation { .. }
                | Self::MissingAttribute { .. }
        )
    }
}

/// Result type for ALTO operations
pub type Result<T> = std::result::Result<T, ContentError>;
