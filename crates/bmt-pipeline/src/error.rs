//! Error types for the issue pipeline and batch driver

use bmt_alto::ContentError;
use bmt_mets::StructureError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single issue produced no records
#[derive(Debug, Error)]
pub enum IssueError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Content(#[from] ContentError),

    /// A location of a section could not be resolved
    #[error("section {section_id} is inconsistent: {source}")]
    Inconsistent {
        section_id: String,
        #[source]
        source: ContentError,
    },
}

/// Result type for single-issue operations
pub type Result<T> = std::result::Result<T, IssueError>;

/// Failures outside a single issue: configuration, discovery, CSV output
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
