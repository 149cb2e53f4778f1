//! Error types for name tables

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamesError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed table, or a required column is missing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for name operations
pub type Result<T> = std::result::Result<T, NamesError>;
