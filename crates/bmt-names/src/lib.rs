//! # bmt-names
//!
//! Post-processing of author names in flat records.
//!
//! - [`corrections`]: initials and academic title heuristics
//! - [`DisambiguationTable`]: hand-maintained mapping from names as printed
//!   to the person they stand for
//! - [`collaborators()`]: pairs of authors appearing in the same issue
//!
//! ```rust
//! use bmt_names::corrections::{fix_initials, get_title_and_rest};
//!
//! assert_eq!(fix_initials("H W"), "H. W.");
//! assert_eq!(
//!     get_title_and_rest("Doktor phil. G. Räusch"),
//!     ("Dr. phil.".to_string(), "G. Räusch".to_string())
//! );
//! ```

pub mod collaborators;
pub mod corrections;
pub mod disambiguation;
pub mod error;

pub use collaborators::{collaborators, write_collaborators, write_collaborators_file, Collaboration};
pub use disambiguation::{unique_names, DisambiguationTable, NameEntry};
pub use error::{NamesError, Result};

/// Create `path` for writing, with its parent directories.
pub(crate) fn create_file(path: &std::path::Path) -> Result<std::fs::File> {
    let io_error = |source| NamesError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::File::create(path).map_err(io_error)
}
