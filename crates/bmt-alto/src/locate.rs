//! Mapping structural file ids onto ALTO files in an issue directory

use crate::error::{ContentError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("Invalid digits regex"));

/// Numeric part of a structural file id.
///
/// The first run of digits, minus its leading digit: `"ALTO00012"` yields
/// `"0012"`.
///
/// # Errors
///
/// `ContentError::NoNumericId` if the id has no digits, or only one.
pub fn numeric_id(target_file: &str) -> Result<&str> {
    let digits = DIGITS
        .find(target_file)
        .map(|m| m.as_str())
        .ok_or_else(|| ContentError::NoNumericId {
            target_file: target_file.to_string(),
        })?;

    match digits.get(1..) {
        Some(rest) if !rest.is_empty() => Ok(rest),
        _ => Err(ContentError::NoNumericId {
            target_file: target_file.to_string(),
        }),
    }
}

/// Find the single file in `directory` whose name contains the numeric part
/// of `target_file`.
///
/// # Errors
///
/// `ContentError::FileNotFound` if no name matches,
/// `ContentError::AmbiguousFile` if several do.
pub fn locate(target_file: &str, directory: &Path) -> Result<PathBuf> {
    let id = numeric_id(target_file)?;

    let entries = fs::read_dir(directory).map_err(|source| ContentError::Io {
        path: directory.display().to_string(),
        source,
    })?;

    let mut candidates: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(id))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(ContentError::FileNotFound {
            target_file: target_file.to_string(),
            directory: directory.display().to_string(),
        }),
        1 => {
            let path = directory.join(&candidates[0]);
            log::trace!("{target_file} -> {}", path.display());
            Ok(path)
        }
        _ => Err(ContentError::AmbiguousFile {
            target_file: target_file.to_string(),
            candidates,
        }),
    }
}
