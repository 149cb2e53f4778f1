//! CSV persistence of flat records

use crate::error::PipelineError;
use bmt_core::FlatRecord;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Write records with a header row.
///
/// # Errors
///
/// Returns `PipelineError::Csv` on serialization or write failure.
pub fn write_records<W: Write>(
    writer: W,
    records: &[FlatRecord],
    separator: u8,
) -> Result<(), PipelineError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_writer(writer);

    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read records written by [`write_records`].
///
/// # Errors
///
/// Returns `PipelineError::Csv` on malformed input or a header mismatch.
pub fn read_records<R: Read>(reader: R, separator: u8) -> Result<Vec<FlatRecord>, PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_reader(reader);

    csv_reader
        .deserialize()
        .map(|row| row.map_err(PipelineError::from))
        .collect()
}

/// Write records to `path`, creating parent directories.
///
/// # Errors
///
/// `PipelineError::Io` if the file cannot be created, otherwise the errors
/// of [`write_records`].
pub fn write_records_file(
    path: &Path,
    records: &[FlatRecord],
    separator: u8,
) -> Result<(), PipelineError> {
    let io_error = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    write_records(file, records, separator)
}

/// Read records from `path`.
///
/// # Errors
///
/// `PipelineError::Io` if the file cannot be opened, otherwise the errors of
/// [`read_records`].
pub fn read_records_file(path: &Path, separator: u8) -> Result<Vec<FlatRecord>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file, separator)
}
