//! Memoizing reader over the ALTO files of one issue

use crate::document::AltoDocument;
use crate::error::Result;
use crate::locate::locate;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome per location id of one file. A location that cannot be read
/// carries its own error; the rest of the file is still usable.
pub type LocationTexts = BTreeMap<String, Result<String>>;

/// Resolves `(file id, location id)` pointers against an issue's ALTO
/// directory. Each file is located and parsed at most once.
#[derive(Debug)]
pub struct ContentReader {
    directory: PathBuf,
    documents: BTreeMap<String, AltoDocument>,
}

impl ContentReader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            documents: BTreeMap::new(),
        }
    }

    fn document(&mut self, target_file: &str) -> Result<&AltoDocument> {
        if !self.documents.contains_key(target_file) {
            let path = locate(target_file, &self.directory)?;
            let document = AltoDocument::open(&path)?;
            log::debug!("Loaded {} for {target_file}", path.display());
            self.documents.insert(target_file.to_string(), document);
        }

        // inserted above when absent
        Ok(&self.documents[target_file])
    }

    /// Text for every requested location of one file, keyed by location id.
    ///
    /// # Errors
    ///
    /// The outer error is file-level: lookup errors from [`locate`] and read
    /// errors from [`AltoDocument::open`]. Failures of single locations
    /// (see [`ContentError::is_location_error`]) are returned per entry.
    ///
    /// [`ContentError::is_location_error`]: crate::ContentError::is_location_error
    pub fn resolve<'a, I>(&mut self, target_file: &str, location_ids: I) -> Result<LocationTexts>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let document = self.document(target_file)?;
        Ok(location_ids
            .into_iter()
            .map(|location_id| (location_id.to_string(), document.text_for(location_id)))
            .collect())
    }

    /// Number of files parsed so far
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.documents.len()
    }
}
