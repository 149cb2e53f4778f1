//! Disambiguation table: found author names and the names they resolve to

use crate::corrections::{are_initials, fix_initials, get_initials, get_title_and_rest};
use crate::create_file;
use crate::error::{NamesError, Result};
use bmt_core::{DiagnosticKind, Diagnostics, FlatRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Life dates appended to a resolved name, e.g. `"Franz Marc (1880-1916)"`.
static YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?(, | )?[0-9]+-?[0-9]*\)?").expect("Invalid years regex"));

/// Row of a disambiguation table as maintained by hand
#[derive(Debug, Clone, Deserialize)]
struct SourceRow {
    #[serde(rename = "Unique Names")]
    found: String,
    #[serde(rename = "NameCopy", default)]
    resolved: String,
}

/// One found name with its resolution and derived name features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Name as it appears in the data
    pub found: String,

    /// Name it stands for; empty if the table gives none
    pub resolved: String,

    /// Academic title split off the found name (`Dr. med.`)
    #[serde(rename = "titles")]
    pub title: String,

    /// Initials of the found name without its title
    pub initials: String,

    /// Whether the found name without its title consists of initials only
    pub found_are_initials: bool,
}

impl NameEntry {
    /// Entry for `found` with derived title and initials.
    #[must_use]
    pub fn new(found: impl Into<String>, resolved: impl Into<String>) -> Self {
        let found = found.into();
        let (title, rest) = get_title_and_rest(&found);
        let rest_are_initials = are_initials(&rest);
        let initials = if rest_are_initials {
            fix_initials(&rest)
        } else {
            get_initials(&rest)
        };

        Self {
            resolved: resolved.into(),
            title,
            initials,
            found_are_initials: rest_are_initials,
            found,
        }
    }
}

/// Found names and their resolutions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisambiguationTable {
    entries: Vec<NameEntry>,
}

impl DisambiguationTable {
    /// Read a hand-maintained table with columns `Unique Names` (found) and
    /// `NameCopy` (resolved). Other columns are ignored.
    ///
    /// # Errors
    ///
    /// `NamesError::Csv` on malformed input or if `Unique Names` is missing.
    pub fn load<R: Read>(reader: R, separator: u8) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize() {
            let row: SourceRow = row?;
            entries.push(NameEntry::new(row.found, row.resolved));
        }
        log::debug!("Loaded {} disambiguation rows", entries.len());
        Ok(Self { entries })
    }

    /// [`DisambiguationTable::load`] from a file.
    ///
    /// # Errors
    ///
    /// `NamesError::Io` if the file cannot be opened.
    pub fn load_file(path: &Path, separator: u8) -> Result<Self> {
        let file = File::open(path).map_err(|source| NamesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file, separator)
    }

    #[must_use]
    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconcile the table with the names present in the data.
    ///
    /// Names on only one side are reported with their share. Names found in
    /// the data but missing from the table are added as resolving to
    /// themselves.
    pub fn prepare(&mut self, names_in_data: &BTreeSet<String>, diagnostics: &mut Diagnostics) {
        let names_in_table: BTreeSet<&str> = self.entries.iter().map(|e| e.found.as_str()).collect();

        let not_in_data: Vec<&str> = names_in_table
            .iter()
            .copied()
            .filter(|name| !names_in_data.contains(*name))
            .collect();
        diagnostics.warn(
            DiagnosticKind::Names,
            "disambiguation",
            format!(
                "{} names in disambiguation ({}) not present in the dataset: {}",
                not_in_data.len(),
                percent(not_in_data.len(), names_in_table.len()),
                not_in_data.join(", ")
            ),
        );

        let missing: Vec<String> = names_in_data
            .iter()
            .filter(|name| !names_in_table.contains(name.as_str()))
            .cloned()
            .collect();
        diagnostics.warn(
            DiagnosticKind::Names,
            "disambiguation",
            format!(
                "{} names ({}) not found in the disambiguation file: {}",
                missing.len(),
                percent(missing.len(), names_in_data.len()),
                missing.join(", ")
            ),
        );

        self.entries
            .extend(missing.into_iter().map(|name| NameEntry::new(name.clone(), name)));
    }

    /// Found name to resolved name.
    ///
    /// A resolution that is itself a found name with a different resolution
    /// is followed one step; life dates are stripped. Rows without a
    /// resolution are left out. The first row for a found name wins.
    #[must_use]
    pub fn mapping(&self) -> BTreeMap<String, String> {
        let mut direct: BTreeMap<&str, &str> = BTreeMap::new();
        for entry in &self.entries {
            if !entry.resolved.is_empty() {
                direct.entry(entry.found.as_str()).or_insert(entry.resolved.as_str());
            }
        }

        direct
            .iter()
            .map(|(found, resolved)| {
                let target = match direct.get(resolved) {
                    Some(next) if found != resolved => next,
                    _ => resolved,
                };
                ((*found).to_string(), YEARS.replace_all(target, "").trim().to_string())
            })
            .collect()
    }

    /// Replace every author of every record with its resolved name.
    ///
    /// A record is left unchanged, with a warning, if any of its authors has
    /// no resolution.
    pub fn apply(&self, records: &mut [FlatRecord], separator: &str, diagnostics: &mut Diagnostics) {
        let mapping = self.mapping();

        for record in records.iter_mut() {
            if record.authors.is_empty() {
                continue;
            }
            let resolved: Option<Vec<&str>> = record
                .author_names(separator)
                .into_iter()
                .map(|author| mapping.get(author).map(String::as_str))
                .collect();

            match resolved {
                Some(names) => record.authors = names.join(separator),
                None => diagnostics.warn(
                    DiagnosticKind::Names,
                    record.section_id.as_str(),
                    format!("author(s) {:?} do not have disambiguations", record.authors),
                ),
            }
        }
    }

    /// Write the table with its derived columns.
    ///
    /// # Errors
    ///
    /// `NamesError::Csv` on write failure.
    pub fn write<W: Write>(&self, writer: W, separator: u8) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .from_writer(writer);
        for entry in &self.entries {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write the table to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// `NamesError::Io` if the file cannot be created.
    pub fn write_file(&self, path: &Path, separator: u8) -> Result<()> {
        self.write(create_file(path)?, separator)
    }
}

/// Every author name in the records.
#[must_use]
pub fn unique_names(records: &[FlatRecord], separator: &str) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.author_names(separator))
        .map(str::to_string)
        .collect()
}

fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let share = part as f64 / whole as f64 * 100.0;
    format!("{share:.1}%")
}
