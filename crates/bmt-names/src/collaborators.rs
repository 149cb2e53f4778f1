//! Co-occurrence of authors within issues

use crate::create_file;
use crate::error::Result;
use bmt_core::FlatRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// Two authors and the number of issues both contributed to.
/// `author1 < author2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Collaboration {
    pub author1: String,
    pub author2: String,
    pub count: u32,
}

/// Count, for every unordered pair of distinct authors, the issues in which
/// both appear. Sorted by `(author1, author2)`.
#[must_use]
pub fn collaborators(records: &[FlatRecord], separator: &str) -> Vec<Collaboration> {
    let mut by_issue: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        by_issue
            .entry(record.issue_id)
            .or_default()
            .extend(record.author_names(separator));
    }

    let mut counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for authors in by_issue.values() {
        let authors: Vec<&str> = authors.iter().copied().collect();
        for (i, first) in authors.iter().enumerate() {
            for second in &authors[i + 1..] {
                *counts.entry((*first, *second)).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|((author1, author2), count)| Collaboration {
            author1: author1.to_string(),
            author2: author2.to_string(),
            count,
        })
        .collect()
}

/// Write collaborations with a header row.
///
/// # Errors
///
/// `NamesError::Csv` on write failure.
pub fn write_collaborators<W: Write>(
    writer: W,
    collaborations: &[Collaboration],
    separator: u8,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_writer(writer);
    for collaboration in collaborations {
        csv_writer.serialize(collaboration)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// [`write_collaborators`] to `path`, creating parent directories.
///
/// # Errors
///
/// `NamesError::Io` if the file cannot be created.
pub fn write_collaborators_file(
    path: &Path,
    collaborations: &[Collaboration],
    separator: u8,
) -> Result<()> {
    write_collaborators(create_file(path)?, collaborations, separator)
}
