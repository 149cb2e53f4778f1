//! Flat per-section records

use serde::{Deserialize, Serialize};

/// Column names of a [`FlatRecord`], in serialization order.
pub const RECORD_COLUMNS: [&str; 13] = [
    "issue_id",
    "date",
    "volume",
    "number",
    "section_id",
    "title",
    "authors",
    "section_type",
    "type_of_resource",
    "Head",
    "Subhead",
    "Byline",
    "Copy",
];

/// One section of one issue, ready for tabular storage.
///
/// Field order is the column order of [`RECORD_COLUMNS`]. All text fields are
/// plain strings; a role without content is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Sequence number assigned by the batch driver
    pub issue_id: u32,
    pub date: String,
    pub volume: String,
    pub number: String,
    pub section_id: String,
    pub title: String,
    /// Author names joined with the author separator
    pub authors: String,
    pub section_type: String,
    pub type_of_resource: String,
    #[serde(rename = "Head")]
    pub head: String,
    #[serde(rename = "Subhead")]
    pub subhead: String,
    #[serde(rename = "Byline")]
    pub byline: String,
    #[serde(rename = "Copy")]
    pub copy: String,
}

impl FlatRecord {
    /// Split the joined author field back into names.
    #[must_use]
    pub fn author_names<'a>(&'a self, separator: &str) -> Vec<&'a str> {
        if self.authors.is_empty() {
            return Vec::new();
        }
        self.authors.split(separator).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_names() {
        let record = FlatRecord {
            authors: "Herwarth Walden||Else Lasker-Schüler".to_string(),
            ..FlatRecord::default()
        };
        assert_eq!(
            record.author_names("||"),
            vec!["Herwarth Walden", "Else Lasker-Schüler"]
        );
    }

    #[test]
    fn test_author_names_empty() {
        let record = FlatRecord::default();
        assert!(record.author_names("||").is_empty());
    }

    #[test]
    fn test_field_order_matches_columns() {
        let record = FlatRecord::default();
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), RECORD_COLUMNS.len());
        for column in RECORD_COLUMNS {
            assert!(object.contains_key(column), "missing column {column}");
        }
    }
}
