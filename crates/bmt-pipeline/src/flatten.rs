//! Conversion of resolved sections into flat records

use bmt_core::{FlatRecord, IssueMetadata, ResolvedSection, Role};

/// One record per section, in section order.
#[must_use]
pub fn flatten(
    metadata: &IssueMetadata,
    sections: &[ResolvedSection],
    issue_id: u32,
    author_separator: &str,
) -> Vec<FlatRecord> {
    sections
        .iter()
        .map(|section| FlatRecord {
            issue_id,
            date: metadata.date.clone(),
            volume: metadata.volume.clone(),
            number: metadata.number.clone(),
            section_id: section.section_id.clone(),
            title: section.title.clone(),
            authors: section.authors.join(author_separator),
            section_type: section.section_type.as_str().to_string(),
            type_of_resource: section.resource_kind.clone(),
            head: section.text(&Role::Head).to_string(),
            subhead: section.text(&Role::Subhead).to_string(),
            byline: section.text(&Role::Byline).to_string(),
            copy: section.text(&Role::Copy).to_string(),
        })
        .collect()
}
