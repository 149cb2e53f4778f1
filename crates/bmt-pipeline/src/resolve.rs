//! Resolution of section content pointers to OCR text

use crate::config::InconsistencyPolicy;
use crate::error::{IssueError, Result};
use bmt_alto::ContentReader;
use bmt_core::{
    ContentPointer, DiagnosticKind, Diagnostics, IssueMetadata, ResolvedSection, ResolvedText,
    RoleContent, RoleText, Section,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Resolves every section of one issue against its ALTO directory.
///
/// Pointers are grouped by file first, so each file is located and parsed
/// once per issue no matter how many sections reference it.
#[derive(Debug)]
pub struct Resolver<'d> {
    diagnostics: &'d mut Diagnostics,
    policy: InconsistencyPolicy,
}

impl<'d> Resolver<'d> {
    #[must_use]
    pub fn new(diagnostics: &'d mut Diagnostics, policy: InconsistencyPolicy) -> Self {
        Self {
            diagnostics,
            policy,
        }
    }

    /// Resolve all sections of an issue.
    ///
    /// Role text is the concatenation, with single spaces, of the role's
    /// fragments ordered by `(location_id, target_file)`.
    ///
    /// # Errors
    ///
    /// - `IssueError::Content` if a referenced file cannot be located, read
    ///   or parsed
    /// - `IssueError::Inconsistent` if a location cannot be resolved and the
    ///   policy is [`InconsistencyPolicy::AbortIssue`]
    pub fn resolve(
        &mut self,
        metadata: &IssueMetadata,
        sections: Vec<Section>,
        content_root: &Path,
    ) -> Result<Vec<ResolvedSection>> {
        let mut by_file: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for section in &sections {
            for (_, pointer) in section.pointers() {
                by_file
                    .entry(pointer.target_file.as_str())
                    .or_default()
                    .insert(pointer.location_id.as_str());
            }
        }

        log::debug!(
            "Resolving volume {} number {}: {} sections, {} pointers over {} files",
            metadata.volume,
            metadata.number,
            sections.len(),
            sections.iter().map(Section::pointer_count).sum::<usize>(),
            by_file.len()
        );

        let mut reader = ContentReader::new(content_root);
        let mut texts: BTreeMap<ContentPointer, String> = BTreeMap::new();
        let mut failures: BTreeMap<ContentPointer, String> = BTreeMap::new();

        for (target_file, location_ids) in &by_file {
            let texts_of_file = reader.resolve(target_file, location_ids.iter().copied())?;
            for (location_id, result) in texts_of_file {
                let pointer = ContentPointer::new(*target_file, location_id);
                match result {
                    Ok(text) => {
                        texts.insert(pointer, text);
                    }
                    Err(e) => match self.policy {
                        InconsistencyPolicy::AbortIssue => {
                            return Err(IssueError::Inconsistent {
                                section_id: owner_of(&sections, &pointer),
                                source: e,
                            });
                        }
                        InconsistencyPolicy::DropSection => {
                            failures.insert(pointer, e.to_string());
                        }
                    },
                }
            }
        }

        log::debug!("Parsed {} ALTO files", reader.loaded());

        let mut resolved = Vec::with_capacity(sections.len());
        for section in sections {
            if let Some(failure) = section.pointers().find_map(|(_, p)| failures.get(p)) {
                self.diagnostics.error(
                    DiagnosticKind::Inconsistency,
                    section.section_id.as_str(),
                    format!("dropping section: {failure}"),
                );
                continue;
            }

            resolved.push(self.resolve_section(section, &texts));
        }

        Ok(resolved)
    }

    fn resolve_section(
        &mut self,
        section: Section,
        texts: &BTreeMap<ContentPointer, String>,
    ) -> ResolvedSection {
        let expects_text = !section.section_type.uses_reduced_roles();

        let roles = section
            .roles
            .into_iter()
            .map(|(role, content)| {
                let text = match content {
                    RoleContent::NoContent => {
                        if expects_text && role.is_text_role() {
                            self.diagnostics.warn(
                                DiagnosticKind::UnresolvedRole,
                                section.section_id.as_str(),
                                format!("no {role} found"),
                            );
                        }
                        RoleText::NoContent
                    }
                    RoleContent::Empty => RoleText::Empty,
                    RoleContent::Pointers(pointers) => {
                        let fragments = ordered_fragments(&pointers, texts);
                        RoleText::Text(join_fragments(&fragments))
                    }
                };
                (role, text)
            })
            .collect();

        ResolvedSection {
            section_id: section.section_id,
            section_type: section.section_type,
            title: section.title,
            authors: section.authors,
            resource_kind: section.resource_kind,
            roles,
        }
    }
}

/// Id of the first section referencing `pointer`.
fn owner_of(sections: &[Section], pointer: &ContentPointer) -> String {
    sections
        .iter()
        .find(|s| s.pointers().any(|(_, p)| p == pointer))
        .map(|s| s.section_id.clone())
        .unwrap_or_default()
}

/// Fragments of one role in `(location_id, target_file)` order; a pointer
/// listed twice contributes twice.
fn ordered_fragments(
    pointers: &[ContentPointer],
    texts: &BTreeMap<ContentPointer, String>,
) -> Vec<ResolvedText> {
    let mut keyed: Vec<(&str, &str, &str)> = pointers
        .iter()
        .filter_map(|p| {
            texts
                .get(p)
                .map(|text| (p.location_id.as_str(), p.target_file.as_str(), text.as_str()))
        })
        .collect();
    keyed.sort_unstable();

    keyed
        .into_iter()
        .map(|(location_id, _, text)| ResolvedText {
            location_id: location_id.to_string(),
            text: text.to_string(),
        })
        .collect()
}

/// Join fragment texts with single spaces.
#[must_use]
pub fn join_fragments(fragments: &[ResolvedText]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
