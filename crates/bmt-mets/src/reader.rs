//! METS structural document reader
//!
//! Reads issue metadata and the ordered section list. Each section carries
//! its role map with unresolved content pointers; resolving them against the
//! ALTO files is done elsewhere.

use crate::error::{Result, StructureError};
use crate::{CREATOR_ROLE_TERM, LOGICAL_STRUCTURE_LABEL, SPONSORED_AD_TYPE, TEXT_CONTENT_TYPE};
use bmt_core::{
    ContentPointer, DiagnosticKind, Diagnostics, IssueMetadata, Role, RoleContent, Section,
    SectionType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Legacy section ids without a `type` attribute still follow this pattern.
static COMPONENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"c[0-9]{3}").expect("Invalid component id regex"));

/// Parsed structural document of one issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetsIssue {
    pub metadata: IssueMetadata,

    /// Valid sections in document order
    pub sections: Vec<Section>,
}

/// Reads METS documents, reporting soft problems to the given diagnostics
#[derive(Debug)]
pub struct StructureReader<'d> {
    diagnostics: &'d mut Diagnostics,
}

impl<'d> StructureReader<'d> {
    #[must_use]
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Read and parse a METS file. The file name is used as document name
    /// in errors and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `StructureError::Io` if the file cannot be read, otherwise the
    /// errors of [`StructureReader::parse`].
    pub fn parse_file(&mut self, path: &Path) -> Result<MetsIssue> {
        let document = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let xml = fs::read_to_string(path).map_err(|source| StructureError::Io {
            document: document.clone(),
            source,
        })?;
        self.parse(&xml, &document)
    }

    /// Parse a METS document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document is not well-formed XML (`StructureError::Xml`)
    /// - `dmdSec`, `mods`, the issue `part` or the logical `structMap` is
    ///   missing or duplicated (`StructureError::Missing` / `Duplicate`)
    /// - A section nests two levels deep (`StructureError::DoubleNesting`)
    /// - A text section has no text content div or unknown sub-types
    pub fn parse(&mut self, xml: &str, document: &str) -> Result<MetsIssue> {
        let parse_options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, parse_options).map_err(
            |source| StructureError::Xml {
                document: document.to_string(),
                source,
            },
        )?;
        let root = doc.root();

        let dmdsec = only_one(root, "dmdSec", None, document)?;
        let metadata = issue_metadata(dmdsec, document)?;

        let mods = only_one(dmdsec, "mods", None, document)?;
        let struct_map = only_one(
            root,
            "structMap",
            Some(("LABEL", LOGICAL_STRUCTURE_LABEL)),
            document,
        )?;

        let mut sections = Vec::new();
        for candidate in descendants_named(mods, "relatedItem") {
            let Some(section_type) = self.classify(candidate, document)? else {
                continue;
            };
            if !section_type.is_valid() {
                self.diagnostics.info(
                    DiagnosticKind::ExcludedSection,
                    candidate.attribute("ID").unwrap_or_default(),
                    format!("excluding {section_type} section"),
                );
                continue;
            }
            sections.push(self.parse_section(candidate, section_type, struct_map, document)?);
        }

        log::debug!("{document}: {} sections", sections.len());
        Ok(MetsIssue { metadata, sections })
    }

    /// Classify a candidate section; `None` if it is not a section at all.
    fn classify(&mut self, section: Node, document: &str) -> Result<Option<SectionType>> {
        if !is_constituent(section) {
            self.diagnostics.warn(
                DiagnosticKind::IgnoredSection,
                section.attribute("ID").unwrap_or(section.tag_name().name()),
                format!("ignoring section: {}", describe_attributes(section)),
            );
            return Ok(None);
        }

        let section_id = section.attribute("ID").unwrap_or_default();
        let resource_kind = first_text(section, "typeOfResource");
        let genre = first_text(section, "genre").unwrap_or_default().to_lowercase();
        let title = descendants_named(section, "titleInfo")
            .next()
            .and_then(|info| first_text(info, "title"))
            .unwrap_or_default();

        let section_type = match resource_kind {
            Some("still image") => SectionType::Image,
            Some("text") => {
                if genre.contains("advertisement") {
                    SectionType::Advertisement
                } else if title.to_lowercase().contains("inhalt") {
                    SectionType::Contents
                } else if descendants_named(section, "relatedItem")
                    .any(|n| n.attribute("type") == Some("constituent"))
                {
                    SectionType::Parent
                } else if section.parent().is_some_and(is_constituent) {
                    let grandparent = section.parent().and_then(|p| p.parent());
                    if grandparent.is_some_and(is_constituent) {
                        return Err(StructureError::DoubleNesting {
                            section_id: section_id.to_string(),
                            document: document.to_string(),
                        });
                    }
                    SectionType::Subsection
                } else {
                    SectionType::Flat
                }
            }
            other => {
                self.diagnostics.warn(
                    DiagnosticKind::UnknownSectionType,
                    section_id,
                    format!(
                        "unknown section type. Resource type: {}, genre: {genre}",
                        other.unwrap_or("<none>")
                    ),
                );
                SectionType::Unknown
            }
        };

        Ok(Some(section_type))
    }

    fn parse_section(
        &mut self,
        section: Node,
        section_type: SectionType,
        struct_map: Node,
        document: &str,
    ) -> Result<Section> {
        let section_id = section
            .attribute("ID")
            .ok_or_else(|| StructureError::MissingAttribute {
                element: "relatedItem",
                attribute: "ID",
                subject: format!("of type {section_type}"),
                document: document.to_string(),
            })?;

        let roles = match section_type {
            SectionType::Advertisement => {
                match content_div(struct_map, SPONSORED_AD_TYPE, section_id) {
                    Some(container) => self.collect_roles(container, section_id, document)?,
                    None => reduced_roles(),
                }
            }
            SectionType::Image => reduced_roles(),
            _ => {
                let container = content_div(struct_map, TEXT_CONTENT_TYPE, section_id)
                    .ok_or_else(|| StructureError::MissingTextContent {
                        section_id: section_id.to_string(),
                        document: document.to_string(),
                    })?;
                self.collect_roles(container, section_id, document)?
            }
        };

        Ok(Section {
            section_id: section_id.to_string(),
            section_type,
            title: title_of(section),
            authors: authors_of(section),
            resource_kind: first_text(section, "typeOfResource")
                .unwrap_or_default()
                .to_string(),
            roles,
        })
    }

    /// Collect the text roles below a section's content div.
    fn collect_roles(
        &mut self,
        container: Node,
        section_id: &str,
        document: &str,
    ) -> Result<BTreeMap<Role, RoleContent>> {
        let mut nodes: Vec<(Role, Node)> = children_named(container, "div")
            .map(|div| (Role::from_name(div.attribute("TYPE").unwrap_or_default()), div))
            .collect();

        let unknown: BTreeSet<String> = nodes
            .iter()
            .filter(|(role, _)| !role.is_recognized())
            .map(|(role, _)| role.name().to_string())
            .collect();

        if !unknown.is_empty() {
            // the padded Byline typo is fixed first, the rest is an error
            let typos: Vec<&String> = unknown.iter().filter(|n| is_byline_typo(n)).collect();
            if !typos.is_empty() {
                for (role, _) in &mut nodes {
                    if matches!(role, Role::Unrecognized(name) if is_byline_typo(name)) {
                        *role = Role::Byline;
                    }
                }
                self.diagnostics.warn(
                    DiagnosticKind::CorrectedSubType,
                    section_id,
                    format!("div of type {typos:?} read as Byline"),
                );
            }

            let remaining: Vec<String> = unknown
                .iter()
                .filter(|n| !is_byline_typo(n))
                .cloned()
                .collect();
            if !remaining.is_empty() {
                return Err(StructureError::UnknownSubTypes {
                    names: remaining,
                    section_id: section_id.to_string(),
                    document: document.to_string(),
                });
            }
        }

        let mut roles = BTreeMap::new();
        for (role, div) in nodes {
            if !role.is_text_role() {
                continue;
            }
            let pointers = area_pointers(div, section_id, document)?;
            let content = if pointers.is_empty() {
                RoleContent::Empty
            } else {
                RoleContent::Pointers(pointers)
            };

            match roles.entry(role) {
                Entry::Vacant(entry) => {
                    entry.insert(content);
                }
                Entry::Occupied(mut entry) => {
                    self.diagnostics.warn(
                        DiagnosticKind::DuplicateRole,
                        section_id,
                        format!("duplicate alto location for {}", entry.key()),
                    );
                    merge_content(entry.get_mut(), content);
                }
            }
        }

        for role in Role::TEXT_ROLES {
            roles.entry(role).or_insert(RoleContent::NoContent);
        }

        Ok(roles)
    }
}

/// First structural-map div of `kind` belonging to `section_id`.
fn content_div<'a, 'input>(
    struct_map: Node<'a, 'input>,
    kind: &str,
    section_id: &str,
) -> Option<Node<'a, 'input>> {
    descendants_named(struct_map, "div").find(|div| {
        div.attribute("TYPE") == Some(kind) && div.attribute("DMDID") == Some(section_id)
    })
}

fn reduced_roles() -> BTreeMap<Role, RoleContent> {
    Role::REDUCED_ROLES
        .iter()
        .map(|role| (role.clone(), RoleContent::NoContent))
        .collect()
}

/// Exactly one descendant `name` element (optionally with an attribute value).
fn only_one<'a, 'input>(
    scope: Node<'a, 'input>,
    name: &'static str,
    attribute: Option<(&str, &str)>,
    document: &str,
) -> Result<Node<'a, 'input>> {
    let mut found = descendants_named(scope, name)
        .filter(|n| attribute.map_or(true, |(key, value)| n.attribute(key) == Some(value)));

    let element = match attribute {
        Some((key, value)) => format!("{name}[{key}={value:?}]"),
        None => name.to_string(),
    };

    let first = found.next().ok_or_else(|| StructureError::Missing {
        element: element.clone(),
        document: document.to_string(),
    })?;
    if found.next().is_some() {
        return Err(StructureError::Duplicate {
            element,
            document: document.to_string(),
        });
    }
    Ok(first)
}

fn issue_metadata(dmdsec: Node, document: &str) -> Result<IssueMetadata> {
    let part = only_one(dmdsec, "part", Some(("type", "issue")), document)?;

    let detail_number = |kind: &str| -> Result<String> {
        descendants_named(part, "detail")
            .find(|detail| detail.attribute("type") == Some(kind))
            .and_then(|detail| first_text(detail, "number"))
            .map(str::to_string)
            .ok_or_else(|| StructureError::Missing {
                element: format!("detail[type={kind:?}]/number"),
                document: document.to_string(),
            })
    };

    let date = descendants_named(dmdsec, "originInfo")
        .next()
        .and_then(|origin| {
            descendants_named(origin, "dateIssued")
                .find(|date| date.attribute("keyDate") == Some("yes"))
        })
        .and_then(string_of)
        .ok_or_else(|| StructureError::Missing {
            element: "originInfo/dateIssued[keyDate=\"yes\"]".to_string(),
            document: document.to_string(),
        })?;

    Ok(IssueMetadata {
        volume: detail_number("volume")?,
        number: detail_number("number")?,
        date: date.to_string(),
    })
}

/// Whether an element is a section: marked constituent, or, lacking any
/// `type`, carrying a component id.
fn is_constituent(node: Node) -> bool {
    if !node.is_element() {
        return false;
    }
    match node.attribute("type") {
        Some(kind) if !kind.is_empty() => kind == "constituent",
        _ => node
            .attribute("ID")
            .is_some_and(|id| COMPONENT_ID.is_match(id)),
    }
}

fn is_byline_typo(name: &str) -> bool {
    name != "Byline" && name.trim_end() == "Byline"
}

fn merge_content(existing: &mut RoleContent, extra: RoleContent) {
    if let RoleContent::Pointers(more) = extra {
        match existing {
            RoleContent::Pointers(pointers) => pointers.extend(more),
            other => *other = RoleContent::Pointers(more),
        }
    }
}

fn area_pointers(div: Node, section_id: &str, document: &str) -> Result<Vec<ContentPointer>> {
    descendants_named(div, "area")
        .map(|area| -> Result<ContentPointer> {
            let attribute = |name: &'static str| {
                area.attribute(name)
                    .ok_or_else(|| StructureError::MissingAttribute {
                        element: "area",
                        attribute: name,
                        subject: format!("of section {section_id}"),
                        document: document.to_string(),
                    })
            };
            Ok(ContentPointer::new(attribute("FILEID")?, attribute("BEGIN")?))
        })
        .collect()
}

/// Title parts (every element below the first `titleInfo`) joined by a space.
fn title_of(section: Node) -> String {
    descendants_named(section, "titleInfo")
        .next()
        .map(|info| {
            info.descendants()
                .skip(1)
                .filter(Node::is_element)
                .filter_map(string_of)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Display forms of the section's own creator names.
fn authors_of(section: Node) -> Vec<String> {
    children_named(section, "name")
        .filter(|name| {
            descendants_named(*name, "role")
                .next()
                .and_then(|role| first_text(role, "roleTerm"))
                == Some(CREATOR_ROLE_TERM)
        })
        .filter_map(|name| first_text(name, "displayForm"))
        .map(str::to_string)
        .collect()
}

/// Text of an element whose only child is text.
fn string_of<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    let mut children = node.children();
    match (children.next(), children.next()) {
        (Some(child), None) if child.is_text() => child.text(),
        _ => None,
    }
}

/// Text of the first descendant `name` element.
fn first_text<'a>(node: Node<'a, '_>, name: &'static str) -> Option<&'a str> {
    descendants_named(node, name).next().and_then(string_of)
}

/// Descendant elements by local name, excluding `node` itself.
fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn children_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn describe_attributes(node: Node) -> String {
    let attributes: Vec<String> = node
        .attributes()
        .map(|attr| format!("{}={:?}", attr.name(), attr.value()))
        .collect();
    format!("{} {{{}}}", node.tag_name().name(), attributes.join(", "))
}
