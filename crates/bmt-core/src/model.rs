//! Issue and section structures

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Issue-level metadata, shared by every record of the issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueMetadata {
    /// Volume number as printed in the structural document
    pub volume: String,

    /// Issue number within the volume
    pub number: String,

    /// Key issue date (`dateIssued[keyDate=yes]`)
    pub date: String,
}

/// Classification of a structural unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Image,
    Advertisement,
    /// Text section containing constituent sections
    Parent,
    /// Text section nested one level inside another section
    Subsection,
    /// Text section without nesting
    Flat,
    /// Table of contents
    Contents,
    Unknown,
}

impl SectionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Advertisement => "advertisement",
            Self::Parent => "parent",
            Self::Subsection => "subsection",
            Self::Flat => "flat",
            Self::Contents => "contents",
            Self::Unknown => "unknown",
        }
    }

    /// Whether sections of this type are emitted at all.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Contents | Self::Unknown)
    }

    /// Image and advertisement sections need no `TextContent` div; without
    /// other content they carry [`Role::REDUCED_ROLES`].
    #[inline]
    #[must_use]
    pub const fn uses_reduced_roles(self) -> bool {
        matches!(self, Self::Image | Self::Advertisement)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unresolved reference from the structural document into an OCR file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentPointer {
    /// `FILEID` of the referencing area
    pub target_file: String,

    /// `BEGIN` of the referencing area, a text block `ID` in the OCR file
    pub location_id: String,
}

impl ContentPointer {
    #[inline]
    #[must_use]
    pub fn new(target_file: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            target_file: target_file.into(),
            location_id: location_id.into(),
        }
    }
}

/// Text of one resolved [`ContentPointer`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedText {
    pub location_id: String,
    pub text: String,
}

/// Content of one role before resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleContent {
    /// The source has no node for this role
    NoContent,
    /// The source has a node for this role, but it references no OCR area
    Empty,
    Pointers(Vec<ContentPointer>),
}

impl RoleContent {
    #[must_use]
    pub fn pointers(&self) -> &[ContentPointer] {
        match self {
            Self::Pointers(pointers) => pointers,
            Self::NoContent | Self::Empty => &[],
        }
    }
}

/// A section as read from the structural document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Source identifier, unique within an issue
    pub section_id: String,
    pub section_type: SectionType,
    /// Title parts joined by a space, possibly empty
    pub title: String,
    /// Raw creator names in document order
    pub authors: Vec<String>,
    /// Raw `typeOfResource` value (`text`, `still image`)
    pub resource_kind: String,
    pub roles: BTreeMap<Role, RoleContent>,
}

impl Section {
    /// Iterate over every content pointer of the section with its role.
    pub fn pointers(&self) -> impl Iterator<Item = (&Role, &ContentPointer)> {
        self.roles
            .iter()
            .flat_map(|(role, content)| content.pointers().iter().map(move |p| (role, p)))
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.roles.values().map(|c| c.pointers().len()).sum()
    }
}

/// Resolved text of one role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleText {
    NoContent,
    Empty,
    Text(String),
}

impl RoleText {
    /// Text as it appears in a flat record; absent content is `""`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::NoContent | Self::Empty => "",
        }
    }
}

/// A section with all of its roles resolved to text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSection {
    pub section_id: String,
    pub section_type: SectionType,
    pub title: String,
    pub authors: Vec<String>,
    pub resource_kind: String,
    pub roles: BTreeMap<Role, RoleText>,
}

impl ResolvedSection {
    /// Text of `role`, or `""` if the section has no such role.
    #[must_use]
    pub fn text(&self, role: &Role) -> &str {
        self.roles.get(role).map_or("", RoleText::as_str)
    }
}
