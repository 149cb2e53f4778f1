//! Subsection roles of a section (the `TYPE` of a structural-map `div`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named component of a section.
///
/// The variants are the known sub-type vocabulary of the structural map.
/// Anything else is kept verbatim in [`Role::Unrecognized`] so classification
/// sites have to handle it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Head,
    Subhead,
    Byline,
    Copy,
    TextContent,
    Illustration,
    Music,
    MinorHead,
    Unrecognized(String),
}

impl Role {
    /// Roles that carry text and end up as record fields, in field order.
    pub const TEXT_ROLES: [Self; 4] = [Self::Head, Self::Subhead, Self::Byline, Self::Copy];

    /// Roles expected on image and advertisement sections.
    pub const REDUCED_ROLES: [Self; 3] = [Self::Head, Self::Copy, Self::Illustration];

    /// Map a structural-map `TYPE` value onto the vocabulary.
    ///
    /// The match is exact: `"Byline   "` is unrecognized here, correcting that
    /// typo is the structure reader's decision.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Head" => Self::Head,
            "Subhead" => Self::Subhead,
            "Byline" => Self::Byline,
            "Copy" => Self::Copy,
            "TextContent" => Self::TextContent,
            "Illustration" => Self::Illustration,
            "Music" => Self::Music,
            "MinorHead" => Self::MinorHead,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Head => "Head",
            Self::Subhead => "Subhead",
            Self::Byline => "Byline",
            Self::Copy => "Copy",
            Self::TextContent => "TextContent",
            Self::Illustration => "Illustration",
            Self::Music => "Music",
            Self::MinorHead => "MinorHead",
            Self::Unrecognized(name) => name,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_text_role(&self) -> bool {
        matches!(self, Self::Head | Self::Subhead | Self::Byline | Self::Copy)
    }

    #[inline]
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
