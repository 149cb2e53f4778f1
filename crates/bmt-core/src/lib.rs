//! # bmt-core
//!
//! Shared data model for reconstructing periodical issues from METS
//! (structure) and ALTO (OCR) documents.
//!
//! The crates of the workspace hand these types to each other in a fixed
//! order:
//!
//! ```text
//! bmt-mets (StructureReader) ── Section / ContentPointer ──┐
//!                                                          ├─> bmt-pipeline (Resolver) ── ResolvedSection
//! bmt-alto (ContentReader)   ── ResolvedText ──────────────┘            │
//!                                                                        └─> flatten ── FlatRecord
//! ```
//!
//! ## Role content
//!
//! A role (heading, byline, ...) of a section is tri-state. [`RoleContent`]
//! keeps "the source never mentioned this role" apart from "the source has a
//! node for it, but no OCR area". Both flatten to an empty string, but only
//! the first one is worth a warning when a text role was expected.
//!
//! ## Diagnostics
//!
//! Soft problems are never raised as errors. Every component takes a
//! [`Diagnostics`] reporter, which records the entry and forwards it to the
//! `log` facade:
//!
//! ```rust
//! use bmt_core::{DiagnosticKind, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::new("bmtnabe_1914-01_01.mets.xml");
//! diagnostics.warn(DiagnosticKind::IgnoredSection, "relatedItem", "no constituent marker");
//! assert_eq!(diagnostics.count(DiagnosticKind::IgnoredSection), 1);
//! ```

pub mod diagnostics;
pub mod model;
pub mod record;
pub mod role;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use model::{
    ContentPointer, IssueMetadata, ResolvedSection, ResolvedText, RoleContent, RoleText, Section,
    SectionType,
};
pub use record::{FlatRecord, RECORD_COLUMNS};
pub use role::Role;

/// Separator between author names in a flattened record.
pub const DEFAULT_AUTHOR_SEPARATOR: &str = "||";
