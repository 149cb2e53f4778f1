//! Per-issue diagnostics reporter
//!
//! Components never log through shared state of their own. They receive a
//! `&mut Diagnostics`, which keeps every entry for the caller and forwards it
//! to the `log` facade tagged with the document it belongs to.

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    const fn level(self) -> log::Level {
        match self {
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Candidate element without a constituent marker or component id
    IgnoredSection,
    /// Section with an unrecognized resource kind
    UnknownSectionType,
    /// Classified section of a type that is not emitted (contents, unknown)
    ExcludedSection,
    /// Sub-type name corrected from a known typo variant
    CorrectedSubType,
    /// More than one structural node for the same role
    DuplicateRole,
    /// Text role expected but absent from the source
    UnresolvedRole,
    /// Content pointer that could not be resolved; owning section dropped
    Inconsistency,
    /// Issue directory skipped by the batch driver
    SkippedIssue,
    /// Name heuristics (disambiguation table coverage, missing names)
    Names,
}

/// A recorded soft problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Document the diagnostic was raised for
    pub document: String,
    /// Identifier of the offending element (section id, file id, ...)
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.document, self.subject, self.message)
    }
}

/// Collects diagnostics for one document or issue
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    document: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            entries: Vec::new(),
        }
    }

    pub fn info(&mut self, kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Info, kind, subject.into(), message.into());
    }

    pub fn warn(&mut self, kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, kind, subject.into(), message.into());
    }

    pub fn error(&mut self, kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, kind, subject.into(), message.into());
    }

    fn push(&mut self, severity: Severity, kind: DiagnosticKind, subject: String, message: String) {
        let entry = Diagnostic {
            severity,
            kind,
            document: self.document.clone(),
            subject,
            message,
        };
        log::log!(severity.level(), "{entry}");
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }

    /// Number of entries of `kind`.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move all entries of `other` into `self`, keeping their documents.
    pub fn absorb(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}
