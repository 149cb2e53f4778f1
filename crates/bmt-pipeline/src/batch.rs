//! Batch driver over a data root of issue directories
//!
//! A data root holds one directory per issue:
//!
//! ```text
//! data/
//! └── bmtnabe_1914-04_01/
//!     ├── bmtnabe_1914-04_01.mets.xml
//!     └── alto/
//!         ├── bmtnabe_1914-04_01_0001.alto.xml
//!         └── bmtnabe_1914-04_01_0002.alto.xml
//! ```
//!
//! Every leaf directory whose name ends in `alto` is an issue's OCR
//! directory; its parent holds the METS document.

use crate::config::Config;
use crate::error::{IssueError, PipelineError};
use crate::flatten::flatten;
use crate::resolve::Resolver;
use bmt_core::{Diagnostic, DiagnosticKind, Diagnostics, FlatRecord};
use bmt_mets::StructureReader;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix of an issue's OCR directory name
pub const ALTO_DIR_SUFFIX: &str = "alto";

/// Suffix of a METS document file name
pub const METS_FILE_SUFFIX: &str = "mets.xml";

/// Location of one issue's input files
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IssueDir {
    pub mets: PathBuf,
    pub alto_dir: PathBuf,
}

impl IssueDir {
    pub fn new(mets: impl Into<PathBuf>, alto_dir: impl Into<PathBuf>) -> Self {
        Self {
            mets: mets.into(),
            alto_dir: alto_dir.into(),
        }
    }

    /// File name of the METS document, used to tag diagnostics
    #[must_use]
    pub fn document_name(&self) -> String {
        self.mets
            .file_name()
            .map_or_else(|| self.mets.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// An issue that produced no records
#[derive(Debug)]
pub struct IssueFailure {
    pub issue_id: u32,
    pub issue: IssueDir,
    pub error: IssueError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records of all successful issues, in issue order
    pub records: Vec<FlatRecord>,

    /// Number of issues that produced records
    pub succeeded: usize,

    pub failures: Vec<IssueFailure>,

    /// Diagnostics of discovery and of every issue
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

/// Find every issue below `root`, sorted by path.
///
/// Leaf directories not ending in `alto` and OCR directories without a METS
/// document next to them are reported as skipped.
///
/// # Errors
///
/// Returns `PipelineError::Walk` if the tree cannot be traversed and
/// `PipelineError::Io` if a directory cannot be listed.
pub fn discover_issues(
    root: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<IssueDir>, PipelineError> {
    let mut issues = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| PipelineError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() || has_subdirectories(entry.path())? {
            continue;
        }

        let dir = entry.path();
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(ALTO_DIR_SUFFIX) {
            diagnostics.warn(
                DiagnosticKind::SkippedIssue,
                dir.display().to_string(),
                "leaf directory is not an ALTO directory",
            );
            continue;
        }

        let Some(parent) = dir.parent() else {
            continue;
        };
        match find_mets(parent)? {
            Some(mets) => issues.push(IssueDir::new(mets, dir)),
            None => diagnostics.warn(
                DiagnosticKind::SkippedIssue,
                parent.display().to_string(),
                format!("no *{METS_FILE_SUFFIX} file next to ALTO directory"),
            ),
        }
    }

    issues.sort();
    log::info!("Found {} issues in {}", issues.len(), root.display());
    Ok(issues)
}

fn has_subdirectories(dir: &Path) -> Result<bool, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(entries
        .flatten()
        .any(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false)))
}

/// First METS document in `dir` by file name.
fn find_mets(dir: &Path) -> Result<Option<PathBuf>, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(METS_FILE_SUFFIX))
        .map(|entry| entry.path())
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Read, resolve and flatten one issue.
///
/// # Errors
///
/// Any [`IssueError`]; no records are produced for the issue then.
pub fn process_issue(
    issue: &IssueDir,
    issue_id: u32,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<FlatRecord>, IssueError> {
    let mets = StructureReader::new(diagnostics).parse_file(&issue.mets)?;
    let sections = Resolver::new(diagnostics, config.inconsistency_policy).resolve(
        &mets.metadata,
        mets.sections,
        &issue.alto_dir,
    )?;
    Ok(flatten(
        &mets.metadata,
        &sections,
        issue_id,
        &config.author_separator,
    ))
}

/// Process every issue below `root`.
///
/// Issue ids are assigned `1..=n` in path order before processing, so a
/// failing issue still consumes its id and output does not depend on
/// scheduling. A failing issue is logged and skipped.
///
/// # Errors
///
/// Only discovery errors; issue failures are collected in the report.
pub fn run_batch(root: &Path, config: &Config) -> Result<BatchReport, PipelineError> {
    let mut discovery = Diagnostics::new(root.display().to_string());
    let issues = discover_issues(root, &mut discovery)?;

    let outcomes: Vec<(u32, Result<Vec<FlatRecord>, IssueError>, Diagnostics)> = if config.parallel
    {
        issues
            .par_iter()
            .enumerate()
            .map(|(idx, issue)| run_issue(idx, issue, config))
            .collect()
    } else {
        issues
            .iter()
            .enumerate()
            .map(|(idx, issue)| run_issue(idx, issue, config))
            .collect()
    };

    let mut report = BatchReport::default();
    let mut collected = discovery;

    for ((issue_id, result, diagnostics), issue) in outcomes.into_iter().zip(issues) {
        // errors on a successful issue are sections dropped by policy
        let level = if diagnostics.has_errors() {
            log::Level::Warn
        } else {
            log::Level::Info
        };
        collected.absorb(diagnostics);
        match result {
            Ok(records) => {
                log::log!(
                    level,
                    "Issue {issue_id} ({}): {} sections",
                    issue.document_name(),
                    records.len()
                );
                report.records.extend(records);
                report.succeeded += 1;
            }
            Err(error) => {
                log::error!("Skipping issue {issue_id} ({}): {error}", issue.document_name());
                report.failures.push(IssueFailure {
                    issue_id,
                    issue,
                    error,
                });
            }
        }
    }

    report.diagnostics = collected.into_entries();
    log::info!(
        "Processed {} issues: {} succeeded, {} failed",
        report.total(),
        report.succeeded,
        report.failures.len()
    );
    Ok(report)
}

fn run_issue(
    idx: usize,
    issue: &IssueDir,
    config: &Config,
) -> (u32, Result<Vec<FlatRecord>, IssueError>, Diagnostics) {
    let issue_id = u32::try_from(idx + 1).unwrap_or(u32::MAX);
    let mut diagnostics = Diagnostics::new(issue.document_name());
    let result = process_issue(issue, issue_id, config, &mut diagnostics);
    (issue_id, result, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_sorted_issues() {
        let root = TempDir::new().unwrap();
        for issue in ["bmtnabe_1914-05_01", "bmtnabe_1914-04_01"] {
            touch(&root.path().join(issue).join(format!("{issue}.mets.xml")));
            touch(&root.path().join(issue).join("alto").join("page_0001.xml"));
        }

        let mut diagnostics = Diagnostics::new("data");
        let issues = discover_issues(root.path(), &mut diagnostics).unwrap();

        assert_eq!(issues.len(), 2);
        assert!(issues[0].mets.ends_with("bmtnabe_1914-04_01/bmtnabe_1914-04_01.mets.xml"));
        assert!(issues[1].alto_dir.ends_with("bmtnabe_1914-05_01/alto"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_discover_skips_incomplete_issues() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("no_mets").join("alto").join("page_0001.xml"));
        touch(&root.path().join("scans").join("tiff").join("page_0001.tif"));
        touch(&root.path().join("ok").join("ok.mets.xml"));
        touch(&root.path().join("ok").join("alto").join("page_0001.xml"));

        let mut diagnostics = Diagnostics::new("data");
        let issues = discover_issues(root.path(), &mut diagnostics).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].document_name(), "ok.mets.xml");
        assert_eq!(diagnostics.count(DiagnosticKind::SkippedIssue), 2);
    }

    #[test]
    fn test_first_mets_file_wins() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("issue").join("b.mets.xml"));
        touch(&root.path().join("issue").join("a.mets.xml"));
        touch(&root.path().join("issue").join("alto").join("page_0001.xml"));

        let mut diagnostics = Diagnostics::new("data");
        let issues = discover_issues(root.path(), &mut diagnostics).unwrap();
        assert_eq!(issues[0].document_name(), "a.mets.xml");
    }

    #[test]
    fn test_missing_root() {
        let root = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new("data");
        let result = discover_issues(&root.path().join("missing"), &mut diagnostics);
        assert!(matches!(result, Err(PipelineError::Walk { .. })));
    }
}
