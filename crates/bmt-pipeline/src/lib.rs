//! # bmt-pipeline
//!
//! Turns issue directories into flat per-section records.
//!
//! ```text
//! METS ──> StructureReader ──> Resolver (+ ALTO) ──> flatten ──> CSV
//! ```
//!
//! One issue is processed by [`process_issue`]; [`run_batch`] walks a data
//! root, numbers the issues and processes them in parallel. An issue that
//! fails is skipped, the batch keeps going.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bmt_pipeline::{records, run_batch, Config};
//! use std::path::Path;
//!
//! let config = Config::discover(None)?;
//! let report = run_batch(Path::new("data"), &config)?;
//! println!("{} of {} issues parsed", report.succeeded, report.total());
//!
//! let path = config.output_path(&config.paths.data, None);
//! records::write_records_file(&path, &report.records, config.separator_byte())?;
//! # Ok::<(), bmt_pipeline::PipelineError>(())
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod flatten;
pub mod records;
pub mod resolve;

pub use batch::{discover_issues, process_issue, run_batch, BatchReport, IssueDir, IssueFailure};
pub use config::{Config, InconsistencyPolicy, OutputPaths};
pub use error::{IssueError, PipelineError, Result};
pub use flatten::flatten;
pub use records::{read_records, write_records};
pub use resolve::Resolver;
