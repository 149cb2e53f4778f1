//! # bmt-alto
//!
//! Text extraction from ALTO OCR files.
//!
//! The structural document points at OCR text by `(file id, location id)`.
//! This crate turns such a pointer into the reconstructed text of the
//! `TextBlock` whose `ID` is the location id:
//!
//! - the file is found by the numeric part of its id ([`locate`])
//! - hyphenated words split over two lines are rejoined from the first
//!   half's `SUBS_CONTENT`, the second half is skipped
//! - tabs become four spaces; words are joined with single spaces
//!
//! ```rust,no_run
//! use bmt_alto::ContentReader;
//!
//! let mut reader = ContentReader::new("bmtnabe_1914-01_01/alto");
//! let texts = reader.resolve("ALTO00001", ["P1_TB00001", "P1_TB00002"])?;
//! for (location, text) in &texts {
//!     match text {
//!         Ok(text) => println!("{location}: {text}"),
//!         Err(e) => eprintln!("{location}: {e}"),
//!     }
//! }
//! # Ok::<(), bmt_alto::ContentError>(())
//! ```

pub mod document;
pub mod error;
pub mod locate;
pub mod reader;

pub use document::{AltoDocument, AltoString, TextBlock};
pub use error::{ContentError, Result};
pub use locate::{locate, numeric_id};
pub use reader::{ContentReader, LocationTexts};

/// `SUBS_TYPE` of the first half of a hyphenated word.
pub const HYPHEN_PART_1: &str = "HypPart1";

/// `SUBS_TYPE` of the second half of a hyphenated word.
pub const HYPHEN_PART_2: &str = "HypPart2";

/// Replacement for a tab character in OCR content.
pub const TAB_EXPANSION: &str = "    ";
