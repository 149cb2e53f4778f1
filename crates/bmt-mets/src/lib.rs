//! # bmt-mets
//!
//! Reader for the METS structural document of a digitized periodical issue.
//!
//! A METS issue document carries two parts this crate cares about:
//!
//! | Part | Element | Yields |
//! |------|---------|--------|
//! | Descriptive metadata | `dmdSec/.../mods` | volume, number, date, and one `relatedItem` per section |
//! | Logical structure | `structMap[LABEL="Logical Structure"]` | per section, `div`s by role with `area` pointers into ALTO files |
//!
//! Elements are matched by local name, so `mets:dmdSec` and `dmdSec` are
//! the same element.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bmt_core::Diagnostics;
//! use bmt_mets::StructureReader;
//! use std::path::Path;
//!
//! let mut diagnostics = Diagnostics::new("bmtnabe_1914-01_01.mets.xml");
//! let issue = StructureReader::new(&mut diagnostics)
//!     .parse_file(Path::new("bmtnabe_1914-01_01.mets.xml"))?;
//!
//! println!("Volume {} / {} ({})", issue.metadata.volume, issue.metadata.number, issue.metadata.date);
//! for section in &issue.sections {
//!     println!("{} {} {:?}", section.section_id, section.section_type, section.title);
//! }
//! # Ok::<(), bmt_mets::StructureError>(())
//! ```
//!
//! ## Section classification
//!
//! Checked in this order, the first match wins:
//!
//! 1. `typeOfResource` is `still image` → image
//! 2. `typeOfResource` is `text` and the genre mentions `advertisement` → advertisement
//! 3. the title contains `inhalt` → contents (not emitted)
//! 4. has constituent descendants → parent
//! 5. parent element is a section → subsection (grandparent too → error)
//! 6. otherwise → flat
//!
//! Any other resource kind is reported and the section is dropped.

pub mod error;
pub mod reader;

pub use error::{Result, StructureError};
pub use reader::{MetsIssue, StructureReader};

/// `LABEL` of the structural map holding the logical structure.
pub const LOGICAL_STRUCTURE_LABEL: &str = "Logical Structure";

/// `TYPE` of the structural-map div holding a section's text content.
pub const TEXT_CONTENT_TYPE: &str = "TextContent";

/// `TYPE` of the structural-map div holding an advertisement's text.
pub const SPONSORED_AD_TYPE: &str = "SponsoredAd";

/// `roleTerm` marking a creator among a section's names.
pub const CREATOR_ROLE_TERM: &str = "cre";
