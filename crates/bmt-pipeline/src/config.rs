//! Pipeline configuration (`bmt.toml`)

use crate::error::PipelineError;
use bmt_core::DEFAULT_AUTHOR_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bmt.toml";

/// What to do when a location of a section cannot be resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InconsistencyPolicy {
    /// Drop the whole issue
    #[default]
    AbortIssue,
    /// Drop only the owning section and record an error diagnostic
    DropSection,
}

/// Output file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub data: String,
    /// Prepared disambiguation table
    pub names: String,
    pub disambiguated: String,
    pub collaborators: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            data: "data.csv".to_string(),
            names: "names.csv".to_string(),
            disambiguated: "disambiguated.csv".to_string(),
            collaborators: "collaborators.csv".to_string(),
        }
    }
}

/// Pipeline settings.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field separator of every CSV file, a single ASCII character
    pub csv_separator: String,

    /// Separator between author names within a field
    pub author_separator: String,

    pub output_dir: PathBuf,

    pub inconsistency_policy: InconsistencyPolicy,

    /// Process issues in parallel
    pub parallel: bool,

    pub paths: OutputPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_separator: "\t".to_string(),
            author_separator: DEFAULT_AUTHOR_SEPARATOR.to_string(),
            output_dir: PathBuf::from("output"),
            inconsistency_policy: InconsistencyPolicy::default(),
            parallel: true,
            paths: OutputPaths::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the file cannot be read,
    /// `PipelineError::Config` if it is not valid TOML for this struct, and
    /// `PipelineError::InvalidConfig` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `bmt.toml` from the working directory if
    /// present, else the defaults.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from_file`]. A missing explicit `path` is an error,
    /// a missing default file is not.
    pub fn discover(path: Option<&Path>) -> Result<Self, PipelineError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::debug!("Using config file {DEFAULT_CONFIG_FILE}");
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check value ranges the type system cannot express.
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidConfig` naming the offending key.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.csv_separator.len() != 1 {
            return Err(PipelineError::InvalidConfig(format!(
                "csv_separator must be a single ASCII character, got {:?}",
                self.csv_separator
            )));
        }
        if self.author_separator.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "author_separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// CSV field separator as a byte
    #[must_use]
    pub fn separator_byte(&self) -> u8 {
        self.csv_separator.as_bytes().first().copied().unwrap_or(b'\t')
    }

    /// Path of an output file inside `output_dir`, prefixed with `name` when
    /// given (`<name>_<file>`).
    #[must_use]
    pub fn output_path(&self, file: &str, name: Option<&str>) -> PathBuf {
        match name {
            Some(name) if !name.is_empty() => self.output_dir.join(format!("{name}_{file}")),
            _ => self.output_dir.join(file),
        }
    }
}
