//! Configuration module for pdfdesk.
//!
//! This module holds the validated, normalized configuration that drives a
//! pdfdesk run. It is built from CLI arguments (see [`crate::cli`]) and
//! handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Resolution of the split and overwrite policies

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PdfDeskError, Result};

/// Default working directory holding the PDFs to edit.
pub const DEFAULT_WORKING_DIR: &str = "static/input";

/// Default directory merged documents are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default location of the named save path registry.
pub const DEFAULT_REGISTRY_FILE: &str = "savepaths.json";

/// Default prefix for document display URLs.
pub const DEFAULT_URL_PREFIX: &str = "/static/input";

/// What happens to the source file after a successful split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Delete the source file once its pages have been written (default).
    #[default]
    RemoveSource,
    /// Leave the source file on disk; it only leaves the working set.
    KeepSource,
}

impl SplitPolicy {
    /// Returns true if the source file is deleted after a split.
    pub fn removes_source(&self) -> bool {
        matches!(self, Self::RemoveSource)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Never overwrite, error if the file exists (default).
    #[default]
    NoClobber,
    /// Always overwrite.
    Force,
}

impl FromStr for OverwriteMode {
    type Err = PdfDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "no-clobber" | "noclobber" => Ok(Self::NoClobber),
            "force" => Ok(Self::Force),
            _ => Err(PdfDeskError::invalid_config(format!(
                "Invalid overwrite mode: {s}. Must be one of: no-clobber, force"
            ))),
        }
    }
}

/// Number of CPU cores, or 1 if it cannot be determined.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Complete configuration for a pdfdesk run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose PDF files form the document set.
    pub working_dir: PathBuf,

    /// Directory merged documents are written to.
    pub output_dir: PathBuf,

    /// JSON file holding the named save paths.
    pub registry_file: PathBuf,

    /// Prefix used to build each document's display URL.
    pub url_prefix: String,

    /// Split source handling.
    pub split_policy: SplitPolicy,

    /// Merge output overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Number of files read concurrently during a scan (None = auto-detect).
    pub jobs: Option<usize>,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            registry_file: PathBuf::from(DEFAULT_REGISTRY_FILE),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            split_policy: SplitPolicy::default(),
            overwrite_mode: OverwriteMode::default(),
            jobs: None,
            quiet: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output directory is the working directory (merged files would
    ///   be picked up as inputs on the next scan)
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfDeskError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.jobs == Some(0) {
            return Err(PdfDeskError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if self.working_dir.as_os_str().is_empty() {
            return Err(PdfDeskError::invalid_config(
                "Working directory cannot be empty",
            ));
        }

        let working = std::path::absolute(&self.working_dir)?;
        let output = std::path::absolute(&self.output_dir)?;
        if working == output {
            return Err(PdfDeskError::invalid_config(format!(
                "Output directory cannot be the working directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Get the effective number of concurrent reads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(default_jobs)
    }

    /// Default tracing filter directive for this configuration.
    ///
    /// `RUST_LOG` still takes precedence when set.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "pdfdesk=debug"
        } else if self.quiet {
            "pdfdesk=warn"
        } else {
            "pdfdesk=info"
        }
    }
}
