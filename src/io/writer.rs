//! PDF writing and removal operations.
//!
//! This module provides safe PDF writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Compression support
//! - Overwrite protection
//! - Write statistics
//!
//! An atomic write either leaves the complete new file at the destination
//! or leaves the destination untouched; the temp file is removed on failure.

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{PdfDeskError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress the PDF before writing.
    pub compress: bool,

    /// Renumber objects before writing.
    pub optimize: bool,

    /// Refuse to replace an existing destination.
    pub no_clobber: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            no_clobber: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that refuses to replace existing files.
    pub fn no_clobber() -> Self {
        Self {
            options: WriteOptions {
                no_clobber: true,
                ..Default::default()
            },
        }
    }

    /// Returns the options this writer uses.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Save a PDF document to a file.
    ///
    /// Blocks until the file is written and, for atomic writes, renamed into
    /// place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The destination exists and the writer is no-clobber
    /// - The output directory doesn't exist or isn't writable
    /// - Serialization or the final rename fails
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        if self.options.no_clobber && path.exists() {
            return Err(PdfDeskError::OutputExists {
                path: path.to_path_buf(),
            });
        }

        if self.options.compress {
            doc.compress();
        }

        if self.options.optimize {
            doc.renumber_objects();
        }

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = self.write_to(doc, &write_path) {
            if self.options.atomic {
                discard_partial(&write_path);
            }
            return Err(err);
        }

        if self.options.atomic {
            std::fs::rename(&write_path, path).map_err(|e| {
                discard_partial(&write_path);
                PdfDeskError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            file_size,
            output_path: path.to_path_buf(),
            compressed: self.options.compress,
        })
    }

    fn write_to(&self, doc: &mut Document, write_path: &Path) -> Result<()> {
        let file =
            std::fs::File::create(write_path).map_err(|e| PdfDeskError::FailedToCreateOutput {
                path: write_path.to_path_buf(),
                source: e,
            })?;

        let mut writer = std::io::BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| PdfDeskError::FailedToWrite {
                path: write_path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|e| PdfDeskError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

/// Temp file used for an atomic write to `path`.
///
/// The temp file sits next to the destination so the final rename never
/// crosses file systems, and it does not end in `.pdf` so a directory scan
/// never picks it up.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Remove the temp file of a failed atomic write, if it was created.
pub(crate) fn discard_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot remove partial file"),
    }
}

/// Remove a file from storage.
///
/// Returns `Ok(false)` if the file was already gone.
///
/// # Errors
///
/// Returns [`PdfDeskError::FailedToDelete`] for any other failure.
pub async fn remove_file(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PdfDeskError::FailedToDelete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
