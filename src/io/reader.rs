//! PDF reading and loading operations.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdesk::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf"))?;
//! println!("Loaded {} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{PdfDeskError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            file_size,
        }
    }
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// This call blocks while the whole file is parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist
    /// - File is not a valid PDF
    /// - PDF is encrypted
    /// - PDF has no pages (when verification is enabled)
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();

        if !path.exists() {
            return Err(PdfDeskError::file_not_found(path_buf));
        }

        let doc = Document::load(path).map_err(|e| {
            let err_msg = e.to_string();
            let lowered = err_msg.to_lowercase();
            if lowered.contains("encrypt") || lowered.contains("password") {
                PdfDeskError::encrypted_pdf(path_buf.clone())
            } else {
                PdfDeskError::failed_to_load_pdf(path_buf.clone(), err_msg)
            }
        })?;

        if self.verify && doc.get_pages().is_empty() {
            return Err(PdfDeskError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        Ok(LoadedPdf::new(doc, path_buf))
    }

    /// Count the pages of a PDF document.
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        self.load(path).map(|loaded| loaded.page_count)
    }

    /// Load several documents in the order given, stopping at the first failure.
    pub fn load_sequential(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPdf>> {
        paths.iter().map(|path| self.load(path)).collect()
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
