//! I/O operations for pdfdesk.
//!
//! This module handles all file I/O including:
//! - Scanning the working directory for PDF files
//! - Loading PDF documents from disk
//! - Writing PDFs atomically (temp file, then rename)
//! - Removing files from storage
//!
//! Reading and writing are blocking; [`crate::codec::LopdfCodec`] moves them
//! onto the blocking thread pool.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdesk::io::{PdfReader, PdfWriter};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let mut loaded = reader.load(Path::new("input.pdf"))?;
//!
//! let writer = PdfWriter::new();
//! writer.save(&mut loaded.document, Path::new("copy.pdf"))?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod scan;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use scan::{is_pdf_path, scan_directory};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics, remove_file};

use std::path::Path;

/// Filename component of a path as an owned string.
///
/// Non-UTF-8 names are converted lossily; the result is empty for paths
/// without a final component.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
