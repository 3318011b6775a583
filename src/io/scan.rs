//! Working directory scanning.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{PdfDeskError, Result};

/// Extension (compared case-insensitively) of the recognized document type.
pub const PDF_EXTENSION: &str = "pdf";

/// Returns true if the path has a `.pdf` extension in any letter case.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// List the PDF files directly inside `dir`, sorted by filename.
///
/// Only regular files (or links to them) whose extension is `pdf` in any case
/// are returned; subdirectories are not descended into. The sort is an
/// ordinal, case-sensitive comparison of the filenames.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be read.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "working directory does not exist, nothing to scan");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                return Err(PdfDeskError::FileNotAccessible {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_type().is_file() && is_pdf_path(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), found = paths.len(), "scanned working directory");

    Ok(paths)
}
