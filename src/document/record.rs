//! A single PDF file in the working set.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::codec::PdfCodec;
use crate::io::file_name_of;

/// Format used to render modification times.
pub const MODIFIED_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// A PDF file and the metadata shown for it.
///
/// The metadata reflects the file as it was when last loaded or refreshed;
/// changes made to the file outside pdfdesk are not noticed until the next
/// reload.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    path: PathBuf,
    filename: String,
    size_bytes: u64,
    modified_at: Option<DateTime<Local>>,
    page_count: usize,
    display_url: Option<String>,
}

impl DocumentRecord {
    /// Read a record for the file at `path`.
    ///
    /// Reading is lenient: an unreadable size becomes 0, an unreadable
    /// modification time is left unset and a file that cannot be parsed gets
    /// a page count of 0.
    pub async fn load<C: PdfCodec>(path: PathBuf, codec: &C) -> Self {
        let mut record = Self {
            filename: file_name_of(&path),
            path,
            size_bytes: 0,
            modified_at: None,
            page_count: 0,
            display_url: None,
        };
        record.refresh_metadata(codec).await;
        record
    }

    /// Re-read size, modification time and page count from disk.
    pub async fn refresh_metadata<C: PdfCodec>(&mut self, codec: &C) {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => {
                self.size_bytes = metadata.len();
                self.modified_at = metadata.modified().ok().map(DateTime::<Local>::from);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read file metadata");
                self.size_bytes = 0;
                self.modified_at = None;
            }
        }

        self.page_count = match codec.page_count(&self.path).await {
            Ok(count) => count,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot count pages");
                0
            }
        };
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename, the record's key within a set.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size of the file in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Last modification time, if the file system reported one.
    pub fn modified_at(&self) -> Option<DateTime<Local>> {
        self.modified_at
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// URL under which the file is served, once assigned.
    pub fn display_url(&self) -> Option<&str> {
        self.display_url.as_deref()
    }

    /// Size rendered with [`human_readable_size`].
    pub fn size_label(&self) -> String {
        human_readable_size(self.size_bytes)
    }

    /// Modification time as `HH:MM:SS DD.MM.YYYY`, or `unknown`.
    pub fn modified_label(&self) -> String {
        self.modified_at
            .map(|t| t.format(MODIFIED_FORMAT).to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub(crate) fn assign_url(&mut self, prefix: &str) {
        self.display_url = Some(format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            urlencoding::encode(&self.filename)
        ));
    }
}

/// Render a byte count with binary (1024) steps and one decimal place.
///
/// # Examples
///
/// ```
/// use pdfdesk::document::human_readable_size;
///
/// assert_eq!(human_readable_size(1024), "1.0 KB");
/// assert_eq!(human_readable_size(1023), "1023.0 B");
/// ```
pub fn human_readable_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.1} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
impl DocumentRecord {
    /// Record with fixed metadata, for tests that do not touch disk.
    pub(crate) fn fixture(path: impl Into<PathBuf>, page_count: usize) -> Self {
        let path = path.into();
        Self {
            filename: file_name_of(&path),
            path,
            size_bytes: 0,
            modified_at: None,
            page_count,
            display_url: None,
        }
    }
}
