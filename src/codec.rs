//! The PDF codec seam.
//!
//! [`DocumentSet`](crate::document::DocumentSet) never touches lopdf
//! directly; every read, rewrite, extraction and concatenation goes through
//! a [`PdfCodec`]. [`LopdfCodec`] is the production implementation and runs
//! all parsing and serialization on tokio's blocking thread pool.

use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::OverwriteMode;
use crate::error::{PdfDeskError, Result};
use crate::io::{PdfReader, PdfWriter, WriteOptions};
use crate::merge::{MergeSummary, Merger, PageEditor};

/// Operations the document set needs from a PDF library.
pub trait PdfCodec: Send + Sync {
    /// Number of pages in the document at `path`.
    fn page_count(&self, path: &Path) -> impl Future<Output = Result<usize>> + Send;

    /// Rotate every page of the document at `path` by `degrees` and rewrite
    /// the file in place.
    ///
    /// The rewrite is atomic: on failure the original file is left as it was.
    fn rewrite_rotated(&self, path: &Path, degrees: i64)
    -> impl Future<Output = Result<()>> + Send;

    /// Write page `page_number` (1-based) of `path` to `output` as a
    /// single-page document.
    fn extract_page(
        &self,
        path: &Path,
        page_number: u32,
        output: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;

    /// Concatenate all pages of `inputs`, in order, into `output`.
    fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> impl Future<Output = Result<MergeSummary>> + Send;
}

/// [`PdfCodec`] backed by lopdf.
#[derive(Debug, Clone)]
pub struct LopdfCodec {
    reader: PdfReader,
    counter: PdfReader,
    rewriter: PdfWriter,
    output_writer: PdfWriter,
    editor: PageEditor,
    merger: Merger,
}

impl LopdfCodec {
    /// Create a codec that refuses to replace existing output files.
    pub fn new() -> Self {
        Self::with_overwrite_mode(OverwriteMode::NoClobber)
    }

    /// Create a codec whose extraction and merge outputs follow `mode`.
    ///
    /// In-place rotation always replaces the source file.
    pub fn with_overwrite_mode(mode: OverwriteMode) -> Self {
        let output_writer = PdfWriter::with_options(WriteOptions {
            no_clobber: mode == OverwriteMode::NoClobber,
            ..Default::default()
        });

        Self {
            reader: PdfReader::new(),
            counter: PdfReader::without_verification(),
            rewriter: PdfWriter::new(),
            output_writer,
            editor: PageEditor::new(),
            merger: Merger::new(),
        }
    }
}

impl Default for LopdfCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCodec for LopdfCodec {
    async fn page_count(&self, path: &Path) -> Result<usize> {
        let reader = self.counter.clone();
        let path = path.to_path_buf();
        blocking(move || reader.page_count(&path)).await
    }

    async fn rewrite_rotated(&self, path: &Path, degrees: i64) -> Result<()> {
        let reader = self.reader.clone();
        let writer = self.rewriter.clone();
        let editor = self.editor;
        let path = path.to_path_buf();

        blocking(move || {
            let mut loaded = reader.load(&path)?;
            let rotated = editor.rotate_all_pages(&mut loaded.document, degrees)?;
            let stats = writer.save(&mut loaded.document, &path)?;
            debug!(
                path = %path.display(),
                pages = rotated,
                degrees,
                size = stats.file_size,
                "rewrote rotated document"
            );
            Ok(())
        })
        .await
    }

    async fn extract_page(&self, path: &Path, page_number: u32, output: &Path) -> Result<PathBuf> {
        let reader = self.reader.clone();
        let writer = self.output_writer.clone();
        let editor = self.editor;
        let path = path.to_path_buf();
        let output = output.to_path_buf();

        blocking(move || {
            let loaded = reader.load(&path)?;
            let mut page = editor.extract_page(&loaded.document, page_number)?;
            writer.save(&mut page, &output)?;
            debug!(
                source = %path.display(),
                page = page_number,
                output = %output.display(),
                "extracted page"
            );
            Ok(output)
        })
        .await
    }

    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeSummary> {
        if inputs.is_empty() {
            return Err(PdfDeskError::NoFilesToMerge);
        }

        let reader = self.reader.clone();
        let writer = self.output_writer.clone();
        let merger = self.merger.clone();
        let inputs = inputs.to_vec();
        let output = output.to_path_buf();

        blocking(move || {
            let loaded = reader.load_sequential(&inputs)?;
            let files_merged = loaded.len();
            let total_pages = loaded.iter().map(|pdf| pdf.page_count).sum();
            let input_size = loaded.iter().map(|pdf| pdf.file_size).sum();

            let mut merged = merger.merge_documents(loaded)?;
            // Catalogs and page trees of the appended documents are now unreachable.
            merged.prune_objects();

            let stats = writer.save(&mut merged, &output)?;

            Ok(MergeSummary {
                output,
                files_merged,
                total_pages,
                input_size,
                output_size: stats.file_size,
            })
        })
        .await
    }
}

/// Run blocking lopdf work on the blocking thread pool.
async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PdfDeskError::other(format!("PDF task failed: {e}")))?
}
