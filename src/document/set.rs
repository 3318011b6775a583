//! The ordered working set of documents.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec::{LopdfCodec, PdfCodec};
use crate::config::{Config, SplitPolicy, default_jobs};
use crate::document::record::DocumentRecord;
use crate::error::{PdfDeskError, Result};
use crate::io::{file_name_of, remove_file, scan_directory};
use crate::merge::{MergeSummary, RotationDirection};

/// One line of a merge plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Filename of the document.
    pub filename: String,
    /// Pages it contributes.
    pub page_count: usize,
    /// Size of the file in bytes.
    pub size_bytes: u64,
}

/// What a merge of the current set would produce.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergePlan {
    /// Documents in merge order.
    pub entries: Vec<PlanEntry>,
    /// Sum of the page counts.
    pub total_pages: usize,
    /// Sum of the file sizes.
    pub total_bytes: u64,
}

impl MergePlan {
    /// Returns true if there is nothing to merge.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered collection of PDF documents from one working directory.
///
/// The order is chosen by the user and is exactly the order used by
/// [`DocumentSet::merge`]. Filenames are unique within a set.
#[derive(Debug)]
pub struct DocumentSet<C = LopdfCodec> {
    working_directory: PathBuf,
    records: Vec<DocumentRecord>,
    codec: C,
    split_policy: SplitPolicy,
    jobs: usize,
    url_prefix: Option<String>,
}

impl DocumentSet<LopdfCodec> {
    /// Open the working directory named by `config` and load its documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory exists but cannot be read.
    pub async fn open(config: &Config) -> Result<Self> {
        let mut set = Self::new(
            config.working_dir.clone(),
            LopdfCodec::with_overwrite_mode(config.overwrite_mode),
        )
        .with_split_policy(config.split_policy)
        .with_jobs(config.effective_jobs());

        set.reload().await?;
        set.assign_urls(&config.url_prefix);
        Ok(set)
    }
}

impl<C: PdfCodec> DocumentSet<C> {
    /// Create an empty set over `working_directory`.
    pub fn new(working_directory: impl Into<PathBuf>, codec: C) -> Self {
        Self {
            working_directory: working_directory.into(),
            records: Vec::new(),
            codec,
            split_policy: SplitPolicy::default(),
            jobs: default_jobs(),
            url_prefix: None,
        }
    }

    /// Set what happens to a source file after it has been split.
    pub fn with_split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Set how many files are read concurrently while loading.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Replace the set with the PDF files found in `directory`.
    ///
    /// Records are ordered by filename; any manual order is discarded. A
    /// missing directory yields an empty set.
    ///
    /// # Returns
    ///
    /// The number of documents loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if `directory` exists but cannot be read.
    pub async fn load(&mut self, directory: &Path) -> Result<usize> {
        let paths = scan_directory(directory)?;

        let codec = &self.codec;
        let mut records: Vec<DocumentRecord> = stream::iter(paths)
            .map(|path| DocumentRecord::load(path, codec))
            .buffered(self.jobs)
            .collect()
            .await;

        if let Some(prefix) = &self.url_prefix {
            for record in &mut records {
                record.assign_url(prefix);
            }
        }

        self.records = records;
        info!(
            dir = %directory.display(),
            documents = self.records.len(),
            "loaded document set"
        );

        Ok(self.records.len())
    }

    /// Reload the set from the working directory.
    pub async fn reload(&mut self) -> Result<usize> {
        let directory = self.working_directory.clone();
        self.load(&directory).await
    }

    /// Position of the document named `filename`.
    pub fn find(&self, filename: &str) -> Option<usize> {
        self.records.iter().position(|r| r.filename() == filename)
    }

    /// The document named `filename`.
    pub fn get(&self, filename: &str) -> Option<&DocumentRecord> {
        self.find(filename).map(|i| &self.records[i])
    }

    /// Swap a document with its predecessor.
    ///
    /// Returns false, changing nothing, if the document is absent or first.
    pub fn move_up(&mut self, filename: &str) -> bool {
        match self.find(filename) {
            Some(i) if i > 0 => {
                self.records.swap(i - 1, i);
                true
            }
            _ => false,
        }
    }

    /// Swap a document with its successor.
    ///
    /// Returns false, changing nothing, if the document is absent or last.
    pub fn move_down(&mut self, filename: &str) -> bool {
        match self.find(filename) {
            Some(i) if i + 1 < self.records.len() => {
                self.records.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Remove a document from the set and delete its file.
    ///
    /// Returns false if no document is named `filename`. A file that is
    /// already gone from disk is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeskError::FailedToDelete`] if the file could not be
    /// removed. The document has already left the set at that point and
    /// comes back on the next reload.
    pub async fn delete(&mut self, filename: &str) -> Result<bool> {
        let Some(index) = self.find(filename) else {
            debug!(filename, "delete of unknown document ignored");
            return Ok(false);
        };

        let record = self.records.remove(index);
        match remove_file(record.path()).await {
            Ok(true) => info!(filename, "deleted document"),
            Ok(false) => debug!(filename, "document file was already gone"),
            Err(e) => {
                warn!(filename, error = %e, "document left the set but its file remains");
                return Err(e);
            }
        }

        Ok(true)
    }

    /// Rotate every page of a document by a quarter turn and rewrite it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeskError::DocumentNotFound`] if no document is named
    /// `filename`, or the codec's error if the rewrite fails (the file is
    /// then unchanged).
    pub async fn rotate(&mut self, filename: &str, direction: RotationDirection) -> Result<()> {
        let index = self
            .find(filename)
            .ok_or_else(|| PdfDeskError::document_not_found(filename))?;

        let path = self.records[index].path().to_path_buf();
        self.codec.rewrite_rotated(&path, direction.degrees()).await?;
        self.records[index].refresh_metadata(&self.codec).await;

        info!(filename, %direction, "rotated document");
        Ok(())
    }

    /// Split a document into one file per page.
    ///
    /// The pages are written next to the source as `<stem>_page_<i><ext>`
    /// and replace the source record at its position, in page order. Under
    /// [`SplitPolicy::RemoveSource`] the source file is then deleted.
    ///
    /// # Returns
    ///
    /// The filenames of the new documents; empty if no document is named
    /// `filename`.
    ///
    /// # Errors
    ///
    /// - [`PdfDeskError::NothingToSplit`] if the document has fewer than two pages
    /// - [`PdfDeskError::NameCollision`] if a page filename is already taken
    ///   in the set or on disk; nothing is written in that case
    /// - the codec's error if a page cannot be written; pages written so far
    ///   are removed again
    pub async fn split(&mut self, filename: &str) -> Result<Vec<String>> {
        let Some(index) = self.find(filename) else {
            debug!(filename, "split of unknown document ignored");
            return Ok(Vec::new());
        };

        let source = self.records[index].path().to_path_buf();
        let page_count = self.codec.page_count(&source).await?;
        if page_count <= 1 {
            return Err(PdfDeskError::NothingToSplit {
                filename: filename.to_string(),
                page_count,
            });
        }

        let outputs = split_paths(&source, &self.working_directory, page_count);
        for output in &outputs {
            let name = file_name_of(output);
            if self.find(&name).is_some() || output.exists() {
                return Err(PdfDeskError::NameCollision { filename: name });
            }
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(page_count);
        for (page, output) in (1..).zip(&outputs) {
            match self.codec.extract_page(&source, page, output).await {
                Ok(path) => written.push(path),
                Err(e) => {
                    for path in &written {
                        if let Err(cleanup) = remove_file(path).await {
                            warn!(error = %cleanup, "cannot remove partial split output");
                        }
                    }
                    return Err(e);
                }
            }
        }

        let mut new_records = Vec::with_capacity(written.len());
        for path in written {
            let mut record = DocumentRecord::load(path, &self.codec).await;
            if let Some(prefix) = &self.url_prefix {
                record.assign_url(prefix);
            }
            new_records.push(record);
        }
        let names: Vec<String> = new_records
            .iter()
            .map(|r| r.filename().to_string())
            .collect();

        self.records.splice(index..=index, new_records);
        info!(filename, pages = page_count, "split document");

        if self.split_policy.removes_source() {
            if let Err(e) = remove_file(&source).await {
                warn!(filename, error = %e, "split succeeded but the source file remains");
                return Err(e);
            }
        }

        Ok(names)
    }

    /// Narrow the set to the documents named in `filenames`.
    ///
    /// Relative order is kept and no file is touched.
    ///
    /// # Returns
    ///
    /// The number of documents dropped from the set.
    pub fn select<S: AsRef<str>>(&mut self, filenames: &[S]) -> usize {
        let wanted: HashSet<&str> = filenames.iter().map(|f| f.as_ref()).collect();
        let before = self.records.len();

        self.records.retain(|r| wanted.contains(r.filename()));

        let dropped = before - self.records.len();
        debug!(kept = self.records.len(), dropped, "selected documents");
        dropped
    }

    /// Summarize what [`DocumentSet::merge`] would produce, touching nothing.
    pub fn plan(&self) -> MergePlan {
        let entries: Vec<PlanEntry> = self
            .records
            .iter()
            .map(|r| PlanEntry {
                filename: r.filename().to_string(),
                page_count: r.page_count(),
                size_bytes: r.size_bytes(),
            })
            .collect();

        MergePlan {
            total_pages: entries.iter().map(|e| e.page_count).sum(),
            total_bytes: entries.iter().map(|e| e.size_bytes).sum(),
            entries,
        }
    }

    /// Concatenate every page of every document, in set order, into `output`.
    ///
    /// The output is written atomically: it is either the complete merged
    /// document or left untouched.
    ///
    /// # Errors
    ///
    /// - [`PdfDeskError::NoFilesToMerge`] if the set is empty
    /// - [`PdfDeskError::OutputIsInput`] if `output` is one of the documents
    /// - the codec's error if an input cannot be read or the output written
    pub async fn merge(&self, output: &Path) -> Result<MergeSummary> {
        if self.records.is_empty() {
            return Err(PdfDeskError::NoFilesToMerge);
        }

        if self.records.iter().any(|r| same_path(r.path(), output)) {
            return Err(PdfDeskError::OutputIsInput {
                path: output.to_path_buf(),
            });
        }

        let inputs: Vec<PathBuf> = self.records.iter().map(|r| r.path().to_path_buf()).collect();
        let summary = self.codec.concatenate(&inputs, output).await?;

        info!(
            output = %summary.output.display(),
            files = summary.files_merged,
            pages = summary.total_pages,
            "merged documents"
        );
        Ok(summary)
    }

    /// Delete every document, front to back.
    ///
    /// # Returns
    ///
    /// The number of documents deleted.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be removed; that document and
    /// all after it stay in the set.
    pub async fn delete_all(&mut self) -> Result<usize> {
        let mut deleted = 0;

        while let Some(record) = self.records.first() {
            let path = record.path().to_path_buf();
            remove_file(&path).await?;
            self.records.remove(0);
            deleted += 1;
        }

        info!(deleted, "cleared document set");
        Ok(deleted)
    }

    /// Give every document a display URL under `prefix`.
    ///
    /// Documents added later by a reload or split get one too.
    pub fn assign_urls(&mut self, prefix: &str) {
        for record in &mut self.records {
            record.assign_url(prefix);
        }
        self.url_prefix = Some(prefix.to_string());
    }

    /// Documents in order.
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Filenames in order.
    pub fn filenames(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.filename()).collect()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no documents.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Directory the set was opened on.
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Total number of pages across all documents.
    pub fn total_pages(&self) -> usize {
        self.records.iter().map(|r| r.page_count()).sum()
    }

    /// Split source handling in effect.
    pub fn split_policy(&self) -> SplitPolicy {
        self.split_policy
    }
}

/// Page file paths for a split of `source` into `page_count` files.
fn split_paths(source: &Path, fallback_dir: &Path, page_count: usize) -> Vec<PathBuf> {
    let dir = source.parent().unwrap_or(fallback_dir);
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..=page_count)
        .map(|page| dir.join(format!("{stem}_page_{page}{ext}")))
        .collect()
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
impl<C: PdfCodec> DocumentSet<C> {
    pub(crate) fn with_records(mut self, records: Vec<DocumentRecord>) -> Self {
        self.records = records;
        self
    }
}
