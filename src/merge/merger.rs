//! Core PDF merging implementation.
//!
//! This module concatenates loaded documents, in the order given, into a
//! single document.

use lopdf::{Document, Object, ObjectId, dictionary};
use std::path::PathBuf;

use crate::error::{PdfDeskError, Result};
use crate::io::LoadedPdf;

/// Summary of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Where the merged document was written.
    pub output: PathBuf,

    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the input files in bytes.
    pub input_size: u64,

    /// Size of the written output file in bytes.
    pub output_size: u64,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger;

impl Merger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merge loaded PDF documents in order.
    ///
    /// The first document is the base. The page tree of every input is hung
    /// unchanged under a new root `Pages` node, so each page keeps the
    /// attributes it inherits and the page order of the result is exactly
    /// the concatenation of the inputs' page orders.
    ///
    /// # Errors
    ///
    /// Returns an error if no documents are given or a page tree cannot be
    /// updated.
    pub fn merge_documents(&self, loaded_pdfs: Vec<LoadedPdf>) -> Result<Document> {
        let mut inputs = loaded_pdfs.into_iter();
        let first = inputs.next().ok_or(PdfDeskError::NoFilesToMerge)?;

        let mut merged = first.document;
        let mut roots = vec![pages_root(&merged)?];
        let mut total_pages = merged.get_pages().len();

        for loaded in inputs {
            let mut doc = loaded.document;

            // Renumber objects to avoid ID conflicts
            doc.renumber_objects_with(merged.max_id + 1);

            roots.push(pages_root(&doc)?);
            total_pages += doc.get_pages().len();

            merged.max_id = merged.max_id.max(doc.max_id);
            merged.objects.extend(doc.objects);
        }

        if roots.len() > 1 {
            self.join_page_trees(&mut merged, &roots, total_pages)?;
        }

        Ok(merged)
    }

    /// Put the page trees `roots` under a new root `Pages` node of `merged`.
    fn join_page_trees(
        &self,
        merged: &mut Document,
        roots: &[ObjectId],
        total_pages: usize,
    ) -> Result<()> {
        let root_id = merged.new_object_id();

        for &old_root in roots {
            let node = merged.get_dictionary_mut(old_root).map_err(|e| {
                PdfDeskError::pdf_operation(format!("Failed to get pages object: {e}"))
            })?;
            node.set("Parent", Object::Reference(root_id));
        }

        let kids: Vec<Object> = roots.iter().map(|&id| Object::Reference(id)).collect();
        merged.objects.insert(
            root_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total_pages as i64,
            }
            .into(),
        );

        let catalog_id = merged
            .trailer
            .get(b"Root")
            .and_then(|r| r.as_reference())
            .map_err(|e| PdfDeskError::pdf_operation(format!("Failed to get catalog: {e}")))?;
        merged
            .get_dictionary_mut(catalog_id)
            .map_err(|e| PdfDeskError::pdf_operation(format!("Failed to get catalog: {e}")))?
            .set("Pages", Object::Reference(root_id));

        Ok(())
    }
}

/// Id of the root `Pages` node of `doc`.
fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|p| p.as_reference())
        .map_err(|e| PdfDeskError::pdf_operation(format!("Failed to get pages reference: {e}")))
}
