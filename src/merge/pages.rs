//! Page extraction and manipulation operations.
//!
//! This module handles page-level operations including:
//! - Page rotation
//! - Single page extraction
//! - Materializing inherited page attributes

use crate::error::{PdfDeskError, Result};
use lopdf::{Document, Object, ObjectId};
use std::fmt;
use std::str::FromStr;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    /// Rotate 90 degrees clockwise.
    Clockwise,
    /// Rotate 90 degrees counter-clockwise.
    CounterClockwise,
}

impl RotationDirection {
    /// Signed rotation in degrees (clockwise is positive).
    pub fn degrees(&self) -> i64 {
        match self {
            Self::Clockwise => 90,
            Self::CounterClockwise => -90,
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "clockwise"),
            Self::CounterClockwise => write!(f, "counter-clockwise"),
        }
    }
}

impl FromStr for RotationDirection {
    type Err = PdfDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cw" | "clockwise" => Ok(Self::Clockwise),
            "ccw" | "counterclockwise" | "counter-clockwise" => Ok(Self::CounterClockwise),
            _ => Err(PdfDeskError::invalid_input(format!(
                "Invalid rotation direction: {s}. Must be one of: cw, ccw"
            ))),
        }
    }
}

/// Normalize a rotation into `0..360`.
///
/// The PDF `/Rotate` entry must be a multiple of 90; negative values are
/// folded back into range.
pub fn normalize_rotation(degrees: i64) -> i64 {
    degrees.rem_euclid(360)
}

/// Page editor for rotating and extracting pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageEditor;

impl PageEditor {
    /// Create a new page editor.
    pub fn new() -> Self {
        Self
    }

    /// Get the number of pages in a document.
    pub fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    /// Rotate all pages in a document by `degrees`.
    ///
    /// The rotation is added to each page's effective rotation, including a
    /// value inherited from the page tree, and stored on the page itself.
    ///
    /// # Returns
    ///
    /// The number of pages rotated.
    ///
    /// # Errors
    ///
    /// Returns an error if `degrees` is not a multiple of 90 or a page object
    /// is not a dictionary.
    pub fn rotate_all_pages(&self, doc: &mut Document, degrees: i64) -> Result<usize> {
        if degrees % 90 != 0 {
            return Err(PdfDeskError::pdf_operation(format!(
                "Rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        for &page_id in &page_ids {
            self.rotate_page(doc, page_id, degrees)?;
        }

        Ok(page_ids.len())
    }

    /// Rotate a single page.
    fn rotate_page(&self, doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
        let current_rotation = self
            .inherited_attribute(doc, page_id, b"Rotate")
            .and_then(|r| r.as_i64().ok())
            .unwrap_or(0);

        let dict = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfDeskError::pdf_operation(format!("Failed to get page: {e}")))?;

        dict.set(
            "Rotate",
            Object::Integer(normalize_rotation(current_rotation + degrees)),
        );

        Ok(())
    }

    /// Extract one page (1-based) into a new document.
    ///
    /// All other pages are removed and objects that are no longer reachable
    /// are pruned.
    ///
    /// # Errors
    ///
    /// Returns an error if the page number is out of range.
    pub fn extract_page(&self, doc: &Document, page_number: u32) -> Result<Document> {
        let page_count = doc.get_pages().len() as u32;

        if page_number == 0 || page_number > page_count {
            return Err(PdfDeskError::pdf_operation(format!(
                "Page {page_number} does not exist (document has {page_count} pages)"
            )));
        }

        let mut extracted = doc.clone();

        // The surviving page keeps its inherited attributes once the rest of
        // the tree is gone.
        if let Some(page_id) = extracted.get_pages().get(&page_number).copied() {
            self.materialize_inherited(&mut extracted, page_id)?;
        }

        let to_delete: Vec<u32> = (1..=page_count).filter(|&p| p != page_number).collect();
        extracted.delete_pages(&to_delete);
        extracted.prune_objects();

        Ok(extracted)
    }

    /// Copy inheritable attributes from the page's ancestors onto the page.
    ///
    /// Needed before a page is moved under a different `Pages` node, which
    /// would otherwise silently change its size, resources or rotation.
    pub fn materialize_inherited(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
        for key in INHERITABLE_KEYS {
            let own = doc
                .get_dictionary(page_id)
                .map(|d| d.has(key))
                .unwrap_or(false);
            if own {
                continue;
            }
            if let Some(value) = self.inherited_attribute(doc, page_id, key) {
                inherited.push((key.to_vec(), value));
            }
        }

        let dict = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfDeskError::pdf_operation(format!("Failed to get page: {e}")))?;
        for (key, value) in inherited {
            dict.set(key, value);
        }

        Ok(())
    }

    /// Look up `key` on the page or the nearest ancestor that defines it.
    fn inherited_attribute(&self, doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;

        for _ in 0..MAX_TREE_DEPTH {
            let dict = doc.get_dictionary(current).ok()?;
            if let Ok(value) = dict.get(key) {
                return Some(value.clone());
            }
            current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        }

        None
    }
}
