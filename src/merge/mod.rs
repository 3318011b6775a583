//! Page-level PDF operations.
//!
//! This module provides the document surgery the document set relies on:
//! - Document concatenation in a fixed order
//! - Whole-document rotation
//! - Single page extraction
//!
//! # Examples
//!
//! ```no_run
//! use pdfdesk::io::PdfReader;
//! use pdfdesk::merge::Merger;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let inputs = reader.load_sequential(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])?;
//!
//! let merged = Merger::new().merge_documents(inputs)?;
//! println!("Merged {} pages", merged.get_pages().len());
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod pages;

pub use merger::{MergeSummary, Merger};
pub use pages::{PageEditor, RotationDirection, normalize_rotation};
