//! The working set of PDF documents.
//!
//! A [`DocumentSet`] holds the PDF files of one working directory in a
//! user-controlled order and offers the editing actions: reorder, delete,
//! rotate, split, select and merge. Each file is described by a
//! [`DocumentRecord`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfdesk::config::Config;
//! use pdfdesk::document::DocumentSet;
//! use pdfdesk::merge::RotationDirection;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut set = DocumentSet::open(&Config::default()).await?;
//!
//! set.move_up("appendix.pdf");
//! set.rotate("scan.pdf", RotationDirection::Clockwise).await?;
//! let summary = set.merge(Path::new("output/combined.pdf")).await?;
//! println!("Merged {} pages", summary.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod record;
pub mod set;

pub use record::{DocumentRecord, MODIFIED_FORMAT, human_readable_size};
pub use set::{DocumentSet, MergePlan, PlanEntry};
