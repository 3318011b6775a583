//! pdfdesk - Arrange and merge the PDF files of a working directory.
//!
//! This library keeps the PDF files of one directory as an ordered working
//! set and provides the editing actions on it:
//!
//! - Reordering, selecting and deleting documents
//! - Rotating every page of a document by a quarter turn
//! - Splitting a document into one file per page
//! - Merging the set, in order, into a single document
//! - Named save paths for merged documents
//!
//! PDF parsing and writing are done with `lopdf` behind the
//! [`codec::PdfCodec`] trait.
//!
//! # Examples
//!
//! ## Working set
//!
//! ```no_run
//! use pdfdesk::config::Config;
//! use pdfdesk::document::DocumentSet;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut set = DocumentSet::open(&config).await?;
//!
//! set.select(&["cover.pdf", "chapter1.pdf"]);
//! set.move_up("chapter1.pdf");
//!
//! let summary = set.merge(Path::new("output/book.pdf")).await?;
//! println!("Created {} page document", summary.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Session actions
//!
//! ```no_run
//! use pdfdesk::config::Config;
//! use pdfdesk::document::DocumentSet;
//! use pdfdesk::registry::PathRegistry;
//! use pdfdesk::session::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let set = DocumentSet::open(&config).await?;
//! let registry = PathRegistry::open(&config.registry_file)?;
//! let session = Session::new(set, registry, &config.output_dir);
//!
//! session.apply_line("rotate scan.pdf").await?;
//! session.apply_line("merge invoices").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use codec::{LopdfCodec, PdfCodec};
pub use config::Config;
pub use document::{DocumentRecord, DocumentSet};
pub use error::{PdfDeskError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
