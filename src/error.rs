//! Error types for pdfdesk.
//!
//! This module defines all error types that can occur while editing a
//! document set. Errors carry the path or filename involved so the front
//! end can tell the user which file an action failed on.
//!
//! # Error Categories
//!
//! - **Not found**: a filename or named path the user referenced is unknown
//! - **Storage**: reading, writing or deleting a file failed
//! - **PDF**: a file could not be parsed or manipulated
//! - **Input**: a malformed action, name or configuration value

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfdesk operations.
pub type Result<T> = std::result::Result<T, PdfDeskError>;

/// Main error type for pdfdesk operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfDeskError {
    /// A file on disk was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// A file or directory is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// The referenced filename is not part of the document set.
    #[error("Document not found in the working set: {filename}")]
    DocumentNotFound {
        /// Filename that was looked up.
        filename: String,
    },

    /// A split was requested for a document with fewer than two pages.
    #[error("Cannot split {filename}: it has {page_count} page(s)")]
    NothingToSplit {
        /// Filename of the document.
        filename: String,
        /// Number of pages in the document.
        page_count: usize,
    },

    /// A generated filename is already taken.
    #[error("A file named {filename} already exists in the working set or on disk")]
    NameCollision {
        /// Conflicting filename.
        filename: String,
    },

    /// The document set is empty, so there is nothing to merge.
    #[error("No documents selected for merging")]
    NoFilesToMerge,

    /// The merge destination is one of the merge inputs.
    #[error("Output file cannot be one of the merged documents: {}", .path.display())]
    OutputIsInput {
        /// Path to the output file.
        path: PathBuf,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different file name",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create an output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to delete a file from storage.
    #[error("Failed to delete file: {}\n  Reason: {source}", .path.display())]
    FailedToDelete {
        /// Path of the file that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A page-level PDF operation failed.
    #[error("PDF operation failed: {reason}")]
    PdfOperation {
        /// Description of what went wrong.
        reason: String,
    },

    /// A named path with the same name already exists.
    #[error("A save path named '{name}' already exists")]
    DuplicateName {
        /// The duplicated name.
        name: String,
    },

    /// The referenced named path does not exist.
    #[error("Unknown save path: {name}")]
    NamedPathNotFound {
        /// Name or id that was looked up.
        name: String,
    },

    /// The named-path file could not be parsed.
    #[error("Save path registry is unreadable: {}\n  Reason: {reason}", .path.display())]
    RegistryCorrupted {
        /// Path to the registry file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// User input (an action line, a name) is malformed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what is wrong.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PdfDeskError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: impl Into<PathBuf>) -> Self {
        Self::EncryptedPdf { path: path.into() }
    }

    /// Create a DocumentNotFound error.
    pub fn document_not_found(filename: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            filename: filename.into(),
        }
    }

    /// Create a PdfOperation error.
    pub fn pdf_operation(reason: impl Into<String>) -> Self {
        Self::PdfOperation {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if the session can carry on after this error.
    ///
    /// Recoverable errors leave the document set consistent with the disk,
    /// so the user can simply try another action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. }
                | Self::NothingToSplit { .. }
                | Self::NameCollision { .. }
                | Self::NoFilesToMerge
                | Self::OutputIsInput { .. }
                | Self::OutputExists { .. }
                | Self::DuplicateName { .. }
                | Self::NamedPathNotFound { .. }
                | Self::InvalidInput { .. }
                | Self::EncryptedPdf { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::DocumentNotFound { .. } => 2,
            Self::NamedPathNotFound { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::OutputIsInput { .. } => 4,
            Self::NameCollision { .. } => 4,
            Self::DuplicateName { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::FailedToDelete { .. } => 5,
            Self::RegistryCorrupted { .. } => 5,
            Self::Io { .. } => 5,
            Self::PdfOperation { .. } => 6,
            Self::NothingToSplit { .. } => 1,
            Self::NoFilesToMerge => 1,
            Self::InvalidInput { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
        }
    }
}
