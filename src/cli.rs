//! CLI argument parsing for pdfdesk.
//!
//! This module defines the command-line interface structure using `clap`.
//! Global options locate the working directory, the output directory and the
//! named path registry; each subcommand performs one action on the working
//! set, and `session` reads actions from stdin until `quit`.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdesk::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().expect("Invalid configuration");
//! println!("Working on {}", config.working_dir.display());
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    Config, DEFAULT_OUTPUT_DIR, DEFAULT_REGISTRY_FILE, DEFAULT_URL_PREFIX, DEFAULT_WORKING_DIR,
    OverwriteMode, SplitPolicy,
};
use crate::error::{PdfDeskError, Result};
use crate::merge::RotationDirection;

/// Arrange, rotate, split and merge the PDF files of a working directory.
///
/// The files of the working directory form an ordered working set. Actions
/// reorder, rotate, split or delete them, and `merge` concatenates the set,
/// in order, into one document in the output directory.
#[derive(Parser, Debug)]
#[command(name = "pdfdesk")]
#[command(version)]
#[command(about = "Arrange and merge the PDF files of a working directory", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Directory holding the PDF files to work on
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        env = "PDFDESK_DIR",
        default_value = DEFAULT_WORKING_DIR,
        global = true
    )]
    pub dir: PathBuf,

    /// Directory merged documents are written to
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        env = "PDFDESK_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        global = true
    )]
    pub output_dir: PathBuf,

    /// JSON file holding the named save paths
    #[arg(
        long,
        value_name = "FILE",
        env = "PDFDESK_REGISTRY",
        default_value = DEFAULT_REGISTRY_FILE,
        global = true
    )]
    pub registry: PathBuf,

    /// Prefix of the URLs shown for each document
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_URL_PREFIX, global = true)]
    pub url_prefix: String,

    /// Keep the original file after splitting it into pages
    ///
    /// By default the original is deleted once every page has been written.
    #[arg(long, global = true)]
    pub keep_split_source: bool,

    /// Number of files read concurrently while scanning
    ///
    /// Default is number of CPU cores.
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<usize>,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output - show details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Action to perform (default: list)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the documents of the working set
    List,

    /// Rotate every page of a document by 90 degrees
    Rotate {
        /// Filename of the document
        #[arg(value_name = "FILE")]
        file: String,

        /// Rotate counter-clockwise instead of clockwise
        #[arg(long)]
        ccw: bool,
    },

    /// Split a document into one file per page
    Split {
        /// Filename of the document
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Delete a document
    Delete {
        /// Filename of the document
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Merge the working set into one document
    Merge(MergeArgs),

    /// Delete every document of the working set
    Clean,

    /// Read actions from stdin, one per line
    Session,

    /// Manage named save paths
    Paths {
        /// Registry action (default: list)
        #[command(subcommand)]
        action: Option<PathsCommand>,
    },
}

/// Options of the `merge` subcommand.
#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeArgs {
    /// Merge only these files (names or glob patterns), in directory order
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub only: Vec<String>,

    /// Named save path (name or id) to prefix the output filename with
    #[arg(long, value_name = "NAME")]
    pub dest: Option<String>,

    /// Output filename (default: a timestamp such as 2024-01-31_17-45-00.pdf)
    #[arg(long, value_name = "FILENAME")]
    pub name: Option<String>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file (default)
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Show the merge plan without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Delete the merged documents afterwards
    #[arg(long, conflicts_with = "dry_run")]
    pub clean: bool,
}

/// Subcommands of `paths`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PathsCommand {
    /// List named save paths
    List,

    /// Add a named save path
    Add {
        /// Unique name
        name: String,
        /// Description
        #[arg(default_value = "")]
        description: String,
    },

    /// Change a named save path
    Edit {
        /// Id of the named save path
        id: u64,
        /// New name
        name: String,
        /// New description
        #[arg(default_value = "")]
        description: String,
    },

    /// Remove a named save path
    Remove {
        /// Id of the named save path
        id: u64,
    },
}

impl Command {
    /// Rotation direction of a `rotate` command.
    pub fn rotation(ccw: bool) -> RotationDirection {
        if ccw {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        }
    }
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let overwrite_mode = match &self.command {
            Some(Command::Merge(args)) if args.force => OverwriteMode::Force,
            _ => OverwriteMode::NoClobber,
        };

        let split_policy = if self.keep_split_source {
            SplitPolicy::KeepSource
        } else {
            SplitPolicy::RemoveSource
        };

        let config = Config {
            working_dir: self.dir.clone(),
            output_dir: self.output_dir.clone(),
            registry_file: self.registry.clone(),
            url_prefix: self.url_prefix.clone(),
            split_policy,
            overwrite_mode,
            jobs: self.jobs,
            quiet: self.quiet,
            verbose: self.verbose,
        };

        config.validate().map_err(|e| {
            PdfDeskError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
