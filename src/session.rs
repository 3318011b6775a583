//! Interactive editing session.
//!
//! A [`Session`] turns user actions into document set operations. Actions
//! arrive as text lines (see [`Action`]'s `FromStr`), run one at a time and
//! report an [`Outcome`] for the front end to display. An action that fails
//! leaves the session usable for the next one.

use chrono::Local;
use globset::{Glob, GlobSetBuilder};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::codec::{LopdfCodec, PdfCodec};
use crate::document::{DocumentRecord, DocumentSet, MergePlan};
use crate::error::{PdfDeskError, Result};
use crate::io::is_pdf_path;
use crate::merge::{MergeSummary, RotationDirection};
use crate::registry::{NamedPath, PathRegistry, default_filename, destination_path};

/// Placeholder for "no named path" in a `merge` line.
pub const NO_NAMED_PATH: &str = "-";

/// Usage shown by the `help` action.
pub const HELP: &str = "\
Actions:
  list                        show the documents in merge order
  reload                      rescan the working directory (resets the order)
  up <file>                   move a document one place up
  down <file>                 move a document one place down
  delete <file>               remove a document and delete its file
  rotate <file>   (cw)        rotate every page 90 degrees clockwise
  rotate-ccw <file> (ccw)     rotate every page 90 degrees counter-clockwise
  split <file>                split a document into one file per page
  select <file|glob>...       keep only the matching documents (\"quote\" names with spaces)
  plan                        show what a merge would produce
  merge [<path>] [<file>]     merge into the output directory ('-' for no named path)
  clean                       delete every document and its file
  paths                       list the named save paths
  help                        show this help
  quit                        leave the session";

/// A single user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the documents.
    List,
    /// Rescan the working directory.
    Reload,
    /// Move a document up.
    Up(String),
    /// Move a document down.
    Down(String),
    /// Delete a document and its file.
    Delete(String),
    /// Rotate every page of a document.
    Rotate(String, RotationDirection),
    /// Split a document into single pages.
    Split(String),
    /// Narrow the set to matching filenames or glob patterns.
    Select(Vec<String>),
    /// Show the merge plan.
    Plan,
    /// Merge the set.
    Merge {
        /// Named path (by name or id) prefixing the output filename.
        named: Option<String>,
        /// Output filename; a timestamp name is used when absent.
        filename: Option<String>,
    },
    /// Delete every document.
    Clean,
    /// List named paths.
    Paths,
    /// Show usage.
    Help,
    /// End the session.
    Quit,
}

impl FromStr for Action {
    type Err = PdfDeskError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let filename = || {
            if rest.is_empty() {
                Err(PdfDeskError::invalid_input(format!("'{verb}' needs a filename")))
            } else {
                Ok(rest.to_string())
            }
        };

        let action = match verb.to_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "reload" => Self::Reload,
            "up" => Self::Up(filename()?),
            "down" => Self::Down(filename()?),
            "delete" | "rm" => Self::Delete(filename()?),
            "rotate" | "cw" => Self::Rotate(filename()?, RotationDirection::Clockwise),
            "rotate-ccw" | "ccw" => {
                Self::Rotate(filename()?, RotationDirection::CounterClockwise)
            }
            "split" => Self::Split(filename()?),
            "select" => {
                let names = split_arguments(rest)?;
                if names.is_empty() {
                    return Err(PdfDeskError::invalid_input(
                        "'select' needs at least one filename or pattern",
                    ));
                }
                Self::Select(names)
            }
            "plan" => Self::Plan,
            "merge" => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                if args.len() > 2 {
                    return Err(PdfDeskError::invalid_input(
                        "usage: merge [<named path>|-] [<filename>]",
                    ));
                }
                let named = args
                    .first()
                    .filter(|&&n| n != NO_NAMED_PATH)
                    .map(|n| n.to_string());
                let filename = args.get(1).map(|f| f.to_string());
                Self::Merge { named, filename }
            }
            "clean" => Self::Clean,
            "paths" => Self::Paths,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "" => return Err(PdfDeskError::invalid_input("empty action")),
            other => {
                return Err(PdfDeskError::invalid_input(format!(
                    "unknown action '{other}', try 'help'"
                )));
            }
        };

        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Reload => write!(f, "reload"),
            Self::Up(name) => write!(f, "up {name}"),
            Self::Down(name) => write!(f, "down {name}"),
            Self::Delete(name) => write!(f, "delete {name}"),
            Self::Rotate(name, RotationDirection::Clockwise) => write!(f, "rotate {name}"),
            Self::Rotate(name, RotationDirection::CounterClockwise) => {
                write!(f, "rotate-ccw {name}")
            }
            Self::Split(name) => write!(f, "split {name}"),
            Self::Select(names) => {
                let args: Vec<String> = names.iter().map(|n| quote_argument(n)).collect();
                write!(f, "select {}", args.join(" "))
            }
            Self::Plan => write!(f, "plan"),
            Self::Merge { named, filename } => {
                write!(f, "merge")?;
                match (named, filename) {
                    (None, None) => Ok(()),
                    (Some(named), None) => write!(f, " {named}"),
                    (named, Some(filename)) => write!(
                        f,
                        " {} {filename}",
                        named.as_deref().unwrap_or(NO_NAMED_PATH)
                    ),
                }
            }
            Self::Clean => write!(f, "clean"),
            Self::Paths => write!(f, "paths"),
            Self::Help => write!(f, "help"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// What an action did.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The current documents, in order.
    Documents(Vec<DocumentRecord>),
    /// A move was requested; `moved` is false at a boundary or for an
    /// unknown filename.
    Moved {
        /// Document that was moved.
        filename: String,
        /// Whether the order changed.
        moved: bool,
    },
    /// A delete was requested.
    Deleted {
        /// Document that was deleted.
        filename: String,
        /// Whether the document was part of the set.
        existed: bool,
    },
    /// A document was rotated.
    Rotated {
        /// Document that was rotated.
        filename: String,
        /// Direction of the quarter turn.
        direction: RotationDirection,
    },
    /// A document was split; `pages` is empty for an unknown filename.
    Split {
        /// Document that was split.
        filename: String,
        /// Filenames of the page documents.
        pages: Vec<String>,
    },
    /// The set was narrowed.
    Selected {
        /// Documents left in the set.
        kept: usize,
        /// Documents dropped from the set.
        dropped: usize,
    },
    /// What a merge would produce.
    Plan(MergePlan),
    /// The set was merged.
    Merged(MergeSummary),
    /// Documents were deleted by `clean`.
    Cleaned {
        /// Number of documents deleted.
        deleted: usize,
    },
    /// The named save paths.
    Paths(Vec<NamedPath>),
    /// Usage text.
    Help,
    /// The session should end.
    Quit,
}

/// Routes actions to a shared document set.
///
/// The set and the registry sit behind async mutexes, so at most one action
/// mutates them at any time even when a session is shared between tasks.
#[derive(Debug)]
pub struct Session<C = LopdfCodec> {
    documents: Arc<Mutex<DocumentSet<C>>>,
    registry: Arc<Mutex<PathRegistry>>,
    output_dir: PathBuf,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            registry: Arc::clone(&self.registry),
            output_dir: self.output_dir.clone(),
        }
    }
}

impl<C: PdfCodec> Session<C> {
    /// Create a session over `documents`, saving merges into `output_dir`.
    pub fn new(
        documents: DocumentSet<C>,
        registry: PathRegistry,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
            registry: Arc::new(Mutex::new(registry)),
            output_dir: output_dir.into(),
        }
    }

    /// The shared document set.
    pub fn documents(&self) -> Arc<Mutex<DocumentSet<C>>> {
        Arc::clone(&self.documents)
    }

    /// The shared named path registry.
    pub fn registry(&self) -> Arc<Mutex<PathRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Directory merged documents are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Parse and apply one action line.
    pub async fn apply_line(&self, line: &str) -> Result<Outcome> {
        let action: Action = line.parse()?;
        self.apply(action).await
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation. The session stays
    /// usable afterwards.
    pub async fn apply(&self, action: Action) -> Result<Outcome> {
        debug!(%action, "applying action");
        let mut set = self.documents.lock().await;

        let outcome = match action {
            Action::List => Outcome::Documents(set.records().to_vec()),
            Action::Reload => {
                set.reload().await?;
                Outcome::Documents(set.records().to_vec())
            }
            Action::Up(filename) => {
                let moved = set.move_up(&filename);
                Outcome::Moved { filename, moved }
            }
            Action::Down(filename) => {
                let moved = set.move_down(&filename);
                Outcome::Moved { filename, moved }
            }
            Action::Delete(filename) => {
                let existed = set.delete(&filename).await?;
                Outcome::Deleted { filename, existed }
            }
            Action::Rotate(filename, direction) => {
                set.rotate(&filename, direction).await?;
                Outcome::Rotated {
                    filename,
                    direction,
                }
            }
            Action::Split(filename) => {
                let pages = set.split(&filename).await?;
                Outcome::Split { filename, pages }
            }
            Action::Select(patterns) => {
                let selected = expand_selection(&patterns, &set.filenames())?;
                let dropped = set.select(&selected);
                Outcome::Selected {
                    kept: set.len(),
                    dropped,
                }
            }
            Action::Plan => Outcome::Plan(set.plan()),
            Action::Merge { named, filename } => {
                let output = self
                    .resolve_destination(named.as_deref(), filename.as_deref())
                    .await?;
                ensure_dir(&self.output_dir).await?;
                Outcome::Merged(set.merge(&output).await?)
            }
            Action::Clean => Outcome::Cleaned {
                deleted: set.delete_all().await?,
            },
            Action::Paths => Outcome::Paths(self.registry.lock().await.list().to_vec()),
            Action::Help => Outcome::Help,
            Action::Quit => Outcome::Quit,
        };

        Ok(outcome)
    }

    /// Output path for a merge under the optional named path.
    ///
    /// `named` is matched by name first, then by numeric id. Without a
    /// filename a timestamp name is used; a filename without a `.pdf`
    /// extension gets one.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeskError::NamedPathNotFound`] for an unknown named path
    /// and [`PdfDeskError::InvalidInput`] for a filename that is not a plain
    /// file name.
    pub async fn resolve_destination(
        &self,
        named: Option<&str>,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let named_path = match named {
            Some(named) => {
                let registry = self.registry.lock().await;
                let found = registry.find_by_name(named).cloned().or_else(|| {
                    named
                        .parse::<u64>()
                        .ok()
                        .and_then(|id| registry.get(id).cloned())
                });
                Some(found.ok_or_else(|| PdfDeskError::NamedPathNotFound {
                    name: named.to_string(),
                })?)
            }
            None => None,
        };

        let filename = match filename {
            Some(name) => output_filename(name)?,
            None => default_filename(Local::now()),
        };

        Ok(destination_path(
            &self.output_dir,
            named_path.as_ref(),
            &filename,
        ))
    }
}

/// Resolve filenames and glob patterns against the current filenames.
///
/// Plain names are kept as given; patterns (containing `*`, `?`, `[` or `{`)
/// are replaced by every current filename they match.
///
/// # Errors
///
/// Returns [`PdfDeskError::InvalidInput`] for a malformed pattern.
pub fn expand_selection<S: AsRef<str>>(patterns: &[S], filenames: &[&str]) -> Result<Vec<String>> {
    let mut selected = Vec::new();
    let mut globs = GlobSetBuilder::new();
    let mut has_globs = false;

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if pattern.contains(['*', '?', '[', '{']) {
            let glob = Glob::new(pattern).map_err(|e| {
                PdfDeskError::invalid_input(format!("Invalid pattern '{pattern}': {e}"))
            })?;
            globs.add(glob);
            has_globs = true;
        } else {
            selected.push(pattern.to_string());
        }
    }

    if has_globs {
        let set = globs
            .build()
            .map_err(|e| PdfDeskError::invalid_input(format!("Invalid pattern: {e}")))?;
        selected.extend(
            filenames
                .iter()
                .filter(|name| set.is_match(name))
                .map(|name| name.to_string()),
        );
    }

    Ok(selected)
}

/// Split `line` at whitespace, keeping `"..."` or `'...'` quoted runs together.
fn split_arguments(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if quote.is_some() {
        return Err(PdfDeskError::invalid_input(format!(
            "Unterminated quote in '{line}'"
        )));
    }
    if in_arg {
        args.push(current);
    }

    Ok(args)
}

fn quote_argument(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

fn output_filename(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(PdfDeskError::invalid_input(format!(
            "Output filename must be a plain file name: '{name}'"
        )));
    }

    if is_pdf_path(Path::new(name)) {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.pdf"))
    }
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PdfDeskError::FailedToCreateOutput {
            path: dir.to_path_buf(),
            source: e,
        })
}
