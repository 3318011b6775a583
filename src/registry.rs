//! Named save paths and merge destinations.
//!
//! A named path is a short label (with a description) that prefixes the
//! filename of a merged document. The registry is kept in a small JSON file
//! and every change is written back immediately.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PdfDeskError, Result};
use crate::io::writer::discard_partial;

/// Format of the filename suggested for a merged document.
pub const DEFAULT_FILENAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S.pdf";

/// A named merge destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPath {
    /// Identifier, assigned in ascending order and never reused.
    pub id: u64,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    paths: Vec<NamedPath>,
}

/// JSON-file backed collection of [`NamedPath`]s.
#[derive(Debug)]
pub struct PathRegistry {
    file: PathBuf,
    next_id: u64,
    paths: Vec<NamedPath>,
}

impl PathRegistry {
    /// Open the registry stored in `file`.
    ///
    /// A missing file is an empty registry; it is created on the first change.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeskError::RegistryCorrupted`] if the file exists but is
    /// not a valid registry.
    pub fn open(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();

        let stored = match std::fs::read_to_string(&file) {
            Ok(contents) => serde_json::from_str::<RegistryFile>(&contents).map_err(|e| {
                PdfDeskError::RegistryCorrupted {
                    path: file.clone(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %file.display(), "no registry file yet");
                RegistryFile::default()
            }
            Err(e) => {
                return Err(PdfDeskError::FileNotAccessible {
                    path: file,
                    source: e,
                });
            }
        };

        let mut paths = stored.paths;
        paths.sort_by_key(|p| p.id);
        let max_id = paths.last().map(|p| p.id).unwrap_or(0);

        Ok(Self {
            file,
            next_id: stored.next_id.max(max_id + 1),
            paths,
        })
    }

    /// All named paths, ordered by id.
    pub fn list(&self) -> &[NamedPath] {
        &self.paths
    }

    /// The named path with `id`.
    pub fn get(&self, id: u64) -> Option<&NamedPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// The named path called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&NamedPath> {
        let name = name.trim();
        self.paths.iter().find(|p| p.name == name)
    }

    /// Add a named path.
    ///
    /// The name is trimmed before it is stored.
    ///
    /// # Errors
    ///
    /// - [`PdfDeskError::InvalidInput`] if the name is empty or contains a
    ///   path separator
    /// - [`PdfDeskError::DuplicateName`] if the name is taken
    /// - a storage error if the registry cannot be written
    pub fn create(&mut self, name: &str, description: &str) -> Result<NamedPath> {
        let name = validate_name(name)?;
        if self.find_by_name(&name).is_some() {
            return Err(PdfDeskError::DuplicateName { name });
        }

        let path = NamedPath {
            id: self.next_id,
            name,
            description: description.trim().to_string(),
        };
        self.next_id += 1;
        self.paths.push(path.clone());
        self.persist()?;

        info!(id = path.id, name = %path.name, "created named path");
        Ok(path)
    }

    /// Change the name and description of the named path with `id`.
    ///
    /// Returns false if there is no such named path.
    ///
    /// # Errors
    ///
    /// Same as [`PathRegistry::create`]; the name may stay unchanged.
    pub fn update(&mut self, id: u64, name: &str, description: &str) -> Result<bool> {
        let name = validate_name(name)?;
        if self.paths.iter().any(|p| p.name == name && p.id != id) {
            return Err(PdfDeskError::DuplicateName { name });
        }

        let Some(path) = self.paths.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        path.name = name;
        path.description = description.trim().to_string();
        self.persist()?;

        info!(id, "updated named path");
        Ok(true)
    }

    /// Remove the named path with `id`.
    ///
    /// Returns false if there is no such named path.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let before = self.paths.len();
        self.paths.retain(|p| p.id != id);
        if self.paths.len() == before {
            return Ok(false);
        }

        self.persist()?;
        info!(id, "deleted named path");
        Ok(true)
    }

    /// File the registry is stored in.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Write the registry to a temp file and rename it over the real one.
    fn persist(&self) -> Result<()> {
        let stored = RegistryFile {
            next_id: self.next_id,
            paths: self.paths.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| PdfDeskError::other(format!("Cannot serialize registry: {e}")))?;

        if let Some(parent) = self.file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PdfDeskError::FailedToCreateOutput {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut temp_name = self.file.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".partial");
        let temp = self.file.with_file_name(temp_name);

        let write = std::fs::write(&temp, json).and_then(|()| std::fs::rename(&temp, &self.file));
        if let Err(e) = write {
            discard_partial(&temp);
            return Err(PdfDeskError::FailedToWrite {
                path: self.file.clone(),
                source: e,
            });
        }

        debug!(file = %self.file.display(), entries = self.paths.len(), "saved registry");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PdfDeskError::invalid_input("Name is required"));
    }
    if name.contains(['/', '\\']) {
        return Err(PdfDeskError::invalid_input(format!(
            "Name cannot contain a path separator: {name}"
        )));
    }
    Ok(name.to_string())
}

/// Filename suggested for a merge made at `now`: `YYYY-MM-DD_HH-MM-SS.pdf`.
pub fn default_filename(now: DateTime<Local>) -> String {
    now.format(DEFAULT_FILENAME_FORMAT).to_string()
}

/// Filename of a merge saved under a named path: `<name>_<filename>`.
pub fn destination_filename(name: &str, filename: &str) -> String {
    format!("{name}_{filename}")
}

/// Full path of a merged document in `output_dir`.
///
/// With a named path the file is called `<name>_<filename>`, otherwise just
/// `<filename>`.
pub fn destination_path(output_dir: &Path, named: Option<&NamedPath>, filename: &str) -> PathBuf {
    match named {
        Some(path) => output_dir.join(destination_filename(&path.name, filename)),
        None => output_dir.join(filename),
    }
}
