//! Shared helpers for the integration tests.
//!
//! Test PDFs are generated on the fly. Every page gets a distinct MediaBox
//! width, which is how the tests tell pages apart after a merge or split.

#![allow(dead_code)]

use lopdf::{Document, Object, dictionary};
use pdfdesk::config::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch working directory, output directory and registry file.
pub struct Workspace {
    _temp: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
    pub registry: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input");
        let output = temp.path().join("output");
        std::fs::create_dir(&input).unwrap();

        Self {
            registry: temp.path().join("savepaths.json"),
            _temp: temp,
            input,
            output,
        }
    }

    /// Configuration pointing at this workspace.
    pub fn config(&self) -> Config {
        Config {
            working_dir: self.input.clone(),
            output_dir: self.output.clone(),
            registry_file: self.registry.clone(),
            quiet: true,
            jobs: Some(2),
            ..Config::default()
        }
    }

    /// Write a PDF into the working directory.
    pub fn add_pdf(&self, name: &str, widths: &[i64]) -> PathBuf {
        write_pdf(&self.input, name, widths)
    }

    /// Write a non-PDF file into the working directory.
    pub fn add_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.input.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn input_file(&self, name: &str) -> PathBuf {
        self.input.join(name)
    }
}

/// Write a PDF with one page per entry of `widths`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// MediaBox widths of the pages of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}

/// `/Rotate` of each page of the PDF at `path` (0 when unset).
pub fn page_rotations(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Rotate")
                .and_then(|r| r.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

/// Rotation of each page as a viewer sees it, inherited values included.
pub fn effective_rotations(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let mut node = doc.get_dictionary(id).unwrap();
            loop {
                if let Ok(rotate) = node.get(b"Rotate") {
                    return rotate.as_i64().unwrap();
                }
                match node.get(b"Parent").and_then(|p| p.as_reference()) {
                    Ok(parent) => node = doc.get_dictionary(parent).unwrap(),
                    Err(_) => return 0,
                }
            }
        })
        .collect()
}

/// Set `/Rotate` on the root `Pages` node of the PDF at `path`.
pub fn rotate_page_tree(path: &Path, degrees: i64) {
    let mut doc = Document::load(path).unwrap();
    let root = doc
        .catalog()
        .unwrap()
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .unwrap();
    doc.get_dictionary_mut(root).unwrap().set("Rotate", degrees);
    doc.save(path).unwrap();
}
