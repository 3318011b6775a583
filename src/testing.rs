//! Helpers shared by unit tests.
//!
//! Test documents tag each page with a distinct MediaBox width so page order
//! can be checked after a file has been rewritten.

use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};

/// Build a document with one page per entry of `widths`.
pub fn sample_document(widths: &[i64]) -> Document {
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
    doc
}

/// Write a sample document to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    sample_document(widths).save(&path).unwrap();
    path
}

/// MediaBox widths of the pages of the document at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    page_values(path, |page| {
        page.get(b"MediaBox")
            .and_then(|m| m.as_array())
            .map(|m| m[2].as_i64().unwrap())
            .unwrap()
    })
}

/// `/Rotate` of each page of the document at `path` (0 when unset).
pub fn page_rotations(path: &Path) -> Vec<i64> {
    page_values(path, |page| {
        page.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0)
    })
}

fn page_values(path: &Path, value: impl Fn(&lopdf::Dictionary) -> i64) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| value(doc.get_dictionary(id).unwrap()))
        .collect()
}
