//! Integration tests for merging the working set.

use pdfdesk::codec::LopdfCodec;
use pdfdesk::config::OverwriteMode;
use pdfdesk::document::DocumentSet;
use pdfdesk::error::PdfDeskError;
use pdfdesk::merge::RotationDirection;

use crate::common::{
    Workspace, effective_rotations, page_rotations, page_widths, rotate_page_tree,
};

#[tokio::test]
async fn test_merge_two_documents_in_order() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100, 101]);
    ws.add_pdf("b.pdf", &[200]);
    std::fs::create_dir(&ws.output).unwrap();
    let set = DocumentSet::open(&ws.config()).await.unwrap();

    let output = ws.output.join("merged.pdf");
    let summary = set.merge(&output).await.unwrap();

    assert_eq!(summary.files_merged, 2);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.output, output);
    assert_eq!(page_widths(&output), vec![100, 101, 200]);
}

#[tokio::test]
async fn test_merge_follows_manual_order() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    ws.add_pdf("c.pdf", &[300, 301]);
    std::fs::create_dir(&ws.output).unwrap();
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    set.move_up("c.pdf");
    set.move_up("c.pdf");

    let output = ws.output.join("merged.pdf");
    set.merge(&output).await.unwrap();

    assert_eq!(page_widths(&output), vec![300, 301, 100, 200]);
}

#[tokio::test]
async fn test_merge_keeps_rotation() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    std::fs::create_dir(&ws.output).unwrap();
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    set.rotate("b.pdf", RotationDirection::Clockwise)
        .await
        .unwrap();

    let output = ws.output.join("merged.pdf");
    set.merge(&output).await.unwrap();

    assert_eq!(page_rotations(&output), vec![0, 90]);
}

#[tokio::test]
async fn test_merge_keeps_inherited_rotation_per_document() {
    let ws = Workspace::new();
    let a = ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200, 201]);
    rotate_page_tree(&a, 90);
    std::fs::create_dir(&ws.output).unwrap();
    let set = DocumentSet::open(&ws.config()).await.unwrap();

    let output = ws.output.join("merged.pdf");
    set.merge(&output).await.unwrap();

    assert_eq!(effective_rotations(&output), vec![90, 0, 0]);
    assert_eq!(page_widths(&output), vec![100, 200, 201]);
}

#[tokio::test]
async fn test_merge_empty_set() {
    let ws = Workspace::new();
    let set = DocumentSet::open(&ws.config()).await.unwrap();

    let result = set.merge(&ws.output.join("merged.pdf")).await;

    assert!(matches!(result, Err(PdfDeskError::NoFilesToMerge)));
}

#[tokio::test]
async fn test_merge_into_an_input_is_rejected() {
    let ws = Workspace::new();
    let a = ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    let set = DocumentSet::open(&ws.config()).await.unwrap();

    let result = set.merge(&a).await;

    assert!(matches!(result, Err(PdfDeskError::OutputIsInput { .. })));
    assert_eq!(page_widths(&a), vec![100]);
}

#[tokio::test]
async fn test_merge_does_not_replace_existing_output() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    std::fs::create_dir(&ws.output).unwrap();
    let output = ws.output.join("merged.pdf");
    std::fs::write(&output, b"earlier result").unwrap();

    let set = DocumentSet::open(&ws.config()).await.unwrap();
    let result = set.merge(&output).await;

    assert!(matches!(result, Err(PdfDeskError::OutputExists { .. })));
    assert_eq!(std::fs::read(&output).unwrap(), b"earlier result");
}

#[tokio::test]
async fn test_forced_merge_replaces_existing_output() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    std::fs::create_dir(&ws.output).unwrap();
    let output = ws.output.join("merged.pdf");
    std::fs::write(&output, b"earlier result").unwrap();

    let mut config = ws.config();
    config.overwrite_mode = OverwriteMode::Force;
    let set = DocumentSet::open(&config).await.unwrap();
    set.merge(&output).await.unwrap();

    assert_eq!(page_widths(&output), vec![100]);
}

#[tokio::test]
async fn test_failed_merge_leaves_no_output() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_file("broken.pdf", b"not a pdf at all");
    std::fs::create_dir(&ws.output).unwrap();

    let mut set = DocumentSet::new(&ws.input, LopdfCodec::new());
    set.reload().await.unwrap();

    let output = ws.output.join("merged.pdf");
    assert!(set.merge(&output).await.is_err());
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(&ws.output).unwrap().count(), 0);
}

#[tokio::test]
async fn test_plan_matches_merge() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100, 101]);
    ws.add_pdf("b.pdf", &[200]);
    std::fs::create_dir(&ws.output).unwrap();
    let set = DocumentSet::open(&ws.config()).await.unwrap();

    let plan = set.plan();
    let summary = set.merge(&ws.output.join("merged.pdf")).await.unwrap();

    assert_eq!(plan.total_pages, summary.total_pages);
    assert_eq!(plan.entries.len(), summary.files_merged);
    assert_eq!(plan.entries[0].filename, "a.pdf");
}
