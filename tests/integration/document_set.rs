//! Integration tests for the working set against real files.

use pdfdesk::config::SplitPolicy;
use pdfdesk::document::DocumentSet;
use pdfdesk::error::PdfDeskError;
use pdfdesk::merge::RotationDirection;

use crate::common::{Workspace, page_rotations, page_widths};

#[tokio::test]
async fn test_load_sorts_and_filters() {
    let ws = Workspace::new();
    ws.add_pdf("b.pdf", &[200]);
    ws.add_pdf("a.pdf", &[100, 101]);
    ws.add_file("c.txt", b"not a pdf");

    let set = DocumentSet::open(&ws.config()).await.unwrap();

    assert_eq!(set.filenames(), vec!["a.pdf", "b.pdf"]);
    assert_eq!(set.records()[0].page_count(), 2);
    assert_eq!(set.records()[1].page_count(), 1);
    assert_eq!(set.total_pages(), 3);
}

#[tokio::test]
async fn test_load_accepts_upper_case_extension() {
    let ws = Workspace::new();
    ws.add_pdf("SCAN.PDF", &[100]);
    ws.add_pdf("notes.pdf", &[100]);

    let set = DocumentSet::open(&ws.config()).await.unwrap();

    assert_eq!(set.filenames(), vec!["SCAN.PDF", "notes.pdf"]);
}

#[tokio::test]
async fn test_load_missing_directory_is_empty() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.working_dir = ws.input.join("nowhere");

    let set = DocumentSet::open(&config).await.unwrap();

    assert!(set.is_empty());
    assert_eq!(set.working_directory(), config.working_dir);
}

#[tokio::test]
async fn test_unreadable_pdf_gets_zero_pages() {
    let ws = Workspace::new();
    ws.add_file("broken.pdf", b"%PDF-1.4 garbage");
    ws.add_pdf("fine.pdf", &[100]);

    let set = DocumentSet::open(&ws.config()).await.unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.get("broken.pdf").unwrap().page_count(), 0);
    assert_eq!(set.get("fine.pdf").unwrap().page_count(), 1);
}

#[tokio::test]
async fn test_reload_discards_manual_order() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);

    let mut set = DocumentSet::open(&ws.config()).await.unwrap();
    assert!(set.move_down("a.pdf"));
    assert_eq!(set.filenames(), vec!["b.pdf", "a.pdf"]);

    set.reload().await.unwrap();
    assert_eq!(set.filenames(), vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_urls_are_assigned() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);

    let set = DocumentSet::open(&ws.config()).await.unwrap();

    assert_eq!(set.records()[0].display_url(), Some("/static/input/a.pdf"));
}

#[tokio::test]
async fn test_rotate_four_times_restores_orientation() {
    let ws = Workspace::new();
    let path = ws.add_pdf("scan.pdf", &[100, 200]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    set.rotate("scan.pdf", RotationDirection::Clockwise)
        .await
        .unwrap();
    assert_eq!(page_rotations(&path), vec![90, 90]);

    for _ in 0..3 {
        set.rotate("scan.pdf", RotationDirection::Clockwise)
            .await
            .unwrap();
    }
    assert_eq!(page_rotations(&path), vec![0, 0]);
    assert_eq!(page_widths(&path), vec![100, 200]);
}

#[tokio::test]
async fn test_rotate_refreshes_metadata() {
    let ws = Workspace::new();
    let path = ws.add_pdf("scan.pdf", &[100, 200, 300]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    set.rotate("scan.pdf", RotationDirection::CounterClockwise)
        .await
        .unwrap();

    let record = set.get("scan.pdf").unwrap();
    assert_eq!(record.page_count(), 3);
    assert_eq!(record.size_bytes(), std::fs::metadata(&path).unwrap().len());
    assert_eq!(page_rotations(&path), vec![270, 270, 270]);
}

#[tokio::test]
async fn test_rotate_unknown_document() {
    let ws = Workspace::new();
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    let result = set.rotate("missing.pdf", RotationDirection::Clockwise).await;
    assert!(matches!(result, Err(PdfDeskError::DocumentNotFound { .. })));
}

#[tokio::test]
async fn test_split_writes_pages_in_place() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200, 201, 202]);
    ws.add_pdf("c.pdf", &[300]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    let pages = set.split("b.pdf").await.unwrap();

    assert_eq!(pages, vec!["b_page_1.pdf", "b_page_2.pdf", "b_page_3.pdf"]);
    assert_eq!(set.len(), 5);
    assert_eq!(set.find("b.pdf"), None);
    assert_eq!(set.find("b_page_1.pdf"), Some(1));
    assert_eq!(set.find("b_page_3.pdf"), Some(3));
    assert_eq!(page_widths(&ws.input_file("b_page_2.pdf")), vec![201]);
    assert!(!ws.input_file("b.pdf").exists());
    assert!(set.records()[1..4].iter().all(|r| r.page_count() == 1));
}

#[tokio::test]
async fn test_split_keep_source() {
    let ws = Workspace::new();
    ws.add_pdf("b.pdf", &[200, 201]);
    let mut config = ws.config();
    config.split_policy = SplitPolicy::KeepSource;
    let mut set = DocumentSet::open(&config).await.unwrap();

    set.split("b.pdf").await.unwrap();

    assert!(ws.input_file("b.pdf").exists());
    assert_eq!(set.filenames(), vec!["b_page_1.pdf", "b_page_2.pdf"]);
}

#[tokio::test]
async fn test_split_single_page_document() {
    let ws = Workspace::new();
    ws.add_pdf("one.pdf", &[100]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    let result = set.split("one.pdf").await;

    assert!(matches!(result, Err(PdfDeskError::NothingToSplit { .. })));
    assert!(!ws.input_file("one_page_1.pdf").exists());
    assert_eq!(set.filenames(), vec!["one.pdf"]);
}

#[tokio::test]
async fn test_select_does_not_touch_disk() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    ws.add_pdf("c.pdf", &[300]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    assert_eq!(set.select(&["a.pdf"]), 2);

    assert_eq!(set.filenames(), vec!["a.pdf"]);
    assert!(ws.input_file("b.pdf").exists());
    assert!(ws.input_file("c.pdf").exists());
}

#[tokio::test]
async fn test_delete_and_delete_all() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    ws.add_pdf("c.pdf", &[300]);
    let mut set = DocumentSet::open(&ws.config()).await.unwrap();

    assert!(set.delete("b.pdf").await.unwrap());
    assert!(!ws.input_file("b.pdf").exists());
    assert!(!set.delete("b.pdf").await.unwrap());

    assert_eq!(set.delete_all().await.unwrap(), 2);
    assert!(set.is_empty());
    assert!(!ws.input_file("a.pdf").exists());
    assert!(!ws.input_file("c.pdf").exists());
}
