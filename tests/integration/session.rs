//! Integration tests for session action routing.

use pdfdesk::document::DocumentSet;
use pdfdesk::error::PdfDeskError;
use pdfdesk::registry::PathRegistry;
use pdfdesk::session::{Action, Outcome, Session};

use crate::common::{Workspace, page_widths};

async fn open_session(ws: &Workspace) -> Session {
    let config = ws.config();
    let set = DocumentSet::open(&config).await.unwrap();
    let registry = PathRegistry::open(&config.registry_file).unwrap();
    Session::new(set, registry, &config.output_dir)
}

async fn filenames(session: &Session) -> Vec<String> {
    let documents = session.documents();
    let set = documents.lock().await;
    set.filenames().into_iter().map(str::to_string).collect()
}

#[tokio::test]
async fn test_list_reports_documents() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200, 201]);
    let session = open_session(&ws).await;

    let Outcome::Documents(records) = session.apply(Action::List).await.unwrap() else {
        panic!("expected a document listing");
    };

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].page_count(), 2);
}

#[tokio::test]
async fn test_actions_from_text() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200, 201]);
    ws.add_pdf("c.pdf", &[300]);
    let session = open_session(&ws).await;

    session.apply_line("down a.pdf").await.unwrap();
    assert_eq!(filenames(&session).await, vec!["b.pdf", "a.pdf", "c.pdf"]);

    let outcome = session.apply_line("split b.pdf").await.unwrap();
    assert!(matches!(outcome, Outcome::Split { ref pages, .. } if pages.len() == 2));
    assert_eq!(
        filenames(&session).await,
        vec!["b_page_1.pdf", "b_page_2.pdf", "a.pdf", "c.pdf"]
    );

    let outcome = session.apply_line("select b_page_* c.pdf").await.unwrap();
    assert!(matches!(outcome, Outcome::Selected { kept: 3, dropped: 1 }));
    assert_eq!(
        filenames(&session).await,
        vec!["b_page_1.pdf", "b_page_2.pdf", "c.pdf"]
    );
}

#[tokio::test]
async fn test_errors_leave_session_usable() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    let session = open_session(&ws).await;

    assert!(matches!(
        session.apply_line("rotate missing.pdf").await,
        Err(PdfDeskError::DocumentNotFound { .. })
    ));
    assert!(matches!(
        session.apply_line("split a.pdf").await,
        Err(PdfDeskError::NothingToSplit { .. })
    ));
    assert!(matches!(
        session.apply_line("bogus").await,
        Err(PdfDeskError::InvalidInput { .. })
    ));

    assert!(matches!(
        session.apply_line("rotate a.pdf").await.unwrap(),
        Outcome::Rotated { .. }
    ));
}

#[tokio::test]
async fn test_merge_with_named_path() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100, 101]);
    ws.add_pdf("b.pdf", &[200]);
    let session = open_session(&ws).await;
    session
        .registry()
        .lock()
        .await
        .create("invoices", "Monthly invoices")
        .unwrap();

    let outcome = session
        .apply_line("merge invoices march.pdf")
        .await
        .unwrap();

    let Outcome::Merged(summary) = outcome else {
        panic!("expected a merge");
    };
    let expected = ws.output.join("invoices_march.pdf");
    assert_eq!(summary.output, expected);
    assert_eq!(page_widths(&expected), vec![100, 101, 200]);
}

#[tokio::test]
async fn test_merge_default_filename() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    let session = open_session(&ws).await;

    let Outcome::Merged(summary) = session.apply(Action::Merge {
        named: None,
        filename: None,
    })
    .await
    .unwrap() else {
        panic!("expected a merge");
    };

    let name = summary.output.file_name().unwrap().to_string_lossy().into_owned();
    // YYYY-MM-DD_HH-MM-SS.pdf
    assert_eq!(name.len(), 23);
    assert!(name.ends_with(".pdf"));
    assert_eq!(summary.output.parent().unwrap(), ws.output);
}

#[tokio::test]
async fn test_merge_with_unknown_named_path() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    let session = open_session(&ws).await;

    let result = session.apply_line("merge nowhere out.pdf").await;

    assert!(matches!(
        result,
        Err(PdfDeskError::NamedPathNotFound { .. })
    ));
    assert!(!ws.output.join("nowhere_out.pdf").exists());
}

#[tokio::test]
async fn test_named_path_by_id() {
    let ws = Workspace::new();
    let session = open_session(&ws).await;
    let id = session
        .registry()
        .lock()
        .await
        .create("taxes", "")
        .unwrap()
        .id;

    let output = session
        .resolve_destination(Some(&id.to_string()), Some("2023"))
        .await
        .unwrap();

    assert_eq!(output, ws.output.join("taxes_2023.pdf"));
}

#[tokio::test]
async fn test_clean_deletes_everything() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf", &[100]);
    ws.add_pdf("b.pdf", &[200]);
    let session = open_session(&ws).await;

    let outcome = session.apply(Action::Clean).await.unwrap();

    assert!(matches!(outcome, Outcome::Cleaned { deleted: 2 }));
    assert!(filenames(&session).await.is_empty());
    assert!(!ws.input_file("a.pdf").exists());
}

#[tokio::test]
async fn test_paths_lists_registry() {
    let ws = Workspace::new();
    let session = open_session(&ws).await;
    session
        .registry()
        .lock()
        .await
        .create("invoices", "")
        .unwrap();

    let Outcome::Paths(paths) = session.apply(Action::Paths).await.unwrap() else {
        panic!("expected named paths");
    };
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].name, "invoices");
}

#[tokio::test]
async fn test_select_quoted_filename() {
    let ws = Workspace::new();
    ws.add_pdf("my scan.pdf", &[100]);
    ws.add_pdf("other.pdf", &[200]);
    let session = open_session(&ws).await;

    let outcome = session.apply_line("select \"my scan.pdf\"").await.unwrap();

    assert!(matches!(outcome, Outcome::Selected { kept: 1, dropped: 1 }));
    assert_eq!(filenames(&session).await, vec!["my scan.pdf"]);
}
