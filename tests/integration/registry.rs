//! Integration tests for the named save path registry.

use pdfdesk::error::PdfDeskError;
use pdfdesk::registry::{PathRegistry, destination_path};

use crate::common::Workspace;

#[test]
fn test_registry_round_trip() {
    let ws = Workspace::new();

    {
        let mut registry = PathRegistry::open(&ws.registry).unwrap();
        registry.create("invoices", "Monthly invoices").unwrap();
        registry.create("taxes", "Tax documents").unwrap();
        registry.create("misc", "").unwrap();
        assert!(registry.delete(2).unwrap());
    }

    let registry = PathRegistry::open(&ws.registry).unwrap();
    let ids: Vec<u64> = registry.list().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(registry.find_by_name("invoices").unwrap().description, "Monthly invoices");
    assert!(registry.find_by_name("taxes").is_none());
}

#[test]
fn test_registry_file_is_plain_json() {
    let ws = Workspace::new();
    let mut registry = PathRegistry::open(&ws.registry).unwrap();
    registry.create("invoices", "Monthly invoices").unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&ws.registry).unwrap()).unwrap();

    assert_eq!(json["paths"][0]["name"], "invoices");
    assert_eq!(json["paths"][0]["id"], 1);
}

#[test]
fn test_duplicate_names_rejected_after_reopen() {
    let ws = Workspace::new();
    PathRegistry::open(&ws.registry)
        .unwrap()
        .create("invoices", "")
        .unwrap();

    let mut reopened = PathRegistry::open(&ws.registry).unwrap();
    assert!(matches!(
        reopened.create("invoices", ""),
        Err(PdfDeskError::DuplicateName { .. })
    ));
}

#[test]
fn test_destination_uses_named_prefix() {
    let ws = Workspace::new();
    let mut registry = PathRegistry::open(&ws.registry).unwrap();
    let named = registry.create("invoices", "").unwrap();

    let path = destination_path(&ws.output, Some(&named), "2024-05-01_10-00-00.pdf");

    assert_eq!(path, ws.output.join("invoices_2024-05-01_10-00-00.pdf"));
}
