//! Output formatting and display for pdfdesk.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Document listings and merge plans
//! - Action outcomes in session mode
//! - Quiet and verbose modes
//!
//! Diagnostics for developers go through `tracing`; this module is what the
//! user reads.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::config::Config;
use crate::document::{DocumentRecord, MergePlan, human_readable_size};
use crate::merge::MergeSummary;
use crate::registry::NamedPath;
use crate::session::{HELP, Outcome};

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

fn pages_label(count: usize) -> String {
    if count == 1 {
        "1 page".to_string()
    } else {
        format!("{count} pages")
    }
}

/// One-line description of a document.
pub fn document_line(record: &DocumentRecord) -> String {
    format!(
        "{}  ({}, {}, modified {})",
        record.filename(),
        pages_label(record.page_count()),
        record.size_label(),
        record.modified_label()
    )
}

/// One-line description of a named path.
pub fn named_path_line(path: &NamedPath) -> String {
    if path.description.is_empty() {
        format!("[{}] {}", path.id, path.name)
    } else {
        format!("[{}] {} -- {}", path.id, path.name, path.description)
    }
}

/// Display the documents of a set in order.
pub fn display_documents(formatter: &OutputFormatter, records: &[DocumentRecord]) {
    if records.is_empty() {
        formatter.info("No PDF documents in the working set");
        return;
    }

    for (i, record) in records.iter().enumerate() {
        formatter.list_item(i + 1, &document_line(record));
        if let Some(url) = record.display_url() {
            formatter.detail("url", url);
        }
    }

    let total: usize = records.iter().map(|r| r.page_count()).sum();
    formatter.info(&format!(
        "{} document(s), {}",
        records.len(),
        pages_label(total)
    ));
}

/// Display what a merge would produce.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    if plan.is_empty() {
        formatter.warning("Nothing to merge: the working set is empty");
        return;
    }

    formatter.section("Merge plan:");
    for (i, entry) in plan.entries.iter().enumerate() {
        formatter.list_item(
            i + 1,
            &format!("{} ({})", entry.filename, pages_label(entry.page_count)),
        );
    }
    formatter.info(&format!(
        "Total: {} from {} file(s), {} of input",
        pages_label(plan.total_pages),
        plan.entries.len(),
        human_readable_size(plan.total_bytes)
    ));
}

/// Display the result of a merge.
pub fn display_merge_summary(formatter: &OutputFormatter, summary: &MergeSummary) {
    formatter.success(&format!(
        "Merged {} file(s), {} into {}",
        summary.files_merged,
        pages_label(summary.total_pages),
        summary.output.display()
    ));
    formatter.detail("input size", &human_readable_size(summary.input_size));
    formatter.detail("output size", &human_readable_size(summary.output_size));
}

/// Display the named save paths.
pub fn display_paths(formatter: &OutputFormatter, paths: &[NamedPath]) {
    if paths.is_empty() {
        formatter.info("No named save paths defined");
        return;
    }

    for path in paths {
        formatter.plain(&format!("  {}", named_path_line(path)));
    }
}

/// Display the outcome of a session action.
pub fn display_outcome(formatter: &OutputFormatter, outcome: &Outcome) {
    match outcome {
        Outcome::Documents(records) => display_documents(formatter, records),
        Outcome::Moved { filename, moved } => {
            if *moved {
                formatter.success(&format!("Moved {filename}"));
            } else {
                formatter.info(&format!("{filename} did not move"));
            }
        }
        Outcome::Deleted { filename, existed } => {
            if *existed {
                formatter.success(&format!("Deleted {filename}"));
            } else {
                formatter.info(&format!("{filename} is not in the working set"));
            }
        }
        Outcome::Rotated {
            filename,
            direction,
        } => formatter.success(&format!("Rotated {filename} {direction}")),
        Outcome::Split { filename, pages } => {
            if pages.is_empty() {
                formatter.info(&format!("{filename} is not in the working set"));
            } else {
                formatter.success(&format!("Split {filename} into {} file(s)", pages.len()));
                for page in pages {
                    formatter.detail("created", page);
                }
            }
        }
        Outcome::Selected { kept, dropped } => {
            formatter.success(&format!("Kept {kept} document(s), dropped {dropped}"))
        }
        Outcome::Plan(plan) => display_plan(formatter, plan),
        Outcome::Merged(summary) => display_merge_summary(formatter, summary),
        Outcome::Cleaned { deleted } => {
            formatter.success(&format!("Deleted {deleted} document(s)"))
        }
        Outcome::Paths(paths) => display_paths(formatter, paths),
        Outcome::Help => formatter.plain(HELP),
        Outcome::Quit => {}
    }
}
