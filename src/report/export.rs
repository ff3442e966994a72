//! Report export functions for Markdown and JSON formats.
//!
//! This module handles writing rendered reports to disk for later
//! publishing or analysis.

use super::types::{ReportRow, TableShape};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write the rendered markdown report.
///
/// Ensures a non-empty report ends with a newline; an empty report is
/// written as an empty file.
pub fn export_markdown_report(markdown: &str, output_path: &Path) -> std::io::Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;
    if !markdown.is_empty() && !markdown.ends_with('\n') {
        writeln!(file)?;
    }
    Ok(())
}

/// Export report rows as JSON.
///
/// # Arguments
/// * `rows` - All rendered rows, in report order
/// * `shape` - Table layout, or None for a single-file or failed report
/// * `multiple` - Whether the report was configured with multi-file entries
/// * `title` - Report title
/// * `output_path` - Path to write the JSON file
pub fn export_json_report(
    rows: &[ReportRow],
    shape: Option<TableShape>,
    multiple: bool,
    title: &str,
    output_path: &Path,
) -> std::io::Result<()> {
    use serde_json::json;

    let tests: u64 = rows.iter().filter_map(|r| r.summary.as_ref()).map(|s| s.tests).sum();
    let failures: u64 = rows.iter().filter_map(|r| r.summary.as_ref()).map(|s| s.failures + s.errors).sum();

    let report = json!({
        "title": title,
        "generated": chrono::Local::now().to_rfc3339(),
        "mode": if multiple { "multiple" } else { "single" },
        "table_shape": shape,
        "totals": {
            "entries": rows.len(),
            "tests": tests,
            "failures_and_errors": failures,
        },
        "rows": rows,
    });

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report)?;

    Ok(())
}
