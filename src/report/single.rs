//! Single coverage file report.
//!
//! Used when no multi-file entries are configured: the coverage figure for
//! `cov_file`, followed by the JUnit summary table when a JUnit file is set.

use super::types::ReportRow;
use crate::config::ReportOptions;
use crate::junit;
use crate::types::{CoverageFigure, TestSummary};

/// Build the row for the single configured coverage file.
pub fn build_single_row<C, X>(options: &ReportOptions, coverage: C, junit: X) -> Result<ReportRow, String>
where
    C: Fn(&ReportOptions) -> Result<CoverageFigure, String>,
    X: Fn(&ReportOptions) -> Result<Option<TestSummary>, String>,
{
    let figure = coverage(options)?;
    let summary = junit(options)?;
    Ok(ReportRow { title: options.title.clone(), coverage: figure, summary })
}

/// Render a single-file report row as markdown.
pub fn render_single(options: &ReportOptions, row: &ReportRow) -> String {
    let mut out = row.coverage.html.clone();
    out.push('\n');
    if let Some(ref summary) = row.summary {
        out.push('\n');
        out.push_str(&junit::render_summary_table(summary, &options.xml_title));
    }
    out
}
