//! Multi-file report aggregation.
//!
//! Turns a list of `title, coverage-file[, junit-file]` lines into a single
//! markdown table. The table shape is fixed in a first pass over all
//! descriptors; rows are then rendered against it in input order.

use super::types::{MultiReport, ReportRow, TableShape};
use crate::config::ReportOptions;
use crate::descriptor::{self, ReportDescriptor};
use crate::types::{CoverageFigure, TestSummary};
use log::debug;

/// Build the table shape and rows for `options.multiple_files`.
///
/// The first collaborator error aborts the whole report.
pub fn build_rows<C, X>(options: &ReportOptions, coverage: C, junit: X) -> Result<(TableShape, Vec<ReportRow>), String>
where
    C: Fn(&ReportOptions) -> Result<CoverageFigure, String>,
    X: Fn(&ReportOptions) -> Result<Option<TestSummary>, String>,
{
    let descriptors = descriptor::parse_lines(&options.multiple_files);
    let shape = TableShape::for_descriptors(&descriptors);
    debug!("{} of {} lines are report descriptors, {:?} table", descriptors.len(), options.multiple_files.len(), shape);

    let rows = descriptors
        .iter()
        .map(|d| build_row(options, d, &coverage, &junit))
        .collect::<Result<Vec<_>, String>>()?;

    Ok((shape, rows))
}

fn build_row<C, X>(options: &ReportOptions, descriptor: &ReportDescriptor, coverage: &C, junit: &X) -> Result<ReportRow, String>
where
    C: Fn(&ReportOptions) -> Result<CoverageFigure, String>,
    X: Fn(&ReportOptions) -> Result<Option<TestSummary>, String>,
{
    let row_options = options.for_descriptor(descriptor);
    let figure = coverage(&row_options).map_err(|e| format!("{}: {}", descriptor.title, e))?;
    let summary = junit(&row_options).map_err(|e| format!("{}: {}", descriptor.title, e))?;

    Ok(ReportRow { title: descriptor.title.clone(), coverage: figure, summary })
}

/// Render a header and rows into one markdown table.
pub fn render_table(shape: TableShape, rows: &[ReportRow]) -> String {
    let mut table = String::from(shape.header());
    for row in rows {
        table.push_str(&row.render(shape));
    }
    table
}

/// Render the multi-file report.
///
/// Returns `NoDescriptors` when no line parses; any collaborator failure is
/// returned as an error and no partial table is produced.
pub fn render_multi_report<C, X>(options: &ReportOptions, coverage: C, junit: X) -> Result<MultiReport, String>
where
    C: Fn(&ReportOptions) -> Result<CoverageFigure, String>,
    X: Fn(&ReportOptions) -> Result<Option<TestSummary>, String>,
{
    let (shape, rows) = build_rows(options, coverage, junit)?;
    if rows.is_empty() {
        return Ok(MultiReport::NoDescriptors);
    }
    let markdown = render_table(shape, &rows);
    Ok(MultiReport::Table { markdown, shape, rows })
}

#[cfg(test)]
#[path = "multi_test.rs"]
mod multi_test;
