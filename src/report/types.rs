//! Report type definitions for the rendering model.
//!
//! This module defines the table shape chosen for a multi-file report,
//! the rows rendered into it, and the outcome of rendering.

use crate::descriptor::ReportDescriptor;
use crate::junit;
use crate::types::{CoverageFigure, TestSummary};
use serde::Serialize;

/// Cell shown for test columns of rows without a JUnit file.
pub const MISSING_CELL: &str = "-";

/// Column layout of a multi-file table.
///
/// Chosen once per table so every row has the same number of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    /// Title and Coverage only
    Minimal,
    /// Title, Coverage, Tests, Skipped, Failures, Errors, Time
    Extended,
}

impl TableShape {
    /// Extended if any descriptor carries a JUnit file, Minimal otherwise.
    pub fn for_descriptors(descriptors: &[ReportDescriptor]) -> Self {
        if descriptors.iter().any(ReportDescriptor::has_xml) { TableShape::Extended } else { TableShape::Minimal }
    }

    /// Number of columns in this layout.
    pub fn column_count(&self) -> usize {
        match self {
            TableShape::Minimal => 2,
            TableShape::Extended => 7,
        }
    }

    /// Header and separator lines, newline-terminated.
    pub fn header(&self) -> &'static str {
        match self {
            TableShape::Minimal => "| Title | Coverage |\n| ----- | ----- |\n",
            TableShape::Extended => {
                "| Title | Coverage | Tests | Skipped | Failures | Errors | Time |\n\
                 | ----- | ----- | ----- | ------- | -------- | -------- | ------------------ |\n"
            }
        }
    }
}

/// One rendered entry of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub title: String,
    pub coverage: CoverageFigure,
    /// None when the entry has no JUnit file
    pub summary: Option<TestSummary>,
}

impl ReportRow {
    /// Cell contents for the given layout.
    pub fn cells(&self, shape: TableShape) -> Vec<String> {
        let mut cells = vec![self.title.clone(), self.coverage.html.clone()];
        if shape == TableShape::Extended {
            match &self.summary {
                Some(summary) => cells.extend(junit::summary_cells(summary)),
                None => cells.extend(std::iter::repeat_n(MISSING_CELL.to_string(), 5)),
            }
        }
        debug_assert_eq!(cells.len(), shape.column_count());
        cells
    }

    /// Render as a markdown table line, newline-terminated.
    pub fn render(&self, shape: TableShape) -> String {
        let cells: Vec<String> = self.cells(shape).iter().map(|c| escape_cell(c)).collect();
        format!("| {} |\n", cells.join(" | "))
    }
}

/// Escape column separators inside a cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Outcome of rendering a multi-file report.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiReport {
    /// Header plus one line per descriptor
    Table { markdown: String, shape: TableShape, rows: Vec<ReportRow> },
    /// Every input line was empty or malformed
    NoDescriptors,
}

impl MultiReport {
    /// Markdown text; empty when there were no descriptors.
    pub fn markdown(&self) -> &str {
        match self {
            MultiReport::Table { markdown, .. } => markdown,
            MultiReport::NoDescriptors => "",
        }
    }

    /// Table layout, or None when there were no descriptors.
    pub fn shape(&self) -> Option<TableShape> {
        match self {
            MultiReport::Table { shape, .. } => Some(*shape),
            MultiReport::NoDescriptors => None,
        }
    }

    /// Rendered rows, in input order.
    pub fn rows(&self) -> &[ReportRow] {
        match self {
            MultiReport::Table { rows, .. } => rows,
            MultiReport::NoDescriptors => &[],
        }
    }
}
