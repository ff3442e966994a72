//! Report generation module - rendering coverage and test results as markdown.
//!
//! This module handles:
//! - Aggregating multi-file entries into one markdown table
//! - Rendering the single coverage file report
//! - Export to Markdown and JSON files
//!
//! # Module Organization
//!
//! - `types` - Rendering types (TableShape, ReportRow, MultiReport)
//! - `multi` - Multi-file table aggregation
//! - `single` - Single coverage file report
//! - `export` - Markdown and JSON export

mod export;
mod multi;
mod single;
mod types;

// Re-export types
pub use types::{MultiReport, ReportRow};

// Re-export aggregation functions
pub use multi::render_multi_report;

// Re-export single report functions
pub use single::{build_single_row, render_single};

// Re-export export functions
pub use export::{export_json_report, export_markdown_report};
