/// pytest coverage report handling
///
/// This module handles:
/// - Parsing `pytest --cov-report=term-missing` text output
/// - Rendering the coverage badge (or plain percentage)
/// - Rendering the per-file coverage details
use crate::config::ReportOptions;
use crate::types::{BadgeColor, CoverageData, CoverageFigure, FileCoverage};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::fs;

lazy_static! {
    // name stmts miss [branch brpart] cover% [missing]
    static ref COVERAGE_LINE: Regex = Regex::new(
        r"^(?P<name>\S+)\s+(?P<stmts>\d+)\s+(?P<miss>\d+)\s+(?:(?P<branch>\d+)\s+(?P<brpart>\d+)\s+)?(?P<cover>\d+(?:\.\d+)?%)(?:\s+(?P<missing>.*))?$"
    )
    .expect("coverage line pattern is valid");
}

/// Parse pytest coverage text into per-file rows and the TOTAL row
///
/// Lines that are not coverage rows (banners, headers, separators, test
/// progress) are skipped. A report without a TOTAL row is an error.
pub fn parse_coverage_text(text: &str) -> Result<CoverageData, String> {
    let mut files = Vec::new();
    let mut total = None;

    for line in text.lines() {
        let line = line.trim_end();
        let Some(caps) = COVERAGE_LINE.captures(line) else {
            continue;
        };

        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u64>().ok());
        let row = FileCoverage {
            name: caps["name"].to_string(),
            stmts: number("stmts").unwrap_or(0),
            miss: number("miss").unwrap_or(0),
            branch: number("branch"),
            brpart: number("brpart"),
            cover: caps["cover"].to_string(),
            missing: caps.name("missing").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        };

        if row.name == "TOTAL" {
            total = Some(row);
        } else {
            files.push(row);
        }
    }

    let total = total.ok_or_else(|| "No TOTAL line found in coverage report".to_string())?;
    debug!("Parsed coverage report: {} files, total {}", files.len(), total.cover);

    Ok(CoverageData { files, total })
}

/// Read and parse a coverage text file
pub fn load_coverage(path: &str) -> Result<CoverageData, String> {
    if path.is_empty() {
        return Err("No coverage file configured".to_string());
    }
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read coverage file {}: {}", path, e))?;
    parse_coverage_text(&text).map_err(|e| format!("{}: {}", path, e))
}

/// Escape text for a shields.io static badge path segment
fn shields_escape(s: &str) -> String {
    s.replace('-', "--").replace('_', "__").replace(' ', "%20")
}

/// Render a shields.io badge image for a percentage
pub fn render_badge(badge_title: &str, percentage: &str, color: BadgeColor) -> String {
    format!(
        "<img alt=\"{}\" src=\"https://img.shields.io/badge/{}-{}%25-{}.svg\" />",
        badge_title,
        shields_escape(badge_title),
        percentage.trim_end_matches('%'),
        color.as_str()
    )
}

/// Render the per-file coverage table inside a collapsible block
pub fn render_file_details(data: &CoverageData, summary: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("<details><summary>{}</summary>\n\n", summary));
    out.push_str("| File | Stmts | Miss | Cover | Missing |\n");
    out.push_str("| :--- | ----: | ---: | ----: | :------ |\n");
    for file in &data.files {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            file.name, file.stmts, file.miss, file.cover, file.missing
        ));
    }
    out.push_str(&format!(
        "| **TOTAL** | **{}** | **{}** | **{}** | |\n",
        data.total.stmts, data.total.miss, data.total.cover
    ));
    out.push_str("\n</details>");
    out
}

/// Turn parsed coverage into the figure placed into a report
pub fn coverage_figure(data: &CoverageData, options: &ReportOptions) -> CoverageFigure {
    let percentage = data.total.percentage();
    let color = BadgeColor::from_percentage(percentage);

    let mut html = if options.hide_badge {
        data.total.cover.clone()
    } else {
        render_badge(&options.badge_title, &data.total.cover, color)
    };

    if !options.hide_report {
        let summary = if options.title.is_empty() { "Coverage Report" } else { options.title.as_str() };
        html.push_str("\n\n");
        html.push_str(&render_file_details(data, summary));
    }

    CoverageFigure { percentage, color, html }
}

/// Coverage collaborator: load `options.cov_file` and render its figure
pub fn get_coverage_report(options: &ReportOptions) -> Result<CoverageFigure, String> {
    let data = load_coverage(&options.cov_file)?;
    if data.files.is_empty() {
        warn!("Coverage report {} lists no files", options.cov_file);
    }
    Ok(coverage_figure(&data, options))
}
