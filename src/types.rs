/// Core data structures for coverage reports
///
/// This module defines the data structures shared by the coverage and
/// JUnit readers and the markdown renderers.
use serde::{Deserialize, Serialize};

/// shields.io badge color for a coverage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Red,
    Orange,
    Yellow,
    Green,
    BrightGreen,
}

impl BadgeColor {
    /// Pick the badge color for a percentage in 0..=100
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 40.0 {
            BadgeColor::Red
        } else if percentage < 60.0 {
            BadgeColor::Orange
        } else if percentage < 80.0 {
            BadgeColor::Yellow
        } else if percentage < 90.0 {
            BadgeColor::Green
        } else {
            BadgeColor::BrightGreen
        }
    }

    /// Color name as understood by shields.io
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Red => "red",
            BadgeColor::Orange => "orange",
            BadgeColor::Yellow => "yellow",
            BadgeColor::Green => "green",
            BadgeColor::BrightGreen => "brightgreen",
        }
    }
}

/// One row of a pytest coverage table (a file, or the TOTAL line)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub name: String,              // "src/app.py"
    pub stmts: u64,                // statements
    pub miss: u64,                 // missed statements
    pub branch: Option<u64>,       // only with --cov-branch
    pub brpart: Option<u64>,       // only with --cov-branch
    pub cover: String,             // "94%" as printed by pytest
    pub missing: String,           // "21, 45-48" (may be empty)
}

impl FileCoverage {
    /// Numeric percentage parsed from the `cover` column
    pub fn percentage(&self) -> f64 {
        self.cover.trim_end_matches('%').parse().unwrap_or(0.0)
    }
}

/// Parsed pytest coverage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageData {
    pub files: Vec<FileCoverage>,
    pub total: FileCoverage,
}

/// Rendered coverage figure for one coverage file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageFigure {
    pub percentage: f64,
    pub color: BadgeColor,
    /// Markdown/HTML placed into the report (badge, or plain percentage)
    pub html: String,
}

/// Aggregated statistics from a JUnit XML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub tests: u64,
    pub skipped: u64,
    pub failures: u64,
    pub errors: u64,
    /// Wall time in seconds
    pub time: f64,
}

impl TestSummary {
    /// Fold another suite's numbers into this summary
    ///
    /// Fails without modifying `self` if any count would overflow.
    pub fn add(&mut self, other: &TestSummary) -> Result<(), String> {
        let sum = |name: &str, a: u64, b: u64| a.checked_add(b).ok_or_else(|| format!("Total '{}' count overflows", name));
        let tests = sum("tests", self.tests, other.tests)?;
        let skipped = sum("skipped", self.skipped, other.skipped)?;
        let failures = sum("failures", self.failures, other.failures)?;
        let errors = sum("errors", self.errors, other.errors)?;

        *self = TestSummary { tests, skipped, failures, errors, time: self.time + other.time };
        Ok(())
    }

    /// Time rounded to milliseconds, formatted without trailing noise
    pub fn display_time(&self) -> String {
        let rounded = (self.time * 1000.0).round() / 1000.0;
        format!("{}", rounded)
    }
}
