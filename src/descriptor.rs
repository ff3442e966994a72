/// Multi-file report descriptors
///
/// This module handles:
/// - Parsing `title, coverage-file[, junit-file]` lines
/// - Dropping empty or malformed lines
use log::debug;

/// One entry of a multi-file report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDescriptor {
    pub title: String,
    pub cov_file: String,
    /// Empty when the line carries no JUnit file
    pub xml_file: String,
}

impl ReportDescriptor {
    /// Whether this entry contributes test statistics
    pub fn has_xml(&self) -> bool {
        !self.xml_file.is_empty()
    }
}

/// Parse a single descriptor line
///
/// Returns None for empty lines, lines without a comma, and lines whose
/// title or coverage path is blank after trimming. Fields past the third
/// are ignored.
pub fn parse_line(line: &str) -> Option<ReportDescriptor> {
    if line.is_empty() || !line.contains(',') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let title = fields[0];
    let cov_file = fields.get(1).copied().unwrap_or_default();
    let xml_file = fields.get(2).copied().unwrap_or_default();

    if title.is_empty() || cov_file.is_empty() {
        debug!("Dropping descriptor line with blank title or coverage path: {:?}", line);
        return None;
    }

    Some(ReportDescriptor { title: title.to_string(), cov_file: cov_file.to_string(), xml_file: xml_file.to_string() })
}

/// Parse every line, keeping input order and dropping the ones that yield nothing
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ReportDescriptor> {
    lines.iter().filter_map(|l| parse_line(l.as_ref())).collect()
}
