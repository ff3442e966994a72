/// JUnit XML summary handling
///
/// This module handles:
/// - Summing test counts from `<testsuites>` / `<testsuite>` reports
/// - Rendering the standalone test summary table
use crate::config::ReportOptions;
use crate::types::TestSummary;
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::fs;

/// Markers appended to summary cells in rendered markdown
pub const SKIPPED_MARKER: &str = ":zzz:";
pub const FAILURES_MARKER: &str = ":x:";
pub const ERRORS_MARKER: &str = ":fire:";
pub const TIME_MARKER: &str = ":stopwatch:";

/// Read the summary attributes of one `<testsuite>` / `<testsuites>` element
fn read_suite_attributes(element: &BytesStart) -> Result<TestSummary, String> {
    let mut summary = TestSummary::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| format!("Invalid attribute: {}", e))?;
        let value = attr.unescape_value().map_err(|e| format!("Invalid attribute value: {}", e))?;
        let value = value.trim();
        let key = attr.key.as_ref();

        let count = |name: &str| -> Result<u64, String> {
            value.parse::<u64>().map_err(|_| format!("Invalid '{}' count: {:?}", name, value))
        };

        match key {
            b"tests" => summary.tests = count("tests")?,
            b"skipped" => summary.skipped = count("skipped")?,
            b"failures" => summary.failures = count("failures")?,
            b"errors" => summary.errors = count("errors")?,
            b"time" => {
                summary.time = value
                    .parse::<f64>()
                    .ok()
                    .filter(|t| t.is_finite() && *t >= 0.0)
                    .ok_or_else(|| format!("Invalid 'time' value: {:?}", value))?;
            }
            _ => {}
        }
    }

    Ok(summary)
}

/// Sum the statistics of a JUnit XML document
///
/// Accepts either a `<testsuite>` root or a `<testsuites>` root whose
/// direct `<testsuite>` children are summed. A `<testsuites>` root without
/// children falls back to its own attributes. Missing attributes count as
/// zero.
pub fn parse_junit_summary(xml: &str) -> Result<TestSummary, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut root: Option<Vec<u8>> = None;
    let mut root_summary = TestSummary::default();
    let mut total = TestSummary::default();
    let mut suites = 0usize;

    loop {
        let (element, is_start) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Ok(Event::Eof) if depth > 0 => return Err("Unexpected end of document".to_string()),
            Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(e) => {
                return Err(format!("Malformed XML at byte {}: {}", reader.buffer_position(), e));
            }
        };

        let name = element.local_name().as_ref().to_vec();
        if depth == 0 {
            match name.as_slice() {
                b"testsuites" => root_summary = read_suite_attributes(&element)?,
                b"testsuite" => {
                    total.add(&read_suite_attributes(&element)?)?;
                    suites += 1;
                }
                other => {
                    return Err(format!("Unexpected root element <{}>", String::from_utf8_lossy(other)));
                }
            }
            root = Some(name);
        } else if depth == 1 && root.as_deref() == Some(b"testsuites".as_slice()) && name == b"testsuite" {
            total.add(&read_suite_attributes(&element)?)?;
            suites += 1;
        }

        if is_start {
            depth += 1;
        }
    }

    match root.as_deref() {
        None => Err("Empty JUnit report".to_string()),
        Some(b"testsuites") if suites == 0 => Ok(root_summary),
        _ => {
            debug!("Summed {} test suites: {} tests", suites, total.tests);
            Ok(total)
        }
    }
}

/// Read and parse a JUnit XML file
pub fn load_junit_summary(path: &str) -> Result<TestSummary, String> {
    let xml = fs::read_to_string(path).map_err(|e| format!("Failed to read JUnit file {}: {}", path, e))?;
    parse_junit_summary(&xml).map_err(|e| format!("Failed to parse JUnit file {}: {}", path, e))
}

/// JUnit collaborator: summary for `options.xml_file`, or None when unset
pub fn get_parsed_xml(options: &ReportOptions) -> Result<Option<TestSummary>, String> {
    if options.xml_file.is_empty() {
        return Ok(None);
    }
    load_junit_summary(&options.xml_file).map(Some)
}

/// The five decorated summary cells: tests, skipped, failures, errors, time
pub fn summary_cells(summary: &TestSummary) -> [String; 5] {
    [
        summary.tests.to_string(),
        format!("{} {}", summary.skipped, SKIPPED_MARKER),
        format!("{} {}", summary.failures, FAILURES_MARKER),
        format!("{} {}", summary.errors, ERRORS_MARKER),
        format!("{}s {}", summary.display_time(), TIME_MARKER),
    ]
}

/// Render a standalone summary table, with a heading when `title` is set
pub fn render_summary_table(summary: &TestSummary, title: &str) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(&format!("### {}\n\n", title));
    }
    out.push_str("| Tests | Skipped | Failures | Errors | Time |\n");
    out.push_str("| ----- | ------- | -------- | -------- | ------------------ |\n");
    out.push_str(&format!("| {} |\n", summary_cells(summary).join(" | ")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTEST_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites>
  <testsuite name="pytest" errors="0" failures="1" skipped="2" tests="12" time="1.234" timestamp="2024-01-01T00:00:00">
    <testcase classname="tests.test_app" name="test_ok" time="0.001" />
    <testcase classname="tests.test_app" name="test_bad" time="0.002">
      <failure message="assert 1 == 2">trace</failure>
    </testcase>
  </testsuite>
</testsuites>"#;

    #[test]
    fn test_parse_pytest_report() {
        let s = parse_junit_summary(PYTEST_XML).unwrap();
        assert_eq!(s, TestSummary { tests: 12, skipped: 2, failures: 1, errors: 0, time: 1.234 });
    }

    #[test]
    fn test_parse_single_testsuite_root() {
        let xml = r#"<testsuite tests="3" failures="0" errors="1" time="0.5"><testcase name="a"/></testsuite>"#;
        let s = parse_junit_summary(xml).unwrap();
        assert_eq!(s.tests, 3);
        assert_eq!(s.errors, 1);
        assert_eq!(s.skipped, 0, "Missing attributes count as zero");
    }

    #[test]
    fn test_parse_sums_top_level_suites_only() {
        let xml = r#"<testsuites tests="999">
  <testsuite tests="2" failures="1" time="0.25">
    <testsuite tests="100" />
  </testsuite>
  <testsuite tests="3" skipped="1" time="0.5" />
</testsuites>"#;
        let s = parse_junit_summary(xml).unwrap();
        assert_eq!(s.tests, 5);
        assert_eq!(s.failures, 1);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.display_time(), "0.75");
    }

    #[test]
    fn test_parse_childless_testsuites_uses_root_attributes() {
        let s = parse_junit_summary(r#"<testsuites tests="7" failures="2" time="3"/>"#).unwrap();
        assert_eq!(s.tests, 7);
        assert_eq!(s.failures, 2);
        assert_eq!(s.time, 3.0);
    }

    #[test]
    fn test_parse_rejects_other_documents() {
        assert!(parse_junit_summary("<coverage line-rate=\"0.5\"/>").is_err());
        assert!(parse_junit_summary("").is_err());
        assert!(parse_junit_summary(r#"<testsuite tests="many"/>"#).is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_totals() {
        let xml = r#"<testsuites><testsuite tests="18446744073709551615"/><testsuite tests="1"/></testsuites>"#;
        let err = parse_junit_summary(xml).unwrap_err();
        assert!(err.contains("overflows"));
    }

    #[test]
    fn test_parse_rejects_non_finite_or_negative_time() {
        for time in ["NaN", "inf", "-inf", "-0.5"] {
            let xml = format!(r#"<testsuite tests="1" time="{}"/>"#, time);
            assert!(parse_junit_summary(&xml).is_err(), "time={} should be rejected", time);
        }
    }

    #[test]
    fn test_parse_rejects_truncated_document() {
        assert!(parse_junit_summary(r#"<testsuites><testsuite tests="3">"#).is_err());
    }

    #[test]
    fn test_get_parsed_xml_without_file() {
        assert_eq!(get_parsed_xml(&ReportOptions::default()).unwrap(), None);
    }

    #[test]
    fn test_get_parsed_xml_missing_file() {
        let opts = ReportOptions { xml_file: "/nonexistent/junit.xml".to_string(), ..Default::default() };
        assert!(get_parsed_xml(&opts).is_err());
    }

    #[test]
    fn test_render_summary_table() {
        let summary = TestSummary { tests: 12, skipped: 2, failures: 1, errors: 0, time: 1.234 };
        let table = render_summary_table(&summary, "Tests");
        assert_eq!(
            table,
            "### Tests\n\n\
             | Tests | Skipped | Failures | Errors | Time |\n\
             | ----- | ------- | -------- | -------- | ------------------ |\n\
             | 12 | 2 :zzz: | 1 :x: | 0 :fire: | 1.234s :stopwatch: |\n"
        );
    }
}
