use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "coverage-comment")]
#[command(about = "Render pytest coverage and JUnit results as a markdown report")]
#[command(version)]
pub struct CliArgs {
    /// TOML file with report options (command-line flags take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Title shown above the report
    #[arg(long)]
    pub title: Option<String>,

    /// Text on the left half of the coverage badge (default: "Coverage")
    #[arg(long)]
    pub badge_title: Option<String>,

    /// Render coverage as a plain percentage instead of a badge
    #[arg(long, overrides_with = "show_badge")]
    pub hide_badge: bool,

    /// Render the coverage badge even if the config file hides it
    #[arg(long, overrides_with = "hide_badge")]
    pub show_badge: bool,

    /// Skip the per-file coverage details
    #[arg(long, overrides_with = "show_report")]
    pub hide_report: bool,

    /// Render the per-file coverage details even if the config file hides them
    #[arg(long, overrides_with = "hide_report")]
    pub show_report: bool,

    /// pytest coverage text output (`pytest --cov-report=term-missing`)
    #[arg(long = "coverage-file", value_name = "FILE")]
    pub coverage_file: Option<String>,

    /// JUnit XML results (`pytest --junitxml`)
    #[arg(long = "junit-file", value_name = "FILE")]
    pub junit_file: Option<String>,

    /// Heading for the JUnit summary table
    #[arg(long = "junit-title", value_name = "TITLE")]
    pub junit_title: Option<String>,

    /// Multi-file report entries: "title, coverage-file[, junit-file]"
    /// A single value may hold several entries separated by newlines
    #[arg(long, value_name = "LINE", num_args = 1..)]
    pub multiple_files: Vec<String>,

    /// Read multi-file report entries from a file, one per line
    #[arg(long, value_name = "FILE")]
    pub multiple_files_from: Option<PathBuf>,

    /// Markdown output path
    #[arg(long, default_value = "coverage-comment.md")]
    pub output: PathBuf,

    /// Also write a JSON report to this path
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// On report errors, log them and write an empty report instead of failing
    #[arg(long)]
    pub keep_going: bool,

    /// Commit the markdown output to a branch of the GitHub repository
    #[arg(long)]
    pub publish: bool,

    /// Target repository as OWNER/REPO (default: $GITHUB_REPOSITORY)
    #[arg(long, value_name = "OWNER/REPO", requires = "publish")]
    pub repository: Option<String>,

    /// Target branch (default: the current git branch)
    #[arg(long, requires = "publish")]
    pub branch: Option<String>,

    /// Commit message for the published report
    #[arg(long, requires = "publish")]
    pub commit_message: Option<String>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Split multiple_files on newlines to support multi-line workflow inputs
        args.multiple_files = split_entries(&args.multiple_files);

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        let has_input = self.config.is_some()
            || self.coverage_file.is_some()
            || !self.multiple_files.is_empty()
            || self.multiple_files_from.is_some();

        if !has_input {
            return Err(
                "Nothing to report. Specify --coverage-file, --multiple-files, --multiple-files-from or --config"
                    .to_string(),
            );
        }

        if self.junit_title.is_some() && self.junit_file.is_none() && self.config.is_none() {
            return Err("--junit-title requires --junit-file".to_string());
        }

        Ok(())
    }
}

/// Split raw entry values on newlines, dropping blank lines
pub fn split_entries(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|s| s.lines().map(|l| l.trim().to_string()))
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_without_input_fails() {
        let args = CliArgs::default();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_coverage_file_succeeds() {
        let args = CliArgs { coverage_file: Some("pytest-coverage.txt".to_string()), ..Default::default() };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_junit_title_requires_file() {
        let args = CliArgs {
            coverage_file: Some("pytest-coverage.txt".to_string()),
            junit_title: Some("Tests".to_string()),
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_split_entries_on_newlines() {
        let values = vec!["A, a.txt\nB, b.txt, b.xml\n\n".to_string(), "C, c.txt".to_string()];
        assert_eq!(split_entries(&values), vec!["A, a.txt", "B, b.txt, b.xml", "C, c.txt"]);
    }

    #[test]
    fn test_parse_from_multiple_values() {
        let args = CliArgs::try_parse_from([
            "coverage-comment",
            "--multiple-files",
            "Unit, cov1.txt, junit1.xml",
            "E2E, cov2.txt",
            "--hide-badge",
        ])
        .unwrap();
        assert_eq!(args.multiple_files.len(), 2);
        assert!(args.hide_badge);
        assert_eq!(args.output, PathBuf::from("coverage-comment.md"));
    }

    #[test]
    fn test_last_of_hide_and_show_wins() {
        let args =
            CliArgs::try_parse_from(["coverage-comment", "--coverage-file", "cov.txt", "--hide-badge", "--show-badge"])
                .unwrap();
        assert!(args.show_badge);
        assert!(!args.hide_badge);

        let args =
            CliArgs::try_parse_from(["coverage-comment", "--coverage-file", "cov.txt", "--show-report", "--hide-report"])
                .unwrap();
        assert!(args.hide_report);
        assert!(!args.show_report);
    }

    #[test]
    fn test_repository_requires_publish() {
        let result = CliArgs::try_parse_from([
            "coverage-comment",
            "--coverage-file",
            "cov.txt",
            "--repository",
            "owner/repo",
        ]);
        assert!(result.is_err());
    }
}
