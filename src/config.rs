/// Configuration resolution module
///
/// This module handles:
/// - Loading the optional TOML config file
/// - Merging it with CLI arguments into immutable ReportOptions
/// - Deriving per-descriptor options for multi-file reports
/// - Resolving the publish target from CLI arguments and environment
use crate::cli::{self, CliArgs};
use crate::descriptor::ReportDescriptor;
use crate::git;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_BADGE_TITLE: &str = "Coverage";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update coverage report";

/// Options shared by every part of a report
///
/// Built once per invocation and never mutated afterwards; per-row
/// variants are derived with [`ReportOptions::for_descriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub badge_title: String,
    pub hide_badge: bool,
    pub hide_report: bool,
    pub cov_file: String,
    pub xml_file: String,
    pub xml_title: String,
    pub multiple_files: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            badge_title: DEFAULT_BADGE_TITLE.to_string(),
            hide_badge: false,
            hide_report: false,
            cov_file: String::new(),
            xml_file: String::new(),
            xml_title: String::new(),
            multiple_files: Vec::new(),
        }
    }
}

impl ReportOptions {
    /// Options for one multi-file report row
    ///
    /// Overrides title and file paths from the descriptor, suppresses the
    /// per-file details and the JUnit heading.
    pub fn for_descriptor(&self, descriptor: &ReportDescriptor) -> ReportOptions {
        ReportOptions {
            title: descriptor.title.clone(),
            cov_file: descriptor.cov_file.clone(),
            xml_file: descriptor.xml_file.clone(),
            hide_report: true,
            xml_title: String::new(),
            ..self.clone()
        }
    }

    pub fn is_multi_file(&self) -> bool {
        !self.multiple_files.is_empty()
    }
}

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub title: Option<String>,
    pub badge_title: Option<String>,
    pub hide_badge: Option<bool>,
    pub hide_report: Option<bool>,
    pub coverage_file: Option<String>,
    pub junit_file: Option<String>,
    pub junit_title: Option<String>,
    pub multiple_files: Option<Vec<String>>,
}

/// Load a TOML config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&text).map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
}

/// Value of a `--hide-*` / `--show-*` flag pair, None when neither was given
fn cli_flag(hide: bool, show: bool) -> Option<bool> {
    match (hide, show) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Build the base ReportOptions from CLI arguments
///
/// Precedence: CLI flags, then the config file, then defaults.
pub fn build_options(args: &CliArgs) -> Result<ReportOptions, String> {
    let file = match &args.config {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            load_config_file(path)?
        }
        None => ConfigFile::default(),
    };

    let mut multiple_files = args.multiple_files.clone();
    if let Some(ref path) = args.multiple_files_from {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read multi-file entries from {}: {}", path.display(), e))?;
        multiple_files.extend(cli::split_entries(&[text]));
    }
    if multiple_files.is_empty() {
        multiple_files = file.multiple_files.unwrap_or_default();
    }

    let options = ReportOptions {
        title: args.title.clone().or(file.title).unwrap_or_default(),
        badge_title: args.badge_title.clone().or(file.badge_title).unwrap_or_else(|| DEFAULT_BADGE_TITLE.to_string()),
        hide_badge: cli_flag(args.hide_badge, args.show_badge).or(file.hide_badge).unwrap_or(false),
        hide_report: cli_flag(args.hide_report, args.show_report).or(file.hide_report).unwrap_or(false),
        cov_file: args.coverage_file.clone().or(file.coverage_file).unwrap_or_default(),
        xml_file: args.junit_file.clone().or(file.junit_file).unwrap_or_default(),
        xml_title: args.junit_title.clone().or(file.junit_title).unwrap_or_default(),
        multiple_files,
    };

    if !options.is_multi_file() && options.cov_file.is_empty() {
        return Err("No coverage file configured and no multi-file entries given".to_string());
    }

    debug!(
        "Resolved options: {} multi-file entries, coverage file {:?}, junit file {:?}",
        options.multiple_files.len(),
        options.cov_file,
        options.xml_file
    );

    Ok(options)
}

/// Where and how to publish the rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub message: String,
    pub token: Option<String>,
}

/// Split "owner/repo" into its parts
pub fn parse_repository(spec: &str) -> Result<(String, String), String> {
    match spec.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.trim_end_matches(".git").to_string()))
        }
        _ => Err(format!("Invalid repository '{}', expected OWNER/REPO", spec)),
    }
}

/// Resolve the publish target from CLI arguments and the process environment
pub fn resolve_publish_target(args: &CliArgs) -> Result<PublishTarget, String> {
    resolve_publish_target_with(args, |key| env::var(key).ok(), git::get_current_branch)
}

/// Resolve the publish target with injectable environment and branch lookup
pub fn resolve_publish_target_with<E, B>(args: &CliArgs, env_var: E, current_branch: B) -> Result<PublishTarget, String>
where
    E: Fn(&str) -> Option<String>,
    B: FnOnce() -> Option<String>,
{
    let repository = args
        .repository
        .clone()
        .or_else(|| env_var("GITHUB_REPOSITORY"))
        .ok_or_else(|| "No repository given. Use --repository OWNER/REPO or set GITHUB_REPOSITORY".to_string())?;
    let (owner, repo) = parse_repository(&repository)?;

    let branch = args
        .branch
        .clone()
        .or_else(current_branch)
        .filter(|b| b != "HEAD")
        .ok_or_else(|| "Cannot determine branch to publish to. Use --branch".to_string())?;

    let message = args.commit_message.clone().unwrap_or_else(|| match git::get_git_hash() {
        Some(hash) => format!("{} for {}", DEFAULT_COMMIT_MESSAGE, hash),
        None => DEFAULT_COMMIT_MESSAGE.to_string(),
    });

    let api_url = env_var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = env_var("GITHUB_TOKEN").filter(|t| !t.is_empty());
    if token.is_none() {
        debug!("GITHUB_TOKEN not set, publishing without credentials");
    }

    Ok(PublishTarget { api_url: api_url.trim_end_matches('/').to_string(), owner, repo, branch, message, token })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
