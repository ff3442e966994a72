/// Git repository utilities
///
/// This module handles:
/// - Getting the current git commit hash
/// - Getting the current branch name
use std::process::Command;

/// Run git with arguments, returning trimmed stdout on success
fn git_output(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get the short git commit hash (7 characters)
pub fn get_git_hash() -> Option<String> {
    git_output(&["rev-parse", "--short", "HEAD"])
}

/// Get the checked-out branch name ("HEAD" when detached)
pub fn get_current_branch() -> Option<String> {
    git_output(&["rev-parse", "--abbrev-ref", "HEAD"])
}
