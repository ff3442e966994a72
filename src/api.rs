/// API module for interacting with the GitHub git data API
///
/// This module provides a RemoteRepository implementation that reads refs
/// and commits and creates blobs, trees and commits over HTTP.
use crate::config::PublishTarget;
use crate::publish::{RemoteRepository, TreeEntry};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

const USER_AGENT: &str = "coverage-comment/0.3.0 (https://github.com/imazen/coverage-comment)";

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    tree: GitObject,
}

/// Blocking client for one repository
pub struct GitHubClient {
    agent: ureq::Agent,
    repo_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: &str, owner: &str, repo: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).timeout(Duration::from_secs(30)).build();
        Self { agent, repo_url: format!("{}/repos/{}/{}", api_url.trim_end_matches('/'), owner, repo), token }
    }

    pub fn from_target(target: &PublishTarget) -> Self {
        Self::new(&target.api_url, &target.owner, &target.repo, target.token.clone())
    }

    /// Full URL for a path below the repository
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.repo_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the JSON response
    fn send<T: DeserializeOwned>(&self, method: &str, path: &str, body: Option<&Value>) -> Result<T, String> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.agent.request(method, &url).set("Accept", "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let result = match body {
            Some(body) => request.set("Content-Type", "application/json").send_string(&body.to_string()),
            None => request.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let detail = response.into_string().unwrap_or_default();
                return Err(format!("{} {} failed with status {}: {}", method, url, code, detail.trim()));
            }
            Err(e) => return Err(format!("{} {} failed: {}", method, url, e)),
        };

        let text = response.into_string().map_err(|e| format!("Failed to read response from {}: {}", url, e))?;
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse response from {}: {}", url, e))
    }
}

impl RemoteRepository for GitHubClient {
    fn get_ref_commit(&self, branch: &str) -> Result<String, String> {
        let data: RefResponse = self.send("GET", &format!("git/ref/heads/{}", branch), None)?;
        Ok(data.object.sha)
    }

    fn get_commit_tree(&self, commit_sha: &str) -> Result<String, String> {
        let data: CommitResponse = self.send("GET", &format!("git/commits/{}", commit_sha), None)?;
        Ok(data.tree.sha)
    }

    fn create_blob(&self, content: &str) -> Result<String, String> {
        let body = json!({ "content": content, "encoding": "utf-8" });
        let data: GitObject = self.send("POST", "git/blobs", Some(&body))?;
        Ok(data.sha)
    }

    fn create_tree(&self, entries: &[TreeEntry], base_tree: &str) -> Result<String, String> {
        let body = json!({ "tree": entries, "base_tree": base_tree });
        let data: GitObject = self.send("POST", "git/trees", Some(&body))?;
        Ok(data.sha)
    }

    fn create_commit(&self, message: &str, tree_sha: &str, parent_sha: &str) -> Result<String, String> {
        let body = json!({ "message": message, "tree": tree_sha, "parents": [parent_sha] });
        let data: GitObject = self.send("POST", "git/commits", Some(&body))?;
        Ok(data.sha)
    }

    fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<(), String> {
        let body = json!({ "sha": commit_sha });
        let _: Value = self.send("PATCH", &format!("git/refs/heads/{}", branch), Some(&body))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish;

    #[test]
    fn test_urls() {
        let client = GitHubClient::new("https://api.github.com/", "octo", "widgets", None);
        assert_eq!(client.url("git/blobs"), "https://api.github.com/repos/octo/widgets/git/blobs");
        assert_eq!(
            client.url("/git/ref/heads/feature/x"),
            "https://api.github.com/repos/octo/widgets/git/ref/heads/feature/x"
        );
    }

    #[test]
    fn test_from_target() {
        let target = PublishTarget {
            api_url: "https://ghe.example.com/api/v3".to_string(),
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
            branch: "main".to_string(),
            message: "Update".to_string(),
            token: Some("t".to_string()),
        };
        let client = GitHubClient::from_target(&target);
        assert_eq!(client.url("git/trees"), "https://ghe.example.com/api/v3/repos/octo/widgets/git/trees");
        assert_eq!(client.token.as_deref(), Some("t"));
    }

    #[test]
    fn test_response_shapes() {
        let r: RefResponse = serde_json::from_str(r#"{"ref":"refs/heads/main","object":{"sha":"abc","type":"commit"}}"#).unwrap();
        assert_eq!(r.object.sha, "abc");
        let c: CommitResponse = serde_json::from_str(r#"{"sha":"abc","tree":{"sha":"def"},"parents":[]}"#).unwrap();
        assert_eq!(c.tree.sha, "def");
    }

    #[test]
    #[ignore] // Requires network access and a writable repository
    fn test_upload_against_github() {
        let repository = std::env::var("GITHUB_REPOSITORY").unwrap();
        let (owner, repo) = crate::config::parse_repository(&repository).unwrap();
        let client = GitHubClient::new("https://api.github.com", &owner, &repo, std::env::var("GITHUB_TOKEN").ok());
        let head = publish::get_current_commit(&client, "main").unwrap();
        assert!(!head.commit_sha.is_empty());
    }
}
