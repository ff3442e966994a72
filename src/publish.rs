/// Publishing rendered reports into a hosted git repository
///
/// This module handles:
/// - The RemoteRepository port over a hosting API's git object model
/// - Uploading files as a single commit on top of a branch
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Commit a branch points at, with the tree of that commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCommit {
    pub commit_sha: String,
    pub tree_sha: String,
}

/// Entry of a tree to create on top of a base tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeEntry {
    /// Regular file entry pointing at a blob
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self { path: path.into(), mode: "100644".to_string(), kind: "blob".to_string(), sha: sha.into() }
    }
}

/// Port for the hosting API's git data operations
///
/// Every method returns the sha of the object it read or created.
pub trait RemoteRepository {
    /// Commit `heads/<branch>` points at
    fn get_ref_commit(&self, branch: &str) -> Result<String, String>;

    /// Tree of a commit
    fn get_commit_tree(&self, commit_sha: &str) -> Result<String, String>;

    /// Store UTF-8 content as a blob
    fn create_blob(&self, content: &str) -> Result<String, String>;

    /// Create a tree from entries layered over `base_tree`
    fn create_tree(&self, entries: &[TreeEntry], base_tree: &str) -> Result<String, String>;

    /// Create a commit with a single parent
    fn create_commit(&self, message: &str, tree_sha: &str, parent_sha: &str) -> Result<String, String>;

    /// Move `heads/<branch>` to a commit
    fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<(), String>;
}

/// Look up the commit a branch points at and its tree
pub fn get_current_commit<R: RemoteRepository + ?Sized>(remote: &R, branch: &str) -> Result<CurrentCommit, String> {
    let commit_sha = remote.get_ref_commit(branch)?;
    let tree_sha = remote.get_commit_tree(&commit_sha)?;
    Ok(CurrentCommit { commit_sha, tree_sha })
}

/// Repository path a file is stored at: `<repo>/<branch>/<file name>`
pub fn remote_path(repo: &str, branch: &str, file: &Path) -> Result<String, String> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid file path: {}", file.display()))?;
    Ok(format!("{}/{}/{}", repo, branch, name))
}

/// Upload files to a branch as one new commit
///
/// Steps run strictly in order: resolve the branch head, create one blob
/// per file, create a tree on top of the head's tree, commit it with the
/// head as parent, and move the branch. Returns the new commit sha.
pub fn upload_to_repo<R: RemoteRepository + ?Sized>(
    remote: &R,
    files: &[PathBuf],
    repo: &str,
    branch: &str,
    message: &str,
) -> Result<String, String> {
    let current = get_current_commit(remote, branch)?;
    debug!("Branch {} is at {} (tree {})", branch, current.commit_sha, current.tree_sha);

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let content = fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
        let sha = remote.create_blob(&content)?;
        let path = remote_path(repo, branch, file)?;
        debug!("Created blob {} for {}", sha, path);
        entries.push(TreeEntry::blob(path, sha));
    }

    let tree_sha = remote.create_tree(&entries, &current.tree_sha)?;
    let commit_sha = remote.create_commit(message, &tree_sha, &current.commit_sha)?;
    remote.update_ref(branch, &commit_sha)?;

    debug!("Moved {} to {}", branch, commit_sha);
    Ok(commit_sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory remote that records every call
    #[derive(Default)]
    struct FakeRemote {
        calls: RefCell<Vec<String>>,
        trees: RefCell<Vec<(Vec<TreeEntry>, String)>>,
        fail_blob: bool,
    }

    impl FakeRemote {
        fn record(&self, call: String) -> String {
            let mut calls = self.calls.borrow_mut();
            calls.push(call);
            format!("sha{}", calls.len())
        }
    }

    impl RemoteRepository for FakeRemote {
        fn get_ref_commit(&self, branch: &str) -> Result<String, String> {
            self.record(format!("get_ref {}", branch));
            Ok("head".to_string())
        }

        fn get_commit_tree(&self, commit_sha: &str) -> Result<String, String> {
            self.record(format!("get_commit {}", commit_sha));
            Ok("base-tree".to_string())
        }

        fn create_blob(&self, content: &str) -> Result<String, String> {
            if self.fail_blob {
                return Err("blob rejected".to_string());
            }
            Ok(self.record(format!("blob {}", content)))
        }

        fn create_tree(&self, entries: &[TreeEntry], base_tree: &str) -> Result<String, String> {
            self.trees.borrow_mut().push((entries.to_vec(), base_tree.to_string()));
            self.record(format!("tree {}", base_tree));
            Ok("new-tree".to_string())
        }

        fn create_commit(&self, message: &str, tree_sha: &str, parent_sha: &str) -> Result<String, String> {
            self.record(format!("commit {} {} {}", message, tree_sha, parent_sha));
            Ok("new-commit".to_string())
        }

        fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<(), String> {
            self.record(format!("update_ref {} {}", branch, commit_sha));
            Ok(())
        }
    }

    #[test]
    fn test_upload_runs_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("coverage-comment.md");
        let json = dir.path().join("coverage.json");
        std::fs::write(&report, "| Title | Coverage |").unwrap();
        std::fs::write(&json, "{}").unwrap();

        let remote = FakeRemote::default();
        let sha = upload_to_repo(&remote, &[report, json], "widgets", "feature/x", "Update").unwrap();

        assert_eq!(sha, "new-commit");
        assert_eq!(
            *remote.calls.borrow(),
            vec![
                "get_ref feature/x",
                "get_commit head",
                "blob | Title | Coverage |",
                "blob {}",
                "tree base-tree",
                "commit Update new-tree head",
                "update_ref feature/x new-commit",
            ]
        );

        let trees = remote.trees.borrow();
        let (entries, base) = &trees[0];
        assert_eq!(base, "base-tree");
        assert_eq!(entries[0], TreeEntry::blob("widgets/feature/x/coverage-comment.md", "sha3"));
        assert_eq!(entries[1].path, "widgets/feature/x/coverage.json");
        assert_eq!(entries[1].mode, "100644");
        assert_eq!(entries[1].kind, "blob");
    }

    #[test]
    fn test_upload_stops_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.md");
        std::fs::write(&report, "x").unwrap();

        let remote = FakeRemote { fail_blob: true, ..Default::default() };
        let err = upload_to_repo(&remote, &[report], "widgets", "main", "Update").unwrap_err();

        assert_eq!(err, "blob rejected");
        assert!(remote.calls.borrow().iter().all(|c| !c.starts_with("update_ref")));
    }

    #[test]
    fn test_upload_missing_file() {
        let remote = FakeRemote::default();
        let err = upload_to_repo(&remote, &[PathBuf::from("/nonexistent/report.md")], "r", "main", "m").unwrap_err();
        assert!(err.contains("/nonexistent/report.md"));
    }

    #[test]
    fn test_tree_entry_serializes_type_field() {
        let value = serde_json::to_value(TreeEntry::blob("a/b.md", "abc")).unwrap();
        assert_eq!(value["type"], "blob");
        assert_eq!(value["mode"], "100644");
    }
}
