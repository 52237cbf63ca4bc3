// In-memory RepoApi for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::client::{discover_latest_commit, select_blobs, RepoApi, DEFAULT_BRANCHES};
use super::error::ApiError;
use super::types::{EntryType, TreeEntry};

pub fn blob(path: &str) -> TreeEntry {
    TreeEntry {
        path: path.to_string(),
        mode: "100644".to_string(),
        kind: EntryType::Blob,
        sha: format!("sha-{}", path),
        content_url: blob_url(path),
    }
}

pub fn dir(path: &str) -> TreeEntry {
    TreeEntry {
        path: path.to_string(),
        mode: "040000".to_string(),
        kind: EntryType::Tree,
        sha: format!("sha-{}", path),
        content_url: format!("https://api.test/repos/acme/widgets/git/trees/{}", path),
    }
}

pub fn blob_url(path: &str) -> String {
    format!("https://api.test/repos/acme/widgets/git/blobs/{}", path)
}

enum Content {
    Text(String),
    Delayed(Duration, String),
    Status(u16),
    Hang,
}

#[derive(Default)]
pub struct FakeApi {
    heads: HashMap<String, String>,
    commits: HashMap<String, String>,
    trees: HashMap<String, Vec<TreeEntry>>,
    contents: HashMap<String, Content>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, name: &str, sha: &str) -> Self {
        self.heads.insert(name.to_string(), sha.to_string());
        self
    }

    pub fn commit(mut self, sha: &str, tree: &str) -> Self {
        self.commits.insert(sha.to_string(), tree.to_string());
        self
    }

    pub fn tree(mut self, sha: &str, entries: Vec<TreeEntry>) -> Self {
        self.trees.insert(sha.to_string(), entries);
        self
    }

    pub fn file(mut self, path: &str, text: &str) -> Self {
        self.contents.insert(blob_url(path), Content::Text(text.to_string()));
        self
    }

    pub fn slow_file(mut self, path: &str, millis: u64, text: &str) -> Self {
        self.contents.insert(
            blob_url(path),
            Content::Delayed(Duration::from_millis(millis), text.to_string()),
        );
        self
    }

    pub fn failing_file(mut self, path: &str, status: u16) -> Self {
        self.contents.insert(blob_url(path), Content::Status(status));
        self
    }

    pub fn hanging_file(mut self, path: &str) -> Self {
        self.contents.insert(blob_url(path), Content::Hang);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RepoApi for FakeApi {
    async fn branch_head(&self, _owner: &str, _repo: &str, branch: &str) -> Result<String, ApiError> {
        self.record(format!("branch_head:{}", branch));
        self.heads
            .get(branch)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("branch '{}'", branch)))
    }

    async fn default_branch(&self, _owner: &str, _repo: &str) -> Result<Option<String>, ApiError> {
        self.record("default_branch".to_string());
        Ok(None)
    }

    async fn resolve_latest_commit(&self, owner: &str, repo: &str) -> Result<String, ApiError> {
        let candidates: Vec<String> = DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect();
        discover_latest_commit(self, owner, repo, &candidates).await
    }

    async fn resolve_tree(&self, commit_sha: &str, _owner: &str, _repo: &str) -> Result<String, ApiError> {
        self.record(format!("resolve_tree:{}", commit_sha));
        self.commits
            .get(commit_sha)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("commit {}", commit_sha)))
    }

    async fn list_tree(
        &self,
        tree_sha: &str,
        _owner: &str,
        _repo: &str,
        path_filter: &HashSet<String>,
    ) -> Result<Vec<TreeEntry>, ApiError> {
        self.record(format!("list_tree:{}", tree_sha));
        let entries = self
            .trees
            .get(tree_sha)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("tree {}", tree_sha)))?;
        Ok(select_blobs(entries, path_filter))
    }

    async fn fetch_content(&self, url: &str) -> Result<String, ApiError> {
        self.record(format!("fetch:{}", url));
        match self.contents.get(url) {
            Some(Content::Text(text)) => Ok(text.clone()),
            Some(Content::Delayed(delay, text)) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
            Some(Content::Status(status)) => Err(ApiError::ContentFetch {
                status: *status,
                snippet: "boom".to_string(),
            }),
            Some(Content::Hang) => std::future::pending().await,
            None => Err(ApiError::ContentFetch {
                status: 404,
                snippet: "Not Found".to_string(),
            }),
        }
    }
}
