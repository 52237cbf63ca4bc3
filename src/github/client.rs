// src/github/client.rs
// =============================================================================
// Authenticated read access to the GitHub REST API.
//
// Operations:
// - resolve_latest_commit: branch name -> commit SHA (main, then master, ...)
// - resolve_tree: commit SHA -> tree SHA
// - list_tree: tree SHA -> blob entries (one recursive request)
// - fetch_content: blob URL -> raw file text
//
// Every call is a single GET with no retries. All of them share one reqwest
// Client, so connection pooling and the per-request timeout are configured once.
//
// The RepoApi trait is the seam the rest of the app depends on. GithubClient
// is the real implementation; tests plug in an in-memory one.
//
// Rust concepts:
// - Traits with `impl Future + Send` returns: async methods whose futures can
//   be moved onto other tokio worker threads
// - Generics with `?Sized`: discover_latest_commit works for any RepoApi
// - serde DeserializeOwned: one get_json helper decodes every response type
// =============================================================================

use std::collections::HashSet;
use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::{snippet, ApiError};
use super::types::{
    CommitResponse, FileTreeResponse, GitRefResponse, RepositoryResponse, TreeEntry,
};
use crate::config::ClientConfig;

/// Raw content negotiation; JSON endpoints still answer with JSON
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Branch names tried, in order, when no commit is pinned
pub const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// Read operations against one Git forge
///
/// Futures are `Send` so callers can spawn them onto the tokio runtime.
pub trait RepoApi: Send + Sync {
    /// SHA that `refs/heads/{branch}` points to
    fn branch_head(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Default branch name from the repository metadata, if it has one
    fn default_branch(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;

    fn resolve_latest_commit(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    fn resolve_tree(
        &self,
        commit_sha: &str,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Blob entries of the tree; an empty `path_filter` keeps every blob
    fn list_tree(
        &self,
        tree_sha: &str,
        owner: &str,
        repo: &str,
        path_filter: &HashSet<String>,
    ) -> impl Future<Output = Result<Vec<TreeEntry>, ApiError>> + Send;

    fn fetch_content(&self, url: &str) -> impl Future<Output = Result<String, ApiError>> + Send;
}

pub struct GithubClient {
    http: Client,
    config: ClientConfig,
    branches: Vec<String>,
}

impl GithubClient {
    // Creates a client for the configured API root
    //
    // Parameters:
    //   config: base URL, token and per-request timeout
    //
    // Returns: the client, or Transport if reqwest cannot build its TLS stack
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: ClientConfig, builder: ClientBuilder) -> Result<Self, ApiError> {
        let http = builder
            .timeout(config.request_timeout)
            // GitHub rejects requests without a User-Agent
            .user_agent(concat!("gitsnatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
        })
    }

    /// Replaces the branch names tried by `resolve_latest_commit`
    pub fn with_branches(mut self, branches: Vec<String>) -> Self {
        if !branches.is_empty() {
            self.branches = branches;
        }
        self
    }

    // Sends one GET with the fixed header pair
    //
    // Parameters:
    //   url: fully-qualified URL
    //
    // Returns: (status, body) for any HTTP answer; Err only for transport
    // failures, so each caller decides what a non-2xx status means
    async fn get(&self, url: &str) -> Result<(StatusCode, String), ApiError> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .header(AUTHORIZATION, format!("token {}", self.config.token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "response");

        Ok((status, body))
    }

    // GET on a JSON endpoint relative to the base URL
    //
    // `what` names the resource in NotFound errors (e.g. "commit abc in o/r").
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, what: &str) -> Result<T, ApiError> {
        let url = resolve_url(&self.config.base_url, endpoint);
        let (status, body) = self.get(&url).await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body, what));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl RepoApi for GithubClient {
    async fn branch_head(&self, owner: &str, repo: &str, branch: &str) -> Result<String, ApiError> {
        let what = format!("branch '{}' of {}/{}", branch, owner, repo);
        let endpoint = format!("/{}/{}/git/refs/heads/{}", owner, repo, branch);

        let response: GitRefResponse = self.get_json(&endpoint, &what).await?;

        // A 200 without a SHA is as good as a missing branch
        if response.object.sha.is_empty() {
            return Err(ApiError::NotFound(format!("SHA of {}", what)));
        }

        Ok(response.object.sha)
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> Result<Option<String>, ApiError> {
        let what = format!("repository {}/{}", owner, repo);
        let endpoint = format!("/{}/{}", owner, repo);

        let response: RepositoryResponse = self.get_json(&endpoint, &what).await?;
        Ok(response.default_branch.filter(|b| !b.is_empty()))
    }

    async fn resolve_latest_commit(&self, owner: &str, repo: &str) -> Result<String, ApiError> {
        discover_latest_commit(self, owner, repo, &self.branches).await
    }

    async fn resolve_tree(&self, commit_sha: &str, owner: &str, repo: &str) -> Result<String, ApiError> {
        let what = format!("commit {} in {}/{}", commit_sha, owner, repo);
        let endpoint = format!("/{}/{}/git/commits/{}", owner, repo, commit_sha);

        let response: CommitResponse = self.get_json(&endpoint, &what).await?;
        match response.tree {
            Some(tree) if !tree.sha.is_empty() => Ok(tree.sha),
            _ => Err(ApiError::NotFound(format!("tree SHA of {}", what))),
        }
    }

    async fn list_tree(
        &self,
        tree_sha: &str,
        owner: &str,
        repo: &str,
        path_filter: &HashSet<String>,
    ) -> Result<Vec<TreeEntry>, ApiError> {
        let what = format!("tree {} in {}/{}", tree_sha, owner, repo);
        let endpoint = format!("/{}/{}/git/trees/{}?recursive=1", owner, repo, tree_sha);

        // recursive=1 makes the server walk subdirectories for us
        let response: FileTreeResponse = self.get_json(&endpoint, &what).await?;

        // No pagination: a truncated listing is used as-is
        if response.truncated {
            warn!(tree = tree_sha, "tree listing was truncated by the server, some files are missing");
        }

        Ok(select_blobs(response.tree, path_filter))
    }

    async fn fetch_content(&self, url: &str) -> Result<String, ApiError> {
        // Tree entries carry absolute blob URLs; relative ones are allowed too
        let url = resolve_url(&self.config.base_url, url);
        let (status, body) = self.get(&url).await?;

        // Any non-2xx here is a per-file failure, whatever the status
        if !status.is_success() {
            return Err(ApiError::ContentFetch {
                status: status.as_u16(),
                snippet: snippet(&body),
            });
        }

        Ok(body)
    }
}

/// Tries each candidate branch, then the repository's own default branch
///
/// Auth and transport failures stop the search immediately.
pub async fn discover_latest_commit<A>(
    api: &A,
    owner: &str,
    repo: &str,
    candidates: &[String],
) -> Result<String, ApiError>
where
    A: RepoApi + ?Sized,
{
    for branch in candidates {
        match api.branch_head(owner, repo, branch).await {
            Ok(sha) => {
                info!(branch = %branch, sha = %sha, "resolved latest commit");
                return Ok(sha);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => debug!(branch = %branch, error = %e, "branch did not resolve"),
        }
    }

    let default = match api.default_branch(owner, repo).await {
        Ok(default) => default,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            debug!(error = %e, "repository metadata unavailable");
            None
        }
    };

    if let Some(branch) = default.filter(|b| !candidates.contains(b)) {
        match api.branch_head(owner, repo, &branch).await {
            Ok(sha) => {
                info!(branch = %branch, sha = %sha, "resolved latest commit from default branch");
                return Ok(sha);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => debug!(branch = %branch, error = %e, "default branch did not resolve"),
        }
    }

    Err(ApiError::NotFound(format!(
        "no branch of {}/{} resolved (tried {})",
        owner,
        repo,
        candidates.join(", ")
    )))
}

/// Keeps blob entries, narrowed to `path_filter` unless it is empty
pub fn select_blobs(entries: Vec<TreeEntry>, path_filter: &HashSet<String>) -> Vec<TreeEntry> {
    entries
        .into_iter()
        .filter(TreeEntry::is_blob)
        .filter(|entry| path_filter.is_empty() || path_filter.contains(&entry.path))
        .collect()
}

/// Absolute URLs pass through; anything else is appended to `base_url`
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with("https://") || url.starts_with("http://") {
        return url.to_string();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), url.trim_start_matches('/'))
}
