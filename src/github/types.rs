// src/github/types.rs
// =============================================================================
// Data types shared by the API client and the repository pipeline.
//
// Two groups live here:
// - Domain types (TreeEntry, RepositoryReference) used across the crate
// - Wire types (the *Response structs) that mirror the JSON GitHub sends back
//
// The wire types stay private to the github module; the rest of the app
// only ever sees domain types.
// =============================================================================

use serde::Deserialize;

/// Kind of node in a recursive tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// A submodule pointer
    Commit,
}

/// One node of a repository tree, as listed by `git/trees/{sha}?recursive=1`
///
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub sha: String,
    /// API URL of the blob; submodule entries come without one
    #[serde(rename = "url", default)]
    pub content_url: String,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == EntryType::Blob
    }
}

/// Identifies the repository to read and, optionally, a pinned commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
    /// When absent the latest commit on a default branch is used
    pub commit_ref: Option<String>,
}

impl RepositoryReference {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, commit_ref: Option<String>) -> Self {
        // An empty commit answer from the prompt means "latest"
        let commit_ref = commit_ref
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Self {
            owner: owner.into(),
            name: name.into(),
            commit_ref,
        }
    }
}

// -----------------------------------------------------------------------------
// Wire types
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GitRefResponse {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    pub tree: Option<GitObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    #[serde(default)]
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileTreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryResponse {
    #[serde(default)]
    pub default_branch: Option<String>,
}
