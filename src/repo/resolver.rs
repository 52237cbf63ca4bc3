// src/repo/resolver.rs
// =============================================================================
// Turns a RepositoryReference into the list of blob entries to offer.
//
// Three sequential steps, each a single API call:
//   1. commit SHA  (skipped when the user pinned a commit)
//   2. tree SHA    (from the commit metadata)
//   3. tree entries (recursive listing, filtered to blobs)
//
// The first failure wins and is tagged with the stage it came from.
// Nothing partial is returned.
// =============================================================================

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::github::{ApiError, RepoApi, RepositoryReference, TreeEntry};

/// Which resolution step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LatestCommit,
    TreeSha,
    FileTree,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::LatestCommit => "fetching latest commit SHA",
            Stage::TreeSha => "fetching tree SHA",
            Stage::FileTree => "fetching file tree",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
#[error("error {stage}: {source}")]
pub struct ResolveError {
    pub stage: Stage,
    #[source]
    pub source: ApiError,
}

impl ResolveError {
    /// The API failure underneath the stage context
    pub fn kind(&self) -> &ApiError {
        &self.source
    }
}

/// Resolves commit -> tree -> entries for `repo`
///
/// An empty `path_filter` returns every blob in the tree.
pub async fn resolve_repository_tree<A>(
    api: &A,
    repo: &RepositoryReference,
    path_filter: &HashSet<String>,
) -> Result<Vec<TreeEntry>, ResolveError>
where
    A: RepoApi + ?Sized,
{
    let at = |stage: Stage| move |source: ApiError| ResolveError { stage, source };

    let commit_sha = match &repo.commit_ref {
        Some(commit) => commit.clone(),
        None => api
            .resolve_latest_commit(&repo.owner, &repo.name)
            .await
            .map_err(at(Stage::LatestCommit))?,
    };

    let tree_sha = api
        .resolve_tree(&commit_sha, &repo.owner, &repo.name)
        .await
        .map_err(at(Stage::TreeSha))?;
    info!(commit = %commit_sha, tree = %tree_sha, "resolved tree");

    let entries = api
        .list_tree(&tree_sha, &repo.owner, &repo.name, path_filter)
        .await
        .map_err(at(Stage::FileTree))?;
    info!(count = entries.len(), "listed blob entries");

    Ok(entries)
}
