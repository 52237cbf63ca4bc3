// src/github/mod.rs
// =============================================================================
// Everything that talks to the GitHub REST API.
//
// - client: the RepoApi trait and its reqwest implementation
// - error: ApiError, shared by all API operations
// - types: tree entries, repository references and the JSON wire shapes
// =============================================================================

mod client;
mod error;
mod types;

#[cfg(test)]
pub mod fake;

pub use client::{GithubClient, RepoApi};
pub use error::ApiError;
pub use types::{RepositoryReference, TreeEntry};
