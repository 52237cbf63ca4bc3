// src/repo/mod.rs
// =============================================================================
// The repository-content pipeline.
//
// Submodules:
// - resolver: commit -> tree -> blob entries, with stage-tagged errors
// - selection: sorting paths for the prompt and narrowing the tree to a pick
// - aggregate: concurrent content fetch joined into one string
// =============================================================================

mod aggregate;
mod resolver;
mod selection;

pub use aggregate::{fetch_and_join, FetchFailure};
pub use resolver::{resolve_repository_tree, ResolveError};
pub use selection::{filter_by_paths, sorted_paths};

#[cfg(test)]
pub use resolver::Stage;
