// src/repo/selection.rs
// Pure helpers between the tree listing and the multi-select prompt.

use std::collections::HashSet;

use crate::github::TreeEntry;

/// Paths of `entries`, sorted case-insensitively for display
///
/// `README.md` and `readme.md` land next to each other instead of being split
/// by case. The sort is stable, so case-only twins keep their listing order.
pub fn sorted_paths(entries: &[TreeEntry]) -> Vec<String> {
    let mut paths: Vec<String> = entries.iter().map(|entry| entry.path.clone()).collect();
    paths.sort_by_cached_key(|path| path.to_lowercase());
    paths
}

/// Entries whose path was selected, in their original order
///
/// Selected paths with no matching entry are ignored.
pub fn filter_by_paths(entries: &[TreeEntry], selected: &[String]) -> Vec<TreeEntry> {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();

    entries
        .iter()
        .filter(|entry| selected.contains(entry.path.as_str()))
        .cloned()
        .collect()
}
