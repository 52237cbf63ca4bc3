// src/fetch.rs
// =============================================================================
// The `fetch` command, start to finish.
//
// 1. Collect owner / repo / commit (arguments first, prompts for the rest)
// 2. Resolve the repository tree
// 3. Let the user pick files (skipped when --path was given)
// 4. Fetch the picked files concurrently
// 5. Hand the joined text to the clipboard writer
//
// Collaborators come in as traits so the whole flow runs against fakes in
// tests. Status lines go to stderr, keeping stdout clean for --print.
//
// Rust concepts:
// - Generic bounds with ?Sized: `run` accepts both concrete types and
//   trait objects such as Box<dyn ClipboardWriter>
// - Arc<A>: the API client is shared with every fetch task
// - timeout_at: one deadline is shared by resolution and fetching
// - `??`: the outer ? handles the timeout, the inner one the resolve error
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{timeout_at, Instant};
use tracing::info;

use crate::cli::FetchArgs;
use crate::clipboard::ClipboardWriter;
use crate::github::{RepoApi, RepositoryReference};
use crate::prompt::Prompter;
use crate::repo::{fetch_and_join, filter_by_paths, resolve_repository_tree, sorted_paths, FetchFailure};

/// How a fetch run ended; every variant is a successful exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSummary {
    /// The tree had no files, or the user ticked none
    NothingSelected,
    /// Files were selected but not a single fetch succeeded
    AllFailed { attempted: usize },
    /// Content was handed to the writer
    Copied {
        fetched: usize,
        skipped: Vec<FetchFailure>,
    },
}

impl FetchSummary {
    /// Final line(s) shown to the user
    pub fn message(&self, printed: bool) -> String {
        match self {
            FetchSummary::NothingSelected => "No files selected. Nothing copied.".to_string(),
            FetchSummary::AllFailed { attempted } => {
                format!("❌ All {} file fetch(es) failed. Nothing copied.", attempted)
            }
            FetchSummary::Copied { fetched, skipped } => {
                let mut lines = Vec::new();
                if !skipped.is_empty() {
                    lines.push(format!("⚠️  Skipped {} file(s) that could not be fetched:", skipped.len()));
                    for failure in skipped {
                        lines.push(format!("   {}: {}", failure.path, failure.reason));
                    }
                }
                let target = if printed { "stdout" } else { "clipboard" };
                lines.push(format!("✅ Copied {} file(s) to {} successfully.", fetched, target));
                lines.join("\n")
            }
        }
    }
}

/// Owner, repo and commit from the arguments, prompting for missing ones
///
/// An empty commit answer means "latest commit".
//
// Parameters:
//   args: parsed `fetch` arguments
//   prompter: asked only for the positionals that were left out
//
// Returns: the repository to resolve, or the prompt error (e.g. no terminal)
pub fn collect_repository<P>(args: &FetchArgs, prompter: &mut P) -> Result<RepositoryReference>
where
    P: Prompter + ?Sized,
{
    let owner = match &args.owner {
        Some(owner) => owner.clone(),
        None => prompter.ask("Who is the owner of the GitHub repo?")?,
    };

    let name = match &args.repo {
        Some(repo) => repo.clone(),
        None => prompter.ask("What is the name of the GitHub repo?")?,
    };

    let commit = match &args.commit {
        Some(commit) => Some(commit.clone()),
        None => prompter.ask_optional("Which commit? (leave empty for the latest)")?,
    };

    Ok(RepositoryReference::new(owner, name, commit))
}

/// Resolves, selects, fetches and writes; all under one `deadline`
///
/// A non-empty `preselected` list replaces the interactive picker.
//
// Parameters:
//   api: shared client, cloned into each fetch task
//   repo: owner, name and optional pinned commit
//   preselected: --path values; empty means "ask the user"
//   prompter: used for the file picker
//   writer: clipboard, or stdout with --print
//   deadline: resolution must finish before it, late fetches are dropped
//
// Returns:
//   Ok(summary) for every outcome the user should just be told about
//   Err = resolution failed, the deadline hit during resolution, or the
//         writer refused the content
pub async fn run<A, P, W>(
    api: Arc<A>,
    repo: &RepositoryReference,
    preselected: &[String],
    prompter: &mut P,
    writer: &mut W,
    deadline: Instant,
) -> Result<FetchSummary>
where
    A: RepoApi + 'static,
    P: Prompter + ?Sized,
    W: ClipboardWriter + ?Sized,
{
    eprintln!("🔍 Resolving {}/{}...", repo.owner, repo.name);

    // The same set narrows the tree listing and skips the picker
    let path_filter: HashSet<String> = preselected.iter().cloned().collect();
    let tree = timeout_at(deadline, resolve_repository_tree(api.as_ref(), repo, &path_filter))
        .await
        .context("deadline elapsed while resolving the repository tree")??;

    let selected = if path_filter.is_empty() {
        // Picker shows case-insensitive order; the tree keeps server order
        let paths = sorted_paths(&tree);
        if paths.is_empty() {
            return Ok(FetchSummary::NothingSelected);
        }
        let picked = prompter.multi_select("Select the files you want to copy.", &paths)?;
        filter_by_paths(&tree, &picked)
    } else {
        tree
    };

    if selected.is_empty() {
        return Ok(FetchSummary::NothingSelected);
    }

    eprintln!("📄 Fetching {} file(s)...", selected.len());
    let report = fetch_and_join(api, &selected, deadline).await;
    info!(fetched = report.fetched, failed = report.failures.len(), "fetch finished");

    // Every fetch failed: leave whatever is on the clipboard alone
    if report.content.is_empty() {
        return Ok(FetchSummary::AllFailed {
            attempted: report.attempted(),
        });
    }

    writer.write(&report.content)?;

    Ok(FetchSummary::Copied {
        fetched: report.fetched,
        skipped: report.failures,
    })
}
