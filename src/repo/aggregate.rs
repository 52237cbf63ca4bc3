// src/repo/aggregate.rs
// =============================================================================
// Concurrent fetch of every selected blob, joined into one string.
//
// How it works:
// 1. Spawn one tokio task per blob entry (no concurrency cap)
// 2. Each task sends (index, outcome) through a channel sized to the batch,
//    so a task never waits on the collector
// 3. The collector drops each outcome into the slot matching its index
// 4. After every task reported, or the deadline passed, slots are joined in
//    listing order
//
// A failed file is logged and left out. It never fails the batch.
// Tasks still running at the deadline are aborted and count as failed.
//
// Output stays deterministic: completion order is a race, but slot order
// is the order of the selected entries.
// =============================================================================

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::github::{RepoApi, TreeEntry};

/// Result of one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { path: String, content: String },
    Failed { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub path: String,
    pub reason: String,
}

/// Joined output of a batch plus what went missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Formatted blocks of every successful fetch, in selection order
    pub content: String,
    pub fetched: usize,
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    /// Number of blobs a worker was dispatched for
    pub fn attempted(&self) -> usize {
        self.fetched + self.failures.len()
    }
}

/// One file as it appears in the clipboard text
pub fn format_block(path: &str, content: &str) -> String {
    format!("----- {} -----\n{}\n", path, content)
}

/// Fetches every blob in `entries` concurrently and joins the results
///
/// Non-blob entries are skipped. Returns once every worker finished or
/// `deadline` passed, whichever comes first.
pub async fn fetch_and_join<A>(api: Arc<A>, entries: &[TreeEntry], deadline: Instant) -> FetchReport
where
    A: RepoApi + 'static,
{
    let blobs: Vec<&TreeEntry> = entries.iter().filter(|entry| entry.is_blob()).collect();
    if blobs.is_empty() {
        return FetchReport::default();
    }

    let (tx, mut rx) = mpsc::channel(blobs.len());
    let mut workers = JoinSet::new();

    for (index, entry) in blobs.iter().enumerate() {
        debug!(path = %entry.path, sha = %entry.sha, mode = %entry.mode, "dispatching fetch");
        let api = Arc::clone(&api);
        let tx = tx.clone();
        let path = entry.path.clone();
        let url = entry.content_url.clone();

        workers.spawn(async move {
            let outcome = match api.fetch_content(&url).await {
                Ok(content) => FetchOutcome::Fetched { path, content },
                Err(e) => FetchOutcome::Failed {
                    path,
                    reason: e.to_string(),
                },
            };
            // Capacity equals the batch size, so this never waits
            let _ = tx.send((index, outcome)).await;
        });
    }
    drop(tx);
    debug!(workers = blobs.len(), "dispatched content fetches");

    let mut slots: Vec<Option<FetchOutcome>> = vec![None; blobs.len()];
    let collect = async {
        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
        }
    };

    let timed_out = timeout_at(deadline, collect).await.is_err();
    if timed_out {
        warn!("deadline elapsed, aborting unfinished fetches");
        workers.abort_all();
    }

    let mut report = FetchReport::default();
    for (slot, entry) in slots.into_iter().zip(&blobs) {
        let outcome = slot.unwrap_or_else(|| FetchOutcome::Failed {
            path: entry.path.clone(),
            reason: if timed_out {
                "deadline elapsed".to_string()
            } else {
                "fetch task stopped without a result".to_string()
            },
        });

        match outcome {
            FetchOutcome::Fetched { path, content } => {
                report.content.push_str(&format_block(&path, &content));
                report.fetched += 1;
            }
            FetchOutcome::Failed { path, reason } => {
                warn!(path = %path, error = %reason, "error fetching content");
                report.failures.push(FetchFailure { path, reason });
            }
        }
    }

    report
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<A> instead of &A?
//    - tokio::spawn needs futures that own everything they touch ('static)
//    - Arc::clone hands each task its own pointer to the same client
//
// 2. What is JoinSet?
//    - A collection of spawned tasks
//    - abort_all() cancels whatever is still running
//    - Dropping it also aborts its tasks
//
// 3. Why a channel if JoinSet can return results too?
//    - JoinSet yields results in completion order and loses the task index
//      when a task panics; the channel carries (index, outcome) explicitly
//
// 4. timeout_at vs timeout:
//    - timeout(duration) starts counting when called
//    - timeout_at(instant) shares one deadline across several steps
// -----------------------------------------------------------------------------
