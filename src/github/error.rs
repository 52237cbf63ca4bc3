// src/github/error.rs
// =============================================================================
// Error type for every GitHub API call.
//
// Callers branch on the variant: a rejected token (Auth) is handled very
// differently from a missing branch (NotFound) during default-branch discovery.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Longest response body excerpt carried inside an error
const SNIPPET_LEN: usize = 200;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("credential rejected (HTTP {status})")]
    Auth { status: u16 },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("content fetch failed (HTTP {status}): {snippet}")]
    ContentFetch { status: u16, snippet: String },

    #[error("GitHub API error (HTTP {status}): {snippet}")]
    UnexpectedStatus { status: u16, snippet: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Maps a non-2xx status on a JSON endpoint to an error
    pub fn from_status(status: StatusCode, body: &str, what: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth {
                status: status.as_u16(),
            },
            // 409: empty repository, 422: malformed SHA
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::NotFound(what.to_string())
            }
            _ => ApiError::UnexpectedStatus {
                status: status.as_u16(),
                snippet: snippet(body),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Errors that no other branch name or retry could fix
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Auth { .. } | ApiError::Transport(_))
    }
}

/// First SNIPPET_LEN characters of a body, cut on a char boundary
pub fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
