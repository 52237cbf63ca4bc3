// src/main.rs
// =============================================================================
// Entry point of the gitsnatch CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Build the API client from GITHUB_TOKEN and the flags
// 4. Run the fetch command and report how it ended
// 5. Exit with proper code (0 = success or nothing copied, 1 = error)
//
// Rust concepts used:
// - async/await: every file is fetched by its own tokio task
// - Result<T, E> and ?: errors bubble up to main, which picks the exit code
// - Box<dyn Trait>: the output target (clipboard or stdout) is chosen at runtime
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;       // src/cli.rs - command-line parsing
mod clipboard; // src/clipboard.rs - where the result ends up
mod config;    // src/config.rs - token, base URL, timeouts
mod fetch;     // src/fetch.rs - the fetch command itself
mod github;    // src/github/ - GitHub REST API client
mod prompt;    // src/prompt.rs - interactive questions
mod repo;      // src/repo/ - resolve, select and aggregate repository files

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::time::Instant;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, FetchArgs};
use clipboard::{ClipboardWriter, StdoutWriter, SystemClipboard};
use config::ClientConfig;
use github::{ApiError, GithubClient};
use prompt::TerminalPrompter;
use repo::ResolveError;

#[tokio::main]
async fn main() {
    // Run the application and turn the outcome into an exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            if let Some(hint) = hint_for(&e) {
                eprintln!("Hint: {}", hint);
            }
            1
        }
    };

    std::process::exit(exit_code);
}

// Main application logic
// Returns:
//   Ok(0) = content copied, or nothing to copy
//   Err = fatal error (missing token, resolution failure, clipboard failure)
async fn run() -> Result<i32> {
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch(args) => handle_fetch(args).await,
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(verbose, rust_log.as_deref()))
        .try_init();
}

// Builds the log filter
//
// Parameters:
//   verbose: --verbose was passed
//   rust_log: value of RUST_LOG, if set
//
// RUST_LOG replaces the WARN default; --verbose always adds DEBUG on top.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let base = rust_log
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    if verbose {
        base.add_directive(Level::DEBUG.into())
    } else {
        base
    }
}

// Extra advice for the resolution failures users hit most
fn hint_for(error: &anyhow::Error) -> Option<&'static str> {
    let kind = error.downcast_ref::<ResolveError>().map(ResolveError::kind)?;

    match kind {
        ApiError::Auth { .. } => Some("check that GITHUB_TOKEN is valid and can read the repository"),
        e if e.is_not_found() => Some("check the owner, repository name and commit SHA"),
        _ => None,
    }
}

// Handles the 'fetch' subcommand
//
// Parameters:
//   args: parsed `fetch` arguments; missing positionals are prompted for
//
// Returns: Ok(0) for every non-fatal outcome
async fn handle_fetch(args: FetchArgs) -> Result<i32> {
    // The deadline covers everything from here to the last fetched file
    let timeout = Duration::from_secs(args.timeout);
    let deadline = Instant::now() + timeout;

    // No token, no network calls
    let config = ClientConfig::from_env()?
        .with_base_url(&args.api_url)?
        .with_timeout(timeout);

    // Arc lets every fetch task share the one client (and its connection pool)
    let api = Arc::new(GithubClient::new(config)?.with_branches(args.branches.clone()));

    let mut prompter = TerminalPrompter::new();
    let repo = fetch::collect_repository(&args, &mut prompter)?;

    // --print swaps the clipboard for stdout
    let mut writer: Box<dyn ClipboardWriter> = if args.print {
        Box::new(StdoutWriter)
    } else {
        Box::new(SystemClipboard)
    };

    let summary = fetch::run(
        api,
        &repo,
        &args.paths,
        &mut prompter,
        writer.as_mut(),
        deadline,
    )
    .await?;

    // Status goes to stderr so --print output stays clean
    eprintln!("{}", summary.message(args.print));
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::Stage;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_default_filter_is_warn() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(false, Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_rust_log_is_honoured() {
        assert_eq!(log_filter(false, Some("info")).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(false, Some("error")).max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_verbose_adds_debug() {
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(true, Some("error")).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_hints() {
        let auth = anyhow::Error::new(ResolveError {
            stage: Stage::LatestCommit,
            source: ApiError::Auth { status: 401 },
        });
        assert!(hint_for(&auth).unwrap().contains("GITHUB_TOKEN"));

        let missing = anyhow::Error::new(ResolveError {
            stage: Stage::TreeSha,
            source: ApiError::NotFound("commit abc".to_string()),
        });
        assert!(hint_for(&missing).unwrap().contains("commit SHA"));

        assert!(hint_for(&anyhow::anyhow!("clipboard unavailable")).is_none());
    }
}
