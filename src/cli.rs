// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// One subcommand today: `fetch`. Every positional argument is optional;
// whatever is missing gets asked for interactively.
// =============================================================================

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "gitsnatch",
    version,
    about = "Pick files from a GitHub repository and copy their contents to the clipboard",
    long_about = "gitsnatch lists the files of a GitHub repository at a commit, lets you pick some, \
                  fetches them concurrently and copies the concatenated contents to your clipboard. \
                  Requires a GITHUB_TOKEN environment variable."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch selected file contents from a GitHub repository
    ///
    /// Example: gitsnatch fetch rust-lang rust
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Repository owner (user or organisation)
    pub owner: Option<String>,

    /// Repository name
    pub repo: Option<String>,

    /// Commit SHA to read; defaults to the latest commit of the default branch
    pub commit: Option<String>,

    /// Copy these paths without showing the file picker (repeatable)
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Branch names tried, in order, to find the latest commit (repeatable)
    ///
    /// Defaults to main, then master, then the repository's default branch.
    #[arg(long = "branch", value_name = "NAME")]
    pub branches: Vec<String>,

    /// Root of the per-repository API endpoints
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Seconds allowed for each request and for the whole fetch
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Print the result to stdout instead of copying it
    #[arg(long)]
    pub print: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_with_all_positionals() {
        let cli = Cli::try_parse_from(["gitsnatch", "fetch", "acme", "widgets", "abc123"]).unwrap();
        let Commands::Fetch(args) = cli.command;

        assert_eq!(args.owner.as_deref(), Some("acme"));
        assert_eq!(args.repo.as_deref(), Some("widgets"));
        assert_eq!(args.commit.as_deref(), Some("abc123"));
        assert_eq!(args.api_url, DEFAULT_BASE_URL);
        assert_eq!(args.timeout, 100);
        assert!(!args.print);
    }

    #[test]
    fn test_fetch_without_positionals() {
        let cli = Cli::try_parse_from(["gitsnatch", "-v", "fetch"]).unwrap();
        let Commands::Fetch(args) = cli.command;

        assert!(cli.verbose);
        assert!(args.owner.is_none() && args.repo.is_none() && args.commit.is_none());
    }

    #[test]
    fn test_repeated_flags() {
        let cli = Cli::try_parse_from([
            "gitsnatch", "fetch", "acme", "widgets", "--path", "README.md", "--path", "src/main.go",
            "--branch", "develop", "--print",
        ])
        .unwrap();
        let Commands::Fetch(args) = cli.command;

        assert_eq!(args.paths, vec!["README.md", "src/main.go"]);
        assert_eq!(args.branches, vec!["develop"]);
        assert!(args.print);
    }

    #[test]
    fn test_too_many_positionals() {
        assert!(Cli::try_parse_from(["gitsnatch", "fetch", "a", "b", "c", "d"]).is_err());
    }
}
