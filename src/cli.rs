use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};

use crate::api;

mod run_check;
mod sub_history;
mod sub_stats;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "followtrack",
    version,
    about = "Track GitHub follower gains and losses",
    long_about = None,
    subcommand_negates_reqs = true
)]
pub struct Args {
    /// Subcommand (use without subcommand to run a check)
    #[command(subcommand)]
    pub cmd: Option<Subcommand>,

    /// GitHub login to track
    ///
    /// Required unless a subcommand is given (subcommands carry their
    /// own LOGIN argument).
    #[arg(value_name = "LOGIN", required = true)]
    pub login: Option<String>,

    /// Personal access token for a higher API rate limit
    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Directory holding the snapshot and history files
    #[arg(long = "data-dir", value_name = "PATH", default_value = ".", value_hint = ValueHint::DirPath)]
    pub data_dir: PathBuf,

    /// Followers requested per page (GitHub caps this at 100)
    #[arg(long = "per-page", value_name = "N", default_value_t = api::DEFAULT_PER_PAGE)]
    pub per_page: usize,

    /// Output JSON instead of text
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Show a progress spinner while fetching
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    pub progress: bool,

    /// Verbose logging
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if command execution fails.
pub fn run() -> Result<()> {
    let args = Args::parse();
    if let Some(cmd) = &args.cmd {
        return match cmd {
            Subcommand::Stats(stats_args) => sub_stats::run_stats(stats_args),
            Subcommand::History(history_args) => sub_history::run_history(history_args),
        };
    }
    run_check::run_with_args(&args)
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Subcommand {
    /// Show aggregate follower stats from the local files (no network)
    Stats(StatsArgs),
    /// Print the recorded gain/loss history
    History(HistoryArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct StatsArgs {
    /// GitHub login whose files to read
    #[arg(value_name = "LOGIN")]
    pub login: String,

    /// Directory holding the snapshot and history files
    #[arg(long = "data-dir", value_name = "PATH", default_value = ".", value_hint = ValueHint::DirPath)]
    pub data_dir: PathBuf,

    /// Output JSON instead of text
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct HistoryArgs {
    /// GitHub login whose files to read
    #[arg(value_name = "LOGIN")]
    pub login: String,

    /// Directory holding the snapshot and history files
    #[arg(long = "data-dir", value_name = "PATH", default_value = ".", value_hint = ValueHint::DirPath)]
    pub data_dir: PathBuf,

    /// Output JSON instead of text
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "csv")]
    pub json: bool,

    /// Output CSV instead of text
    #[arg(long = "csv", action = ArgAction::SetTrue, conflicts_with = "json")]
    pub csv: bool,
}
