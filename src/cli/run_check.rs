use anyhow::{Context, Result, bail};
use chrono::Utc;

use crate::api::{self, BackoffPolicy, GithubClient};
use crate::diff::diff_snapshots;
use crate::formatters;
use crate::store::Store;
use crate::types::{CheckReport, HistoryEntry};

use super::Args;

/// One full check: fetch the current follower set, diff it against the
/// stored snapshot, record the result, and report what changed.
///
/// Nothing is written until the fetch has completed: a failed or
/// interrupted fetch leaves the snapshot and history files untouched.
pub fn run_with_args(args: &Args) -> Result<()> {
    if args.per_page == 0 || args.per_page > api::DEFAULT_PER_PAGE {
        bail!("--per-page must be between 1 and {}", api::DEFAULT_PER_PAGE);
    }

    let login = args.login.as_deref().context("missing LOGIN argument")?;
    let store = Store::new(&args.data_dir, login);
    let previous = store.load_snapshot()?;
    if args.verbose > 0 {
        eprintln!(
            "Checking {login} (previous snapshot: {} followers)",
            previous.len()
        );
    }

    let mut client = GithubClient::new(login, args.token.clone())
        .context("build http client")?;

    // Progress setup
    let pb = if args.progress {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner} {msg}")
                .unwrap()
                .tick_chars("⠁⠃⠇⠋⠙⠸⢰⣠⣄⡆"),
        );
        Some(pb)
    } else {
        None
    };

    let backoff = BackoffPolicy::default();
    let current = api::fetch_all(
        &mut client,
        args.per_page,
        &backoff,
        &mut |wait| {
            if args.verbose > 0 {
                eprintln!("Rate limited; waiting {}s before retrying", wait.as_secs());
            }
            std::thread::sleep(wait);
        },
        |page, count| {
            if let Some(ref pb) = pb {
                pb.set_message(format!("page {page} ({count} followers)"));
                pb.tick();
            }
            if args.verbose > 1 {
                eprintln!("Fetched page {page}: {count} entries");
            }
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    if args.verbose > 0 {
        eprintln!("Fetched {} followers", current.len());
    }

    let diff = diff_snapshots(&previous, &current);
    let timestamp = Utc::now();

    // History first, snapshot second: if the snapshot replace fails the
    // next run re-reads the old snapshot and the diff is recomputed.
    store.append_entry(HistoryEntry {
        timestamp,
        gained: diff.gained.clone(),
        lost: diff.lost.clone(),
    })?;
    store.save_snapshot(&current)?;

    let report = CheckReport {
        login: login.to_string(),
        timestamp,
        gained: diff.gained,
        lost: diff.lost,
        total_followers: current.len(),
    };

    if args.json {
        let s = serde_json::to_string_pretty(&report)?;
        println!("{s}");
        return Ok(());
    }
    print!("{}", formatters::text::format_check(&report));
    Ok(())
}
