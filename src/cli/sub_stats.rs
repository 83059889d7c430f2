use anyhow::Result;

use crate::formatters;
use crate::store::Store;
use crate::types::{RecentEvent, StatsReport};

use super::StatsArgs;

const RECENT_EVENTS: usize = 5;

pub fn run_stats(args: &StatsArgs) -> Result<()> {
    let store = Store::new(&args.data_dir, &args.login);
    let report = compute_stats(&args.login, &store)?;
    if args.json {
        let s = serde_json::to_string_pretty(&report)?;
        println!("{s}");
        return Ok(());
    }
    print!("{}", formatters::text::format_stats(&report));
    Ok(())
}

/// Aggregates the local snapshot and history log; no network access.
fn compute_stats(login: &str, store: &Store) -> Result<StatsReport> {
    let snapshot = store.load_snapshot()?;
    let history = store.load_history()?;

    let mut gained: Vec<RecentEvent> = Vec::new();
    let mut lost: Vec<RecentEvent> = Vec::new();
    for entry in &history {
        for f in &entry.gained {
            gained.push(RecentEvent {
                login: f.login.clone(),
                html_url: f.html_url.clone(),
                timestamp: entry.timestamp,
            });
        }
        for f in &entry.lost {
            lost.push(RecentEvent {
                login: f.login.clone(),
                html_url: f.html_url.clone(),
                timestamp: entry.timestamp,
            });
        }
    }

    let total_gained = gained.len();
    let total_lost = lost.len();
    let recent_gained = gained.split_off(total_gained.saturating_sub(RECENT_EVENTS));
    let recent_lost = lost.split_off(total_lost.saturating_sub(RECENT_EVENTS));

    Ok(StatsReport {
        login: login.to_string(),
        total_followers: snapshot.len(),
        total_gained,
        total_lost,
        recent_gained,
        recent_lost,
    })
}
