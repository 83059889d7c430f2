use std::fmt::Write as _;

use crate::types::{CheckReport, RecentEvent, StatsReport};

pub fn format_check(r: &CheckReport) -> String {
    let mut out = String::new();

    if r.gained.is_empty() {
        out.push_str("No new followers this time.\n");
    } else {
        let _ = writeln!(out, "New followers ({}):", r.gained.len());
        for f in &r.gained {
            let _ = writeln!(out, "  + {} - {}", f.login, f.html_url);
        }
    }

    if r.lost.is_empty() {
        out.push_str("Nobody unfollowed.\n");
    } else {
        let _ = writeln!(out, "Unfollowers ({}):", r.lost.len());
        for f in &r.lost {
            let _ = writeln!(out, "  - {} - {}", f.login, f.html_url);
        }
    }

    let _ = writeln!(out, "Total followers: {}", r.total_followers);
    out
}

pub fn format_stats(s: &StatsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Follower stats for {}", s.login);
    let _ = writeln!(out, "  Total followers:     {}", s.total_followers);
    let _ = writeln!(out, "  New followers ever:  {}", s.total_gained);
    let _ = writeln!(out, "  Unfollowers ever:    {}", s.total_lost);
    push_events(&mut out, "Recent new followers:", &s.recent_gained);
    push_events(&mut out, "Recent unfollowers:", &s.recent_lost);
    out
}

fn push_events(out: &mut String, heading: &str, events: &[RecentEvent]) {
    if events.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}");
    for e in events {
        let _ = writeln!(
            out,
            "  {} - {}",
            e.login,
            e.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Follower;
    use chrono::Utc;

    fn follower(login: &str) -> Follower {
        Follower {
            login: login.to_string(),
            id: 1,
            avatar_url: String::new(),
            html_url: format!("https://github.com/{login}"),
        }
    }

    #[test]
    fn check_output_lists_both_directions() {
        let report = CheckReport {
            login: "octocat".to_string(),
            timestamp: Utc::now(),
            gained: vec![follower("new1")],
            lost: vec![follower("old1"), follower("old2")],
            total_followers: 10,
        };
        let s = format_check(&report);
        assert!(s.contains("New followers (1):"));
        assert!(s.contains("+ new1"));
        assert!(s.contains("Unfollowers (2):"));
        assert!(s.contains("- old2"));
        assert!(s.contains("Total followers: 10"));
    }

    #[test]
    fn quiet_run_says_so() {
        let report = CheckReport {
            login: "octocat".to_string(),
            timestamp: Utc::now(),
            gained: vec![],
            lost: vec![],
            total_followers: 3,
        };
        let s = format_check(&report);
        assert!(s.contains("No new followers this time."));
        assert!(s.contains("Nobody unfollowed."));
    }
}
