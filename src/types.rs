use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One follower record as returned by the GitHub users API.
///
/// The `login` is the identity key: two records with the same login are
/// the same follower for diffing purposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Follower {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
}

/// Gained/lost follower sets between two snapshots, sorted by login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowerDiff {
    pub gained: Vec<Follower>,
    pub lost: Vec<Follower>,
}

impl FollowerDiff {
    pub fn is_empty(&self) -> bool {
        self.gained.is_empty() && self.lost.is_empty()
    }
}

/// One recorded check: a timestamp and the diff observed at that time.
/// Entries are append-only; once written they are never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub gained: Vec<Follower>,
    pub lost: Vec<Follower>,
}

/// Result of one full check run, printed by `followtrack <login>`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub login: String,
    pub timestamp: DateTime<Utc>,
    pub gained: Vec<Follower>,
    pub lost: Vec<Follower>,
    pub total_followers: usize,
}

/// Aggregate numbers computed from the local snapshot and history log.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub login: String,
    pub total_followers: usize,
    pub total_gained: usize,
    pub total_lost: usize,
    /// Most recent gained events, oldest first, at most five.
    pub recent_gained: Vec<RecentEvent>,
    /// Most recent lost events, oldest first, at most five.
    pub recent_lost: Vec<RecentEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentEvent {
    pub login: String,
    pub html_url: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn follower(login: &str) -> Follower {
        Follower {
            login: login.to_string(),
            id: 7,
            avatar_url: format!("https://avatars.example/{login}"),
            html_url: format!("https://github.com/{login}"),
        }
    }

    #[test]
    fn follower_round_trips_through_github_field_names() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat"
        }"#;
        let f: Follower = serde_json::from_str(json).unwrap();
        assert_eq!(f.login, "octocat");
        assert_eq!(f.id, 583231);
        let back = serde_json::to_string(&f).unwrap();
        assert!(back.contains("\"avatar_url\""));
        assert!(back.contains("\"html_url\""));
    }

    #[test]
    fn history_entry_serializes_rfc3339_timestamp() {
        let entry = HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap(),
            gained: vec![follower("a")],
            lost: vec![],
        };
        let s = serde_json::to_string(&entry).unwrap();
        assert!(s.contains("2026-08-23T12:00:00Z"));
        let back: HistoryEntry = serde_json::from_str(&s).unwrap();
        assert_eq!(back.gained.len(), 1);
        assert!(back.lost.is_empty());
    }
}
