use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Follower, HistoryEntry};

/// On-disk layout for one tracked account: a snapshot file holding the
/// follower list from the last completed run, and an append-only history
/// log of per-run diffs. Both live in `data_dir` and are named after the
/// tracked login.
pub struct Store {
    snapshot_path: PathBuf,
    history_path: PathBuf,
}

impl Store {
    pub fn new(data_dir: &Path, login: &str) -> Self {
        Store {
            snapshot_path: data_dir.join(format!("{login}_followers.json")),
            history_path: data_dir.join(format!("{login}_history.json")),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Loads the last stored snapshot. A missing file is the first-run
    /// case and reads as empty; a file that exists but fails to parse is
    /// an error, never silently treated as empty.
    pub fn load_snapshot(&self) -> Result<Vec<Follower>> {
        read_json_or_default(&self.snapshot_path)
    }

    /// Replaces the stored snapshot with `followers`.
    ///
    /// The write goes to a sibling temp file first and is renamed into
    /// place, so a crash mid-write leaves the previous snapshot intact.
    pub fn save_snapshot(&self, followers: &[Follower]) -> Result<()> {
        write_json_atomic(&self.snapshot_path, followers)
    }

    pub fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        read_json_or_default(&self.history_path)
    }

    /// Appends one entry to the history log.
    ///
    /// Exactly one entry is recorded per run, including runs where both
    /// gained and lost are empty: a no-change observation is still an
    /// observation. The log is rewritten atomically with the new entry
    /// last; existing entries are never modified.
    pub fn append_entry(&self, entry: HistoryEntry) -> Result<()> {
        let mut history = self.load_history()?;
        history.push(entry);
        write_json_atomic(&self.history_path, &history)
    }
}

fn read_json_or_default<T>(path: &Path) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let parsed = serde_json::from_str(&data)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(parsed)
}

fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn follower(login: &str) -> Follower {
        Follower {
            login: login.to_string(),
            id: 1,
            avatar_url: format!("https://avatars.example/{login}"),
            html_url: format!("https://github.com/{login}"),
        }
    }

    #[test]
    fn missing_snapshot_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "nobody");
        assert!(store.load_snapshot().unwrap().is_empty());
        assert!(store.load_history().unwrap().is_empty());
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "octocat");
        let snap = vec![follower("a"), follower("b")];
        store.save_snapshot(&snap).unwrap();
        let loaded = store.load_snapshot().unwrap();
        assert_eq!(loaded, snap);
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "octocat");
        store.save_snapshot(&[follower("a")]).unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["octocat_followers.json"]);
    }

    #[test]
    fn corrupt_snapshot_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "octocat");
        fs::write(store.snapshot_path(), "{not json").unwrap();
        assert!(store.load_snapshot().is_err());
    }

    #[test]
    fn history_appends_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "octocat");
        store
            .append_entry(HistoryEntry {
                timestamp: Utc::now(),
                gained: vec![follower("a")],
                lost: vec![],
            })
            .unwrap();
        store
            .append_entry(HistoryEntry {
                timestamp: Utc::now(),
                gained: vec![],
                lost: vec![follower("a")],
            })
            .unwrap();

        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].gained[0].login, "a");
        assert_eq!(history[1].lost[0].login, "a");
    }

    #[test]
    fn no_change_run_still_appends_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path(), "octocat");
        store
            .append_entry(HistoryEntry {
                timestamp: Utc::now(),
                gained: vec![],
                lost: vec![],
            })
            .unwrap();
        assert_eq!(store.load_history().unwrap().len(), 1);
    }
}
