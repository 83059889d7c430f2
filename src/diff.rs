use std::collections::BTreeSet;

use crate::types::{Follower, FollowerDiff};

/// Computes who followed and who unfollowed between two snapshots.
///
/// Identity is the login: `gained` holds every record in `current` whose
/// login is absent from `previous`, `lost` the reverse. An empty
/// `previous` (first ever run) therefore reports the whole current set
/// as gained and nothing as lost. Both output lists are sorted by login.
pub fn diff_snapshots(previous: &[Follower], current: &[Follower]) -> FollowerDiff {
    let prev_logins: BTreeSet<&str> = previous.iter().map(|f| f.login.as_str()).collect();
    let curr_logins: BTreeSet<&str> = current.iter().map(|f| f.login.as_str()).collect();

    let mut gained: Vec<Follower> = current
        .iter()
        .filter(|f| !prev_logins.contains(f.login.as_str()))
        .cloned()
        .collect();
    let mut lost: Vec<Follower> = previous
        .iter()
        .filter(|f| !curr_logins.contains(f.login.as_str()))
        .cloned()
        .collect();

    gained.sort_by(|a, b| a.login.cmp(&b.login));
    lost.sort_by(|a, b| a.login.cmp(&b.login));

    FollowerDiff { gained, lost }
}
