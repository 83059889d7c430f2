use crate::types::HistoryEntry;

/// Flattens the history log into one CSV row per event.
pub fn format(history: &[HistoryEntry]) -> String {
    let mut out = String::new();
    out.push_str("timestamp,event,login,html_url\n");
    for entry in history {
        for f in &entry.gained {
            push_row(&mut out, entry, "gained", &f.login, &f.html_url);
        }
        for f in &entry.lost {
            push_row(&mut out, entry, "lost", &f.login, &f.html_url);
        }
    }
    out
}

fn push_row(out: &mut String, entry: &HistoryEntry, event: &str, login: &str, html_url: &str) {
    use std::fmt::Write as _;
    let _ = writeln!(
        out,
        "{},{},{},{}",
        entry.timestamp.to_rfc3339(),
        event,
        login,
        html_url
    );
}
