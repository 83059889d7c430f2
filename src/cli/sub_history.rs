use anyhow::Result;

use crate::formatters;
use crate::store::Store;

use super::HistoryArgs;

pub fn run_history(args: &HistoryArgs) -> Result<()> {
    let store = Store::new(&args.data_dir, &args.login);
    let history = store.load_history()?;

    if args.json {
        let s = serde_json::to_string_pretty(&history)?;
        println!("{s}");
        return Ok(());
    }
    if args.csv {
        print!("{}", formatters::csv::format(&history));
        return Ok(());
    }

    if history.is_empty() {
        println!("No history recorded for {} yet.", args.login);
        return Ok(());
    }
    for entry in &history {
        println!(
            "{}  +{} -{}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.gained.len(),
            entry.lost.len()
        );
        for f in &entry.gained {
            println!("  + {}", f.login);
        }
        for f in &entry.lost {
            println!("  - {}", f.login);
        }
    }
    Ok(())
}
