fn main() {
    // Delegate to CLI runner; errors are printed nicely inside.
    if let Err(err) = followtrack::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
