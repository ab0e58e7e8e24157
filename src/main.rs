fn main() {
    // Fatal errors are logged (the logger is initialized inside run) and end the process.
    if let Err(err) = commit_scan::cli::run() {
        log::error!("❌ {err:#}");
        std::process::exit(1);
    }
}
