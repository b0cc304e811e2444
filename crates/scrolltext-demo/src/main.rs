#![forbid(unsafe_code)]

//! scrolltext demo binary entry point.

use scrolltext_demo::cli;
use scrolltext_demo::run::{self, RunSummary};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let opts = cli::Opts::parse();
    let summary: RunSummary = match run::run(&opts) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Run failed: {e}");
            std::process::exit(1);
        }
    };

    if let Some(target) = &opts.summary
        && let Err(e) = run::emit_summary(&summary, target)
    {
        eprintln!("Failed to write summary: {e}");
        std::process::exit(1);
    }
}
