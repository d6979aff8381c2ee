use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Diagnostics go to stderr so they never interleave with the chat on stdout.

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Install the global subscriber. `--verbose` wins over the configured level.
pub fn init_logging(verbose: bool, configured: Option<&str>) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured.map(parse_level).unwrap_or(Level::WARN)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}
