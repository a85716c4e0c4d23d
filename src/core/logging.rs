//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding a full filter directive, e.g. `shipquote=debug`
pub const LOG_ENV: &str = "SHIPQUOTE_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive from the command-line flags and config
///
/// `SHIPQUOTE_LOG` is handled separately by [`init`] and beats all of these.
pub fn directive(verbose: bool, quiet: bool, configured: Option<&str>) -> String {
    if verbose {
        "debug".to_string()
    } else if quiet {
        "error".to_string()
    } else {
        configured
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string()
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
