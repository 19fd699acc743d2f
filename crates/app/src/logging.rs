//! Tracing setup for the binary.
//!
//! Logs go to stderr so they never mix with the drill on stdout. `RUST_LOG`
//! overrides the level picked from `-v`.

use std::io;

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Map `-v` occurrences to a level; quiet by default.
#[must_use]
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(verbosity: u8) -> Result<(), TryInitError> {
    let filter = build_env_filter(level_from_verbosity(verbosity));
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Other crates (pdf-extract in particular) stay at warn.
        EnvFilter::new(format!(
            "warn,quiz_core={level},services={level},mcq_drill={level}"
        ))
    })
}
