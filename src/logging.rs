//! Process-wide `tracing` setup.

use crate::constants;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
