//! `tracing` output for the CLI.
//!
//! Logs go to stderr without timestamps so they never mix with command
//! output. `RUST_LOG` takes precedence over the `-v` count.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level selected by the number of `-v` flags.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("invite_core={level},invite_cli={level},warn"))
    })
}

pub fn init(verbosity: u8) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level_for(verbosity)))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if result.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
