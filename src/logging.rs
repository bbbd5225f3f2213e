//! Log output for the CLI.
//!
//! `RUST_LOG` takes precedence; otherwise `-v` raises the level to info and
//! `-vv` to debug. Logs go to stderr so `check --json` output stays clean.

use tracing_subscriber::{EnvFilter, fmt};

pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
