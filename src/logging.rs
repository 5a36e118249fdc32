//! Tracing setup for the CLI: `tracing` + `tracing-subscriber` for
//! structured diagnostics, kept separate from the program's own stdout
//! (print/println/REPL echo stay on `println!`/`write!`; tracing events
//! go through the subscriber, which defaults to stderr).

use tracing_subscriber::EnvFilter;

/// `-v` raises the default level; `RUST_LOG` always wins if set.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
