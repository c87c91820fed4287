//! Diagnostic logging setup.
//!
//! Log lines go to stderr so they never mix with the query printed on stdout.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit log filter, e.g. `SOLRQ_LOG=solrq_query=debug`.
pub const LOG_ENV: &str = "SOLRQ_LOG";

/// Installs the global subscriber.
///
/// `SOLRQ_LOG` wins when set; otherwise the `-v` count picks the level.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    if let Err(e) = subscriber.try_init() {
        eprintln!("warning: could not initialize logging: {e}");
    }
}

/// Maps a `-v` count to a filter directive.
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
