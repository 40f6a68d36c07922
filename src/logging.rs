//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter, e.g.
/// `QUALITY_GATE_LOG=quality_gate=debug`.
pub const LOG_ENV: &str = "QUALITY_GATE_LOG";

static INIT: Once = Once::new();

/// Filter used when the environment does not provide one.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "quality_gate=warn",
        1 => "quality_gate=info",
        2 => "quality_gate=debug",
        _ => "quality_gate=trace",
    }
}

/// Install the global subscriber. Logs go to stderr so JSON on stdout stays
/// parseable. Safe to call more than once.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .init();
    });
}
