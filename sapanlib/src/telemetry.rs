//! Инициализация tracing.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "SAPAN_LOG";

/// Install the global subscriber once. `SAPAN_LOG` wins over `verbose`;
/// without it the filter is `sapan=info,sapanlib=info` (or `debug` when verbose).
/// Logs go to stderr so report output on stdout stays clean.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "sapan=debug,sapanlib=debug"
        } else {
            "sapan=info,sapanlib=info"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
