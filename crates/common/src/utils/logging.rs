use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Compact single-line output on stdout for running the sync server by hand.
/// - `RUST_LOG` overrides the filter
/// - otherwise record saves, proxy forwards and per-request spans at `info`
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// JSON lines for log shippers when the sync server runs as a deployed service.
/// - `RUST_LOG` overrides the filter
/// - otherwise `info`, with the `tower_http` request spans at `debug`
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the output format by name; anything other than `json` is compact.
pub fn init_logging(format: &str) {
    if format.eq_ignore_ascii_case("json") {
        init_logging_json();
    } else {
        init_logging_default();
    }
}
