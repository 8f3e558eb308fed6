//! Process-wide tracing setup driven by [`ObservabilityConfig`].

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber on first call; later calls are no-ops.
///
/// Output is compact text unless `config.json_logs` is on
/// (`TOOLSETS_LOG_FORMAT=json`).
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let filter = log_filter(config, std::env::var("RUST_LOG").ok().as_deref());
        let json = config.json_logs.then(|| fmt::layer().json());
        let text = (!config.json_logs).then(|| fmt::layer().compact());

        if let Err(err) = tracing_subscriber::registry()
            .with(filter)
            .with(json)
            .with(text)
            .try_init()
        {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

/// `RUST_LOG` directives when present and valid, else `config.log_level`.
fn log_filter(config: &ObservabilityConfig, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(&config.log_level))
}
