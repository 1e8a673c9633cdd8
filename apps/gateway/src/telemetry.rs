//! Tracing bootstrap for the gateway binary.

use std::sync::OnceLock;

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the fmt subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
/// JSON output is the default; `LOG_FORMAT=text` switches to plain lines.
/// Safe to call more than once; later calls are no-ops.
pub fn init_telemetry(service_name: &str) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|value| !matches!(value.to_lowercase().as_str(), "text" | "pretty" | "plain"))
        .unwrap_or(true);
    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
    INIT.set(()).ok();

    tracing::info!(
        service = service_name,
        version = env!("CARGO_PKG_VERSION"),
        "telemetry installed"
    );
    Ok(())
}
