//! Sports Feed Service: binary entrypoint.
//! Boots the Axum HTTP server: loads feed config, builds the adapters, wires routes,
//! shared state and the Prometheus exporter.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sports_feed::ingest::config::load_feed_config_default;
use sports_feed::telemetry::Metrics;
use sports_feed::{api, AppState};

/// Compact tracing logs; RUST_LOG wins over the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sports_feed=info,ingest=info,aggregate=info,warn"));

    // The runtime may already have installed a subscriber; keep theirs in that case.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = load_feed_config_default()?;
    let state = AppState::from_config(&cfg)?;
    tracing::info!(
        adapters = ?state.aggregator.adapter_names(),
        adapter_timeout_ms = cfg.aggregator.adapter_timeout_ms,
        overall_timeout_ms = cfg.aggregator.overall_timeout_ms,
        "feed service starting"
    );

    let metrics = Metrics::init(&cfg.aggregator)?;
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
