// tests/metrics.rs
//
// The Prometheus recorder is process-global, so this file installs it exactly once.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use sports_feed::api::{self, AppState};
use sports_feed::ingest::config::AggregatorSettings;
use sports_feed::ingest::providers::static_feed::StaticFeedAdapter;
use sports_feed::telemetry::Metrics;
use sports_feed::{Aggregator, RawRecord, SourceAdapter};

struct Broken;

#[async_trait]
impl SourceAdapter for Broken {
    fn name(&self) -> &str {
        "Broken Wire"
    }

    fn base_url(&self) -> &str {
        "https://broken.test/"
    }

    async fn fetch(&self, _sport: Option<&str>) -> anyhow::Result<Vec<RawRecord>> {
        Err(anyhow!("connection reset"))
    }
}

fn build_app() -> Router {
    let settings = AggregatorSettings {
        adapter_timeout_ms: 750,
        overall_timeout_ms: 1_500,
        ..AggregatorSettings::default()
    };
    let metrics = Metrics::init(&settings).expect("install prometheus recorder");
    let agg = Aggregator::new(
        vec![Arc::new(StaticFeedAdapter::default_seed()), Arc::new(Broken)],
        settings,
    )
    .expect("build aggregator");
    api::router(AppState::new(agg)).merge(metrics.router())
}

async fn get_text(app: &Router, uri: &str) -> String {
    let resp = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn metrics_endpoint_contains_pipeline_series() {
    let app = build_app();

    // one request drives every adapter once
    let _ = get_text(&app, "/api/articles?sport=nba").await;
    let text = get_text(&app, "/metrics").await;

    for needle in [
        "ingest_records_total",
        "ingest_kept_total",
        "ingest_adapter_errors_total",
        "feed_aggregate_ms",
        "feed_last_run_ts",
        "feed_adapter_timeout_ms 750",
        "feed_overall_timeout_ms 1500",
    ] {
        assert!(
            text.contains(needle),
            "metrics output missing `{needle}`:\n{text}"
        );
    }
}
