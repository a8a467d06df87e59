// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/articles   (envelope, sport filter, bad/zero limit)
// - GET /api/headlines
// - GET /api/discussions

use std::sync::Arc;

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use sports_feed::api::{self, AppState, DiscussionsResponse};
use sports_feed::ingest::config::AggregatorSettings;
use sports_feed::ingest::providers::static_feed::StaticFeedAdapter;
use sports_feed::Aggregator;

const BODY_LIMIT: usize = 1024 * 1024;

/// Same router the binary builds, fed only by the offline static desk.
fn test_router() -> Router {
    let settings = AggregatorSettings {
        adapter_timeout_ms: 500,
        overall_timeout_ms: 1_000,
        ..AggregatorSettings::default()
    };
    let agg = Aggregator::new(vec![Arc::new(StaticFeedAdapter::default_seed())], settings)
        .expect("build aggregator");
    api::router(AppState::new(agg))
}

async fn get_json(uri: &str) -> Json {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = test_router().oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri} should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn articles_envelope_has_camel_case_fields() {
    let v = get_json("/api/articles?sport=nba&limit=2").await;

    let articles = v["articles"].as_array().expect("articles array");
    assert_eq!(articles.len(), 2);
    assert_eq!(v["totalCount"], 2);
    assert!(v["lastUpdated"].is_string());

    for a in articles {
        assert_eq!(a["sport"], "nba");
        for key in ["id", "title", "summary", "source", "publishedAt", "importance", "tags", "url"] {
            assert!(a.get(key).is_some(), "missing '{key}'");
        }
        let url = a["url"].as_str().expect("url");
        assert!(url.starts_with("https://fanzone.example/nba/"), "url not absolute: {url}");
    }
}

#[tokio::test]
async fn articles_team_filter() {
    let v = get_json("/api/articles?team=Celtics").await;
    let articles = v["articles"].as_array().expect("articles array");
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["team"], "Boston Celtics");
}

#[tokio::test]
async fn non_numeric_limit_falls_back_to_default() {
    let v = get_json("/api/articles?limit=lots").await;
    assert_eq!(v["totalCount"], 10);
}

#[tokio::test]
async fn zero_limit_returns_empty_envelope() {
    let v = get_json("/api/articles?limit=0").await;
    assert_eq!(v["totalCount"], 0);
    assert_eq!(v["articles"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn headlines_are_ranked_and_filtered() {
    let v = get_json("/api/headlines?limit=3").await;
    let ids: Vec<&str> = v["articles"]
        .as_array()
        .expect("articles array")
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["headline-0", "headline-1", "headline-5"]);

    let nfl = get_json("/api/headlines?sport=nfl").await;
    assert_eq!(nfl["totalCount"], 2);
}

#[tokio::test]
async fn discussions_are_ranked_by_heat() {
    let v = get_json("/api/discussions").await;
    let parsed: DiscussionsResponse = serde_json::from_value(v).expect("discussions envelope");
    let ids: Vec<&str> = parsed.discussions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d5", "d2", "d3", "d4"]);
    assert_eq!(parsed.total_count, 5);

    let nhl = get_json("/api/discussions?sport=nhl&limit=5").await;
    assert_eq!(nhl["totalCount"], 1);
    assert_eq!(nhl["discussions"][0]["isHot"], true);
}
