//! HTTP surface: a thin JSON envelope around the feed pipeline.
//!
//! Every list endpoint answers 200 with a well-formed envelope, also when every
//! source failed (empty list) or `limit` is garbage (default applies).

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::aggregate::{Aggregator, FeedQuery};
use crate::article::Article;
use crate::discussions::{seed_board, top_discussions, DiscussionPost};
use crate::headlines::{seed_headlines, top_headlines};
use crate::ingest::config::FeedConfig;
use crate::rank::resolve_limit;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub headlines: Arc<Vec<Article>>,
    pub discussions: Arc<Vec<DiscussionPost>>,
}

impl AppState {
    /// State with the built-in headline desk and discussion board.
    pub fn new(aggregator: Aggregator) -> Self {
        let now = Utc::now();
        Self {
            aggregator: Arc::new(aggregator),
            headlines: Arc::new(seed_headlines(now)),
            discussions: Arc::new(seed_board(now)),
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> anyhow::Result<Self> {
        Ok(Self::new(Aggregator::from_config(cfg)?))
    }

    fn default_limit(&self) -> usize {
        self.aggregator.settings().default_limit
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/articles", get(get_articles))
        .route("/api/headlines", get(get_headlines))
        .route("/api/discussions", get(get_discussions))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Raw query params; `limit` stays text so bad input falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sport: Option<String>,
    pub team: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub articles: Vec<Article>,
    pub last_updated: DateTime<Utc>,
    pub total_count: usize,
}

impl ArticlesResponse {
    fn new(articles: Vec<Article>) -> Self {
        Self {
            total_count: articles.len(),
            articles,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionsResponse {
    pub discussions: Vec<DiscussionPost>,
    pub last_updated: DateTime<Utc>,
    pub total_count: usize,
}

async fn get_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ArticlesResponse> {
    let limit = resolve_limit(params.limit.as_deref(), state.default_limit());
    let query = FeedQuery {
        sport: params.sport,
        team: params.team,
        limit: Some(i64::try_from(limit).unwrap_or(i64::MAX)),
    };
    let articles = state.aggregator.aggregate(&query).await;
    Json(ArticlesResponse::new(articles))
}

async fn get_headlines(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ArticlesResponse> {
    let limit = resolve_limit(params.limit.as_deref(), state.default_limit());
    let pool: Vec<Article> = state
        .headlines
        .iter()
        .filter(|a| params.team.as_deref().map_or(true, |t| a.mentions_team(t)))
        .cloned()
        .collect();
    let articles = top_headlines(&pool, params.sport.as_deref(), limit, Utc::now());
    Json(ArticlesResponse::new(articles))
}

async fn get_discussions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<DiscussionsResponse> {
    let limit = resolve_limit(params.limit.as_deref(), state.default_limit());
    let discussions = top_discussions(&state.discussions, params.sport.as_deref(), limit, Utc::now());
    Json(DiscussionsResponse {
        total_count: discussions.len(),
        discussions,
        last_updated: Utc::now(),
    })
}
