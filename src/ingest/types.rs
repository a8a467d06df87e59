// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One candidate item as scraped/parsed by an adapter, before normalization.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawRecord {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub url: Option<String>, // absolute or relative to the adapter's base url
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub sport: Option<String>, // hint only; the request's sport filter wins
    #[serde(default)]
    pub image_url: Option<String>,
}

impl RawRecord {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// True when both title and summary carry text after trimming.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.summary.trim().is_empty()
    }
}

/// A single external provider of sports content.
///
/// Implementations must be independent of each other: an `Err` from one adapter only
/// removes that adapter's contribution from the current aggregation.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable provider name, e.g. "ESPN NBA".
    fn name(&self) -> &str;

    /// Base URL used to resolve relative links.
    fn base_url(&self) -> &str;

    async fn fetch(&self, sport: Option<&str>) -> Result<Vec<RawRecord>>;
}
