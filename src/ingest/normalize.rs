// src/ingest/normalize.rs
//! Maps an adapter's `RawRecord` onto the canonical `Article`.
//!
//! Importance and tags are left at their floor values here; the aggregator fills them
//! in after rewording.

use chrono::{DateTime, Utc};
use url::Url;

use crate::article::{Article, MIN_IMPORTANCE};
use crate::ingest::slugify;
use crate::ingest::types::RawRecord;
use crate::teams;

/// Per-source normalization context.
#[derive(Debug, Clone)]
pub struct Normalizer {
    source: String,
    slug: String,
    base_url: Option<Url>,
    base_url_raw: String,
    sport_filter: Option<String>,
    now: DateTime<Utc>,
    next_seq: usize,
}

impl Normalizer {
    pub fn new(source: &str, base_url: &str, sport_filter: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            source: source.to_string(),
            slug: slugify(source),
            base_url: Url::parse(base_url).ok(),
            base_url_raw: base_url.to_string(),
            sport_filter: sport_filter
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty()),
            now,
            next_seq: 0,
        }
    }

    /// Returns `None` for records without a title or summary; those do not consume
    /// a sequence index.
    pub fn normalize(&mut self, raw: RawRecord) -> Option<Article> {
        let title = raw.title.trim();
        let summary = raw.summary.trim();
        if title.is_empty() || summary.is_empty() {
            return None;
        }

        let sport = self
            .sport_filter
            .clone()
            .or_else(|| {
                raw.sport
                    .as_deref()
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "general".to_string());

        let league = (sport != "general").then_some(sport.as_str());
        let team = match raw.team.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(given) => Some(
                teams::lookup(given, league)
                    .map(|t| t.canonical_name())
                    .unwrap_or_else(|| given.to_string()),
            ),
            None => teams::detect(&format!("{title} {summary}"), league).map(|t| t.canonical_name()),
        };

        let url = raw
            .url
            .as_deref()
            .and_then(|u| self.resolve(u))
            .unwrap_or_else(|| self.base_url_raw.clone());
        let image_url = raw.image_url.as_deref().and_then(|u| self.resolve(u));

        let id = format!("{}-{}", self.slug, self.next_seq);
        self.next_seq += 1;

        Some(Article {
            id,
            title: title.to_string(),
            summary: summary.to_string(),
            source: self.source.clone(),
            published_at: raw.published_at.unwrap_or(self.now),
            sport,
            team,
            importance: MIN_IMPORTANCE,
            tags: Vec::new(),
            url,
            image_url,
        })
    }

    /// Normalize a batch, dropping incomplete records. Returns (articles, dropped).
    pub fn normalize_all(&mut self, raws: Vec<RawRecord>) -> (Vec<Article>, usize) {
        let total = raws.len();
        let out: Vec<Article> = raws.into_iter().filter_map(|r| self.normalize(r)).collect();
        let dropped = total - out.len();
        (out, dropped)
    }

    fn resolve(&self, link: &str) -> Option<String> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        if let Ok(abs) = Url::parse(link) {
            return Some(abs.to_string());
        }
        self.base_url
            .as_ref()
            .and_then(|base| base.join(link).ok())
            .map(|u| u.to_string())
    }
}
