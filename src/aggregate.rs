//! # Aggregator
//! Fan-out/fan-in over every configured [`SourceAdapter`], then the shared pipeline:
//! normalize → reword → score → tag → team filter → rank → (optional dedup) → truncate.
//!
//! - Each adapter runs in its own task under `adapter_timeout`; an error or timeout
//!   only removes that adapter's articles.
//! - The join loop is bounded by `overall_timeout`, which may be shorter than the
//!   per-adapter timeout; stragglers are aborted and what arrived is kept.
//! - Dropping the `aggregate` future drops the `JoinSet`, which aborts in-flight fetches.
//! - Nothing is shared between adapter tasks; results are merged after fan-in.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use strsim::normalized_levenshtein;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::article::Article;
use crate::importance;
use crate::ingest::config::{ensure_unique_slugs, AggregatorSettings, FeedConfig};
use crate::ingest::ensure_metrics_described;
use crate::ingest::normalize::Normalizer;
use crate::ingest::types::SourceAdapter;
use crate::rank::{article_tie_break, composite_score, rank_with};
use crate::reword::{RandomSource, Rewriter, RngSource};
use crate::tags::extract_tags;

/// One feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub sport: Option<String>,
    pub team: Option<String>,
    /// `None` → configured default; `<= 0` → empty result.
    pub limit: Option<i64>,
}

impl FeedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn effective_limit(&self, default: usize) -> usize {
        match self.limit {
            None => default,
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        }
    }

    fn sport_filter(&self) -> Option<&str> {
        self.sport.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn team_filter(&self) -> Option<&str> {
        self.team.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    settings: AggregatorSettings,
    rewriter: Option<Rewriter>,
}

impl Aggregator {
    /// Fails when two adapters would produce colliding article ids.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, settings: AggregatorSettings) -> Result<Self> {
        ensure_unique_slugs(adapters.iter().map(|a| a.name()))?;
        let rewriter = settings.reword.then_some(Rewriter);
        Ok(Self {
            adapters,
            settings,
            rewriter,
        })
    }

    pub fn from_config(cfg: &FeedConfig) -> Result<Self> {
        Self::new(cfg.build_adapters()?, cfg.aggregator.clone())
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    pub fn adapter_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Aggregate with an OS-seeded random source for rewording.
    pub async fn aggregate(&self, query: &FeedQuery) -> Vec<Article> {
        let now = Utc::now();
        let merged = self.collect(query.sport_filter(), now).await;
        let mut rng = RngSource::from_os();
        self.finish(merged, query, now, &mut rng)
    }

    /// Aggregate with an injected random source (deterministic tests).
    pub async fn aggregate_with(
        &self,
        query: &FeedQuery,
        rng: &mut dyn RandomSource,
    ) -> Vec<Article> {
        let now = Utc::now();
        let merged = self.collect(query.sport_filter(), now).await;
        self.finish(merged, query, now, rng)
    }

    async fn collect(&self, sport: Option<&str>, now: DateTime<Utc>) -> Vec<Article> {
        ensure_metrics_described();

        let mut set = JoinSet::new();
        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let sport = sport.map(str::to_string);
            let per_adapter = self.settings.adapter_timeout();
            set.spawn(async move { run_adapter(adapter, sport, per_adapter, now).await });
        }

        let deadline = tokio::time::Instant::now() + self.settings.overall_timeout();
        let mut merged = Vec::new();
        loop {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok(mut articles))) => merged.append(&mut articles),
                Ok(Some(Err(e))) => {
                    warn!(target: "aggregate", error = %e, "adapter task failed");
                    counter!("ingest_adapter_errors_total").increment(1);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(target: "aggregate", pending = set.len(), "overall timeout, aborting remaining adapters");
                    counter!("ingest_adapter_timeouts_total").increment(set.len() as u64);
                    set.abort_all();
                    break;
                }
            }
        }

        // Join order is arbitrary; fix it so random draws line up with ids.
        merged.sort_by(|a, b| a.id.cmp(&b.id));
        merged
    }

    fn finish(
        &self,
        merged: Vec<Article>,
        query: &FeedQuery,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Article> {
        let t0 = Instant::now();
        let fetched = merged.len();

        let enriched: Vec<(String, Article)> = merged
            .into_iter()
            .map(|a| {
                let key = dedup_key(&a.title);
                (key, enrich(a, self.rewriter.as_ref(), rng))
            })
            .filter(|(_, a)| query.team_filter().map_or(true, |t| a.mentions_team(t)))
            .collect();
        let matched = enriched.len();

        let ranked = rank_with(
            enriched,
            |(_, a)| composite_score(a, now),
            |(_, a), (_, b)| article_tie_break(a, b),
            usize::MAX,
        );
        let deduped = match self.settings.dedup_similarity {
            Some(threshold) => drop_near_duplicates(ranked, threshold),
            None => ranked,
        };
        let duplicates = matched - deduped.len();
        if duplicates > 0 {
            counter!("feed_duplicates_total").increment(duplicates as u64);
        }

        let limit = query.effective_limit(self.settings.default_limit);
        let out: Vec<Article> = deduped.into_iter().take(limit).map(|(_, a)| a).collect();

        histogram!("feed_aggregate_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        gauge!("feed_last_run_ts").set(now.timestamp() as f64);
        info!(
            target: "aggregate",
            sport = query.sport_filter().unwrap_or("any"),
            team = query.team_filter().unwrap_or("any"),
            fetched,
            matched,
            duplicates,
            returned = out.len(),
            "feed aggregated"
        );
        out
    }
}

async fn run_adapter(
    adapter: Arc<dyn SourceAdapter>,
    sport: Option<String>,
    per_adapter: std::time::Duration,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let name = adapter.name().to_string();
    match tokio::time::timeout(per_adapter, adapter.fetch(sport.as_deref())).await {
        Ok(Ok(raws)) => {
            let mut normalizer = Normalizer::new(&name, adapter.base_url(), sport.as_deref(), now);
            let (articles, dropped) = normalizer.normalize_all(raws);
            if dropped > 0 {
                counter!("ingest_dropped_total").increment(dropped as u64);
            }
            counter!("ingest_kept_total").increment(articles.len() as u64);
            tracing::debug!(target: "ingest", adapter = %name, kept = articles.len(), dropped, "adapter done");
            articles
        }
        Ok(Err(e)) => {
            warn!(target: "ingest", error = ?e, adapter = %name, "adapter error");
            counter!("ingest_adapter_errors_total").increment(1);
            Vec::new()
        }
        Err(_) => {
            warn!(target: "ingest", adapter = %name, timeout_ms = per_adapter.as_millis() as u64, "adapter timed out");
            counter!("ingest_adapter_timeouts_total").increment(1);
            Vec::new()
        }
    }
}

/// Reword (optionally), then score and tag the final text.
fn enrich(mut a: Article, rewriter: Option<&Rewriter>, rng: &mut dyn RandomSource) -> Article {
    if let Some(r) = rewriter {
        r.rewrite(&mut a, rng);
    }
    a.importance = importance::score(&a.title, &a.summary);
    a.tags = extract_tags(&a.combined_text());
    a
}

/// Lowercase alphanumerics and single spaces; computed before rewording.
fn dedup_key(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the first (best ranked) of every group of near-identical titles.
fn drop_near_duplicates<T>(ranked: Vec<(String, T)>, threshold: f64) -> Vec<(String, T)> {
    let mut kept: Vec<(String, T)> = Vec::with_capacity(ranked.len());
    for (key, item) in ranked {
        let dup = kept
            .iter()
            .any(|(k, _)| k == &key || normalized_levenshtein(k, &key) >= threshold);
        if !dup {
            kept.push((key, item));
        }
    }
    kept
}
