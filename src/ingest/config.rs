// src/ingest/config.rs
//! Feed configuration: aggregator knobs plus the list of sources to build adapters for.
//!
//! Lookup order:
//! 1) $FEED_CONFIG_PATH (must exist if set)
//! 2) config/feed.toml
//! 3) config/feed.json
//! 4) built-in defaults
//!
//! `FEED_ADAPTER_TIMEOUT_MS` and `FEED_USER_AGENT` override the loaded values.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::ingest::providers::html_page::{HtmlPageAdapter, HtmlSelectors};
use crate::ingest::providers::rss_feed::RssFeedAdapter;
use crate::ingest::providers::static_feed::StaticFeedAdapter;
use crate::ingest::providers::{http_client, GENERAL_KEY};
use crate::ingest::slugify;
use crate::ingest::types::SourceAdapter;
use crate::rank::DEFAULT_LIMIT;

pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const ENV_ADAPTER_TIMEOUT_MS: &str = "FEED_ADAPTER_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "FEED_USER_AGENT";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

fn default_adapter_timeout_ms() -> u64 {
    4_000
}
fn default_overall_timeout_ms() -> u64 {
    8_000
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AggregatorSettings {
    #[serde(default = "default_adapter_timeout_ms")]
    pub adapter_timeout_ms: u64,
    #[serde(default = "default_overall_timeout_ms")]
    pub overall_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_true")]
    pub reword: bool,
    /// Opt-in: titles at least this similar (normalized Levenshtein) count as duplicates.
    /// `None` keeps every article.
    #[serde(default)]
    pub dedup_similarity: Option<f64>,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            adapter_timeout_ms: default_adapter_timeout_ms(),
            overall_timeout_ms: default_overall_timeout_ms(),
            user_agent: default_user_agent(),
            default_limit: default_limit(),
            reword: true,
            dedup_similarity: None,
        }
    }
}

impl AggregatorSettings {
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter_timeout_ms.max(1))
    }

    /// Deadline for the whole fan-in, independent of the per-adapter timeout.
    pub fn overall_timeout(&self) -> Duration {
        Duration::from_millis(self.overall_timeout_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HtmlSourceCfg {
    pub name: String,
    pub base_url: String,
    /// Sport key (`nba`, `nfl`, ..., `general`) → listing page URL.
    pub pages: BTreeMap<String, String>,
    pub selectors: HtmlSelectors,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RssSourceCfg {
    pub name: String,
    pub base_url: String,
    /// Sport key → feed URL.
    pub feeds: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedConfig {
    #[serde(default)]
    pub aggregator: AggregatorSettings,
    #[serde(default)]
    pub html_sources: Vec<HtmlSourceCfg>,
    #[serde(default)]
    pub rss_sources: Vec<RssSourceCfg>,
    #[serde(default = "default_true")]
    pub static_feed: bool,
    /// JSON file for the static generator; built-in seed when absent.
    #[serde(default)]
    pub static_feed_path: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let espn = |path: &str| format!("https://www.espn.com/espn/rss/{path}");
        let feeds = [
            (GENERAL_KEY, espn("news")),
            ("nba", espn("nba/news")),
            ("nfl", espn("nfl/news")),
            ("mlb", espn("mlb/news")),
            ("nhl", espn("nhl/news")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            aggregator: AggregatorSettings::default(),
            html_sources: Vec::new(),
            rss_sources: vec![RssSourceCfg {
                name: "ESPN".to_string(),
                base_url: "https://www.espn.com/".to_string(),
                feeds,
            }],
            static_feed: true,
            static_feed_path: None,
        }
    }
}

impl FeedConfig {
    /// Build one adapter per configured source, sharing a single HTTP client.
    /// Two sources whose names slugify to the same value are rejected.
    pub fn build_adapters(&self) -> Result<Vec<Arc<dyn SourceAdapter>>> {
        let client = http_client(&self.aggregator.user_agent, self.aggregator.adapter_timeout())?;
        let mut out: Vec<Arc<dyn SourceAdapter>> = Vec::new();

        for src in &self.html_sources {
            let adapter = HtmlPageAdapter::from_urls(
                &src.name,
                &src.base_url,
                src.pages.clone(),
                src.selectors.clone(),
                client.clone(),
            )
            .with_context(|| format!("html source `{}`", src.name))?;
            out.push(Arc::new(adapter));
        }
        for src in &self.rss_sources {
            out.push(Arc::new(RssFeedAdapter::from_urls(
                &src.name,
                &src.base_url,
                src.feeds.clone(),
                client.clone(),
            )));
        }
        if self.static_feed {
            let adapter = match &self.static_feed_path {
                Some(p) => StaticFeedAdapter::load_from_file("Fan Zone Desk", "https://fanzone.example/", p)?,
                None => StaticFeedAdapter::default_seed(),
            };
            out.push(Arc::new(adapter));
        }

        ensure_unique_slugs(out.iter().map(|a| a.name()))?;
        Ok(out)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(ms) = std::env::var(ENV_ADAPTER_TIMEOUT_MS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.aggregator.adapter_timeout_ms = ms;
        }
        if let Some(ua) = std::env::var(ENV_USER_AGENT)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            self.aggregator.user_agent = ua;
        }
    }
}

/// Adapter ids are `<slug>-<n>`, so slugs must not collide.
pub fn ensure_unique_slugs<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        let slug = slugify(name);
        if slug.is_empty() {
            bail!("source name `{name}` has no usable characters for an id");
        }
        if !seen.insert(slug.clone()) {
            bail!("duplicate source slug `{slug}` (from `{name}`)");
        }
    }
    Ok(())
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_feed_config_from(path: &Path) -> Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mut cfg = parse_feed_config(&content, ext.as_str())?;
    cfg.apply_env_overrides();
    Ok(cfg)
}

/// Load config using env var + fallbacks (see module docs).
pub fn load_feed_config_default() -> Result<FeedConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feed_config_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in ["config/feed.toml", "config/feed.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_feed_config_from(&p);
        }
    }
    let mut cfg = FeedConfig::default();
    cfg.apply_env_overrides();
    Ok(cfg)
}

fn parse_feed_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing feed config json");
    }
    match toml::from_str::<FeedConfig>(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s).map_err(|_| anyhow!(toml_err).context("parsing feed config toml")),
    }
}
