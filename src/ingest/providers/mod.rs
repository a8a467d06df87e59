// src/ingest/providers/mod.rs
pub mod html_page;
pub mod rss_feed;
pub mod static_feed;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

/// Sport key used when no sport-specific URL is configured.
pub const GENERAL_KEY: &str = "general";

/// Build the shared outbound client: browser-like UA and a hard request timeout.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .context("building http client")
}

/// GET `url` and return the body; non-2xx statuses are errors.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} status"))?
        .text()
        .await
        .with_context(|| format!("GET {url} body"))
}

/// Pick the URL for `sport`, falling back to the `general` entry.
/// A sport filter with no matching entry and no general page yields `None`.
pub(crate) fn url_for_sport<'a>(
    urls: &'a BTreeMap<String, String>,
    sport: Option<&str>,
) -> Option<&'a str> {
    let wanted = sport.map(|s| s.trim().to_ascii_lowercase());
    wanted
        .as_deref()
        .and_then(|s| urls.get(s))
        .or_else(|| urls.get(GENERAL_KEY))
        .map(String::as_str)
}

/// Parse RFC 3339 (`2025-03-01T12:00:00Z`) or RFC 2822 (`Sat, 01 Mar 2025 12:00:00 GMT`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    OffsetDateTime::parse(raw, &Rfc2822)
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond()))
}
