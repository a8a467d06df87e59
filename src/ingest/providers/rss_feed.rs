// src/ingest/providers/rss_feed.rs
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::providers::{get_text, parse_timestamp, url_for_sport};
use crate::ingest::types::{RawRecord, SourceAdapter};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    enclosure: Option<Enclosure>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

enum Mode {
    // Own copy so tests don't need 'static fixtures.
    Fixture(String),
    Http {
        client: reqwest::Client,
        feeds: BTreeMap<String, String>,
    },
}

/// RSS 2.0 feed adapter (one feed per sport, `general` as fallback).
pub struct RssFeedAdapter {
    name: String,
    base_url: String,
    mode: Mode,
}

impl RssFeedAdapter {
    pub fn from_fixture(name: &str, base_url: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_urls(
        name: &str,
        base_url: &str,
        feeds: BTreeMap<String, String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            mode: Mode::Http { client, feeds },
        }
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .with_context(|| format!("parsing {} rss xml", self.name))?;

        let total = rss.channel.item.len();
        let mut out = Vec::with_capacity(total);
        for it in rss.channel.item {
            let rec = RawRecord {
                title: normalize_text(it.title.as_deref().unwrap_or_default()),
                summary: normalize_text(it.description.as_deref().unwrap_or_default()),
                url: it.link.map(|l| l.trim().to_string()),
                published_at: it.pub_date.as_deref().and_then(parse_timestamp),
                team: None,
                sport: None,
                image_url: it
                    .enclosure
                    .filter(|e| e.kind.as_deref().map_or(true, |k| k.starts_with("image/")))
                    .and_then(|e| e.url),
            };
            if rec.is_complete() {
                out.push(rec);
            }
        }

        let dropped = (total - out.len()) as u64;
        if dropped > 0 {
            counter!("ingest_dropped_total").increment(dropped);
        }
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_records_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for RssFeedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, sport: Option<&str>) -> Result<Vec<RawRecord>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { client, feeds } => {
                let Some(url) = url_for_sport(feeds, sport) else {
                    return Ok(Vec::new());
                };
                let body = get_text(client, url).await?;
                self.parse_items_from_str(&body)
            }
        }
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Test</title>
  <item>
    <title>Chiefs agree to contract extension</title>
    <link>https://www.test/nfl/1</link>
    <pubDate>Sat, 01 Mar 2025 12:00:00 GMT</pubDate>
    <description>&lt;p&gt;Deal runs through 2029&nbsp;season.&lt;/p&gt;</description>
    <enclosure url="https://cdn.test/1.jpg" type="image/jpeg" length="0"/>
  </item>
  <item>
    <title>Title only</title>
  </item>
</channel></rss>"#;

    #[tokio::test]
    async fn fixture_parses_and_skips_incomplete() {
        let a = RssFeedAdapter::from_fixture("Test RSS", "https://www.test/", FEED);
        let recs = a.fetch(Some("nfl")).await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].summary, "Deal runs through 2029 season.");
        assert_eq!(recs[0].image_url.as_deref(), Some("https://cdn.test/1.jpg"));
        assert!(recs[0].published_at.is_some());
    }

    #[tokio::test]
    async fn empty_channel_is_ok() {
        let xml = r#"<rss><channel><title>x</title></channel></rss>"#;
        let a = RssFeedAdapter::from_fixture("Empty", "https://www.test/", xml);
        assert!(a.fetch(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn garbage_is_an_error() {
        let a = RssFeedAdapter::from_fixture("Bad", "https://www.test/", "<html>nope");
        assert!(a.fetch(None).await.is_err());
    }
}
