// src/ingest/providers/html_page.rs
//! Scrapes a sports news listing page with CSS selectors.
//!
//! Every element matching `item` is one story. Inside it, `title` and `summary` give the
//! text, `link` gives the `href`, and the optional `image`/`time` selectors supply
//! `src` and `datetime`. Items missing a title or summary are skipped one by one.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::providers::{get_text, parse_timestamp, url_for_sport};
use crate::ingest::types::{RawRecord, SourceAdapter};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HtmlSelectors {
    pub item: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

struct Compiled {
    item: Selector,
    title: Selector,
    summary: Selector,
    link: Selector,
    image: Option<Selector>,
    time: Option<Selector>,
    team: Option<Selector>,
}

fn compile(sel: &str) -> Result<Selector> {
    Selector::parse(sel).map_err(|e| anyhow!("invalid css selector `{sel}`: {e}"))
}

impl HtmlSelectors {
    fn compile(&self) -> Result<Compiled> {
        Ok(Compiled {
            item: compile(&self.item)?,
            title: compile(&self.title)?,
            summary: compile(&self.summary)?,
            link: compile(&self.link)?,
            image: self.image.as_deref().map(compile).transpose()?,
            time: self.time.as_deref().map(compile).transpose()?,
            team: self.team.as_deref().map(compile).transpose()?,
        })
    }
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        pages: BTreeMap<String, String>,
    },
}

pub struct HtmlPageAdapter {
    name: String,
    base_url: String,
    selectors: HtmlSelectors,
    mode: Mode,
}

impl HtmlPageAdapter {
    /// Live adapter; `pages` maps sport keys (and `general`) to listing URLs.
    pub fn from_urls(
        name: &str,
        base_url: &str,
        pages: BTreeMap<String, String>,
        selectors: HtmlSelectors,
        client: reqwest::Client,
    ) -> Result<Self> {
        selectors.compile()?;
        Ok(Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            selectors,
            mode: Mode::Http { client, pages },
        })
    }

    /// Offline adapter over a fixed HTML document (tests, demos).
    pub fn from_fixture(
        name: &str,
        base_url: &str,
        html: &str,
        selectors: HtmlSelectors,
    ) -> Result<Self> {
        selectors.compile()?;
        Ok(Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            selectors,
            mode: Mode::Fixture(html.to_string()),
        })
    }

    fn parse_page(&self, body: &str) -> Result<Vec<RawRecord>> {
        let t0 = Instant::now();
        let sel = self.selectors.compile()?;
        let document = Html::parse_document(body);

        let mut out = Vec::new();
        let mut skipped = 0u64;
        for item in document.select(&sel.item) {
            match parse_item(item, &sel) {
                Some(rec) => out.push(rec),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(target: "ingest", adapter = %self.name, skipped, "html items without title/summary");
            counter!("ingest_dropped_total").increment(skipped);
        }
        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("ingest_records_total").increment(out.len() as u64);
        Ok(out)
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<String>())
}

fn parse_item(item: ElementRef<'_>, sel: &Compiled) -> Option<RawRecord> {
    let title = item.select(&sel.title).next().map(text_of)?;
    let summary = item.select(&sel.summary).next().map(text_of)?;
    let rec = RawRecord {
        title,
        summary,
        url: item
            .select(&sel.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
        published_at: sel.time.as_ref().and_then(|s| {
            let el = item.select(s).next()?;
            el.value()
                .attr("datetime")
                .and_then(parse_timestamp)
                .or_else(|| parse_timestamp(&text_of(el)))
        }),
        team: sel
            .team
            .as_ref()
            .and_then(|s| item.select(s).next())
            .map(text_of)
            .filter(|t| !t.is_empty()),
        sport: None,
        image_url: sel.image.as_ref().and_then(|s| {
            let img = item.select(s).next()?;
            img.value()
                .attr("src")
                .or_else(|| img.value().attr("data-src"))
                .map(str::to_string)
        }),
    };
    rec.is_complete().then_some(rec)
}

#[async_trait]
impl SourceAdapter for HtmlPageAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, sport: Option<&str>) -> Result<Vec<RawRecord>> {
        match &self.mode {
            Mode::Fixture(html) => self.parse_page(html),
            Mode::Http { client, pages } => {
                let Some(url) = url_for_sport(pages, sport) else {
                    tracing::debug!(target: "ingest", adapter = %self.name, ?sport, "no page for sport");
                    return Ok(Vec::new());
                };
                let body = get_text(client, url).await?;
                self.parse_page(&body)
            }
        }
    }
}
