// src/ingest/mod.rs
pub mod config;
pub mod normalize;
pub mod providers;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// Max characters kept for a single text field coming from a source.
pub const MAX_TEXT_CHARS: usize = 1500;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_records_total",
            "Raw records returned by source adapters."
        );
        describe_counter!(
            "ingest_kept_total",
            "Articles emitted by the normalizer."
        );
        describe_counter!(
            "ingest_dropped_total",
            "Records dropped for missing title or summary."
        );
        describe_counter!(
            "ingest_adapter_errors_total",
            "Adapter fetch/parse errors."
        );
        describe_counter!(
            "ingest_adapter_timeouts_total",
            "Adapters that exceeded their fetch timeout."
        );
        describe_counter!(
            "feed_duplicates_total",
            "Articles removed as near-duplicate headlines."
        );
        describe_histogram!("ingest_parse_ms", "Adapter parse time in milliseconds.");
        describe_histogram!("feed_aggregate_ms", "Full aggregation time in milliseconds.");
        describe_gauge!(
            "feed_last_run_ts",
            "Unix ts when the aggregation last ran."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Lowercase ASCII alphanumeric runs joined by `-`: "ESPN NBA" -> "espn-nba".
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
