//! Keyword importance scorer.
//!
//! Base 50, then +20 per high-tier keyword, +10 per medium-tier keyword and -5 per
//! low-tier keyword found as a substring of the lowercased `title + summary`. Each
//! keyword counts once. The result is clamped to `[10, 100]`.
//!
//! "injury" matches on its stem so "injured"/"injuries" count as well.

use crate::article::{MAX_IMPORTANCE, MIN_IMPORTANCE};

pub const BASE_SCORE: i32 = 50;

pub const HIGH_TIER: &[&str] = &[
    "trade",
    "injury",
    "mvp",
    "championship",
    "playoff",
    "record",
    "suspension",
];
pub const MEDIUM_TIER: &[&str] = &["draft", "contract", "coach", "rookie", "all-star"];
pub const LOW_TIER: &[&str] = &["practice", "interview", "social media"];

const HIGH_POINTS: i32 = 20;
const MEDIUM_POINTS: i32 = 10;
const LOW_POINTS: i32 = -5;

/// Every keyword the scorer reacts to.
pub fn keywords() -> impl Iterator<Item = &'static str> {
    HIGH_TIER
        .iter()
        .chain(MEDIUM_TIER)
        .chain(LOW_TIER)
        .copied()
}

/// Substring actually searched for a keyword.
pub fn stem(keyword: &str) -> &str {
    match keyword {
        "injury" => "injur",
        other => other,
    }
}

pub fn score(title: &str, summary: &str) -> u8 {
    let text = format!("{title} {summary}").to_lowercase();
    let hits = |tier: &[&str]| tier.iter().filter(|kw| text.contains(stem(kw))).count() as i32;

    let raw = BASE_SCORE
        + hits(HIGH_TIER) * HIGH_POINTS
        + hits(MEDIUM_TIER) * MEDIUM_POINTS
        + hits(LOW_TIER) * LOW_POINTS;

    raw.clamp(MIN_IMPORTANCE as i32, MAX_IMPORTANCE as i32) as u8
}
