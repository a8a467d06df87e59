//! Static headlines desk: pre-scored `Article` records ranked with the feed composite.

use chrono::{DateTime, Duration, Utc};

use crate::article::Article;
use crate::rank::rank_articles;
use crate::tags::extract_tags;

/// Rank headlines (optionally one sport) by the article composite score.
pub fn top_headlines(
    headlines: &[Article],
    sport: Option<&str>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let wanted = sport.map(str::trim).filter(|s| !s.is_empty());
    let pool: Vec<Article> = headlines
        .iter()
        .filter(|a| wanted.map_or(true, |w| a.sport.eq_ignore_ascii_case(w)))
        .cloned()
        .collect();
    rank_articles(pool, now, limit)
}

/// Built-in headlines, published relative to `now`.
pub fn seed_headlines(now: DateTime<Utc>) -> Vec<Article> {
    [
        ("nba", Some("Denver Nuggets"), "Jokic triple-double keeps MVP race tight", "Denver's center posted 28-14-12 in a win over Phoenix.", 90, 45),
        ("nba", Some("Golden State Warriors"), "Warriors confirm guard will miss two weeks with injury", "The team expects a full recovery before the postseason.", 85, 120),
        ("nba", None, "All-Star reserves announced", "Seven first-time selections headline this year's bench.", 60, 400),
        ("nfl", Some("Buffalo Bills"), "Bills sign edge rusher to four-year contract", "The deal includes $60 million guaranteed.", 70, 90),
        ("nfl", None, "Combine standouts boost draft stock", "Three receivers ran under 4.35 in Indianapolis.", 65, 300),
        ("mlb", Some("Seattle Mariners"), "Mariners land veteran bat in three-team trade", "Seattle sent two prospects to complete the deal.", 80, 200),
        ("nhl", Some("Florida Panthers"), "Panthers defenseman returns to practice", "He skated in a no-contact jersey on Monday.", 45, 60),
        ("general", None, "Championship weekend schedule set", "Four title games across three leagues this Sunday.", 75, 30),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (sport, team, title, summary, importance, age_minutes))| Article {
        id: format!("headline-{i}"),
        title: title.to_string(),
        summary: summary.to_string(),
        source: "Fan Zone Newsroom".to_string(),
        published_at: now - Duration::minutes(age_minutes),
        sport: sport.to_string(),
        team: team.map(str::to_string),
        importance,
        tags: extract_tags(&format!("{title} {summary}")),
        url: format!("https://fanzone.example/headlines/{i}"),
        image_url: None,
    })
    .collect()
}
