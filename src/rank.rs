//! Formula-agnostic ranking: score → sort descending → truncate.
//!
//! Used by the article feed, the headlines desk and the discussions list; each call
//! site only supplies its own scoring closure.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::article::Article;

/// Limit used when the caller gives none or gives garbage.
pub const DEFAULT_LIMIT: usize = 10;

/// Weight of importance in the article composite.
pub const IMPORTANCE_WEIGHT: f64 = 0.7;
/// Weight of recency in the article composite.
pub const RECENCY_WEIGHT: f64 = 0.3;
/// Recency decays by `e` every this many hours.
pub const RECENCY_DECAY_HOURS: f64 = 72.0;

/// Sort `items` by `score` (highest first) and keep at most `limit`.
/// Equal scores keep their input order.
pub fn rank<T, F>(items: Vec<T>, score: F, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    rank_with(items, score, |_, _| Ordering::Equal, limit)
}

/// Like [`rank`], with `tie_break` ordering items whose scores are equal.
pub fn rank_with<T, F, B>(items: Vec<T>, score: F, tie_break: B, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> f64,
    B: Fn(&T, &T) -> Ordering,
{
    if limit == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(f64, T)> = items.into_iter().map(|it| (score(&it), it)).collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then_with(|| tie_break(a, b)));
    scored.truncate(limit);
    scored.into_iter().map(|(_, it)| it).collect()
}

/// Turn a raw `limit` query value into a count.
/// Missing or non-numeric → `default`; zero or negative → 0.
pub fn resolve_limit(raw: Option<&str>, default: usize) -> usize {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n <= 0 => 0,
            Ok(n) => usize::try_from(n).unwrap_or(usize::MAX),
            Err(_) => default,
        },
    }
}

/// Recency in `[0, 100]`: 100 for "now" (or future), decaying with age.
pub fn recency_score(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - published_at).num_milliseconds().max(0) as f64 / 3_600_000.0;
    100.0 * (-age_hours / RECENCY_DECAY_HOURS).exp()
}

/// `importance*0.7 + recency*0.3`.
pub fn composite_score(article: &Article, now: DateTime<Utc>) -> f64 {
    article.importance as f64 * IMPORTANCE_WEIGHT
        + recency_score(article.published_at, now) * RECENCY_WEIGHT
}

/// Newer first, then id ascending.
pub fn article_tie_break(a: &Article, b: &Article) -> Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Rank articles by the composite score.
pub fn rank_articles(articles: Vec<Article>, now: DateTime<Utc>, limit: usize) -> Vec<Article> {
    rank_with(
        articles,
        |a| composite_score(a, now),
        article_tie_break,
        limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn art(id: &str, importance: u8, age_minutes: i64) -> Article {
        Article {
            id: id.into(),
            title: format!("title {id}"),
            summary: "summary".into(),
            source: "Test".into(),
            published_at: now() - Duration::minutes(age_minutes),
            sport: "general".into(),
            team: None,
            importance,
            tags: vec![],
            url: "https://example.test/".into(),
            image_url: None,
        }
    }

    #[test]
    fn rank_sorts_descending_and_truncates() {
        let out = rank(vec![3, 9, 1, 7], |x| *x as f64, 3);
        assert_eq!(out, vec![9, 7, 3]);
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let out = rank(vec![("a", 1), ("b", 1), ("c", 2)], |x| x.1 as f64, 10);
        assert_eq!(out, vec![("c", 2), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn zero_limit_is_empty_and_large_limit_is_everything() {
        assert!(rank(vec![1, 2], |x| *x as f64, 0).is_empty());
        assert_eq!(rank(vec![1, 2], |x| *x as f64, 100).len(), 2);
    }

    #[test]
    fn resolve_limit_defaults_and_clamps() {
        assert_eq!(resolve_limit(None, 10), 10);
        assert_eq!(resolve_limit(Some("abc"), 10), 10);
        assert_eq!(resolve_limit(Some(" "), 10), 10);
        assert_eq!(resolve_limit(Some("3"), 10), 3);
        assert_eq!(resolve_limit(Some("0"), 10), 0);
        assert_eq!(resolve_limit(Some("-5"), 10), 0);
        assert_eq!(resolve_limit(Some("2.5"), 10), 10);
    }

    #[test]
    fn recency_is_monotone_and_bounded() {
        let n = now();
        let fresh = recency_score(n, n);
        let hour = recency_score(n - Duration::hours(1), n);
        let day = recency_score(n - Duration::days(1), n);
        assert!((fresh - 100.0).abs() < 1e-9);
        assert!(fresh > hour && hour > day && day > 0.0);
        assert_eq!(recency_score(n + Duration::hours(2), n), fresh);
    }

    #[test]
    fn importance_beats_a_few_hours_of_recency() {
        // 5 importance points outweigh up to ~8h of age difference
        let older_important = art("a", 55, 7 * 60);
        let newer = art("b", 50, 0);
        let out = rank_articles(vec![newer, older_important], now(), 10);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn newer_wins_at_equal_importance() {
        let out = rank_articles(vec![art("old", 70, 30), art("new", 70, 5)], now(), 10);
        assert_eq!(out[0].id, "new");

        // both in the future: recency saturates, tie-break still prefers newer
        let out = rank_articles(vec![art("f1", 70, -30), art("f2", 70, -60)], now(), 10);
        assert_eq!(out[0].id, "f2");
    }

    #[test]
    fn strictly_decreasing_importance_is_preserved() {
        let input: Vec<Article> = (0..10)
            .map(|i| art(&format!("x{i}"), 100 - i as u8 * 5, (i as i64 * 7) % 60))
            .rev()
            .collect();
        let out = rank_articles(input, now(), 10);
        let imps: Vec<u8> = out.iter().map(|a| a.importance).collect();
        let mut sorted = imps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(imps, sorted);
    }

    #[test]
    fn identical_articles_order_by_id() {
        let out = rank_articles(vec![art("b", 60, 0), art("a", 60, 0)], now(), 10);
        assert_eq!(out[0].id, "a");
    }
}
