//! # Rewording
//!
//! Bounded, rule-based text substitution that gives articles pulled from different
//! sources their own phrasing without changing what they say.
//!
//! - Titles: exactly one rule from `TITLE_RULES` is picked at random and applied to
//!   every case-insensitive match. A rule whose pattern is absent leaves the title as-is.
//! - Summaries: every `SYNONYMS` entry present as a whole word passes a random gate with
//!   probability `SYNONYM_PROBABILITY`; on pass, one synonym is drawn and replaces every
//!   occurrence of that word.
//!
//! Randomness is injected through [`RandomSource`] so tests can pin every draw.
//! The vocabulary here is disjoint from the importance and tag keywords.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};

use crate::article::Article;

/// Chance that a present synonym-table word is rewritten.
pub const SYNONYM_PROBABILITY: f64 = 0.4;

/// Title rules: (case-insensitive pattern, replacement).
pub const TITLE_RULES: &[(&str, &str)] = &[
    (r"\bbreaking:", "Report:"),
    (r"\bexclusive:", "Inside:"),
    (r"\bannounces\b", "reveals"),
    (r"\bsigns\b", "inks"),
    (r"\bsays\b", "states"),
    (r"\bconfirms\b", "verifies"),
    (r"\bdefeats\b", "tops"),
    (r"\bbeats\b", "edges"),
];

/// Summary synonym table, applied in this order.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("said", &["stated", "noted", "remarked"]),
    ("announced", &["revealed", "unveiled"]),
    ("team", &["squad", "club"]),
    ("game", &["matchup", "contest"]),
    ("player", &["athlete"]),
    ("season", &["campaign"]),
    ("fans", &["supporters", "faithful"]),
    ("big", &["major", "significant"]),
    ("expected", &["anticipated", "projected"]),
    ("victory", &["win", "triumph"]),
];

/// A source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Adapter over any `rand` generator.
pub struct RngSource<R>(pub R);

impl RngSource<rand::rngs::StdRng> {
    pub fn from_os() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }

    /// Always returns `v`.
    pub fn constant(v: f64) -> Self {
        Self::new(vec![v])
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

/// Index in `0..len` from one draw.
fn pick_index(rng: &mut dyn RandomSource, len: usize) -> usize {
    let r = rng.next_f64().clamp(0.0, 1.0);
    ((r * len as f64) as usize).min(len.saturating_sub(1))
}

struct TitleRule {
    re: Regex,
    replacement: &'static str,
}

static COMPILED_TITLE_RULES: Lazy<Vec<TitleRule>> = Lazy::new(|| {
    TITLE_RULES
        .iter()
        .map(|(pattern, replacement)| TitleRule {
            re: Regex::new(&format!("(?i){pattern}")).expect("title rule regex"),
            replacement,
        })
        .collect()
});

static COMPILED_SYNONYMS: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    SYNONYMS
        .iter()
        .map(|(word, alts)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                .expect("synonym regex");
            (re, *alts)
        })
        .collect()
});

/// Apply exactly one randomly chosen title rule.
pub fn reword_title(text: &str, rng: &mut dyn RandomSource) -> String {
    let rule = &COMPILED_TITLE_RULES[pick_index(rng, COMPILED_TITLE_RULES.len())];
    rule.re
        .replace_all(text, regex::NoExpand(rule.replacement))
        .into_owned()
}

/// Swap synonym-table words, each independently gated.
pub fn reword_summary(text: &str, rng: &mut dyn RandomSource) -> String {
    let mut out = text.to_string();
    for (re, alts) in COMPILED_SYNONYMS.iter() {
        if !re.is_match(&out) {
            continue;
        }
        if rng.next_f64() >= SYNONYM_PROBABILITY {
            continue;
        }
        let chosen = alts[pick_index(rng, alts.len())];
        out = re
            .replace_all(&out, |caps: &Captures| match_case(&caps[0], chosen))
            .into_owned();
    }
    out
}

/// The rewording stage of the feed pipeline: one title rule, then summary synonyms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter;

impl Rewriter {
    pub fn rewrite(&self, article: &mut Article, rng: &mut dyn RandomSource) {
        article.title = reword_title(&article.title, rng);
        article.summary = reword_summary(&article.summary, rng);
    }
}

/// Capitalize `replacement` when the matched word starts with an uppercase letter.
fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{importance, tags};

    #[test]
    fn rule_zero_replaces_breaking_only() {
        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(
            reword_title("Breaking: Team signs star", &mut rng),
            "Report: Team signs star"
        );
    }

    #[test]
    fn exactly_one_rule_fires() {
        // 0.4 * 8 rules -> index 3 ("signs")
        let mut rng = SequenceSource::constant(0.4);
        assert_eq!(
            reword_title("BREAKING: Team signs star, coach says", &mut rng),
            "BREAKING: Team inks star, coach says"
        );
    }

    #[test]
    fn absent_rule_leaves_title() {
        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(reword_title("Lakers roll", &mut rng), "Lakers roll");
    }

    #[test]
    fn draw_near_one_picks_last_rule() {
        let mut rng = SequenceSource::constant(0.999_999);
        assert_eq!(reword_title("Nets beats Knicks", &mut rng), "Nets edges Knicks");
    }

    #[test]
    fn gate_closed_keeps_summary() {
        let mut rng = SequenceSource::constant(0.9);
        let s = "The coach said the team played a big game.";
        assert_eq!(reword_summary(s, &mut rng), s);
    }

    #[test]
    fn gate_open_replaces_every_occurrence_with_same_synonym() {
        // gate 0.0 passes, choice 0.0 picks the first synonym
        let mut rng = SequenceSource::constant(0.0);
        let out = reword_summary("Team first. The team said the team wins.", &mut rng);
        assert_eq!(out, "Squad first. The squad stated the squad wins.");
    }

    #[test]
    fn words_fire_independently() {
        // said: gate 0.1 pass, choice 0.5 -> "noted"; team: gate 0.7 fail
        let mut rng = SequenceSource::new(vec![0.1, 0.5, 0.7]);
        let out = reword_summary("He said the team is ready", &mut rng);
        assert_eq!(out, "He noted the team is ready");
    }

    #[test]
    fn whole_words_only() {
        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(
            reword_summary("Teammates and gamers", &mut rng),
            "Teammates and gamers"
        );
    }

    #[test]
    fn vocabulary_is_disjoint_from_scoring_keywords() {
        let mut words: Vec<String> = Vec::new();
        for (pattern, replacement) in TITLE_RULES {
            let plain: String = pattern
                .replace(r"\b", "")
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect();
            words.push(plain.to_lowercase());
            words.push(replacement.to_lowercase());
        }
        for (word, alts) in SYNONYMS {
            words.push(word.to_string());
            words.extend(alts.iter().map(|a| a.to_string()));
        }

        let stems: Vec<&str> = importance::keywords()
            .map(importance::stem)
            .chain(tags::TAG_VOCABULARY.iter().copied())
            .collect();
        for w in &words {
            for s in &stems {
                assert!(!w.contains(s), "rewrite word {w:?} contains keyword {s:?}");
                assert!(!s.contains(w.as_str()), "keyword {s:?} contains rewrite word {w:?}");
            }
        }
    }

    #[test]
    fn rewording_never_changes_importance_or_tags() {
        let title = "Breaking: Star says injury will not stop trade talks";
        let summary = "The team said the player expects a big season and a contract.";
        for seed in 0..50u64 {
            let mut rng = RngSource::seeded(seed);
            let t = reword_title(title, &mut rng);
            let s = reword_summary(summary, &mut rng);
            assert_eq!(importance::score(&t, &s), importance::score(title, summary));
            assert_eq!(
                tags::extract_tags(&format!("{t} {s}")),
                tags::extract_tags(&format!("{title} {summary}"))
            );
        }
    }

    #[test]
    fn rewriter_touches_title_then_summary() {
        let mut a = Article {
            id: "x-0".into(),
            title: "Breaking: Bills rally".into(),
            summary: "Fans expected more.".into(),
            source: "X".into(),
            published_at: chrono::Utc::now(),
            sport: "nfl".into(),
            team: None,
            importance: 50,
            tags: vec![],
            url: "https://x.test/".into(),
            image_url: None,
        };
        Rewriter.rewrite(&mut a, &mut SequenceSource::constant(0.0));
        assert_eq!(a.title, "Report: Bills rally");
        assert_eq!(a.summary, "Supporters anticipated more.");
        assert_eq!(a.importance, 50);
    }
}
