// src/ingest/providers/static_feed.rs
//! Static generator: a fixed set of stories served without any network I/O.
//!
//! Items carry an `age_minutes` offset instead of an absolute time so the feed always
//! looks fresh relative to the moment it is fetched. Loads from JSON or falls back to
//! the built-in `default_seed()`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use metrics::counter;
use serde::Deserialize;

use crate::ingest::types::{RawRecord, SourceAdapter};

#[derive(Debug, Clone, Deserialize)]
pub struct StaticItem {
    #[serde(flatten)]
    pub record: RawRecord,
    /// Minutes before fetch time; `None` leaves the publish time to the normalizer.
    #[serde(default)]
    pub age_minutes: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct StaticFeedAdapter {
    name: String,
    base_url: String,
    items: Vec<StaticItem>,
}

impl StaticFeedAdapter {
    pub fn new(name: &str, base_url: &str, items: Vec<StaticItem>) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            items,
        }
    }

    /// Load items from a JSON array file.
    pub fn load_from_file<P: AsRef<Path>>(name: &str, base_url: &str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading static feed from {}", path.display()))?;
        let items: Vec<StaticItem> = serde_json::from_str(&data)
            .with_context(|| format!("parsing static feed {}", path.display()))?;
        Ok(Self::new(name, base_url, items))
    }

    /// Built-in desk used when no file is configured.
    pub fn default_seed() -> Self {
        let items = [
            ("nba", "Celtics", "Celtics extend win streak to nine", "Boston's defense held Miami under 90 points for the third straight game.", "/nba/celtics-streak", 35),
            ("nba", "Lakers", "Lakers guard exits with ankle injury", "The team said imaging is scheduled for Tuesday and he is day-to-day.", "/nba/lakers-ankle", 80),
            ("nba", "Thunder", "Thunder rookie posts career night", "The first-year forward scored 31 as Oklahoma City rolled past Denver.", "/nba/thunder-rookie", 140),
            ("nba", "Knicks", "Knicks coach praises bench after comeback", "New York erased a 20-point deficit behind its second unit.", "/nba/knicks-bench", 220),
            ("nfl", "Chiefs", "Chiefs restructure contract to clear cap space", "Kansas City freed roughly $18 million ahead of free agency.", "/nfl/chiefs-cap", 50),
            ("nfl", "Eagles", "Eagles weigh trade offers for veteran receiver", "Several teams have called about the 29-year-old, according to league sources.", "/nfl/eagles-trade", 95),
            ("nfl", "Bears", "Bears host top prospects ahead of the draft", "Chicago holds two first-round picks this spring.", "/nfl/bears-draft", 300),
            ("nfl", "Packers", "Packers open voluntary practice", "Attendance was high as Green Bay began its offseason program.", "/nfl/packers-practice", 600),
            ("mlb", "Dodgers", "Dodgers ace sets strikeout record", "He fanned 18 in a complete-game shutout on Sunday night.", "/mlb/dodgers-record", 60),
            ("mlb", "Yankees", "Yankees slugger returns from injury list", "The outfielder went 2-for-4 in his first game back.", "/mlb/yankees-return", 180),
            ("mlb", "Cubs", "Cubs announce new spring training schedule", "Fans can expect eight home dates in Mesa this March.", "/mlb/cubs-spring", 900),
            ("nhl", "Oilers", "Oilers captain leads MVP conversation", "His 110 points lead the league with a month to play.", "/nhl/oilers-mvp", 70),
            ("nhl", "Bruins", "Bruins forward handed three-game suspension", "The league ruled his hit to the head was avoidable.", "/nhl/bruins-suspension", 130),
            ("nhl", "Maple Leafs", "Maple Leafs clinch playoff berth", "Toronto is back in the postseason for the ninth year in a row.", "/nhl/leafs-playoff", 240),
        ]
        .into_iter()
        .map(|(sport, team, title, summary, url, age)| StaticItem {
            record: RawRecord {
                title: title.to_string(),
                summary: summary.to_string(),
                url: Some(url.to_string()),
                published_at: None,
                team: Some(team.to_string()),
                sport: Some(sport.to_string()),
                image_url: None,
            },
            age_minutes: Some(age),
        })
        .collect();

        Self::new("Fan Zone Desk", "https://fanzone.example/", items)
    }
}

#[async_trait]
impl SourceAdapter for StaticFeedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, sport: Option<&str>) -> Result<Vec<RawRecord>> {
        let wanted = sport.map(|s| s.trim().to_ascii_lowercase());
        let now = Utc::now();
        let out: Vec<RawRecord> = self
            .items
            .iter()
            .filter(|it| match (&wanted, &it.record.sport) {
                (Some(w), Some(s)) => s.eq_ignore_ascii_case(w),
                _ => true,
            })
            .map(|it| {
                let mut rec = it.record.clone();
                if let Some(age) = it.age_minutes {
                    rec.published_at = Some(now - Duration::minutes(age.max(0)));
                }
                rec
            })
            .collect();
        counter!("ingest_records_total").increment(out.len() as u64);
        Ok(out)
    }
}
