//! The canonical `Article` that flows out of the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest importance an article can carry.
pub const MIN_IMPORTANCE: u8 = 10;
/// Highest importance an article can carry.
pub const MAX_IMPORTANCE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// `<source-slug>-<index>`; unique within one aggregation only.
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    /// Lowercase league code (`nba`, `nfl`, ...) or `general`.
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub importance: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Title and summary joined the way the scorer and tagger read them.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }

    /// Case-insensitive substring match against team, title or summary.
    pub fn mentions_team(&self, team: &str) -> bool {
        let needle = team.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.team
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&needle))
            || self.title.to_lowercase().contains(&needle)
            || self.summary.to_lowercase().contains(&needle)
    }
}
