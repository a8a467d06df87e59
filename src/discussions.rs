//! # Discussions
//! Forum-post shaped records ranked by community heat:
//! `is_hot*100 + (upvotes - downvotes)*2 + replies*5 - hours_since_created`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::rank::rank_with;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_hot: bool,
}

impl DiscussionPost {
    pub fn net_votes(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

/// Heat score; older posts lose one point per hour.
pub fn hot_score(post: &DiscussionPost, now: DateTime<Utc>) -> f64 {
    let hours = (now - post.created_at).num_milliseconds() as f64 / 3_600_000.0;
    let hot = if post.is_hot { 100.0 } else { 0.0 };
    hot + post.net_votes() as f64 * 2.0 + post.replies.len() as f64 * 5.0 - hours
}

/// Rank posts, optionally limited to one sport. Ties go to the newer post.
pub fn top_discussions(
    posts: &[DiscussionPost],
    sport: Option<&str>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<DiscussionPost> {
    let wanted = sport.map(str::trim).filter(|s| !s.is_empty());
    let pool: Vec<DiscussionPost> = posts
        .iter()
        .filter(|p| wanted.map_or(true, |w| p.sport.eq_ignore_ascii_case(w)))
        .cloned()
        .collect();
    rank_with(
        pool,
        |p| hot_score(p, now),
        |a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)),
        limit,
    )
}

/// In-memory board used by the API; times are relative to `now`.
pub fn seed_board(now: DateTime<Utc>) -> Vec<DiscussionPost> {
    let reply = |post: &str, n: usize, author: &str, body: &str, age_h: i64| Reply {
        id: format!("{post}-r{n}"),
        author: author.to_string(),
        body: body.to_string(),
        created_at: now - Duration::hours(age_h),
    };
    vec![
        DiscussionPost {
            id: "d1".into(),
            title: "Is this the year the Celtics repeat?".into(),
            author: "greenrunsdeep".into(),
            sport: "nba".into(),
            team: Some("Boston Celtics".into()),
            upvotes: 142,
            downvotes: 12,
            replies: vec![
                reply("d1", 1, "hoopshead", "Depth says yes.", 3),
                reply("d1", 2, "westcoastbias", "Health says maybe.", 2),
            ],
            created_at: now - Duration::hours(5),
            is_hot: true,
        },
        DiscussionPost {
            id: "d2".into(),
            title: "Trade deadline winners and losers".into(),
            author: "capspace".into(),
            sport: "nba".into(),
            team: None,
            upvotes: 88,
            downvotes: 20,
            replies: vec![reply("d2", 1, "fakebuyer", "Bold calls.", 1)],
            created_at: now - Duration::hours(20),
            is_hot: false,
        },
        DiscussionPost {
            id: "d3".into(),
            title: "Rank the rookie quarterbacks".into(),
            author: "pocketpresence".into(),
            sport: "nfl".into(),
            team: None,
            upvotes: 64,
            downvotes: 9,
            replies: vec![
                reply("d3", 1, "blitz", "Arm talent first.", 6),
                reply("d3", 2, "zonecover", "Processing first.", 5),
                reply("d3", 3, "redzone", "Both matter.", 4),
            ],
            created_at: now - Duration::hours(9),
            is_hot: false,
        },
        DiscussionPost {
            id: "d4".into(),
            title: "Dodgers rotation: too much depth?".into(),
            author: "bluecrew".into(),
            sport: "mlb".into(),
            team: Some("Los Angeles Dodgers".into()),
            upvotes: 40,
            downvotes: 3,
            replies: vec![],
            created_at: now - Duration::hours(30),
            is_hot: false,
        },
        DiscussionPost {
            id: "d5".into(),
            title: "Oilers power play is unstoppable".into(),
            author: "oilcountry".into(),
            sport: "nhl".into(),
            team: Some("Edmonton Oilers".into()),
            upvotes: 75,
            downvotes: 30,
            replies: vec![reply("d5", 1, "pkspecialist", "Until the playoffs.", 2)],
            created_at: now - Duration::hours(2),
            is_hot: true,
        },
    ]
}
