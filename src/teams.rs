//! # Team directory
//!
//! Canonical team names for the four major North American leagues and a detector that
//! finds the first team mentioned in a piece of text.
//!
//! - Matching is whole-word and case-insensitive on the nickname ("Celtics") or the
//!   full name ("Boston Celtics").
//! - Nicknames shared across leagues ("Kings", "Giants", "Rangers", ...) resolve to the
//!   league of the sport filter when one is given, otherwise to the first league listed.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub league: &'static str,
    pub city: &'static str,
    pub nickname: &'static str,
}

impl Team {
    pub fn canonical_name(&self) -> String {
        format!("{} {}", self.city, self.nickname)
    }
}

macro_rules! teams {
    ($league:literal: $( $city:literal $nick:literal ),* $(,)?) => {
        &[ $( Team { league: $league, city: $city, nickname: $nick } ),* ]
    };
}

const NBA: &[Team] = teams!("nba":
    "Atlanta" "Hawks", "Boston" "Celtics", "Brooklyn" "Nets", "Charlotte" "Hornets",
    "Chicago" "Bulls", "Cleveland" "Cavaliers", "Dallas" "Mavericks", "Denver" "Nuggets",
    "Detroit" "Pistons", "Golden State" "Warriors", "Houston" "Rockets", "Indiana" "Pacers",
    "Los Angeles" "Clippers", "Los Angeles" "Lakers", "Memphis" "Grizzlies", "Miami" "Heat",
    "Milwaukee" "Bucks", "Minnesota" "Timberwolves", "New Orleans" "Pelicans",
    "New York" "Knicks", "Oklahoma City" "Thunder", "Orlando" "Magic",
    "Philadelphia" "76ers", "Phoenix" "Suns", "Portland" "Trail Blazers",
    "Sacramento" "Kings", "San Antonio" "Spurs", "Toronto" "Raptors", "Utah" "Jazz",
    "Washington" "Wizards",
);

const NFL: &[Team] = teams!("nfl":
    "Arizona" "Cardinals", "Atlanta" "Falcons", "Baltimore" "Ravens", "Buffalo" "Bills",
    "Carolina" "Panthers", "Chicago" "Bears", "Cincinnati" "Bengals", "Cleveland" "Browns",
    "Dallas" "Cowboys", "Denver" "Broncos", "Detroit" "Lions", "Green Bay" "Packers",
    "Houston" "Texans", "Indianapolis" "Colts", "Jacksonville" "Jaguars",
    "Kansas City" "Chiefs", "Las Vegas" "Raiders", "Los Angeles" "Chargers",
    "Los Angeles" "Rams", "Miami" "Dolphins", "Minnesota" "Vikings",
    "New England" "Patriots", "New Orleans" "Saints", "New York" "Giants",
    "New York" "Jets", "Philadelphia" "Eagles", "Pittsburgh" "Steelers",
    "San Francisco" "49ers", "Seattle" "Seahawks", "Tampa Bay" "Buccaneers",
    "Tennessee" "Titans", "Washington" "Commanders",
);

const MLB: &[Team] = teams!("mlb":
    "Arizona" "Diamondbacks", "Atlanta" "Braves", "Baltimore" "Orioles", "Boston" "Red Sox",
    "Chicago" "Cubs", "Chicago" "White Sox", "Cincinnati" "Reds", "Cleveland" "Guardians",
    "Colorado" "Rockies", "Detroit" "Tigers", "Houston" "Astros", "Kansas City" "Royals",
    "Los Angeles" "Angels", "Los Angeles" "Dodgers", "Miami" "Marlins",
    "Milwaukee" "Brewers", "Minnesota" "Twins", "New York" "Mets", "New York" "Yankees",
    "Oakland" "Athletics", "Philadelphia" "Phillies", "Pittsburgh" "Pirates",
    "San Diego" "Padres", "San Francisco" "Giants", "Seattle" "Mariners",
    "St. Louis" "Cardinals", "Tampa Bay" "Rays", "Texas" "Rangers", "Toronto" "Blue Jays",
    "Washington" "Nationals",
);

const NHL: &[Team] = teams!("nhl":
    "Anaheim" "Ducks", "Boston" "Bruins", "Buffalo" "Sabres", "Calgary" "Flames",
    "Carolina" "Hurricanes", "Chicago" "Blackhawks", "Colorado" "Avalanche",
    "Columbus" "Blue Jackets", "Dallas" "Stars", "Detroit" "Red Wings",
    "Edmonton" "Oilers", "Florida" "Panthers", "Los Angeles" "Kings", "Minnesota" "Wild",
    "Montreal" "Canadiens", "Nashville" "Predators", "New Jersey" "Devils",
    "New York" "Islanders", "New York" "Rangers", "Ottawa" "Senators",
    "Philadelphia" "Flyers", "Pittsburgh" "Penguins", "San Jose" "Sharks",
    "Seattle" "Kraken", "St. Louis" "Blues", "Tampa Bay" "Lightning",
    "Toronto" "Maple Leafs", "Utah" "Mammoth", "Vancouver" "Canucks",
    "Vegas" "Golden Knights", "Washington" "Capitals", "Winnipeg" "Jets",
);

struct Matcher {
    team: Team,
    re: Regex,
}

static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    [NBA, NFL, MLB, NHL]
        .iter()
        .flat_map(|league| league.iter())
        .map(|team| Matcher {
            team: *team,
            re: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(team.nickname)))
                .expect("team regex"),
        })
        .collect()
});

/// All known teams, league by league.
pub fn all() -> impl Iterator<Item = &'static Team> {
    [NBA, NFL, MLB, NHL].into_iter().flat_map(|l| l.iter())
}

/// Resolve a free-form team string ("celtics", "Boston Celtics") to a known team.
pub fn lookup(name: &str, sport: Option<&str>) -> Option<Team> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let candidates = all().filter(|t| {
        t.nickname.to_lowercase() == needle || t.canonical_name().to_lowercase() == needle
    });
    prefer_league(candidates.copied(), sport)
}

/// First team mentioned in `text`, by earliest position.
pub fn detect(text: &str, sport: Option<&str>) -> Option<Team> {
    let mut hits: Vec<(usize, Team)> = MATCHERS
        .iter()
        .filter_map(|m| m.re.find(text).map(|found| (found.start(), m.team)))
        .collect();
    let first = hits.iter().map(|(pos, _)| *pos).min()?;
    hits.retain(|(pos, _)| *pos == first);
    prefer_league(hits.into_iter().map(|(_, t)| t), sport)
}

fn prefer_league(candidates: impl Iterator<Item = Team>, sport: Option<&str>) -> Option<Team> {
    let candidates: Vec<Team> = candidates.collect();
    let wanted = sport.map(|s| s.trim().to_ascii_lowercase());
    wanted
        .and_then(|w| candidates.iter().find(|t| t.league == w).copied())
        .or_else(|| candidates.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_league_is_complete() {
        assert_eq!(NBA.len(), 30);
        assert_eq!(NFL.len(), 32);
        assert_eq!(MLB.len(), 30);
        assert_eq!(NHL.len(), 32);
    }

    #[test]
    fn detects_nickname_case_insensitively() {
        let t = detect("big night for the CELTICS in game two", None).unwrap();
        assert_eq!(t.canonical_name(), "Boston Celtics");
    }

    #[test]
    fn ambiguous_nickname_follows_sport_filter() {
        let text = "Kings rally late";
        assert_eq!(detect(text, Some("nhl")).unwrap().league, "nhl");
        assert_eq!(detect(text, Some("nba")).unwrap().league, "nba");
        assert_eq!(detect(text, None).unwrap().league, "nba");
    }

    #[test]
    fn earliest_mention_wins() {
        let t = detect("Lakers fall to the Celtics", Some("nba")).unwrap();
        assert_eq!(t.nickname, "Lakers");
    }

    #[test]
    fn no_partial_word_hits() {
        assert!(detect("The heater is broken", None).is_none());
    }

    #[test]
    fn lookup_accepts_full_or_short_name() {
        assert_eq!(lookup("boston celtics", None).unwrap().nickname, "Celtics");
        assert_eq!(lookup(" Jets ", Some("nhl")).unwrap().league, "nhl");
        assert!(lookup("Springfield Isotopes", None).is_none());
    }
}
