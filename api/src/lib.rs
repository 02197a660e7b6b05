pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position value the backend uses for goalkeepers.
pub const GOALKEEPER: &str = "Goalkeeper";

// ---------------------------------------------------------------------------
// Domain types, independent of the REST wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Club {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub position: String, // "Goalkeeper", "Defender", "Midfielder", "Forward", ...
    pub photo: Option<String>,
    pub club_id: Option<u64>,
}

impl Player {
    /// Stand-in for a lineup entry whose player is missing from the loaded pool.
    pub fn unknown(id: u64) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            position: "?".to_string(),
            photo: None,
            club_id: None,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position == GOALKEEPER
    }

    /// Two-letter badge drawn on the pitch marker.
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub id: u64,
    pub home: Club,
    pub away: Club,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub kickoff: Option<DateTime<Utc>>,
}

impl Match {
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }

    pub fn score_line(&self) -> String {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => format!("{h} x {a}"),
            _ => "- x -".to_string(),
        }
    }
}

/// Zone a lineup entry occupies. Players without an entry are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineupStatus {
    Starter,
    Bench,
}

impl fmt::Display for LineupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineupStatus::Starter => write!(f, "starter"),
            LineupStatus::Bench => write!(f, "bench"),
        }
    }
}

/// One player's placement for one match, as persisted by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LineupEntry {
    pub id: u64,
    pub match_id: u64,
    pub club_id: Option<u64>,
    pub player_id: u64,
    pub status: LineupStatus,
    /// Normalized 0..=100, only meaningful for starters. None = not yet positioned.
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// POST body for a new lineup entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLineupEntry {
    #[serde(rename = "match")]
    pub match_id: u64,
    pub club: u64,
    pub player: u64,
    pub status: LineupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// PATCH body for an existing lineup entry. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LineupStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Per-match rating sheet row for one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Performance {
    pub id: u64,
    pub match_id: u64,
    pub player_id: u64,
    pub rating: Option<f64>,
    pub goals: u32,
    pub assists: u32,
}

/// Body shared by POST and PATCH on the performances resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceForm {
    #[serde(rename = "match")]
    pub match_id: u64,
    pub player: u64,
    pub rating: Option<f64>,
    pub goals: u32,
    pub assists: u32,
}

// ---------------------------------------------------------------------------
// Clubs and competitions (read-only dashboards)
// ---------------------------------------------------------------------------

/// Result of one game from a club's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Backend result codes: `W`, `D`, `L`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Outcome::Win),
            "D" => Some(Outcome::Draw),
            "L" => Some(Outcome::Loss),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Draw => "DRAW",
            Outcome::Loss => "LOSS",
        }
    }
}

/// Win/draw/loss totals over a set of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClubRecord {
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Points won as a percentage of points available, when the backend sends it.
    pub win_rate: Option<f64>,
}

impl ClubRecord {
    /// Backend value if present, otherwise three points a win and one a draw.
    pub fn win_rate(&self) -> f64 {
        self.win_rate.unwrap_or_else(|| {
            if self.games == 0 {
                0.0
            } else {
                f64::from(3 * self.wins + self.draws) * 100.0 / f64::from(3 * self.games)
            }
        })
    }

    /// Share of games with `count` as a fraction in 0..=1.
    pub fn ratio(&self, count: u32) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (f64::from(count) / f64::from(self.games)).min(1.0)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClubProfile {
    pub name: String,
    pub country: Option<String>,
    pub founded: Option<i32>,
    pub history: Option<String>,
    pub crest: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentResult {
    pub opponent: String,
    pub score: String,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClubDashboard {
    pub profile: ClubProfile,
    pub record: ClubRecord,
    pub recent: Vec<RecentResult>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Competition {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionGame {
    pub id: u64,
    pub home: String,
    pub away: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub date: Option<String>,
    pub outcome: Option<Outcome>,
}

impl CompetitionGame {
    pub fn score_line(&self) -> String {
        let score = |s: Option<u32>| s.map_or_else(|| "-".to_string(), |s| s.to_string());
        format!(
            "{} {} x {} {}",
            self.home,
            score(self.home_score),
            score(self.away_score),
            self.away
        )
    }
}

/// One club's record and games inside one competition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionClubStats {
    pub record: ClubRecord,
    pub games: Vec<CompetitionGame>,
}
