/// REST wire types: serde shapes for deserializing backend responses.
/// These map to the clean domain types via the mapping functions in client.rs.
use crate::LineupStatus;
use serde::Deserialize;

/// List endpoints answer either with a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Page { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Page { results } => results,
        }
    }
}

/// Foreign keys come back as either a bare id or a nested object.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ClubRef {
    Id(u64),
    Embedded(WireClub),
}

impl ClubRef {
    pub fn id(&self) -> u64 {
        match self {
            ClubRef::Id(id) => *id,
            ClubRef::Embedded(club) => club.id,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum PlayerRef {
    Id(u64),
    Embedded(WirePlayer),
}

impl PlayerRef {
    pub fn id(&self) -> u64 {
        match self {
            PlayerRef::Id(id) => *id,
            PlayerRef::Embedded(player) => player.id,
        }
    }
}

/// Decimal fields are serialized as strings by some backends ("7.5").
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    pub fn value(&self) -> Option<f64> {
        match self {
            Decimal::Number(n) => Some(*n),
            Decimal::Text(s) => s.trim().parse().ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct WireClub {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WirePlayer {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    pub photo: Option<String>,
    pub club: Option<ClubRef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireMatch {
    pub id: u64,
    pub home: ClubRef,
    pub away: ClubRef,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub kickoff: Option<String>, // ISO 8601, with or without offset
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireLineupEntry {
    pub id: u64,
    #[serde(rename = "match")]
    pub match_id: u64,
    pub club: Option<ClubRef>,
    pub player: PlayerRef,
    pub status: LineupStatus,
    pub x: Option<Decimal>,
    pub y: Option<Decimal>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WirePerformance {
    pub id: u64,
    #[serde(rename = "match")]
    pub match_id: u64,
    pub player: PlayerRef,
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub goals: Option<u32>,
    #[serde(default)]
    pub assists: Option<u32>,
}

// ---------------------------------------------------------------------------
// Club dashboard and competitions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WireClubRecord {
    pub games: Option<u32>,
    pub wins: Option<u32>,
    pub draws: Option<u32>,
    pub losses: Option<u32>,
    pub win_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WireClubProfile {
    #[serde(default)]
    pub name: String,
    pub country: Option<String>,
    pub founded: Option<i32>,
    pub history: Option<String>,
    pub crest: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireRecentResult {
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub score: String,
    pub result: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireClubDashboard {
    #[serde(default)]
    pub profile: WireClubProfile,
    #[serde(default)]
    pub stats: WireClubRecord,
    #[serde(default)]
    pub recent_matches: Vec<WireRecentResult>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireCompetition {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireCompetitionGame {
    pub id: u64,
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub away: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub date: Option<String>,
    pub result: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireCompetitionClubStats {
    #[serde(default)]
    pub stats: WireClubRecord,
    #[serde(default)]
    pub games: Vec<WireCompetitionGame>,
}
