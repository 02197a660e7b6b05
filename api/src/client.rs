use crate::wire::{
    ClubRef, ListPayload, WireClub, WireClubDashboard, WireClubRecord, WireCompetition,
    WireCompetitionClubStats, WireCompetitionGame, WireLineupEntry, WireMatch, WirePerformance,
    WirePlayer,
};
use crate::{
    Club, ClubDashboard, ClubProfile, ClubRecord, Competition, CompetitionClubStats,
    CompetitionGame, LineupEntry, LineupPatch, Match, NewLineupEntry, Outcome, Performance,
    PerformanceForm, Player, RecentResult,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {url}: HTTP {status}")]
    Api { status: StatusCode, url: String },
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Error: {0}")]
    Other(String),
}

/// Client for the club management REST backend.
#[derive(Debug, Clone)]
pub struct PitchsideApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Default for PitchsideApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PitchsideApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("pitchside/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Matches / players
    // -----------------------------------------------------------------------

    pub async fn fetch_matches(&self) -> ApiResult<Vec<Match>> {
        let raw: ListPayload<WireMatch> = self.get("/matches/").await?;
        Ok(raw.into_items().into_iter().map(map_match).collect())
    }

    pub async fn fetch_match(&self, match_id: u64) -> ApiResult<Match> {
        let raw: WireMatch = self.get(&format!("/matches/{match_id}/")).await?;
        Ok(map_match(raw))
    }

    pub async fn fetch_players(&self) -> ApiResult<Vec<Player>> {
        let raw: ListPayload<WirePlayer> = self.get("/players/").await?;
        Ok(raw.into_items().into_iter().map(map_player).collect())
    }

    // -----------------------------------------------------------------------
    // Lineup entries
    // -----------------------------------------------------------------------

    pub async fn fetch_lineup(&self, match_id: u64) -> ApiResult<Vec<LineupEntry>> {
        let raw: ListPayload<WireLineupEntry> =
            self.get(&format!("/lineup-entries/?match={match_id}")).await?;
        Ok(raw.into_items().into_iter().map(map_lineup_entry).collect())
    }

    /// Only the status is checked; the board reloads afterwards anyway.
    pub async fn create_lineup_entry(&self, entry: &NewLineupEntry) -> ApiResult<()> {
        self.write(Method::POST, "/lineup-entries/", entry).await
    }

    pub async fn update_lineup_entry(&self, entry_id: u64, patch: &LineupPatch) -> ApiResult<()> {
        self.write(Method::PATCH, &format!("/lineup-entries/{entry_id}/"), patch).await
    }

    pub async fn delete_lineup_entry(&self, entry_id: u64) -> ApiResult<()> {
        let url = self.url(&format!("/lineup-entries/{entry_id}/"));
        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        check_status(&response, &url)
    }

    // -----------------------------------------------------------------------
    // Performances (ratings)
    // -----------------------------------------------------------------------

    pub async fn fetch_match_performances(&self, match_id: u64) -> ApiResult<Vec<Performance>> {
        let raw: ListPayload<WirePerformance> =
            self.get(&format!("/performances/?match={match_id}")).await?;
        Ok(raw.into_items().into_iter().map(map_performance).collect())
    }

    pub async fn fetch_player_performances(&self, player_id: u64) -> ApiResult<Vec<Performance>> {
        let raw: ListPayload<WirePerformance> =
            self.get(&format!("/performances/?player={player_id}")).await?;
        Ok(raw.into_items().into_iter().map(map_performance).collect())
    }

    pub async fn create_performance(&self, form: &PerformanceForm) -> ApiResult<()> {
        self.write(Method::POST, "/performances/", form).await
    }

    pub async fn update_performance(
        &self,
        performance_id: u64,
        form: &PerformanceForm,
    ) -> ApiResult<()> {
        self.write(Method::PATCH, &format!("/performances/{performance_id}/"), form).await
    }

    // -----------------------------------------------------------------------
    // Clubs / competitions
    // -----------------------------------------------------------------------

    pub async fn fetch_clubs(&self) -> ApiResult<Vec<Club>> {
        let raw: ListPayload<WireClub> = self.get("/clubs/").await?;
        Ok(raw.into_items().into_iter().map(|c| map_club(ClubRef::Embedded(c))).collect())
    }

    pub async fn fetch_club_dashboard(&self, club_id: u64) -> ApiResult<ClubDashboard> {
        let raw: WireClubDashboard = self.get(&format!("/clubs/{club_id}/dashboard/")).await?;
        Ok(map_dashboard(raw))
    }

    pub async fn fetch_competitions(&self) -> ApiResult<Vec<Competition>> {
        let raw: ListPayload<WireCompetition> = self.get("/competitions/").await?;
        Ok(raw
            .into_items()
            .into_iter()
            .map(|c| Competition { id: c.id, name: c.name })
            .collect())
    }

    pub async fn fetch_competition_clubs(&self, competition_id: u64) -> ApiResult<Vec<Club>> {
        let raw: ListPayload<WireClub> =
            self.get(&format!("/competitions/{competition_id}/clubs/")).await?;
        Ok(raw.into_items().into_iter().map(|c| map_club(ClubRef::Embedded(c))).collect())
    }

    pub async fn fetch_competition_club_stats(
        &self,
        competition_id: u64,
        club_id: u64,
    ) -> ApiResult<CompetitionClubStats> {
        let path = format!("/competitions/{competition_id}/clubs/{club_id}/stats/");
        let raw: WireCompetitionClubStats = self.get(&path).await?;
        Ok(CompetitionClubStats {
            record: map_record(raw.stats),
            games: raw.games.into_iter().map(map_competition_game).collect(),
        })
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url).timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        decode(response, &url).await
    }

    /// POST/PATCH a JSON body. Any 2xx counts as success, with or without a body.
    async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        let url = self.url(path);
        let response = self
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        check_status(&response, &url)
    }
}

fn check_status(response: &Response, url: &str) -> ApiResult<()> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.to_owned()));
    }
    if !status.is_success() {
        return Err(ApiError::Api { status, url: url.to_owned() });
    }
    Ok(())
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> ApiResult<T> {
    check_status(&response, url)?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parsing(e, url.to_owned()))
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_club(club: ClubRef) -> Club {
    match club {
        ClubRef::Id(id) => Club { id, name: format!("Club #{id}") },
        ClubRef::Embedded(WireClub { id, name }) => Club { id, name },
    }
}

fn map_player(raw: WirePlayer) -> Player {
    Player {
        id: raw.id,
        name: raw.name,
        position: raw.position,
        photo: raw.photo.filter(|p| !p.is_empty()),
        club_id: raw.club.as_ref().map(ClubRef::id),
    }
}

fn map_match(raw: WireMatch) -> Match {
    Match {
        id: raw.id,
        home: map_club(raw.home),
        away: map_club(raw.away),
        home_score: raw.home_score,
        away_score: raw.away_score,
        kickoff: raw.kickoff.as_deref().and_then(parse_kickoff),
    }
}

fn map_lineup_entry(raw: WireLineupEntry) -> LineupEntry {
    LineupEntry {
        id: raw.id,
        match_id: raw.match_id,
        club_id: raw.club.as_ref().map(ClubRef::id),
        player_id: raw.player.id(),
        status: raw.status,
        x: raw.x.and_then(|x| x.value()),
        y: raw.y.and_then(|y| y.value()),
    }
}

fn map_performance(raw: WirePerformance) -> Performance {
    Performance {
        id: raw.id,
        match_id: raw.match_id,
        player_id: raw.player.id(),
        rating: raw.rating.and_then(|r| r.value()),
        goals: raw.goals.unwrap_or_default(),
        assists: raw.assists.unwrap_or_default(),
    }
}

fn map_record(raw: WireClubRecord) -> ClubRecord {
    ClubRecord {
        games: raw.games.unwrap_or_default(),
        wins: raw.wins.unwrap_or_default(),
        draws: raw.draws.unwrap_or_default(),
        losses: raw.losses.unwrap_or_default(),
        win_rate: raw.win_rate.and_then(|r| r.value()),
    }
}

fn map_dashboard(raw: WireClubDashboard) -> ClubDashboard {
    let profile = raw.profile;
    ClubDashboard {
        profile: ClubProfile {
            name: profile.name,
            country: profile.country.filter(|c| !c.is_empty()),
            founded: profile.founded,
            history: profile.history.filter(|h| !h.trim().is_empty()),
            crest: profile.crest.filter(|c| !c.is_empty()),
        },
        record: map_record(raw.stats),
        recent: raw
            .recent_matches
            .into_iter()
            .map(|r| RecentResult {
                opponent: r.opponent,
                score: r.score,
                outcome: r.result.as_deref().and_then(Outcome::from_code),
            })
            .collect(),
    }
}

fn map_competition_game(raw: WireCompetitionGame) -> CompetitionGame {
    CompetitionGame {
        id: raw.id,
        home: raw.home,
        away: raw.away,
        home_score: raw.home_score,
        away_score: raw.away_score,
        date: raw.date,
        outcome: raw.result.as_deref().and_then(Outcome::from_code),
    }
}

/// Accepts RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM[:SS]` values (read as UTC).
fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
