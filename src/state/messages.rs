use crate::state::network::LoadingState;
use crate::state::placement::{CommitOutcome, LineupMutation};
use crate::state::ratings::RatingSubmission;
use crate::state::roster::{LoadTicket, RosterSnapshot};
use crossterm::event::{KeyEvent, MouseEvent};
use pitchside_api::{
    Club, ClubDashboard, Competition, CompetitionClubStats, Match, Performance, Player,
};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadMatches,
    LoadPlayers,
    LoadRoster { ticket: LoadTicket },
    /// One write followed by a full roster reload.
    CommitLineup { ticket: LoadTicket, mutation: LineupMutation },
    LoadPlayerStats { player_id: u64 },
    LoadRatings { match_id: u64 },
    SaveRatings { match_id: u64, submissions: Vec<RatingSubmission> },
    LoadClubs,
    LoadClubDashboard { club_id: u64 },
    LoadCompetitions,
    LoadCompetitionClubs { competition_id: u64 },
    LoadCompetitionClubStats { competition_id: u64, club_id: u64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchesLoaded { matches: Vec<Match> },
    PlayersLoaded { players: Vec<Player> },
    RosterLoaded { ticket: LoadTicket, result: Result<RosterSnapshot, String> },
    LineupCommitted { ticket: LoadTicket, outcome: CommitOutcome },
    PlayerStatsLoaded { player_id: u64, performances: Vec<Performance> },
    RatingsLoaded { match_info: Match, pool: Vec<Player>, performances: Vec<Performance> },
    RatingsSaved { match_id: u64, failed: usize, total: usize },
    ClubsLoaded { clubs: Vec<Club> },
    ClubDashboardLoaded { club_id: u64, dashboard: ClubDashboard },
    CompetitionsLoaded { competitions: Vec<Competition> },
    CompetitionClubsLoaded { competition_id: u64, clubs: Vec<Club> },
    CompetitionClubStatsLoaded { competition_id: u64, club_id: u64, stats: CompetitionClubStats },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    AppStarted,
    Tick,
}
