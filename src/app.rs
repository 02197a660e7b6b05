use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Notice};
use crate::state::competitions::CompetitionFocus;
use crate::state::lineup_view::DropOutcome;
use crate::state::messages::NetworkRequest;
use crate::state::placement::CommitOutcome;
use crate::state::roster::{LoadTicket, RosterSnapshot, Zone};
use log::{error, warn};
use pitchside_api::client::PitchsideApi;
use pitchside_api::{
    Club, ClubDashboard, Competition, CompetitionClubStats, Match, Performance, Player,
};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Matches,
    Lineup,
    Players,
    Ratings,
    Clubs,
    Competitions,
    Live,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn api_client(&self) -> PitchsideApi {
        PitchsideApi::new(self.settings.api_url.clone()).with_token(self.settings.token.clone())
    }

    /// Requests issued once the UI is up.
    pub fn startup_requests(&mut self) -> Vec<NetworkRequest> {
        self.state.matches.is_loading = true;
        let mut requests = vec![NetworkRequest::LoadMatches];
        if let Some(match_id) = self.settings.initial_match {
            requests.push(self.open_lineup(match_id));
        }
        requests
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_matches_loaded(&mut self, matches: Vec<Match>) {
        self.state.matches.load(matches);
    }

    pub fn on_players_loaded(&mut self, players: Vec<Player>) {
        self.state.players.load(players);
    }

    pub fn on_roster_loaded(&mut self, ticket: LoadTicket, result: Result<RosterSnapshot, String>) {
        if let Err(message) = &result {
            warn!("lineup load failed: {message}");
        }
        self.state.roster.apply(ticket, result);
    }

    /// The write and its reload are both done. The gesture ends here, whatever happened.
    pub fn on_lineup_committed(&mut self, ticket: LoadTicket, outcome: CommitOutcome) {
        if self.state.roster.match_id() == Some(ticket.match_id) {
            self.state.lineup.settle();
        }
        if let Err(message) = &outcome.saved {
            error!("lineup save failed: {message}");
            self.state.notice = Some(Notice::error(
                "Save failed. Showing the lineup as stored on the server.",
            ));
        }
        self.state.roster.apply(ticket, outcome.reloaded);
    }

    pub fn on_player_stats_loaded(&mut self, player_id: u64, performances: Vec<Performance>) {
        self.state.players.is_loading = false;
        self.state.players.on_stats_loaded(player_id, &performances);
    }

    pub fn on_ratings_loaded(
        &mut self,
        match_info: Match,
        pool: Vec<Player>,
        performances: Vec<Performance>,
    ) {
        self.state.ratings.load(match_info, pool, performances);
    }

    /// Reports the result and reloads the sheet so new rows pick up their ids.
    pub fn on_ratings_saved(
        &mut self,
        match_id: u64,
        failed: usize,
        total: usize,
    ) -> Option<NetworkRequest> {
        self.state.ratings.is_saving = false;
        self.state.notice = Some(if failed == 0 {
            Notice::info(format!("Saved {total} rating(s)."))
        } else {
            Notice::error(format!("Some rows failed to save ({failed} of {total})."))
        });
        (self.state.ratings.match_id() == Some(match_id)).then(|| self.open_ratings(match_id))
    }

    /// The first club's dashboard follows the list.
    pub fn on_clubs_loaded(&mut self, clubs: Vec<Club>) -> Option<NetworkRequest> {
        let club_id = self.state.clubs.load(clubs)?;
        self.state.clubs.is_loading = true;
        Some(NetworkRequest::LoadClubDashboard { club_id })
    }

    pub fn on_club_dashboard_loaded(&mut self, club_id: u64, dashboard: ClubDashboard) {
        self.state.clubs.on_dashboard_loaded(club_id, dashboard);
    }

    /// The first competition's entrants follow the list.
    pub fn on_competitions_loaded(
        &mut self,
        competitions: Vec<Competition>,
    ) -> Option<NetworkRequest> {
        let competition_id = self.state.competitions.load(competitions)?;
        self.state.competitions.begin_clubs_load();
        Some(NetworkRequest::LoadCompetitionClubs { competition_id })
    }

    pub fn on_competition_clubs_loaded(&mut self, competition_id: u64, clubs: Vec<Club>) {
        self.state.competitions.on_clubs_loaded(competition_id, clubs);
    }

    pub fn on_competition_club_stats_loaded(
        &mut self,
        competition_id: u64,
        club_id: u64,
        stats: CompetitionClubStats,
    ) {
        self.state.competitions.on_stats_loaded(competition_id, club_id, stats);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.matches.is_loading = false;
        self.state.players.is_loading = false;
        self.state.ratings.is_loading = false;
        self.state.ratings.is_saving = false;
        self.state.clubs.is_loading = false;
        self.state.competitions.is_loading = false;
        let slot = match self.state.active_tab {
            MenuItem::Matches => Some(&mut self.state.matches.last_error),
            MenuItem::Players => Some(&mut self.state.players.last_error),
            MenuItem::Ratings => Some(&mut self.state.ratings.last_error),
            MenuItem::Clubs => Some(&mut self.state.clubs.last_error),
            MenuItem::Competitions => Some(&mut self.state.competitions.last_error),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = Some(message.clone());
        }
        self.state.notice = Some(Notice::error(message));
    }

    pub fn on_tick(&mut self) -> bool {
        let Some(notice) = self.state.notice.as_mut() else {
            return false;
        };
        if !notice.tick() {
            self.state.notice = None;
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) -> Option<NetworkRequest> {
        if self.state.active_tab == next {
            return None;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        match next {
            MenuItem::Players => {
                let players = &mut self.state.players;
                if players.players.is_empty() && !players.is_loading {
                    players.is_loading = true;
                    return Some(NetworkRequest::LoadPlayers);
                }
            }
            MenuItem::Clubs => {
                let clubs = &mut self.state.clubs;
                if clubs.clubs.is_empty() && !clubs.is_loading {
                    clubs.is_loading = true;
                    return Some(NetworkRequest::LoadClubs);
                }
            }
            MenuItem::Competitions => {
                let competitions = &mut self.state.competitions;
                if competitions.competitions.is_empty() && !competitions.is_loading {
                    competitions.is_loading = true;
                    return Some(NetworkRequest::LoadCompetitions);
                }
            }
            _ => {}
        }
        None
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------------

    pub fn reload_matches(&mut self) -> NetworkRequest {
        self.state.matches.is_loading = true;
        NetworkRequest::LoadMatches
    }

    pub fn matches_open_lineup(&mut self) -> Option<NetworkRequest> {
        let match_id = self.state.matches.selected_match()?.id;
        Some(self.open_lineup(match_id))
    }

    pub fn matches_open_ratings(&mut self) -> Option<NetworkRequest> {
        let match_id = self.state.matches.selected_match()?.id;
        Some(self.open_ratings(match_id))
    }

    // -----------------------------------------------------------------------
    // Lineup board
    // -----------------------------------------------------------------------

    pub fn open_lineup(&mut self, match_id: u64) -> NetworkRequest {
        if self.state.roster.match_id() != Some(match_id) {
            self.state.lineup.reset();
        }
        let ticket = self.state.roster.begin_load(match_id);
        self.update_tab(MenuItem::Lineup);
        NetworkRequest::LoadRoster { ticket }
    }

    /// Full reload of the current match. Refused while a change is being saved.
    pub fn reload_lineup(&mut self) -> Option<NetworkRequest> {
        if self.state.lineup.in_flight {
            return None;
        }
        let match_id = self.state.roster.match_id()?;
        let ticket = self.state.roster.begin_load(match_id);
        Some(NetworkRequest::LoadRoster { ticket })
    }

    pub fn lineup_drag_start(&mut self, column: u16, row: u16) -> bool {
        self.state.lineup.begin_drag(&self.state.roster, column, row)
    }

    pub fn lineup_drag_to(&mut self, column: u16, row: u16) {
        self.state.lineup.drag_to(column, row);
    }

    pub fn lineup_drop(&mut self, column: u16, row: u16) -> Option<NetworkRequest> {
        let outcome = self.state.lineup.drop_at(&self.state.roster, column, row);
        self.dispatch(outcome)
    }

    pub fn lineup_move_selected(&mut self, zone: Zone) -> Option<NetworkRequest> {
        let outcome = self.state.lineup.move_selected(&self.state.roster, zone);
        self.dispatch(outcome)
    }

    fn dispatch(&mut self, outcome: DropOutcome) -> Option<NetworkRequest> {
        match outcome {
            DropOutcome::Dispatch(mutation) => {
                let Some(match_id) = self.state.roster.match_id() else {
                    self.state.lineup.settle();
                    return None;
                };
                let ticket = self.state.roster.begin_load(match_id);
                Some(NetworkRequest::CommitLineup { ticket, mutation })
            }
            DropOutcome::Rejected(rejected) => {
                self.state.notice = Some(Notice::error(rejected.notice()));
                None
            }
            DropOutcome::Cancelled => None,
        }
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    pub fn players_show_stats(&mut self) -> Option<NetworkRequest> {
        let player_id = self.state.players.selected_player()?.id;
        self.state.players.is_loading = true;
        Some(NetworkRequest::LoadPlayerStats { player_id })
    }

    // -----------------------------------------------------------------------
    // Clubs and competitions
    // -----------------------------------------------------------------------

    pub fn clubs_open_dashboard(&mut self) -> Option<NetworkRequest> {
        let club_id = self.state.clubs.selected_club()?.id;
        self.state.clubs.is_loading = true;
        Some(NetworkRequest::LoadClubDashboard { club_id })
    }

    pub fn reload_clubs(&mut self) -> NetworkRequest {
        self.state.clubs.is_loading = true;
        NetworkRequest::LoadClubs
    }

    /// Enter on a competition loads its entrants; on a club, that club's stats.
    pub fn competitions_open_selected(&mut self) -> Option<NetworkRequest> {
        let competitions = &mut self.state.competitions;
        let competition_id = competitions.selected_competition()?.id;
        match competitions.focus {
            CompetitionFocus::Competitions => {
                competitions.begin_clubs_load();
                Some(NetworkRequest::LoadCompetitionClubs { competition_id })
            }
            CompetitionFocus::Clubs => {
                let club_id = competitions.selected_club()?.id;
                competitions.is_loading = true;
                Some(NetworkRequest::LoadCompetitionClubStats { competition_id, club_id })
            }
        }
    }

    pub fn reload_competitions(&mut self) -> NetworkRequest {
        self.state.competitions.is_loading = true;
        NetworkRequest::LoadCompetitions
    }

    // -----------------------------------------------------------------------
    // Ratings
    // -----------------------------------------------------------------------

    pub fn open_ratings(&mut self, match_id: u64) -> NetworkRequest {
        self.state.ratings.begin_load();
        self.update_tab(MenuItem::Ratings);
        NetworkRequest::LoadRatings { match_id }
    }

    pub fn ratings_save(&mut self) -> Option<NetworkRequest> {
        if self.state.ratings.is_saving {
            return None;
        }
        let match_id = self.state.ratings.match_id()?;
        match self.state.ratings.submissions() {
            Err(message) => {
                self.state.notice = Some(Notice::error(message));
                None
            }
            Ok(submissions) if submissions.is_empty() => {
                self.state.notice = Some(Notice::info("Nothing to save."));
                None
            }
            Ok(submissions) => {
                self.state.ratings.is_saving = true;
                self.state.ratings.editing = false;
                Some(NetworkRequest::SaveRatings { match_id, submissions })
            }
        }
    }
}
