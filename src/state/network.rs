use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::placement::{self, LineupMutation};
use crate::state::ratings::{self, RatingSubmission};
use crate::state::roster::{self, LoadTicket};
use log::{debug, error};
use pitchside_api::client::{ApiError, PitchsideApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Performs requests one at a time, so a lineup write always completes
/// (together with its reload) before the next request starts.
pub struct NetworkWorker {
    client: PitchsideApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: PitchsideApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadMatches => self.handle_load_matches().await,
                NetworkRequest::LoadPlayers => self.handle_load_players().await,
                NetworkRequest::LoadRoster { ticket } => Ok(self.handle_load_roster(ticket).await),
                NetworkRequest::CommitLineup { ticket, mutation } => {
                    Ok(self.handle_commit_lineup(ticket, mutation).await)
                }
                NetworkRequest::LoadPlayerStats { player_id } => {
                    self.handle_load_player_stats(player_id).await
                }
                NetworkRequest::LoadRatings { match_id } => {
                    self.handle_load_ratings(match_id).await
                }
                NetworkRequest::SaveRatings { match_id, submissions } => {
                    Ok(self.handle_save_ratings(match_id, submissions).await)
                }
                NetworkRequest::LoadClubs => self.handle_load_clubs().await,
                NetworkRequest::LoadClubDashboard { club_id } => {
                    self.handle_load_club_dashboard(club_id).await
                }
                NetworkRequest::LoadCompetitions => self.handle_load_competitions().await,
                NetworkRequest::LoadCompetitionClubs { competition_id } => {
                    self.handle_load_competition_clubs(competition_id).await
                }
                NetworkRequest::LoadCompetitionClubStats { competition_id, club_id } => {
                    self.handle_load_competition_club_stats(competition_id, club_id).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(is_ok(&result)).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_matches(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading matches");
        let matches = self.client.fetch_matches().await?;
        Ok(NetworkResponse::MatchesLoaded { matches })
    }

    async fn handle_load_players(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading players");
        let players = self.client.fetch_players().await?;
        Ok(NetworkResponse::PlayersLoaded { players })
    }

    async fn handle_load_roster(&self, ticket: LoadTicket) -> NetworkResponse {
        let result = roster::load(&self.client, ticket.match_id)
            .await
            .map_err(|e| {
                error!("roster load for match {} failed: {e}", ticket.match_id);
                e.to_string()
            });
        NetworkResponse::RosterLoaded { ticket, result }
    }

    async fn handle_commit_lineup(
        &self,
        ticket: LoadTicket,
        mutation: LineupMutation,
    ) -> NetworkResponse {
        let outcome = placement::commit(&self.client, ticket.match_id, &mutation).await;
        NetworkResponse::LineupCommitted { ticket, outcome }
    }

    async fn handle_load_player_stats(&self, player_id: u64) -> Result<NetworkResponse, ApiError> {
        debug!("loading performances for player {player_id}");
        let performances = self.client.fetch_player_performances(player_id).await?;
        Ok(NetworkResponse::PlayerStatsLoaded { player_id, performances })
    }

    async fn handle_load_ratings(&self, match_id: u64) -> Result<NetworkResponse, ApiError> {
        let (match_info, pool, performances) = ratings::load(&self.client, match_id).await?;
        Ok(NetworkResponse::RatingsLoaded { match_info, pool, performances })
    }

    async fn handle_save_ratings(
        &self,
        match_id: u64,
        submissions: Vec<RatingSubmission>,
    ) -> NetworkResponse {
        debug!("saving {} performances for match {match_id}", submissions.len());
        let failed = ratings::save(&self.client, &submissions).await;
        NetworkResponse::RatingsSaved { match_id, failed, total: submissions.len() }
    }

    async fn handle_load_clubs(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading clubs");
        let clubs = self.client.fetch_clubs().await?;
        Ok(NetworkResponse::ClubsLoaded { clubs })
    }

    async fn handle_load_club_dashboard(&self, club_id: u64) -> Result<NetworkResponse, ApiError> {
        debug!("loading dashboard for club {club_id}");
        let dashboard = self.client.fetch_club_dashboard(club_id).await?;
        Ok(NetworkResponse::ClubDashboardLoaded { club_id, dashboard })
    }

    async fn handle_load_competitions(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading competitions");
        let competitions = self.client.fetch_competitions().await?;
        Ok(NetworkResponse::CompetitionsLoaded { competitions })
    }

    async fn handle_load_competition_clubs(
        &self,
        competition_id: u64,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading clubs of competition {competition_id}");
        let clubs = self.client.fetch_competition_clubs(competition_id).await?;
        Ok(NetworkResponse::CompetitionClubsLoaded { competition_id, clubs })
    }

    async fn handle_load_competition_club_stats(
        &self,
        competition_id: u64,
        club_id: u64,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading stats of club {club_id} in competition {competition_id}");
        let stats = self.client.fetch_competition_club_stats(competition_id, club_id).await?;
        Ok(NetworkResponse::CompetitionClubStatsLoaded { competition_id, club_id, stats })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

/// Failures carried inside a response still count as errors for the spinner.
fn is_ok(result: &Result<NetworkResponse, ApiError>) -> bool {
    match result {
        Ok(NetworkResponse::RosterLoaded { result, .. }) => result.is_ok(),
        Ok(NetworkResponse::LineupCommitted { outcome, .. }) => {
            outcome.saved.is_ok() && outcome.reloaded.is_ok()
        }
        Ok(NetworkResponse::RatingsSaved { failed, .. }) => *failed == 0,
        Ok(_) => true,
        Err(_) => false,
    }
}
