use pitchside_api::{Performance, Player};

/// Career totals over every recorded performance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub games: usize,
    pub goals: u32,
    pub assists: u32,
    /// Unrated games count as zero.
    pub average: f64,
}

impl PlayerStats {
    pub fn from_performances(performances: &[Performance]) -> Self {
        let games = performances.len();
        let goals = performances.iter().map(|p| p.goals).sum();
        let assists = performances.iter().map(|p| p.assists).sum();
        let total: f64 = performances.iter().filter_map(|p| p.rating).sum();
        let average = if games == 0 { 0.0 } else { total / games as f64 };
        Self { games, goals, assists, average }
    }

    /// One decimal, halves rounded up.
    pub fn average_label(&self) -> String {
        format!("{:.1}", (self.average * 10.0).round() / 10.0)
    }
}

#[derive(Debug, Default)]
pub struct PlayersState {
    pub players: Vec<Player>,
    pub selected: usize,
    /// Stats for the player they were fetched for.
    pub stats: Option<(u64, PlayerStats)>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl PlayersState {
    pub fn load(&mut self, players: Vec<Player>) {
        self.players = players;
        self.selected = self.selected.min(self.players.len().saturating_sub(1));
        self.is_loading = false;
        self.last_error = None;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.players.len().saturating_sub(1));
        self.stats = None;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.stats = None;
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.players.get(self.selected)
    }

    /// Stats arrive asynchronously; ignore them if the selection moved on.
    pub fn on_stats_loaded(&mut self, player_id: u64, performances: &[Performance]) {
        if self.selected_player().map(|p| p.id) == Some(player_id) {
            self.stats = Some((player_id, PlayerStats::from_performances(performances)));
        }
    }

    pub fn selected_stats(&self) -> Option<&PlayerStats> {
        let selected = self.selected_player()?.id;
        self.stats.as_ref().filter(|(id, _)| *id == selected).map(|(_, s)| s)
    }
}
