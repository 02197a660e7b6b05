use pitchside_api::{Club, ClubDashboard};

#[derive(Debug, Default)]
pub struct ClubsState {
    pub clubs: Vec<Club>,
    pub selected: usize,
    /// Dashboard for the club it was fetched for.
    pub dashboard: Option<(u64, ClubDashboard)>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl ClubsState {
    /// Store the list and return the club whose dashboard should load first.
    pub fn load(&mut self, clubs: Vec<Club>) -> Option<u64> {
        self.clubs = clubs;
        self.selected = self.selected.min(self.clubs.len().saturating_sub(1));
        self.is_loading = false;
        self.last_error = None;
        self.selected_club().map(|c| c.id)
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.clubs.len().saturating_sub(1));
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_club(&self) -> Option<&Club> {
        self.clubs.get(self.selected)
    }

    pub fn on_dashboard_loaded(&mut self, club_id: u64, dashboard: ClubDashboard) {
        self.is_loading = false;
        if self.selected_club().map(|c| c.id) == Some(club_id) {
            self.dashboard = Some((club_id, dashboard));
        }
    }

    /// Only shown while its club is still selected.
    pub fn selected_dashboard(&self) -> Option<&ClubDashboard> {
        let selected = self.selected_club()?.id;
        self.dashboard.as_ref().filter(|(id, _)| *id == selected).map(|(_, d)| d)
    }
}
