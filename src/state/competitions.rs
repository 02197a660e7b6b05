use pitchside_api::{Club, Competition, CompetitionClubStats};

/// Which list j/k moves on the Competitions tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompetitionFocus {
    #[default]
    Competitions,
    Clubs,
}

#[derive(Debug, Default)]
pub struct CompetitionsState {
    pub competitions: Vec<Competition>,
    pub selected: usize,
    pub focus: CompetitionFocus,
    /// Entrants of the competition they were fetched for.
    pub clubs: Option<(u64, Vec<Club>)>,
    pub club_selected: usize,
    /// Stats keyed by (competition, club).
    pub stats: Option<((u64, u64), CompetitionClubStats)>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl CompetitionsState {
    /// Store the list and return the competition whose clubs should load first.
    pub fn load(&mut self, competitions: Vec<Competition>) -> Option<u64> {
        self.competitions = competitions;
        self.selected = self.selected.min(self.competitions.len().saturating_sub(1));
        self.is_loading = false;
        self.last_error = None;
        self.selected_competition().map(|c| c.id)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CompetitionFocus::Competitions => CompetitionFocus::Clubs,
            CompetitionFocus::Clubs => CompetitionFocus::Competitions,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            CompetitionFocus::Competitions => {
                self.selected =
                    (self.selected + 1).min(self.competitions.len().saturating_sub(1));
            }
            CompetitionFocus::Clubs => {
                let len = self.selected_clubs().map_or(0, <[Club]>::len);
                self.club_selected = (self.club_selected + 1).min(len.saturating_sub(1));
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            CompetitionFocus::Competitions => self.selected = self.selected.saturating_sub(1),
            CompetitionFocus::Clubs => self.club_selected = self.club_selected.saturating_sub(1),
        }
    }

    pub fn selected_competition(&self) -> Option<&Competition> {
        self.competitions.get(self.selected)
    }

    /// Entrants, only while they belong to the selected competition.
    pub fn selected_clubs(&self) -> Option<&[Club]> {
        let selected = self.selected_competition()?.id;
        self.clubs.as_ref().filter(|(id, _)| *id == selected).map(|(_, c)| c.as_slice())
    }

    pub fn selected_club(&self) -> Option<&Club> {
        self.selected_clubs()?.get(self.club_selected)
    }

    /// A new competition starts with no club picked and no stats.
    pub fn begin_clubs_load(&mut self) {
        self.is_loading = true;
        self.club_selected = 0;
        self.stats = None;
    }

    pub fn on_clubs_loaded(&mut self, competition_id: u64, clubs: Vec<Club>) {
        self.is_loading = false;
        if self.selected_competition().map(|c| c.id) == Some(competition_id) {
            self.club_selected = 0;
            self.stats = None;
            self.clubs = Some((competition_id, clubs));
        }
    }

    pub fn on_stats_loaded(
        &mut self,
        competition_id: u64,
        club_id: u64,
        stats: CompetitionClubStats,
    ) {
        self.is_loading = false;
        let competition = self.selected_competition().map(|c| c.id);
        let club = self.selected_club().map(|c| c.id);
        if competition.zip(club) == Some((competition_id, club_id)) {
            self.stats = Some(((competition_id, club_id), stats));
        }
    }

    pub fn selected_stats(&self) -> Option<&CompetitionClubStats> {
        let key = (self.selected_competition()?.id, self.selected_club()?.id);
        self.stats.as_ref().filter(|(k, _)| *k == key).map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_api::ClubRecord;

    fn competition(id: u64, name: &str) -> Competition {
        Competition { id, name: name.to_string() }
    }

    fn clubs() -> Vec<Club> {
        vec![Club { id: 1, name: "Tigres".into() }, Club { id: 3, name: "Leões".into() }]
    }

    fn stats(wins: u32) -> CompetitionClubStats {
        CompetitionClubStats {
            record: ClubRecord { games: 2, wins, ..ClubRecord::default() },
            games: vec![],
        }
    }

    #[test]
    fn focus_decides_which_list_moves() {
        let mut state = CompetitionsState::default();
        state.load(vec![competition(5, "Copa"), competition(6, "Liga")]);
        state.on_clubs_loaded(5, clubs());

        state.toggle_focus();
        state.select_next();
        assert_eq!(state.selected_club().map(|c| c.id), Some(3));
        assert_eq!(state.selected_competition().map(|c| c.id), Some(5));

        state.toggle_focus();
        state.select_next();
        assert_eq!(state.selected_competition().map(|c| c.id), Some(6));
        assert!(state.selected_clubs().is_none());
    }

    #[test]
    fn clubs_for_a_competition_no_longer_selected_are_dropped() {
        let mut state = CompetitionsState::default();
        state.load(vec![competition(5, "Copa"), competition(6, "Liga")]);
        state.select_next();
        state.on_clubs_loaded(5, clubs());
        assert!(state.clubs.is_none());
        state.on_clubs_loaded(6, clubs());
        assert_eq!(state.selected_clubs().map(<[Club]>::len), Some(2));
    }

    #[test]
    fn stats_follow_the_selected_club() {
        let mut state = CompetitionsState::default();
        state.load(vec![competition(5, "Copa")]);
        state.on_clubs_loaded(5, clubs());
        state.on_stats_loaded(5, 1, stats(2));
        assert_eq!(state.selected_stats().map(|s| s.record.wins), Some(2));

        state.toggle_focus();
        state.select_next();
        assert!(state.selected_stats().is_none());
        state.on_stats_loaded(5, 1, stats(1));
        assert!(state.selected_stats().is_none());
        state.on_stats_loaded(5, 3, stats(0));
        assert_eq!(state.selected_stats().map(|s| s.record.wins), Some(0));
    }
}
