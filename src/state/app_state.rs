use crate::app::MenuItem;
use crate::state::clubs::ClubsState;
use crate::state::competitions::CompetitionsState;
use crate::state::lineup_view::LineupViewState;
use crate::state::players::PlayersState;
use crate::state::ratings::RatingsState;
use crate::state::roster::RosterStore;
use pitchside_api::Match;

/// Ticks a notice stays on screen (tick is 250ms).
pub const NOTICE_TICKS: u16 = 16;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    ticks_left: u16,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NoticeKind::Info, ticks_left: NOTICE_TICKS }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NoticeKind::Error, ticks_left: NOTICE_TICKS }
    }

    /// Count down one tick. Returns false once the notice has expired.
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left > 0
    }
}

// ---------------------------------------------------------------------------
// Match list
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchesState {
    pub matches: Vec<Match>,
    pub selected: usize,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl MatchesState {
    pub fn load(&mut self, matches: Vec<Match>) {
        self.matches = matches;
        self.selected = self.selected.min(self.matches.len().saturating_sub(1));
        self.is_loading = false;
        self.last_error = None;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.matches.len().saturating_sub(1));
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.matches.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub notice: Option<Notice>,
    pub matches: MatchesState,
    pub roster: RosterStore,
    pub lineup: LineupViewState,
    pub players: PlayersState,
    pub ratings: RatingsState,
    pub clubs: ClubsState,
    pub competitions: CompetitionsState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
