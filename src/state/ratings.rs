use log::{debug, error};
use pitchside_api::client::{ApiResult, PitchsideApi};
use pitchside_api::{Match, Performance, PerformanceForm, Player};
use std::collections::HashMap;

pub const MAX_RATING: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingField {
    #[default]
    Rating,
    Goals,
    Assists,
}

impl RatingField {
    pub fn next(self) -> Self {
        match self {
            RatingField::Rating => RatingField::Goals,
            RatingField::Goals => RatingField::Assists,
            RatingField::Assists => RatingField::Rating,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingField::Rating => "Rating",
            RatingField::Goals => "Goals",
            RatingField::Assists => "Assists",
        }
    }
}

/// One editable line of the rating sheet. Values are kept as typed until saved.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub player: Player,
    pub performance_id: Option<u64>,
    pub rating: String,
    pub goals: String,
    pub assists: String,
    pub dirty: bool,
}

impl RatingRow {
    fn new(player: Player, existing: Option<&Performance>) -> Self {
        let (performance_id, rating, goals, assists) = match existing {
            Some(p) => (
                Some(p.id),
                p.rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
                p.goals.to_string(),
                p.assists.to_string(),
            ),
            None => (None, String::new(), String::new(), String::new()),
        };
        Self { player, performance_id, rating, goals, assists, dirty: false }
    }

    pub fn value(&self, field: RatingField) -> &str {
        match field {
            RatingField::Rating => &self.rating,
            RatingField::Goals => &self.goals,
            RatingField::Assists => &self.assists,
        }
    }

    fn value_mut(&mut self, field: RatingField) -> &mut String {
        match field {
            RatingField::Rating => &mut self.rating,
            RatingField::Goals => &mut self.goals,
            RatingField::Assists => &mut self.assists,
        }
    }

    /// Validated request body. Empty goals/assists count as zero, an empty rating is sent as null.
    pub fn form(&self, match_id: u64) -> Result<PerformanceForm, String> {
        let rating = match self.rating.trim() {
            "" => None,
            raw => {
                let value: f64 = raw
                    .parse()
                    .map_err(|_| format!("{}: rating '{raw}' is not a number", self.player.name))?;
                if !(0.0..=MAX_RATING).contains(&value) {
                    return Err(format!("{}: rating must be between 0 and 10", self.player.name));
                }
                Some((value * 10.0).round() / 10.0)
            }
        };
        Ok(PerformanceForm {
            match_id,
            player: self.player.id,
            rating,
            goals: parse_count(&self.goals, &self.player.name, "goals")?,
            assists: parse_count(&self.assists, &self.player.name, "assists")?,
        })
    }
}

fn parse_count(raw: &str, name: &str, what: &str) -> Result<u32, String> {
    match raw.trim() {
        "" => Ok(0),
        raw => raw.parse().map_err(|_| format!("{name}: {what} '{raw}' is not a whole number")),
    }
}

/// A single POST (no performance yet) or PATCH.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSubmission {
    pub performance_id: Option<u64>,
    pub form: PerformanceForm,
}

#[derive(Debug, Default)]
pub struct RatingsState {
    pub match_info: Option<Match>,
    pub rows: Vec<RatingRow>,
    pub selected: usize,
    pub field: RatingField,
    pub editing: bool,
    pub is_loading: bool,
    pub is_saving: bool,
    pub last_error: Option<String>,
}

impl RatingsState {
    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    /// One row per pool player, pre-filled from any performance already recorded.
    pub fn load(&mut self, match_info: Match, pool: Vec<Player>, performances: Vec<Performance>) {
        let by_player: HashMap<u64, &Performance> =
            performances.iter().map(|p| (p.player_id, p)).collect();
        self.rows = pool
            .into_iter()
            .map(|player| {
                let existing = by_player.get(&player.id).copied();
                RatingRow::new(player, existing)
            })
            .collect();
        self.match_info = Some(match_info);
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.editing = false;
        self.is_loading = false;
    }

    pub fn match_id(&self) -> Option<u64> {
        self.match_info.as_ref().map(|m| m.id)
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.rows.len().saturating_sub(1));
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.field;
        let accepted = match field {
            RatingField::Rating => c.is_ascii_digit() || c == '.',
            RatingField::Goals | RatingField::Assists => c.is_ascii_digit(),
        };
        if !accepted {
            return;
        }
        if let Some(row) = self.rows.get_mut(self.selected) {
            row.value_mut(field).push(c);
            row.dirty = true;
        }
    }

    pub fn pop_char(&mut self) {
        let field = self.field;
        if let Some(row) = self.rows.get_mut(self.selected)
            && row.value_mut(field).pop().is_some()
        {
            row.dirty = true;
        }
    }

    pub fn dirty_count(&self) -> usize {
        self.rows.iter().filter(|r| r.dirty).count()
    }

    /// Requests for every edited row, or the first validation error.
    pub fn submissions(&self) -> Result<Vec<RatingSubmission>, String> {
        let match_id = self.match_id().ok_or_else(|| "No match selected".to_string())?;
        self.rows
            .iter()
            .filter(|r| r.dirty)
            .map(|r| {
                Ok(RatingSubmission {
                    performance_id: r.performance_id,
                    form: r.form(match_id)?,
                })
            })
            .collect()
    }
}

/// Match header, player pool and the match's recorded performances.
pub async fn load(
    api: &PitchsideApi,
    match_id: u64,
) -> ApiResult<(Match, Vec<Player>, Vec<Performance>)> {
    debug!("loading rating sheet for match {match_id}");
    tokio::try_join!(
        api.fetch_match(match_id),
        api.fetch_players(),
        api.fetch_match_performances(match_id),
    )
}

/// Send all submissions concurrently. Returns how many failed.
pub async fn save(api: &PitchsideApi, submissions: &[RatingSubmission]) -> usize {
    let calls = submissions.iter().map(|s| async move {
        match s.performance_id {
            Some(id) => api.update_performance(id, &s.form).await,
            None => api.create_performance(&s.form).await,
        }
    });
    let mut failed = 0;
    for err in futures_util::future::join_all(calls).await.into_iter().filter_map(Result::err) {
        error!("saving performance failed: {err}");
        failed += 1;
    }
    failed
}
