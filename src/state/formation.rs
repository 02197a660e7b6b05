use crate::state::roster::HydratedEntry;
use pitchside_api::LineupStatus;
use std::fmt;

/// Upper bounds (exclusive) of the vertical bands, measured from the attacking edge.
pub const ATTACK_LIMIT: f64 = 35.0;
pub const MIDFIELD_LIMIT: f64 = 65.0;
pub const DEFENSE_LIMIT: f64 = 90.0;

/// Label shown before any match data has been loaded.
pub const UNKNOWN_FORMATION: &str = "?-?-?";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub attackers: usize,
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.attackers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Attack,
    Midfield,
    Defense,
    GoalkeeperArea,
}

impl Band {
    /// Half-open bands, lower bound inclusive.
    pub fn of(y: f64) -> Self {
        if y < ATTACK_LIMIT {
            Band::Attack
        } else if y < MIDFIELD_LIMIT {
            Band::Midfield
        } else if y < DEFENSE_LIMIT {
            Band::Defense
        } else {
            Band::GoalkeeperArea
        }
    }
}

impl Formation {
    /// Count outfield starters per band. Goalkeepers, unplaced starters and anyone
    /// standing in the goalkeeper area are left out.
    pub fn from_starters<'a>(entries: impl IntoIterator<Item = &'a HydratedEntry>) -> Self {
        let mut formation = Formation::default();
        for entry in entries {
            if entry.status != LineupStatus::Starter || entry.player.is_goalkeeper() {
                continue;
            }
            let Some(y) = entry.y else {
                continue;
            };
            match Band::of(y) {
                Band::Attack => formation.attackers += 1,
                Band::Midfield => formation.midfielders += 1,
                Band::Defense => formation.defenders += 1,
                Band::GoalkeeperArea => {}
            }
        }
        formation
    }
}

/// Display label for an optional formation (`"?-?-?"` until data is loaded).
pub fn label(formation: Option<Formation>) -> String {
    formation
        .map(|f| f.to_string())
        .unwrap_or_else(|| UNKNOWN_FORMATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_api::Player;

    fn starter(id: u64, position: &str, y: Option<f64>) -> HydratedEntry {
        HydratedEntry {
            entry_id: id,
            status: LineupStatus::Starter,
            x: y.map(|_| 50.0),
            y,
            player: Player {
                id,
                name: format!("Player {id}"),
                position: position.to_string(),
                ..Player::default()
            },
        }
    }

    #[test]
    fn empty_lineup_is_zero_formation() {
        assert_eq!(Formation::from_starters(&[]).to_string(), "0-0-0");
    }

    #[test]
    fn unknown_label_before_load() {
        assert_eq!(label(None), "?-?-?");
        assert_eq!(label(Some(Formation::default())), "0-0-0");
    }

    #[test]
    fn classic_four_four_two() {
        let mut lineup = vec![starter(1, "Goalkeeper", Some(95.0))];
        lineup.extend((2..=5).map(|id| starter(id, "Defender", Some(75.0))));
        lineup.extend((6..=9).map(|id| starter(id, "Midfielder", Some(50.0))));
        lineup.extend((10..=11).map(|id| starter(id, "Forward", Some(20.0))));
        assert_eq!(Formation::from_starters(&lineup).to_string(), "4-4-2");
    }

    #[test]
    fn band_boundaries_are_lower_inclusive() {
        assert_eq!(Band::of(34.999), Band::Attack);
        assert_eq!(Band::of(35.0), Band::Midfield);
        assert_eq!(Band::of(65.0), Band::Defense);
        assert_eq!(Band::of(90.0), Band::GoalkeeperArea);
        assert_eq!(Band::of(0.0), Band::Attack);
        assert_eq!(Band::of(100.0), Band::GoalkeeperArea);
    }

    #[test]
    fn boundary_players_land_in_upper_band() {
        let lineup = vec![
            starter(1, "Midfielder", Some(35.0)),
            starter(2, "Defender", Some(65.0)),
            starter(3, "Defender", Some(90.0)),
        ];
        assert_eq!(Formation::from_starters(&lineup).to_string(), "1-1-0");
    }

    #[test]
    fn goalkeeper_never_counts_even_upfield() {
        let lineup = vec![
            starter(1, "Goalkeeper", Some(95.0)),
            starter(2, "Goalkeeper", Some(10.0)),
        ];
        assert_eq!(Formation::from_starters(&lineup), Formation::default());
    }

    #[test]
    fn outfield_player_in_goalkeeper_area_is_ignored() {
        let lineup = vec![starter(1, "Defender", Some(92.0))];
        assert_eq!(Formation::from_starters(&lineup).to_string(), "0-0-0");
    }

    #[test]
    fn unplaced_starters_are_ignored() {
        let lineup = vec![starter(1, "Forward", None), starter(2, "Forward", Some(10.0))];
        assert_eq!(Formation::from_starters(&lineup).to_string(), "0-0-1");
    }

    #[test]
    fn bench_entries_are_ignored() {
        let mut bench = starter(1, "Forward", Some(10.0));
        bench.status = LineupStatus::Bench;
        assert_eq!(Formation::from_starters(&[bench]).to_string(), "0-0-0");
    }

    #[test]
    fn same_input_same_label() {
        let lineup = vec![
            starter(1, "Defender", Some(80.0)),
            starter(2, "Midfielder", Some(40.0)),
            starter(3, "Forward", Some(5.0)),
        ];
        let first = Formation::from_starters(&lineup);
        let second = Formation::from_starters(&lineup);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "1-1-1");
    }
}
