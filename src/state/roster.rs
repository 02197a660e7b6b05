use crate::state::formation::Formation;
use log::{debug, warn};
use pitchside_api::client::{ApiResult, PitchsideApi};
use pitchside_api::{LineupEntry, LineupStatus, Match, Player};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Zone {
    #[default]
    Unassigned,
    Starters,
    Bench,
}

impl Zone {
    pub fn status(self) -> Option<LineupStatus> {
        match self {
            Zone::Unassigned => None,
            Zone::Starters => Some(LineupStatus::Starter),
            Zone::Bench => Some(LineupStatus::Bench),
        }
    }

    pub fn of_status(status: LineupStatus) -> Self {
        match status {
            LineupStatus::Starter => Zone::Starters,
            LineupStatus::Bench => Zone::Bench,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Unassigned => "Available",
            Zone::Starters => "Starters",
            Zone::Bench => "Bench",
        }
    }

    /// Focus order when cycling with Tab: left panel, pitch, right panel.
    pub fn next(self) -> Self {
        match self {
            Zone::Unassigned => Zone::Starters,
            Zone::Starters => Zone::Bench,
            Zone::Bench => Zone::Unassigned,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot + hydration
// ---------------------------------------------------------------------------

/// Everything the lineup board shows for one match, exactly as the server returned it.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub match_info: Match,
    pub pool: Vec<Player>,
    pub entries: Vec<LineupEntry>,
}

/// A lineup entry with its player resolved against the loaded pool.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedEntry {
    pub entry_id: u64,
    pub status: LineupStatus,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub player: Player,
}

impl HydratedEntry {
    pub fn zone(&self) -> Zone {
        Zone::of_status(self.status)
    }
}

/// Resolve each entry's player id. Ids missing from the pool become a placeholder
/// player and are logged, since the pool and the entries should always agree.
pub fn hydrate(pool: &[Player], entries: &[LineupEntry]) -> Vec<HydratedEntry> {
    let by_id: HashMap<u64, &Player> = pool.iter().map(|p| (p.id, p)).collect();
    entries
        .iter()
        .map(|entry| {
            let player = match by_id.get(&entry.player_id) {
                Some(player) => (*player).clone(),
                None => {
                    warn!(
                        "lineup entry {} references player {} missing from the pool",
                        entry.id, entry.player_id
                    );
                    Player::unknown(entry.player_id)
                }
            };
            HydratedEntry {
                entry_id: entry.id,
                status: entry.status,
                x: entry.x,
                y: entry.y,
                player,
            }
        })
        .collect()
}

/// Fetch match detail, player pool and lineup entries concurrently.
pub async fn load(api: &PitchsideApi, match_id: u64) -> ApiResult<RosterSnapshot> {
    debug!("loading roster for match {match_id}");
    let (match_info, pool, entries) = tokio::try_join!(
        api.fetch_match(match_id),
        api.fetch_players(),
        api.fetch_lineup(match_id),
    )?;
    Ok(RosterSnapshot { match_info, pool, entries })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Identifies one load request. Results whose ticket is no longer current are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub match_id: u64,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct RosterStore {
    current: Option<LoadTicket>,
    generation: u64,
    snapshot: Option<RosterSnapshot>,
    hydrated: Vec<HydratedEntry>,
    formation: Option<Formation>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl RosterStore {
    /// Issue a ticket for a fresh load of `match_id`. Switching to another match
    /// drops the old snapshot so it is never shown under the new match's header.
    pub fn begin_load(&mut self, match_id: u64) -> LoadTicket {
        if self.match_id() != Some(match_id) {
            self.snapshot = None;
            self.hydrated.clear();
            self.formation = None;
        }
        self.generation += 1;
        let ticket = LoadTicket { match_id, generation: self.generation };
        self.current = Some(ticket);
        self.is_loading = true;
        self.last_error = None;
        ticket
    }

    /// Apply a load result. Returns false when the result was stale and discarded.
    /// A failed load keeps the previous snapshot untouched.
    pub fn apply(&mut self, ticket: LoadTicket, result: Result<RosterSnapshot, String>) -> bool {
        if self.current != Some(ticket) {
            debug!(
                "discarding stale roster load for match {} (generation {})",
                ticket.match_id, ticket.generation
            );
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(snapshot) => {
                self.hydrated = hydrate(&snapshot.pool, &snapshot.entries);
                self.formation = Some(Formation::from_starters(&self.hydrated));
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(message) => {
                self.last_error = Some(message);
            }
        }
        true
    }

    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.current
    }

    pub fn match_id(&self) -> Option<u64> {
        self.current.map(|t| t.match_id)
    }

    pub fn snapshot(&self) -> Option<&RosterSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn match_info(&self) -> Option<&Match> {
        self.snapshot.as_ref().map(|s| &s.match_info)
    }

    pub fn formation(&self) -> Option<Formation> {
        self.formation
    }

    pub fn starters(&self) -> Vec<&HydratedEntry> {
        self.in_status(LineupStatus::Starter)
    }

    pub fn bench(&self) -> Vec<&HydratedEntry> {
        self.in_status(LineupStatus::Bench)
    }

    /// Pool players with no lineup entry for this match.
    pub fn unassigned(&self) -> Vec<&Player> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let assigned: HashSet<u64> = self.hydrated.iter().map(|e| e.player.id).collect();
        snapshot
            .pool
            .iter()
            .filter(|p| !assigned.contains(&p.id))
            .collect()
    }

    pub fn count(&self, zone: Zone) -> usize {
        match zone.status() {
            Some(status) => self.hydrated.iter().filter(|e| e.status == status).count(),
            None => self.unassigned().len(),
        }
    }

    pub fn entry_for_player(&self, player_id: u64) -> Option<&HydratedEntry> {
        self.hydrated.iter().find(|e| e.player.id == player_id)
    }

    /// Zone the player currently sits in, or None if they are not in the pool or lineup.
    pub fn zone_of(&self, player_id: u64) -> Option<Zone> {
        if let Some(entry) = self.entry_for_player(player_id) {
            return Some(entry.zone());
        }
        self.snapshot
            .as_ref()?
            .pool
            .iter()
            .any(|p| p.id == player_id)
            .then_some(Zone::Unassigned)
    }

    fn in_status(&self, status: LineupStatus) -> Vec<&HydratedEntry> {
        self.hydrated.iter().filter(|e| e.status == status).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pitchside_api::Club;

    pub(crate) fn player(id: u64, name: &str, position: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            position: position.to_string(),
            photo: None,
            club_id: Some(1),
        }
    }

    pub(crate) fn entry(
        id: u64,
        player_id: u64,
        status: LineupStatus,
        y: Option<f64>,
    ) -> LineupEntry {
        LineupEntry {
            id,
            match_id: 7,
            club_id: Some(1),
            player_id,
            status,
            x: y.map(|_| 50.0),
            y,
        }
    }

    pub(crate) fn snapshot(pool: Vec<Player>, entries: Vec<LineupEntry>) -> RosterSnapshot {
        RosterSnapshot {
            match_info: Match {
                id: 7,
                home: Club { id: 1, name: "Tigres".into() },
                away: Club { id: 3, name: "Leões".into() },
                ..Match::default()
            },
            pool,
            entries,
        }
    }

    #[test]
    fn hydration_resolves_players_from_pool() {
        let pool = vec![player(1, "Rafael", "Goalkeeper")];
        let hydrated = hydrate(&pool, &[entry(10, 1, LineupStatus::Starter, Some(95.0))]);
        assert_eq!(hydrated[0].player.name, "Rafael");
        assert_eq!(hydrated[0].entry_id, 10);
    }

    #[test]
    fn hydration_falls_back_to_unknown_player() {
        let hydrated = hydrate(&[], &[entry(10, 42, LineupStatus::Bench, None)]);
        assert_eq!(hydrated[0].player.id, 42);
        assert_eq!(hydrated[0].player.name, "Unknown");
        assert_eq!(hydrated[0].player.position, "?");
    }

    #[test]
    fn hydration_is_idempotent() {
        let pool = vec![player(1, "Rafael", "Goalkeeper"), player(2, "Bruno", "Forward")];
        let entries = vec![
            entry(10, 1, LineupStatus::Starter, Some(95.0)),
            entry(11, 2, LineupStatus::Bench, None),
        ];
        assert_eq!(hydrate(&pool, &entries), hydrate(&pool, &entries));
    }

    #[test]
    fn unassigned_is_pool_minus_lineup() {
        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        let pool = vec![
            player(1, "Rafael", "Goalkeeper"),
            player(2, "Bruno", "Forward"),
            player(3, "Caio", "Defender"),
        ];
        let entries = vec![
            entry(10, 1, LineupStatus::Starter, Some(95.0)),
            entry(11, 3, LineupStatus::Bench, None),
        ];
        assert!(store.apply(ticket, Ok(snapshot(pool, entries))));

        let unassigned: Vec<u64> = store.unassigned().iter().map(|p| p.id).collect();
        assert_eq!(unassigned, vec![2]);
        assert_eq!(store.count(Zone::Starters), 1);
        assert_eq!(store.count(Zone::Bench), 1);
        assert_eq!(store.count(Zone::Unassigned), 1);
        assert_eq!(store.zone_of(2), Some(Zone::Unassigned));
        assert_eq!(store.zone_of(3), Some(Zone::Bench));
        assert_eq!(store.zone_of(99), None);
    }

    #[test]
    fn formation_is_unknown_until_first_load() {
        let mut store = RosterStore::default();
        assert_eq!(store.formation(), None);
        let ticket = store.begin_load(7);
        let pool = vec![player(2, "Bruno", "Forward")];
        let entries = vec![entry(10, 2, LineupStatus::Starter, Some(10.0))];
        store.apply(ticket, Ok(snapshot(pool, entries)));
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-1"));
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        let pool = vec![player(2, "Bruno", "Forward")];
        let entries = vec![entry(10, 2, LineupStatus::Starter, Some(10.0))];
        store.apply(ticket, Ok(snapshot(pool, entries)));

        let retry = store.begin_load(7);
        assert!(store.is_loading);
        assert!(store.apply(retry, Err("boom".into())));
        assert!(!store.is_loading);
        assert_eq!(store.last_error.as_deref(), Some("boom"));
        assert_eq!(store.starters().len(), 1);
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-1"));
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut store = RosterStore::default();
        let first = store.begin_load(7);
        let second = store.begin_load(8);

        let late = snapshot(vec![player(1, "Rafael", "Goalkeeper")], vec![]);
        assert!(!store.apply(first, Ok(late)));
        assert!(store.snapshot().is_none());
        assert!(store.is_loading);

        let mut fresh = snapshot(vec![player(2, "Bruno", "Forward")], vec![]);
        fresh.match_info.id = 8;
        assert!(store.apply(second, Ok(fresh)));
        assert_eq!(store.match_info().map(|m| m.id), Some(8));
    }

    #[test]
    fn switching_match_clears_old_snapshot() {
        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        store.apply(ticket, Ok(snapshot(vec![player(1, "Rafael", "Goalkeeper")], vec![])));
        store.begin_load(8);
        assert!(store.snapshot().is_none());
        assert_eq!(store.formation(), None);
    }

    #[tokio::test]
    async fn load_reads_match_pool_and_lineup() {
        let mut server = mockito::Server::new_async().await;
        let match_mock = server
            .mock("GET", "/matches/7/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 7, "home": {"id": 1, "name": "Tigres"},
                    "away": {"id": 3, "name": "Leões"}}"#,
            )
            .create_async()
            .await;
        let players_mock = server
            .mock("GET", "/players/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 2, "name": "Bruno", "position": "Forward", "club": 1}]"#)
            .create_async()
            .await;
        let lineup_mock = server
            .mock("GET", "/lineup-entries/")
            .match_query(mockito::Matcher::UrlEncoded("match".into(), "7".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 10, "match": 7, "club": 1, "player": 2, "status": "STARTER",
                     "x": 50, "y": 20}]"#,
            )
            .create_async()
            .await;

        let api = PitchsideApi::new(server.url());
        let snapshot = load(&api, 7).await.unwrap();
        match_mock.assert_async().await;
        players_mock.assert_async().await;
        lineup_mock.assert_async().await;

        assert_eq!(snapshot.match_info.title(), "Tigres vs Leões");
        assert_eq!(snapshot.pool.len(), 1);
        assert_eq!(snapshot.entries[0].y, Some(20.0));
    }

    #[tokio::test]
    async fn load_fails_when_any_read_fails() {
        let mut server = mockito::Server::new_async().await;
        let _match_mock = server
            .mock("GET", "/matches/7/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 7, "home": 1, "away": 3}"#)
            .create_async()
            .await;
        let _players_mock = server
            .mock("GET", "/players/")
            .with_status(503)
            .create_async()
            .await;
        let _lineup_mock = server
            .mock("GET", "/lineup-entries/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let api = PitchsideApi::new(server.url());
        assert!(load(&api, 7).await.is_err());
    }
}
