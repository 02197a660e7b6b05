use crate::state::roster::{self, RosterSnapshot, Zone};
use log::{debug, error};
use pitchside_api::client::{ApiResult, PitchsideApi};
use pitchside_api::{LineupPatch, NewLineupEntry, Player};

pub const MAX_STARTERS: usize = 11;
pub const MAX_BENCH: usize = 6;

/// A drag in progress: who is being moved and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub player: Player,
    pub origin: Zone,
    pub entry_id: Option<u64>,
}

/// Pointer position in screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    /// Centre of a terminal cell.
    pub fn from_cell(column: u16, row: u16) -> Self {
        Self {
            x: f64::from(column) + 0.5,
            y: f64::from(row) + 0.5,
        }
    }
}

/// Bounding box of the drawn pitch, in the same units as [`Pointer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PitchBounds {
    /// Normalize a pointer position to `[0, 100] x [0, 100]`, 0 being the top-left corner.
    pub fn normalize(&self, pointer: Pointer) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = (100.0 * (pointer.x - self.left) / self.width).clamp(0.0, 100.0);
        let y = (100.0 * (pointer.y - self.top) / self.height).clamp(0.0, 100.0);
        Some((x, y))
    }
}

/// Where a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub zone: Zone,
    /// None for keyboard moves.
    pub pointer: Option<Pointer>,
    /// None until the pitch has been drawn at least once.
    pub pitch: Option<PitchBounds>,
}

/// What the board looks like at drop time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardContext {
    pub match_id: u64,
    /// Club used for new entries when the player has none on record.
    pub fallback_club: u64,
    pub starters: usize,
    pub bench: usize,
}

impl BoardContext {
    pub fn from_snapshot(snapshot: &RosterSnapshot, starters: usize, bench: usize) -> Self {
        Self {
            match_id: snapshot.match_info.id,
            fallback_club: snapshot.match_info.home.id,
            starters,
            bench,
        }
    }
}

/// The single persistence call a gesture resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum LineupMutation {
    Create(NewLineupEntry),
    Update { entry_id: u64, patch: LineupPatch },
    Delete { entry_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejected {
    ZoneFull(Zone),
    /// Dropped onto the unassigned zone with no entry to remove.
    NothingToRemove,
    /// Player sits in a lineup zone but the gesture carries no entry id.
    MissingEntry,
}

impl PlacementRejected {
    pub fn notice(&self) -> String {
        match self {
            PlacementRejected::ZoneFull(Zone::Starters) => {
                format!("Squad full: {MAX_STARTERS} starters already on the pitch.")
            }
            PlacementRejected::ZoneFull(Zone::Bench) => {
                format!("Bench full: {MAX_BENCH} substitutes already selected.")
            }
            PlacementRejected::ZoneFull(Zone::Unassigned) => "Zone full.".to_string(),
            PlacementRejected::NothingToRemove => "Player is not in the lineup.".to_string(),
            PlacementRejected::MissingEntry => {
                "Lineup entry not found, reload with r.".to_string()
            }
        }
    }
}

/// Turn a finished gesture into exactly one persistence call, or reject it
/// without touching the server.
pub fn plan(
    gesture: &Gesture,
    target: &DropTarget,
    board: &BoardContext,
) -> Result<LineupMutation, PlacementRejected> {
    let coordinates = match target.zone {
        Zone::Starters => target
            .pitch
            .zip(target.pointer)
            .and_then(|(pitch, pointer)| pitch.normalize(pointer)),
        _ => None,
    };

    if target.zone != gesture.origin {
        let full = match target.zone {
            Zone::Starters => board.starters >= MAX_STARTERS,
            Zone::Bench => board.bench >= MAX_BENCH,
            Zone::Unassigned => false,
        };
        if full {
            return Err(PlacementRejected::ZoneFull(target.zone));
        }
    }

    let Some(status) = target.zone.status() else {
        return match gesture.entry_id {
            Some(entry_id) if gesture.origin != Zone::Unassigned => {
                Ok(LineupMutation::Delete { entry_id })
            }
            _ => Err(PlacementRejected::NothingToRemove),
        };
    };

    let (x, y) = match coordinates {
        Some((x, y)) => (Some(x), Some(y)),
        None => (None, None),
    };

    if gesture.origin == Zone::Unassigned {
        return Ok(LineupMutation::Create(NewLineupEntry {
            match_id: board.match_id,
            club: gesture.player.club_id.unwrap_or(board.fallback_club),
            player: gesture.player.id,
            status,
            x,
            y,
        }));
    }

    let entry_id = gesture.entry_id.ok_or(PlacementRejected::MissingEntry)?;
    Ok(LineupMutation::Update {
        entry_id,
        patch: LineupPatch { status: Some(status), x, y },
    })
}

/// Result of a committed gesture: the write, then the reload that always follows it.
#[derive(Debug)]
pub struct CommitOutcome {
    pub saved: Result<(), String>,
    pub reloaded: Result<RosterSnapshot, String>,
}

pub async fn execute(api: &PitchsideApi, mutation: &LineupMutation) -> ApiResult<()> {
    match mutation {
        LineupMutation::Create(entry) => api.create_lineup_entry(entry).await,
        LineupMutation::Update { entry_id, patch } => {
            api.update_lineup_entry(*entry_id, patch).await
        }
        LineupMutation::Delete { entry_id } => api.delete_lineup_entry(*entry_id).await,
    }
}

/// Perform the write and then reload the whole roster, whatever the write's outcome,
/// so the board always ends up showing the server's state.
pub async fn commit(
    api: &PitchsideApi,
    match_id: u64,
    mutation: &LineupMutation,
) -> CommitOutcome {
    debug!("committing lineup change for match {match_id}: {mutation:?}");
    let saved = execute(api, mutation).await.map_err(|e| {
        error!("lineup change failed: {e}");
        e.to_string()
    });
    let reloaded = roster::load(api, match_id).await.map_err(|e| e.to_string());
    CommitOutcome { saved, reloaded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::formation::Formation;
    use crate::state::roster::RosterStore;
    use crate::state::roster::tests::{entry, player, snapshot};
    use pitchside_api::{LineupEntry, LineupStatus};

    const PITCH: PitchBounds = PitchBounds { left: 10.0, top: 4.0, width: 40.0, height: 20.0 };

    fn board(starters: usize, bench: usize) -> BoardContext {
        BoardContext { match_id: 7, fallback_club: 1, starters, bench }
    }

    fn gesture(origin: Zone, entry_id: Option<u64>) -> Gesture {
        Gesture { player: player(2, "Bruno", "Forward"), origin, entry_id }
    }

    fn drop_on(zone: Zone) -> DropTarget {
        DropTarget { zone, pointer: None, pitch: None }
    }

    fn drop_on_pitch(fx: f64, fy: f64) -> DropTarget {
        DropTarget {
            zone: Zone::Starters,
            pointer: Some(Pointer {
                x: PITCH.left + fx * PITCH.width,
                y: PITCH.top + fy * PITCH.height,
            }),
            pitch: Some(PITCH),
        }
    }

    #[test]
    fn normalize_maps_relative_position() {
        let (x, y) = PITCH.normalize(Pointer { x: 18.0, y: 6.0 }).unwrap();
        assert!((x - 20.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_clamps_outside_pointer() {
        let (x, y) = PITCH.normalize(Pointer { x: 0.0, y: 100.0 }).unwrap();
        assert_eq!((x, y), (0.0, 100.0));
    }

    #[test]
    fn normalize_rejects_degenerate_pitch() {
        let flat = PitchBounds { height: 0.0, ..PITCH };
        assert_eq!(flat.normalize(Pointer { x: 12.0, y: 4.0 }), None);
    }

    #[test]
    fn unassigned_to_pitch_creates_positioned_starter() {
        let mutation =
            plan(&gesture(Zone::Unassigned, None), &drop_on_pitch(0.2, 0.1), &board(0, 0)).unwrap();
        let LineupMutation::Create(created) = mutation else {
            panic!("expected create, got {mutation:?}");
        };
        assert_eq!(created.status, LineupStatus::Starter);
        assert_eq!(created.player, 2);
        assert_eq!(created.match_id, 7);
        assert_eq!(created.club, 1);
        assert!((created.x.unwrap() - 20.0).abs() < 1e-9);
        assert!((created.y.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn created_forward_counts_as_attacker() {
        let LineupMutation::Create(created) =
            plan(&gesture(Zone::Unassigned, None), &drop_on_pitch(0.2, 0.1), &board(0, 0)).unwrap()
        else {
            panic!("expected create");
        };
        let server_entry = LineupEntry {
            id: 60,
            match_id: created.match_id,
            club_id: Some(created.club),
            player_id: created.player,
            status: created.status,
            x: created.x,
            y: created.y,
        };
        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        store.apply(ticket, Ok(snapshot(vec![player(2, "Bruno", "Forward")], vec![server_entry])));
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-1"));
    }

    #[test]
    fn goalkeeper_deep_in_own_half_adds_nothing() {
        let keeper = Gesture {
            player: player(1, "Rafael", "Goalkeeper"),
            origin: Zone::Unassigned,
            entry_id: None,
        };
        let LineupMutation::Create(created) =
            plan(&keeper, &drop_on_pitch(0.5, 0.95), &board(0, 0)).unwrap()
        else {
            panic!("expected create");
        };
        assert!((created.y.unwrap() - 95.0).abs() < 1e-9);

        let hydrated = roster::hydrate(
            &[player(1, "Rafael", "Goalkeeper")],
            &[entry(10, 1, LineupStatus::Starter, created.y)],
        );
        assert_eq!(Formation::from_starters(&hydrated), Formation::default());
    }

    #[test]
    fn pitch_drop_without_bounds_omits_coordinates() {
        let target = DropTarget {
            zone: Zone::Starters,
            pointer: Some(Pointer { x: 1.0, y: 1.0 }),
            pitch: None,
        };
        let LineupMutation::Create(created) =
            plan(&gesture(Zone::Unassigned, None), &target, &board(0, 0)).unwrap()
        else {
            panic!("expected create");
        };
        assert_eq!((created.x, created.y), (None, None));
    }

    #[test]
    fn unassigned_to_bench_creates_without_coordinates() {
        let mutation =
            plan(&gesture(Zone::Unassigned, None), &drop_on(Zone::Bench), &board(0, 0)).unwrap();
        assert_eq!(
            mutation,
            LineupMutation::Create(NewLineupEntry {
                match_id: 7,
                club: 1,
                player: 2,
                status: LineupStatus::Bench,
                x: None,
                y: None,
            })
        );
    }

    #[test]
    fn player_without_club_uses_home_club() {
        let mut g = gesture(Zone::Unassigned, None);
        g.player.club_id = None;
        let board = BoardContext { fallback_club: 9, ..board(0, 0) };
        let LineupMutation::Create(created) = plan(&g, &drop_on(Zone::Bench), &board).unwrap()
        else {
            panic!("expected create");
        };
        assert_eq!(created.club, 9);
    }

    #[test]
    fn starter_to_bench_updates_status_and_drops_coordinates() {
        let mutation =
            plan(&gesture(Zone::Starters, Some(60)), &drop_on(Zone::Bench), &board(11, 0)).unwrap();
        assert_eq!(
            mutation,
            LineupMutation::Update {
                entry_id: 60,
                patch: LineupPatch { status: Some(LineupStatus::Bench), x: None, y: None },
            }
        );
    }

    #[test]
    fn repositioning_on_full_pitch_is_allowed() {
        let mutation =
            plan(&gesture(Zone::Starters, Some(60)), &drop_on_pitch(0.5, 0.5), &board(11, 6))
                .unwrap();
        let LineupMutation::Update { entry_id, patch } = mutation else {
            panic!("expected update");
        };
        assert_eq!(entry_id, 60);
        assert_eq!(patch.status, Some(LineupStatus::Starter));
        assert!((patch.x.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn same_zone_bench_drop_is_redundant_update() {
        let mutation =
            plan(&gesture(Zone::Bench, Some(61)), &drop_on(Zone::Bench), &board(0, 6)).unwrap();
        assert_eq!(
            mutation,
            LineupMutation::Update {
                entry_id: 61,
                patch: LineupPatch { status: Some(LineupStatus::Bench), ..LineupPatch::default() },
            }
        );
    }

    #[test]
    fn full_pitch_rejects_newcomers() {
        let err = plan(&gesture(Zone::Unassigned, None), &drop_on_pitch(0.5, 0.5), &board(11, 0))
            .unwrap_err();
        assert_eq!(err, PlacementRejected::ZoneFull(Zone::Starters));
        let err = plan(&gesture(Zone::Bench, Some(61)), &drop_on_pitch(0.5, 0.5), &board(11, 3))
            .unwrap_err();
        assert_eq!(err, PlacementRejected::ZoneFull(Zone::Starters));
    }

    #[test]
    fn full_bench_rejects_newcomers() {
        let err = plan(&gesture(Zone::Starters, Some(60)), &drop_on(Zone::Bench), &board(5, 6))
            .unwrap_err();
        assert_eq!(err, PlacementRejected::ZoneFull(Zone::Bench));
        assert!(err.notice().contains("Bench full"));
    }

    #[test]
    fn back_to_unassigned_deletes_entry() {
        let mutation =
            plan(&gesture(Zone::Starters, Some(60)), &drop_on(Zone::Unassigned), &board(11, 6))
                .unwrap();
        assert_eq!(mutation, LineupMutation::Delete { entry_id: 60 });
    }

    #[test]
    fn unassigned_to_unassigned_is_guarded() {
        let err = plan(&gesture(Zone::Unassigned, None), &drop_on(Zone::Unassigned), &board(0, 0))
            .unwrap_err();
        assert_eq!(err, PlacementRejected::NothingToRemove);
    }

    #[test]
    fn lineup_player_without_entry_id_is_rejected() {
        let err =
            plan(&gesture(Zone::Bench, None), &drop_on(Zone::Starters), &board(0, 1)).unwrap_err();
        assert_eq!(err, PlacementRejected::MissingEntry);
    }

    /// In-memory stand-in for the backend, applying mutations the way the REST API would.
    fn apply(entries: &mut Vec<LineupEntry>, next_id: &mut u64, mutation: LineupMutation) {
        match mutation {
            LineupMutation::Create(new) => {
                assert!(entries.iter().all(|e| e.player_id != new.player), "duplicate entry");
                *next_id += 1;
                entries.push(LineupEntry {
                    id: *next_id,
                    match_id: new.match_id,
                    club_id: Some(new.club),
                    player_id: new.player,
                    status: new.status,
                    x: new.x,
                    y: new.y,
                });
            }
            LineupMutation::Update { entry_id, patch } => {
                let e = entries.iter_mut().find(|e| e.id == entry_id).expect("entry exists");
                if let Some(status) = patch.status {
                    e.status = status;
                }
                if patch.x.is_some() {
                    e.x = patch.x;
                    e.y = patch.y;
                }
            }
            LineupMutation::Delete { entry_id } => entries.retain(|e| e.id != entry_id),
        }
    }

    #[test]
    fn capacities_hold_for_any_move_sequence() {
        let pool: Vec<Player> =
            (1..=25).map(|id| player(id, &format!("P{id}"), "Midfielder")).collect();
        let mut entries: Vec<LineupEntry> = Vec::new();
        let mut next_id = 100;
        let mut store = RosterStore::default();
        let mut seed: u64 = 0x2545_f491;

        for _ in 0..2_000 {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let who = pool[(seed >> 33) as usize % pool.len()].clone();
            let target = [Zone::Unassigned, Zone::Starters, Zone::Bench][(seed >> 20) as usize % 3];

            let ticket = store.begin_load(7);
            store.apply(ticket, Ok(snapshot(pool.clone(), entries.clone())));
            let origin = store.zone_of(who.id).unwrap();
            let entry_id = store.entry_for_player(who.id).map(|e| e.entry_id);
            let board = BoardContext::from_snapshot(
                store.snapshot().unwrap(),
                store.count(Zone::Starters),
                store.count(Zone::Bench),
            );

            let g = Gesture { player: who, origin, entry_id };
            let dropped = match target {
                Zone::Starters => drop_on_pitch(0.3, 0.6),
                zone => drop_on(zone),
            };
            if let Ok(mutation) = plan(&g, &dropped, &board) {
                apply(&mut entries, &mut next_id, mutation);
            }

            let starters = entries.iter().filter(|e| e.status == LineupStatus::Starter).count();
            let bench = entries.iter().filter(|e| e.status == LineupStatus::Bench).count();
            assert!(starters <= MAX_STARTERS, "{starters} starters");
            assert!(bench <= MAX_BENCH, "{bench} on the bench");
        }
    }

    #[test]
    fn deleting_a_starter_returns_player_to_available_list() {
        let pool = vec![player(2, "Bruno", "Forward")];
        let mut entries = vec![entry(60, 2, LineupStatus::Starter, Some(10.0))];
        let mut next_id = 100;

        let mutation =
            plan(&gesture(Zone::Starters, Some(60)), &drop_on(Zone::Unassigned), &board(1, 0))
                .unwrap();
        apply(&mut entries, &mut next_id, mutation);

        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        store.apply(ticket, Ok(snapshot(pool, entries)));
        assert_eq!(store.count(Zone::Starters), 0);
        assert_eq!(store.unassigned().iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-0"));
    }

    async fn mock_roster(
        server: &mut mockito::ServerGuard,
        lineup_body: &str,
    ) -> Vec<mockito::Mock> {
        let match_mock = server
            .mock("GET", "/matches/7/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 7, "home": {"id": 1, "name": "Tigres"},
                    "away": {"id": 3, "name": "Leões"}}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let players_mock = server
            .mock("GET", "/players/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 2, "name": "Bruno", "position": "Forward", "club": 1}]"#)
            .expect(1)
            .create_async()
            .await;
        let lineup_mock = server
            .mock("GET", "/lineup-entries/")
            .match_query(mockito::Matcher::UrlEncoded("match".into(), "7".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(lineup_body)
            .expect(1)
            .create_async()
            .await;
        vec![match_mock, players_mock, lineup_mock]
    }

    #[tokio::test]
    async fn failed_write_still_reloads_once_and_shows_server_state() {
        let mut server = mockito::Server::new_async().await;
        let write = server
            .mock("POST", "/lineup-entries/")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        // Server still has the player on the bench, not where the user dropped them.
        let reload = mock_roster(
            &mut server,
            r#"[{"id": 61, "match": 7, "club": 1, "player": 2, "status": "BENCH",
                 "x": null, "y": null}]"#,
        )
        .await;

        let api = PitchsideApi::new(server.url());
        let mutation =
            plan(&gesture(Zone::Unassigned, None), &drop_on_pitch(0.2, 0.1), &board(0, 0)).unwrap();
        let outcome = commit(&api, 7, &mutation).await;

        write.assert_async().await;
        for mock in &reload {
            mock.assert_async().await;
        }
        assert!(outcome.saved.is_err());

        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        store.apply(ticket, outcome.reloaded);
        assert_eq!(store.count(Zone::Starters), 0);
        assert_eq!(store.count(Zone::Bench), 1);
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-0"));
    }

    #[tokio::test]
    async fn successful_write_reloads_once() {
        let mut server = mockito::Server::new_async().await;
        let write = server
            .mock("DELETE", "/lineup-entries/60/")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let reload = mock_roster(&mut server, "[]").await;

        let api = PitchsideApi::new(server.url());
        let outcome = commit(&api, 7, &LineupMutation::Delete { entry_id: 60 }).await;

        write.assert_async().await;
        for mock in &reload {
            mock.assert_async().await;
        }
        assert!(outcome.saved.is_ok());
        assert!(outcome.reloaded.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn patch_answered_without_body_counts_as_saved() {
        let mut server = mockito::Server::new_async().await;
        let write = server
            .mock("PATCH", "/lineup-entries/60/")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let reload = mock_roster(
            &mut server,
            r#"[{"id": 60, "match": 7, "club": 1, "player": 2, "status": "BENCH",
                 "x": null, "y": null}]"#,
        )
        .await;

        let api = PitchsideApi::new(server.url());
        let mutation =
            plan(&gesture(Zone::Starters, Some(60)), &drop_on(Zone::Bench), &board(1, 0)).unwrap();
        let outcome = commit(&api, 7, &mutation).await;

        write.assert_async().await;
        for mock in &reload {
            mock.assert_async().await;
        }
        assert_eq!(outcome.saved, Ok(()));
        assert_eq!(outcome.reloaded.unwrap().entries[0].status, LineupStatus::Bench);
    }

    #[tokio::test]
    async fn string_coordinates_in_responses_count_as_saved() {
        let mut server = mockito::Server::new_async().await;
        let write = server
            .mock("POST", "/lineup-entries/")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 60, "match": 7, "club": 1, "player": 2, "status": "STARTER",
                    "x": "20.00", "y": "10.00"}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let reload = mock_roster(
            &mut server,
            r#"[{"id": 60, "match": 7, "club": 1, "player": 2, "status": "STARTER",
                 "x": "20.00", "y": "10.00"}]"#,
        )
        .await;

        let api = PitchsideApi::new(server.url());
        let mutation =
            plan(&gesture(Zone::Unassigned, None), &drop_on_pitch(0.2, 0.1), &board(0, 0)).unwrap();
        let outcome = commit(&api, 7, &mutation).await;

        write.assert_async().await;
        for mock in &reload {
            mock.assert_async().await;
        }
        assert_eq!(outcome.saved, Ok(()));

        let mut store = RosterStore::default();
        let ticket = store.begin_load(7);
        store.apply(ticket, outcome.reloaded);
        let starter = store.entry_for_player(2).unwrap();
        assert_eq!((starter.x, starter.y), (Some(20.0), Some(10.0)));
        assert_eq!(store.formation().map(|f| f.to_string()).as_deref(), Some("0-0-1"));
    }
}
