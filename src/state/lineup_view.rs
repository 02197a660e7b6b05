use crate::state::placement::{
    self, BoardContext, DropTarget, Gesture, LineupMutation, PitchBounds, PlacementRejected,
    Pointer,
};
use crate::state::roster::{RosterStore, Zone};
use tui::layout::{Position, Rect};

// ---------------------------------------------------------------------------
// Hit map: screen regions recorded during the last draw
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHit {
    pub area: Rect,
    pub player_id: u64,
    pub zone: Zone,
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub zones: Vec<(Zone, Rect)>,
    /// Inner area of the pitch, None until the lineup tab has been drawn.
    pub pitch: Option<Rect>,
    pub cards: Vec<CardHit>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.zones.clear();
        self.pitch = None;
        self.cards.clear();
    }

    /// Topmost card under the cell. Cards drawn later sit on top.
    pub fn card_at(&self, column: u16, row: u16) -> Option<CardHit> {
        let pos = Position::new(column, row);
        self.cards.iter().rev().find(|c| c.area.contains(pos)).copied()
    }

    pub fn zone_at(&self, column: u16, row: u16) -> Option<Zone> {
        let pos = Position::new(column, row);
        if self.pitch.is_some_and(|p| p.contains(pos)) {
            return Some(Zone::Starters);
        }
        self.zones
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(zone, _)| *zone)
    }

    pub fn pitch_bounds(&self) -> Option<PitchBounds> {
        self.pitch
            .filter(|p| p.width > 0 && p.height > 0)
            .map(|p| PitchBounds {
                left: f64::from(p.x),
                top: f64::from(p.y),
                width: f64::from(p.width),
                height: f64::from(p.height),
            })
    }
}

// ---------------------------------------------------------------------------
// Interaction state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Send this to the network worker; the gesture stays alive until it settles.
    Dispatch(LineupMutation),
    Rejected(PlacementRejected),
    Cancelled,
}

#[derive(Debug, Default)]
pub struct LineupViewState {
    pub gesture: Option<Gesture>,
    /// Cell the dragged card is currently hovering over.
    pub ghost: Option<(u16, u16)>,
    /// A mutation and its reload are outstanding; new gestures are refused.
    pub in_flight: bool,
    pub focus: Zone,
    pub selected: usize,
    pub hit_map: HitMap,
}

impl LineupViewState {
    pub fn reset(&mut self) {
        self.gesture = None;
        self.ghost = None;
        self.in_flight = false;
        self.focus = Zone::Unassigned;
        self.selected = 0;
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some() && !self.in_flight
    }

    /// Start a drag on the card under the pointer. Returns false if nothing was picked up.
    pub fn begin_drag(&mut self, roster: &RosterStore, column: u16, row: u16) -> bool {
        if self.in_flight {
            return false;
        }
        let Some(card) = self.hit_map.card_at(column, row) else {
            return false;
        };
        let Some(gesture) = gesture_for(roster, card.player_id) else {
            return false;
        };
        self.focus = card.zone;
        if let Some(idx) = player_ids_in(roster, card.zone)
            .iter()
            .position(|id| *id == card.player_id)
        {
            self.selected = idx;
        }
        self.gesture = Some(gesture);
        self.ghost = Some((column, row));
        true
    }

    pub fn drag_to(&mut self, column: u16, row: u16) {
        if self.is_dragging() {
            self.ghost = Some((column, row));
        }
    }

    /// Finish a mouse drag. Releasing outside every zone cancels the gesture.
    pub fn drop_at(&mut self, roster: &RosterStore, column: u16, row: u16) -> DropOutcome {
        if !self.is_dragging() {
            return DropOutcome::Cancelled;
        }
        self.ghost = None;
        let gesture = self.gesture.take();
        let (Some(gesture), Some(zone)) = (gesture, self.hit_map.zone_at(column, row)) else {
            return DropOutcome::Cancelled;
        };
        let target = DropTarget {
            zone,
            pointer: Some(Pointer::from_cell(column, row)),
            pitch: self.hit_map.pitch_bounds(),
        };
        self.resolve(roster, gesture, target)
    }

    /// Keyboard move of the selected card. Starters moved this way keep their
    /// current coordinates (or none).
    pub fn move_selected(&mut self, roster: &RosterStore, zone: Zone) -> DropOutcome {
        if self.in_flight {
            return DropOutcome::Cancelled;
        }
        let Some(gesture) = self
            .selected_player_id(roster)
            .and_then(|id| gesture_for(roster, id))
        else {
            return DropOutcome::Cancelled;
        };
        let target = DropTarget { zone, pointer: None, pitch: None };
        self.resolve(roster, gesture, target)
    }

    pub fn cancel(&mut self) {
        if !self.in_flight {
            self.gesture = None;
            self.ghost = None;
        }
    }

    /// The mutation and its reload finished, successfully or not.
    pub fn settle(&mut self) {
        self.gesture = None;
        self.ghost = None;
        self.in_flight = false;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.selected = 0;
    }

    pub fn select_next(&mut self, roster: &RosterStore) {
        let max = player_ids_in(roster, self.focus).len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_player_id(&self, roster: &RosterStore) -> Option<u64> {
        player_ids_in(roster, self.focus).get(self.selected).copied()
    }

    fn resolve(
        &mut self,
        roster: &RosterStore,
        gesture: Gesture,
        target: DropTarget,
    ) -> DropOutcome {
        let Some(snapshot) = roster.snapshot() else {
            self.gesture = None;
            return DropOutcome::Cancelled;
        };
        let board = BoardContext::from_snapshot(
            snapshot,
            roster.count(Zone::Starters),
            roster.count(Zone::Bench),
        );
        match placement::plan(&gesture, &target, &board) {
            Ok(mutation) => {
                self.gesture = Some(gesture);
                self.in_flight = true;
                DropOutcome::Dispatch(mutation)
            }
            Err(rejected) => {
                self.gesture = None;
                DropOutcome::Rejected(rejected)
            }
        }
    }
}

/// Player ids shown in a zone, in display order.
pub fn player_ids_in(roster: &RosterStore, zone: Zone) -> Vec<u64> {
    match zone {
        Zone::Unassigned => roster.unassigned().iter().map(|p| p.id).collect(),
        Zone::Starters => roster.starters().iter().map(|e| e.player.id).collect(),
        Zone::Bench => roster.bench().iter().map(|e| e.player.id).collect(),
    }
}

fn gesture_for(roster: &RosterStore, player_id: u64) -> Option<Gesture> {
    if let Some(entry) = roster.entry_for_player(player_id) {
        return Some(Gesture {
            player: entry.player.clone(),
            origin: entry.zone(),
            entry_id: Some(entry.entry_id),
        });
    }
    let player = roster.unassigned().into_iter().find(|p| p.id == player_id)?;
    Some(Gesture { player: player.clone(), origin: Zone::Unassigned, entry_id: None })
}
