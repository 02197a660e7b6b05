use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Returns true when the event changed something worth redrawing.
pub async fn handle_mouse_event(
    mouse_event: MouseEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    let mut guard = app.lock().await;
    let (redraw, request) = route_mouse(&mut guard, mouse_event);
    drop(guard);

    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
    redraw
}

/// Only the lineup board reacts to the mouse: press picks a card up, drag moves
/// the ghost, release drops it.
fn route_mouse(app: &mut App, event: MouseEvent) -> (bool, Option<NetworkRequest>) {
    if app.state.active_tab != MenuItem::Lineup {
        return (false, None);
    }
    let (column, row) = (event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => (app.lineup_drag_start(column, row), None),
        MouseEventKind::Drag(MouseButton::Left) => {
            if !app.state.lineup.is_dragging() {
                return (false, None);
            }
            app.lineup_drag_to(column, row);
            (true, None)
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if !app.state.lineup.is_dragging() {
                return (false, None);
            }
            (true, app.lineup_drop(column, row))
        }
        _ => (false, None),
    }
}
