use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crate::state::roster::Zone;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let request = route_key(&mut guard, key_event);
    drop(guard);

    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}

fn route_key(app: &mut App, key_event: KeyEvent) -> Option<NetworkRequest> {
    // Typing into the rating sheet captures every printable key.
    if app.state.active_tab == MenuItem::Ratings && app.state.ratings.editing {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => app.state.ratings.editing = false,
            KeyCode::Tab => app.state.ratings.next_field(),
            KeyCode::Backspace => app.state.ratings.pop_char(),
            KeyCode::Down => app.state.ratings.select_next(),
            KeyCode::Up => app.state.ratings.select_prev(),
            Char(c) => app.state.ratings.push_char(c),
            _ => {}
        }
        return None;
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => app.update_tab(MenuItem::Matches),
        (_, Char('2'), _) => app.update_tab(MenuItem::Lineup),
        (_, Char('3'), _) => app.update_tab(MenuItem::Players),
        (_, Char('4'), _) => app.update_tab(MenuItem::Ratings),
        (_, Char('5'), _) => app.update_tab(MenuItem::Clubs),
        (_, Char('6'), _) => app.update_tab(MenuItem::Competitions),
        (_, Char('7'), _) => app.update_tab(MenuItem::Live),
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => {
            app.exit_help();
            None
        }

        // Matches
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => {
            app.state.matches.select_next();
            None
        }
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => {
            app.state.matches.select_prev();
            None
        }
        (MenuItem::Matches, KeyCode::Enter, _) => app.matches_open_lineup(),
        (MenuItem::Matches, Char('n'), _) => app.matches_open_ratings(),
        (MenuItem::Matches, Char('r'), _) => Some(app.reload_matches()),

        // Lineup board
        (MenuItem::Lineup, KeyCode::Tab, _) => {
            app.state.lineup.focus_next();
            None
        }
        (MenuItem::Lineup, Char('j') | KeyCode::Down, _) => {
            app.state.lineup.select_next(&app.state.roster);
            None
        }
        (MenuItem::Lineup, Char('k') | KeyCode::Up, _) => {
            app.state.lineup.select_prev();
            None
        }
        (MenuItem::Lineup, Char('s'), _) => app.lineup_move_selected(Zone::Starters),
        (MenuItem::Lineup, Char('b'), _) => app.lineup_move_selected(Zone::Bench),
        (MenuItem::Lineup, Char('u'), _) => app.lineup_move_selected(Zone::Unassigned),
        (MenuItem::Lineup, KeyCode::Esc, _) => {
            app.state.lineup.cancel();
            None
        }
        (MenuItem::Lineup, Char('r'), _) => app.reload_lineup(),

        // Players
        (MenuItem::Players, Char('j') | KeyCode::Down, _) => {
            app.state.players.select_next();
            None
        }
        (MenuItem::Players, Char('k') | KeyCode::Up, _) => {
            app.state.players.select_prev();
            None
        }
        (MenuItem::Players, KeyCode::Enter, _) => app.players_show_stats(),

        // Ratings
        (MenuItem::Ratings, Char('j') | KeyCode::Down, _) => {
            app.state.ratings.select_next();
            None
        }
        (MenuItem::Ratings, Char('k') | KeyCode::Up, _) => {
            app.state.ratings.select_prev();
            None
        }
        (MenuItem::Ratings, KeyCode::Tab, _) => {
            app.state.ratings.next_field();
            None
        }
        (MenuItem::Ratings, KeyCode::Enter, _) => {
            app.state.ratings.editing = !app.state.ratings.rows.is_empty();
            None
        }
        (MenuItem::Ratings, Char('s'), _) => app.ratings_save(),

        // Clubs
        (MenuItem::Clubs, Char('j') | KeyCode::Down, _) => {
            app.state.clubs.select_next();
            None
        }
        (MenuItem::Clubs, Char('k') | KeyCode::Up, _) => {
            app.state.clubs.select_prev();
            None
        }
        (MenuItem::Clubs, KeyCode::Enter, _) => app.clubs_open_dashboard(),
        (MenuItem::Clubs, Char('r'), _) => Some(app.reload_clubs()),

        // Competitions
        (MenuItem::Competitions, KeyCode::Tab, _) => {
            app.state.competitions.toggle_focus();
            None
        }
        (MenuItem::Competitions, Char('j') | KeyCode::Down, _) => {
            app.state.competitions.select_next();
            None
        }
        (MenuItem::Competitions, Char('k') | KeyCode::Up, _) => {
            app.state.competitions.select_prev();
            None
        }
        (MenuItem::Competitions, KeyCode::Enter, _) => app.competitions_open_selected(),
        (MenuItem::Competitions, Char('r'), _) => Some(app.reload_competitions()),

        // Global
        (_, Char('f'), _) => {
            app.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            app.toggle_show_logs();
            None
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use crossterm::event::KeyEventKind;
    use pitchside_api::Match;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn enter_on_match_opens_lineup() {
        let mut app = App::new(AppSettings::default());
        app.on_matches_loaded(vec![
            Match { id: 4, ..Match::default() },
            Match { id: 9, ..Match::default() },
        ]);
        route_key(&mut app, key(Char('j')));
        let request = route_key(&mut app, key(KeyCode::Enter));
        assert!(matches!(
            request,
            Some(NetworkRequest::LoadRoster { ticket }) if ticket.match_id == 9
        ));
        assert_eq!(app.state.active_tab, MenuItem::Lineup);
    }

    #[test]
    fn digits_type_into_ratings_while_editing() {
        let mut app = App::new(AppSettings::default());
        app.open_ratings(7);
        app.on_ratings_loaded(
            Match { id: 7, ..Match::default() },
            vec![crate::state::roster::tests::player(1, "Rafael", "Goalkeeper")],
            vec![],
        );
        route_key(&mut app, key(KeyCode::Enter));
        assert!(app.state.ratings.editing);
        route_key(&mut app, key(Char('3')));
        assert_eq!(app.state.active_tab, MenuItem::Ratings);
        assert_eq!(app.state.ratings.rows[0].rating, "3");

        route_key(&mut app, key(KeyCode::Esc));
        route_key(&mut app, key(Char('3')));
        assert_eq!(app.state.active_tab, MenuItem::Players);
    }

    #[test]
    fn lineup_tab_cycles_focus() {
        let mut app = App::new(AppSettings::default());
        app.update_tab(MenuItem::Lineup);
        route_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.state.lineup.focus, Zone::Starters);
        assert!(route_key(&mut app, key(Char('s'))).is_none());
    }

    #[test]
    fn digit_tabs_follow_tab_bar_order() {
        let mut app = App::new(AppSettings::default());
        let request = route_key(&mut app, key(Char('5')));
        assert_eq!(app.state.active_tab, MenuItem::Clubs);
        assert!(matches!(request, Some(NetworkRequest::LoadClubs)));
        let request = route_key(&mut app, key(Char('6')));
        assert_eq!(app.state.active_tab, MenuItem::Competitions);
        assert!(matches!(request, Some(NetworkRequest::LoadCompetitions)));
        route_key(&mut app, key(Char('7')));
        assert_eq!(app.state.active_tab, MenuItem::Live);
    }

    #[test]
    fn competitions_tab_switches_list_with_tab() {
        use crate::state::competitions::CompetitionFocus;
        use pitchside_api::{Club, Competition};

        let mut app = App::new(AppSettings::default());
        app.update_tab(MenuItem::Competitions);
        app.on_competitions_loaded(vec![Competition { id: 5, name: "Copa".into() }]);
        app.on_competition_clubs_loaded(5, vec![Club { id: 3, name: "Leões".into() }]);

        route_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.state.competitions.focus, CompetitionFocus::Clubs);
        let request = route_key(&mut app, key(KeyCode::Enter));
        assert!(matches!(
            request,
            Some(NetworkRequest::LoadCompetitionClubStats { competition_id: 5, club_id: 3 })
        ));
    }
}
