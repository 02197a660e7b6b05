mod app;
mod components;
mod draw;
mod keys;
mod mouse;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, Command};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use crossterm::{cursor, execute, terminal};
use futures_util::StreamExt;
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Notices and other timed UI state advance on this interval.
const TICK_MILLIS: u64 = 250;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = match AppSettings::load().with_args(std::env::args().skip(1)) {
        Ok(Command::Run(settings)) => settings,
        Ok(Command::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("pitchside {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let app = App::new(settings);
    let client = app.api_client();
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network worker
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Notice timer
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MILLIS));
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    tick_task.abort();

    Ok(())
}

fn usage_text() -> &'static str {
    "pitchside - match-day lineup board for the terminal

Usage:
  pitchside [--api URL] [--match ID]
  pitchside --help
  pitchside --version

Options:
  --api URL     Base URL of the club API
  --match ID    Open the lineup board for this match on startup

Environment:
  PITCHSIDE_API_URL   Base URL of the club API (default http://127.0.0.1:8000)
  PITCHSIDE_TOKEN     Bearer token sent with every request
  PITCHSIDE_MATCH     Match to open on startup
  PITCHSIDE_LOG       Log level for the log pane (error, warn, info, debug)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.startup_requests();
            for request in requests {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Mouse(mouse_event) => {
            mouse::handle_mouse_event(mouse_event, app, network_requests).await
        }
        UiEvent::Resize => true,
        UiEvent::Tick => app.lock().await.on_tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::MatchesLoaded { matches } => {
            app.lock().await.on_matches_loaded(matches);
        }
        NetworkResponse::PlayersLoaded { players } => {
            app.lock().await.on_players_loaded(players);
        }
        NetworkResponse::RosterLoaded { ticket, result } => {
            app.lock().await.on_roster_loaded(ticket, result);
        }
        NetworkResponse::LineupCommitted { ticket, outcome } => {
            app.lock().await.on_lineup_committed(ticket, outcome);
        }
        NetworkResponse::PlayerStatsLoaded { player_id, performances } => {
            app.lock().await.on_player_stats_loaded(player_id, performances);
        }
        NetworkResponse::RatingsLoaded { match_info, pool, performances } => {
            app.lock().await.on_ratings_loaded(match_info, pool, performances);
        }
        NetworkResponse::RatingsSaved { match_id, failed, total } => {
            let reload = app.lock().await.on_ratings_saved(match_id, failed, total);
            send_follow_up(network_requests, reload).await;
        }
        NetworkResponse::ClubsLoaded { clubs } => {
            let follow_up = app.lock().await.on_clubs_loaded(clubs);
            send_follow_up(network_requests, follow_up).await;
        }
        NetworkResponse::ClubDashboardLoaded { club_id, dashboard } => {
            app.lock().await.on_club_dashboard_loaded(club_id, dashboard);
        }
        NetworkResponse::CompetitionsLoaded { competitions } => {
            let follow_up = app.lock().await.on_competitions_loaded(competitions);
            send_follow_up(network_requests, follow_up).await;
        }
        NetworkResponse::CompetitionClubsLoaded { competition_id, clubs } => {
            app.lock().await.on_competition_clubs_loaded(competition_id, clubs);
        }
        NetworkResponse::CompetitionClubStatsLoaded { competition_id, club_id, stats } => {
            app.lock().await.on_competition_club_stats_loaded(competition_id, club_id, stats);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

async fn send_follow_up(
    network_requests: &mpsc::Sender<NetworkRequest>,
    request: Option<NetworkRequest>,
) {
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    let mut events = EventStream::new();
    while let Some(event) = events.next().await {
        let ui_event = match event {
            Ok(Event::Key(key_event)) => Some(UiEvent::KeyPressed(key_event)),
            Ok(Event::Mouse(mouse_event)) => Some(UiEvent::Mouse(mouse_event)),
            Ok(Event::Resize(_, _)) => Some(UiEvent::Resize),
            Ok(_) => None,
            Err(e) => {
                error!("terminal input failed: {e}");
                None
            }
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, EnableMouseCapture)?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture);
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
