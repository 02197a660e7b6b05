use chrono::Local;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, LineGauge, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::palette::{Swatch, resolve};
use crate::components::pitch::{PitchView, marker_rect};
use crate::state::app_state::NoticeKind;
use crate::state::competitions::CompetitionFocus;
use crate::state::formation;
use crate::state::lineup_view::{CardHit, LineupViewState};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::placement::{MAX_BENCH, MAX_STARTERS};
use crate::state::ratings::RatingField;
use crate::state::roster::{RosterStore, Zone};
use crate::ui::layout::{LayoutAreas, LineupAreas};
use pitchside_api::{Club, ClubRecord, Match, Outcome, Player};

static TABS: &[&str; 7] =
    &["Matches", "Lineup", "Players", "Ratings", "Clubs", "Competitions", "Live"];

const HELP_TEXT: &str = "\
Global      q quit   1-7 switch tab   ? help   \" logs   f full screen

Matches     j/k move   Enter lineup board   n rate players   r reload

Lineup      drag a card with the left mouse button onto the pitch, the bench or
            back to the available list
            Tab next zone   j/k select   s starters   b bench   u remove
            Esc cancel drag   r reload

Players     j/k move   Enter career stats

Ratings     j/k row   Tab field   Enter edit (Esc/Enter to stop)   s save

Clubs       j/k move   Enter dashboard   r reload

Competitions
            Tab switch list   j/k move   Enter load clubs or club stats   r reload";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Lineup => draw_lineup(f, layout.main, app),
            MenuItem::Players => draw_players(f, layout.main, app),
            MenuItem::Ratings => draw_ratings(f, layout.main, app),
            MenuItem::Clubs => draw_clubs(f, layout.main, app),
            MenuItem::Competitions => draw_competitions(f, layout.main, app),
            MenuItem::Live => draw_placeholder(f, layout.main, "Live match centre coming soon."),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        let frame_area = f.area();
        draw_notice(f, frame_area, app);
        draw_loading_spinner(f, frame_area, app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Matches => 0,
        MenuItem::Lineup => 1,
        MenuItem::Players => 2,
        MenuItem::Ratings => 3,
        MenuItem::Clubs => 4,
        MenuItem::Competitions => 5,
        MenuItem::Live => 6,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let matches = &app.state.matches;
    if matches.matches.is_empty() {
        let msg = if matches.is_loading {
            "Loading matches...".to_string()
        } else if let Some(err) = matches.last_error.as_deref() {
            format!("Match list failed to load:\n{err}\n\nPress r to retry.")
        } else {
            "No matches scheduled.".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [legend, list] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  Enter=lineup board  n=ratings  r=reload")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    let offset = scroll_offset(matches.selected, list.height);
    let lines: Vec<Line> = matches
        .matches
        .iter()
        .enumerate()
        .skip(offset)
        .take(list.height as usize)
        .map(|(idx, m)| match_line(m, idx == matches.selected))
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

fn match_line(m: &Match, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let kickoff = m
        .kickoff
        .map(|k| k.with_timezone(&Local).format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| "TBD".to_string());
    let style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{marker} {:<40}", m.title()), style),
        Span::styled(format!("{:>8}  ", m.score_line()), Style::default().fg(Color::Yellow)),
        Span::styled(kickoff, Style::default().fg(Color::DarkGray)),
    ])
}

// ---------------------------------------------------------------------------
// Lineup board
// ---------------------------------------------------------------------------

fn draw_lineup(f: &mut Frame, area: Rect, app: &mut App) {
    let state = &mut app.state;
    let roster = &state.roster;
    let view = &mut state.lineup;
    view.hit_map.clear();

    let block = default_border(Color::White).title(" Lineup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if roster.match_info().is_none() {
        let msg = if roster.is_loading {
            "Loading lineup...".to_string()
        } else if let Some(err) = roster.last_error.as_deref() {
            format!("Lineup failed to load:\n{err}\n\nPress r to retry.")
        } else {
            "Pick a match on the Matches tab (1) and press Enter.".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let areas = LineupAreas::new(inner);
    draw_lineup_header(f, areas.header, roster, view);

    let dragging = view.gesture.as_ref().map(|g| g.player.id);
    let selected = view.selected_player_id(roster);

    let available: Vec<&Player> = roster.unassigned();
    let cards =
        draw_zone_list(f, areas.unassigned, Zone::Unassigned, &available, view, selected, dragging);
    view.hit_map.cards.extend(cards);

    let bench: Vec<&Player> = roster.bench().into_iter().map(|e| &e.player).collect();
    let cards = draw_zone_list(f, areas.bench, Zone::Bench, &bench, view, selected, dragging);
    view.hit_map.cards.extend(cards);

    let pitch_block =
        zone_block(Zone::Starters, view.focus == Zone::Starters, roster.count(Zone::Starters));
    let pitch_inner = pitch_block.inner(areas.pitch);
    f.render_widget(pitch_block, areas.pitch);
    let starters = roster.starters();
    f.render_widget(
        PitchView {
            starters: &starters,
            selected: selected.filter(|_| view.focus == Zone::Starters),
            dragging,
        },
        pitch_inner,
    );

    view.hit_map.zones = vec![
        (Zone::Unassigned, areas.unassigned),
        (Zone::Starters, areas.pitch),
        (Zone::Bench, areas.bench),
    ];
    view.hit_map.pitch = Some(pitch_inner);
    view.hit_map.cards.extend(starters.iter().map(|entry| CardHit {
        area: marker_rect(pitch_inner, entry.x, entry.y),
        player_id: entry.player.id,
        zone: Zone::Starters,
    }));

    draw_ghost(f, view);
}

fn draw_lineup_header(f: &mut Frame, area: Rect, roster: &RosterStore, view: &LineupViewState) {
    let Some(match_info) = roster.match_info() else {
        return;
    };
    let [summary, legend] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let mut spans = vec![
        Span::styled(match_info.title(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}  |  ", match_info.score_line())),
        Span::raw(format!("Starters {}/{MAX_STARTERS}  ", roster.count(Zone::Starters))),
        Span::raw(format!("Bench {}/{MAX_BENCH}  |  ", roster.count(Zone::Bench))),
        Span::raw("Formation "),
        Span::styled(
            formation::label(roster.formation()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ];
    if view.in_flight {
        spans.push(Span::styled("  saving...", Style::default().fg(Color::DarkGray)));
    } else if let Some(err) = roster.last_error.as_deref() {
        spans.push(Span::styled(
            format!("  reload failed: {err} (r to retry)"),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), summary);
    f.render_widget(
        Paragraph::new(
            "Drag cards with the mouse, or Tab=zone  j/k=select  s/b/u=move  Esc=cancel  r=reload",
        )
        .style(Style::default().fg(Color::DarkGray)),
        legend,
    );
}

fn zone_block<'a>(zone: Zone, focused: bool, count: usize) -> Block<'a> {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    let title = match zone {
        Zone::Unassigned => format!(" {} ({count}) ", zone.label()),
        Zone::Starters => format!(" {} {count}/{MAX_STARTERS} ", zone.label()),
        Zone::Bench => format!(" {} {count}/{MAX_BENCH} ", zone.label()),
    };
    default_border(color).title(title)
}

/// Draw one side column and return the card rectangles it produced.
fn draw_zone_list(
    f: &mut Frame,
    area: Rect,
    zone: Zone,
    players: &[&Player],
    view: &LineupViewState,
    selected: Option<u64>,
    dragging: Option<u64>,
) -> Vec<CardHit> {
    let focused = view.focus == zone;
    let block = zone_block(zone, focused, players.len());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if players.is_empty() {
        let hint = match zone {
            Zone::Bench => "Drop substitutes here",
            _ => "Everyone is in the lineup",
        };
        f.render_widget(Paragraph::new(hint).style(resolve(Swatch::Dim)), inner);
        return Vec::new();
    }

    let offset = if focused { scroll_offset(view.selected, inner.height) } else { 0 };
    let mut cards = Vec::new();
    for (row, (idx, player)) in players
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner.height as usize)
        .enumerate()
    {
        let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let is_selected = focused && idx == view.selected && selected == Some(player.id);
        let style = if dragging == Some(player.id) {
            resolve(Swatch::Dim)
        } else if is_selected {
            resolve(Swatch::Selected)
        } else {
            Style::default().fg(Color::White)
        };
        let label = card_label(player, rect.width as usize);
        f.render_widget(Paragraph::new(label).style(style), rect);
        cards.push(CardHit { area: rect, player_id: player.id, zone });
    }
    cards
}

fn card_label(player: &Player, width: usize) -> String {
    let position: String = player.position.chars().take(3).collect::<String>().to_uppercase();
    let name_width = width.saturating_sub(position.len() + 2);
    format!("{:<name_width$} {position}", truncate(&player.name, name_width))
}

fn draw_ghost(f: &mut Frame, view: &LineupViewState) {
    let (Some(gesture), Some((column, row))) = (view.gesture.as_ref(), view.ghost) else {
        return;
    };
    if view.in_flight {
        return;
    }
    let area = f.area();
    if column >= area.right() || row >= area.bottom() {
        return;
    }
    let text = format!(" {} ", gesture.player.name);
    let width = (text.chars().count() as u16).min(area.right() - column);
    f.render_widget(
        Paragraph::new(text).style(resolve(Swatch::Selected).add_modifier(Modifier::REVERSED)),
        Rect::new(column, row, width, 1),
    );
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

fn draw_players(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Players ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let players = &app.state.players;
    if players.players.is_empty() {
        let msg = if players.is_loading {
            "Loading players...".to_string()
        } else if let Some(err) = players.last_error.as_deref() {
            format!("Player list failed to load:\n{err}")
        } else {
            "No players registered.".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [list, detail] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    let offset = scroll_offset(players.selected, list.height);
    let lines: Vec<Line> = players
        .players
        .iter()
        .enumerate()
        .skip(offset)
        .take(list.height as usize)
        .map(|(idx, p)| {
            let selected = idx == players.selected;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{marker} {:<28}", truncate(&p.name, 28)), style),
                Span::styled(p.position.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list);

    let detail_block = default_border(Color::DarkGray).title(" Career ");
    let detail_inner = detail_block.inner(detail);
    f.render_widget(detail_block, detail);

    let Some(player) = players.selected_player() else {
        return;
    };
    let mut lines = vec![
        Line::from(Span::styled(
            player.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(player.position.clone(), Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];
    match players.selected_stats() {
        Some(stats) => {
            lines.push(Line::from(format!("Games    {}", stats.games)));
            lines.push(Line::from(format!("Goals    {}", stats.goals)));
            lines.push(Line::from(format!("Assists  {}", stats.assists)));
            lines.push(Line::from(vec![
                Span::raw("Average  "),
                Span::styled(
                    stats.average_label(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        None if players.is_loading => lines.push(Line::from("Loading...")),
        None => lines.push(Line::from(Span::styled(
            "Press Enter for career stats",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    f.render_widget(Paragraph::new(lines), detail_inner);
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

fn draw_ratings(f: &mut Frame, area: Rect, app: &App) {
    let ratings = &app.state.ratings;
    let title = match ratings.match_info.as_ref() {
        Some(m) => format!(" Ratings: {} ", m.title()),
        None => " Ratings ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if ratings.rows.is_empty() {
        let msg = if ratings.is_loading {
            "Loading rating sheet...".to_string()
        } else if let Some(err) = ratings.last_error.as_deref() {
            format!("Rating sheet failed to load:\n{err}")
        } else {
            "Select a match on the Matches tab (1) and press n.".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [legend, header, list] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let mode = if ratings.is_saving {
        "saving...".to_string()
    } else if ratings.editing {
        format!("editing {} (Tab next field, Esc done)", ratings.field.label())
    } else {
        format!("{} unsaved row(s)", ratings.dirty_count())
    };
    f.render_widget(
        Paragraph::new(format!("Keys: j/k=row  Tab=field  Enter=edit  s=save    [{mode}]"))
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );
    f.render_widget(
        Paragraph::new(format!(
            "  {:<26}{:<14}{:>8}{:>8}{:>8}",
            "Player", "Position", "Rating", "Goals", "Assists"
        ))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::UNDERLINED)),
        header,
    );

    let offset = scroll_offset(ratings.selected, list.height);
    let lines: Vec<Line> = ratings
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(list.height as usize)
        .map(|(idx, row)| {
            let selected = idx == ratings.selected;
            let marker = if row.dirty { "*" } else { " " };
            let base = if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cell = |field: RatingField| {
                let value = row.value(field);
                let shown = if value.is_empty() { "-" } else { value };
                let style = if selected && field == ratings.field {
                    let s = base.fg(Color::Yellow);
                    if ratings.editing { s.add_modifier(Modifier::REVERSED) } else { s }
                } else {
                    base
                };
                Span::styled(format!("{shown:>8}"), style)
            };
            Line::from(vec![
                Span::styled(format!("{marker} {:<26}", truncate(&row.player.name, 25)), base),
                Span::styled(
                    format!("{:<14}", truncate(&row.player.position, 13)),
                    Style::default().fg(Color::DarkGray),
                ),
                cell(RatingField::Rating),
                cell(RatingField::Goals),
                cell(RatingField::Assists),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

fn draw_clubs(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Clubs ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let clubs = &app.state.clubs;
    if clubs.clubs.is_empty() {
        let msg = if clubs.is_loading {
            "Loading clubs...".to_string()
        } else if let Some(err) = clubs.last_error.as_deref() {
            format!("Club list failed to load:\n{err}\n\nPress r to retry.")
        } else {
            "No clubs registered.".to_string()
        };
        draw_empty(f, inner, msg);
        return;
    }

    let [list, detail] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(inner);
    draw_club_list(f, list, &clubs.clubs, clubs.selected, true);

    let Some(dashboard) = clubs.selected_dashboard() else {
        let msg = if clubs.is_loading {
            "Loading dashboard..."
        } else if clubs.last_error.is_some() {
            "Dashboard failed to load. Press Enter to retry."
        } else {
            "Press Enter to open the dashboard."
        };
        draw_empty(f, detail, msg.to_string());
        return;
    };

    let [profile, record, recent] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(detail);

    let info = &dashboard.profile;
    let name = if info.name.is_empty() {
        clubs.selected_club().map(|c| c.name.clone()).unwrap_or_default()
    } else {
        info.name.clone()
    };
    let mut lines = vec![Line::from(Span::styled(
        name,
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let facts: Vec<String> = [
        info.country.clone(),
        info.founded.map(|year| format!("founded {year}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !facts.is_empty() {
        lines.push(Line::from(Span::styled(
            facts.join("  |  "),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(info.history.clone().unwrap_or_else(|| "No history yet.".into())));
    let profile_block = default_border(Color::DarkGray).title(" Profile ");
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(profile_block),
        profile,
    );

    draw_record(f, record, &dashboard.record);

    let recent_block = default_border(Color::DarkGray).title(" Recent matches ");
    let recent_inner = recent_block.inner(recent);
    f.render_widget(recent_block, recent);
    if dashboard.recent.is_empty() {
        f.render_widget(
            Paragraph::new("No matches played.").style(Style::default().fg(Color::DarkGray)),
            recent_inner,
        );
        return;
    }
    let lines: Vec<Line> = dashboard
        .recent
        .iter()
        .take(recent_inner.height as usize)
        .map(|game| {
            Line::from(vec![
                Span::raw(format!("{:<28}", truncate(&game.opponent, 27))),
                Span::styled(format!("{:>8}  ", game.score), Style::default().fg(Color::Yellow)),
                outcome_span(game.outcome),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), recent_inner);
}

fn draw_club_list(f: &mut Frame, area: Rect, clubs: &[Club], selected: usize, focused: bool) {
    let offset = scroll_offset(selected, area.height);
    let lines: Vec<Line> = clubs
        .iter()
        .enumerate()
        .skip(offset)
        .take(area.height as usize)
        .map(|(idx, club)| {
            let is_selected = idx == selected;
            let marker = if is_selected { ">" } else { " " };
            let style = match (is_selected, focused) {
                (true, true) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::White),
                _ => Style::default().fg(Color::Gray),
            };
            Line::from(Span::styled(format!("{marker} {}", club.name), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

/// Totals line plus one bar each for wins, draws and losses.
fn draw_record(f: &mut Frame, area: Rect, record: &ClubRecord) {
    let block = default_border(Color::DarkGray).title(" Season ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 4]).split(inner);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(format!("Games {}   ", record.games)),
            Span::raw("Win rate "),
            Span::styled(
                format!("{:.1}%", record.win_rate()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])),
        rows[0],
    );
    let bars = [
        ("Wins", record.wins, Color::Green),
        ("Draws", record.draws, Color::Gray),
        ("Losses", record.losses, Color::Red),
    ];
    for ((label, count, color), row) in bars.into_iter().zip(rows.iter().skip(1)) {
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(color))
            .label(format!("{label:<7}{count:>3}"))
            .ratio(record.ratio(count));
        f.render_widget(gauge, *row);
    }
}

fn outcome_span(outcome: Option<Outcome>) -> Span<'static> {
    match outcome {
        Some(o) => {
            let color = match o {
                Outcome::Win => Color::Green,
                Outcome::Draw => Color::Gray,
                Outcome::Loss => Color::Red,
            };
            Span::styled(o.label(), Style::default().fg(color).add_modifier(Modifier::BOLD))
        }
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    }
}

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

fn draw_competitions(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Competitions ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let state = &app.state.competitions;
    if state.competitions.is_empty() {
        let msg = if state.is_loading {
            "Loading competitions...".to_string()
        } else if let Some(err) = state.last_error.as_deref() {
            format!("Competition list failed to load:\n{err}\n\nPress r to retry.")
        } else {
            "No competitions registered.".to_string()
        };
        draw_empty(f, inner, msg);
        return;
    }

    let [list, clubs, stats] = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(50),
    ])
    .areas(inner);

    let on_list = state.focus == CompetitionFocus::Competitions;
    let list_block = default_border(if on_list { Color::Yellow } else { Color::DarkGray });
    let list_inner = list_block.inner(list);
    f.render_widget(list_block, list);
    let offset = scroll_offset(state.selected, list_inner.height);
    let lines: Vec<Line> = state
        .competitions
        .iter()
        .enumerate()
        .skip(offset)
        .take(list_inner.height as usize)
        .map(|(idx, c)| {
            let marker = if idx == state.selected { ">" } else { " " };
            let style = if idx == state.selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!("{marker} {}", c.name), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list_inner);

    let clubs_block =
        default_border(if on_list { Color::DarkGray } else { Color::Yellow }).title(" Clubs ");
    let clubs_inner = clubs_block.inner(clubs);
    f.render_widget(clubs_block, clubs);
    match state.selected_clubs() {
        Some([]) => draw_empty(f, clubs_inner, "No clubs entered.".to_string()),
        Some(entrants) => {
            draw_club_list(f, clubs_inner, entrants, state.club_selected, !on_list);
        }
        None if state.is_loading => draw_empty(f, clubs_inner, "Loading...".to_string()),
        None => draw_empty(f, clubs_inner, "Press Enter to load clubs.".to_string()),
    }

    let title = match state.selected_club() {
        Some(club) => format!(" {} ", club.name),
        None => " Stats ".to_string(),
    };
    let stats_block = default_border(Color::DarkGray).title(title);
    let stats_inner = stats_block.inner(stats);
    f.render_widget(stats_block, stats);

    let Some(club_stats) = state.selected_stats() else {
        let msg = if state.selected_clubs().is_some_and(|c| !c.is_empty()) {
            "Tab to the clubs, then Enter for stats."
        } else {
            ""
        };
        draw_empty(f, stats_inner, msg.to_string());
        return;
    };

    let [record, games] =
        Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(stats_inner);
    draw_record(f, record, &club_stats.record);

    let lines: Vec<Line> = if club_stats.games.is_empty() {
        vec![Line::from(Span::styled("No games yet.", Style::default().fg(Color::DarkGray)))]
    } else {
        club_stats
            .games
            .iter()
            .take(games.height as usize)
            .map(|game| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<12}", game.date.as_deref().unwrap_or("-")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(format!("{:<36}", truncate(&game.score_line(), 35))),
                    outcome_span(game.outcome),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines), games);
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// First visible row so that `selected` stays on screen.
fn scroll_offset(selected: usize, height: u16) -> usize {
    selected.saturating_sub((height as usize).saturating_sub(1))
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

fn draw_empty(f: &mut Frame, area: Rect, msg: String) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help (Esc to close) ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(widget, area);
}

fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = app.state.notice.as_ref() else {
        return;
    };
    let width = (notice.text.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.bottom().saturating_sub(height + 1),
        width,
        height,
    );
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(notice.text.as_str())
            .alignment(Alignment::Center)
            .block(default_border(color)),
        rect,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
