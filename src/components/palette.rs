use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Swatch {
    Grass,
    Line,
    Guide,
    Keeper,
    Outfield,
    Selected,
    Dragging,
    Label,
    Dim,
}

pub fn resolve(swatch: Swatch) -> Style {
    let grass = Color::Rgb(28, 94, 40);
    match swatch {
        Swatch::Grass => Style::default().bg(grass),
        Swatch::Line => Style::default().fg(Color::Rgb(220, 230, 220)).bg(grass),
        Swatch::Guide => Style::default().fg(Color::Rgb(70, 140, 80)).bg(grass),
        Swatch::Keeper => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Swatch::Outfield => Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
        Swatch::Selected => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(0, 122, 195))
            .add_modifier(Modifier::BOLD),
        Swatch::Dragging => Style::default().fg(Color::Indexed(240)).bg(grass),
        Swatch::Label => Style::default().fg(Color::White).bg(grass),
        Swatch::Dim => Style::default().fg(Color::Indexed(240)),
    }
}
