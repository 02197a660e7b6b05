use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::widgets::Widget;

use crate::components::palette::{Swatch, resolve};
use crate::state::formation::{ATTACK_LIMIT, DEFENSE_LIMIT, MIDFIELD_LIMIT};
use crate::state::roster::HydratedEntry;

/// Terminal columns taken by one player marker.
pub const MARKER_WIDTH: u16 = 4;

/// Where a starter with no stored coordinates is drawn.
const CENTRE: f64 = 50.0;

const NAME_WIDTH: usize = 10;

// ---------------------------------------------------------------------------
// Coordinate mapping
// ---------------------------------------------------------------------------

/// Map a normalized coordinate (0..=100) onto `len` cells starting at `origin`.
/// Inverse of the pointer normalization used on drop: a drop on cell `c` lands back on `c`.
pub fn to_cell(value: Option<f64>, origin: u16, len: u16) -> u16 {
    if len == 0 {
        return origin;
    }
    let v = value.unwrap_or(CENTRE).clamp(0.0, 100.0);
    let offset = (v / 100.0 * f64::from(len)).floor() as u16;
    origin + offset.min(len - 1)
}

/// Cell a starter's marker is centred on.
pub fn marker_anchor(area: Rect, x: Option<f64>, y: Option<f64>) -> (u16, u16) {
    (to_cell(x, area.x, area.width), to_cell(y, area.y, area.height))
}

/// Screen rectangle of a marker, kept inside the pitch.
pub fn marker_rect(area: Rect, x: Option<f64>, y: Option<f64>) -> Rect {
    let (col, row) = marker_anchor(area, x, y);
    let width = MARKER_WIDTH.min(area.width);
    let max_left = area.right().saturating_sub(width);
    let left = col.saturating_sub(MARKER_WIDTH / 2).clamp(area.x, max_left.max(area.x));
    Rect::new(left, row, width, 1)
}

/// Text inside a marker: `1` for goalkeepers, initials for everyone else.
pub fn marker_label(entry: &HydratedEntry) -> String {
    if entry.player.is_goalkeeper() {
        "1".to_string()
    } else {
        entry.player.initials()
    }
}

// ---------------------------------------------------------------------------
// PitchView widget
// ---------------------------------------------------------------------------

/// Vertical pitch, attacking edge at the top. Band guides follow the formation thresholds.
pub struct PitchView<'a> {
    pub starters: &'a [&'a HydratedEntry],
    /// Player highlighted by keyboard focus.
    pub selected: Option<u64>,
    /// Player currently being dragged, drawn faded at its old spot.
    pub dragging: Option<u64>,
}

impl<'a> Widget for PitchView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MARKER_WIDTH || area.height < 3 {
            return;
        }
        buf.set_style(area, resolve(Swatch::Grass));

        draw_goal(area, area.y, buf);
        draw_goal(area, area.bottom() - 1, buf);

        let halfway = to_cell(Some(50.0), area.y, area.height);
        for x in area.left()..area.right() {
            put_char(buf, x, halfway, '─', resolve(Swatch::Line));
        }
        let mid = to_cell(Some(50.0), area.x, area.width);
        put_char(buf, mid, halfway, '┼', resolve(Swatch::Line));

        let guides = [(ATTACK_LIMIT, "ATT"), (MIDFIELD_LIMIT, "MID"), (DEFENSE_LIMIT, "DEF")];
        for (limit, tag) in guides {
            let row = to_cell(Some(limit), area.y, area.height);
            if row == halfway {
                continue;
            }
            for x in area.left()..area.right() {
                put_char(buf, x, row, '┈', resolve(Swatch::Guide));
            }
            // tag names the band just above the guide
            if row > area.y {
                let tag_x = area.right().saturating_sub(tag.len() as u16);
                buf.set_string(tag_x, row - 1, tag, resolve(Swatch::Guide));
            }
        }

        for entry in self.starters {
            let rect = marker_rect(area, entry.x, entry.y);
            if rect.y + 1 >= area.bottom() {
                continue;
            }
            let name: String = entry.player.name.chars().take(NAME_WIDTH).collect();
            let len = name.chars().count() as u16;
            let centre = rect.x + rect.width / 2;
            let left = centre
                .saturating_sub(len / 2)
                .clamp(area.x, area.right().saturating_sub(len).max(area.x));
            buf.set_stringn(
                left,
                rect.y + 1,
                &name,
                area.right().saturating_sub(left) as usize,
                resolve(Swatch::Label),
            );
        }

        for entry in self.starters {
            let rect = marker_rect(area, entry.x, entry.y);
            let style = if self.dragging == Some(entry.player.id) {
                resolve(Swatch::Dragging)
            } else if self.selected == Some(entry.player.id) {
                resolve(Swatch::Selected)
            } else if entry.player.is_goalkeeper() {
                resolve(Swatch::Keeper)
            } else {
                resolve(Swatch::Outfield)
            };
            let text = format!("{:^width$}", marker_label(entry), width = rect.width as usize);
            buf.set_stringn(rect.x, rect.y, &text, rect.width as usize, style);
        }
    }
}

fn draw_goal(area: Rect, row: u16, buf: &mut Buffer) {
    let width = (area.width / 5).max(3).min(area.width);
    let left = area.x + (area.width - width) / 2;
    for x in left..left + width {
        put_char(buf, x, row, '▔', resolve(Swatch::Line));
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: tui::style::Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}
