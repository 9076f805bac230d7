//! Screen regions for a given terminal size.
//!
//! `draw` and mouse hit-testing both go through [`layout`], so a click always
//! lands on what was rendered under it.

use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};

use super::slider::slider_value;

/// Width of one transport button, borders excluded.
pub const BUTTON_WIDTH: u16 = 8;
const BUTTON_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Prev,
    PlayPause,
    Next,
    Mute,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Prev, Button::PlayPause, Button::Next, Button::Mute];
}

/// What sits under a mouse position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Seek(f64),
    Volume(f64),
    Button(Button),
    /// Catalog index of a playlist row.
    Row(usize),
}

/// Which slider a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Seek,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub header: Rect,
    pub now_playing: Rect,
    pub seek_bar: Rect,
    pub transport: Rect,
    pub volume_bar: Rect,
    pub list: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> UiLayout {
    let [header, now_playing, seek_bar, controls, list, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(4),
    ])
    .areas(area);

    let transport_width = 2 + Button::ALL.len() as u16 * (BUTTON_WIDTH + BUTTON_GAP);
    let [transport, volume_bar] =
        Layout::horizontal([Constraint::Length(transport_width), Constraint::Min(10)])
            .areas(controls);

    UiLayout {
        header,
        now_playing,
        seek_bar,
        transport,
        volume_bar,
        list,
        footer,
    }
}

/// Area inside a bordered block.
pub fn inner(area: Rect) -> Rect {
    area.inner(Margin::new(1, 1))
}

/// Button cells inside the transport block, left to right.
pub fn button_rects(transport: Rect) -> [(Button, Rect); 4] {
    let inner = inner(transport);
    let mut rects = Button::ALL.map(|button| (button, Rect::default()));
    for (slot, (_, rect)) in rects.iter_mut().enumerate() {
        let x = inner
            .x
            .saturating_add(slot as u16 * (BUTTON_WIDTH + BUTTON_GAP));
        let width = BUTTON_WIDTH.min(inner.right().saturating_sub(x));
        *rect = Rect::new(x, inner.y, width, inner.height.min(1));
    }
    rects
}

/// Scrolled window over `total` rows so `selected` stays centered when possible.
///
/// Returns `(start, end, selected_in_window)`.
pub fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Map a column on a bordered bar to a slider percentage.
///
/// Columns left or right of the bar clamp to its ends, which keeps drags that
/// overshoot the bar at 0 or 100.
pub fn percent_at(bar: Rect, column: u16) -> Option<f64> {
    let inner = inner(bar);
    if inner.width == 0 {
        return None;
    }
    if inner.width == 1 {
        return Some(100.0);
    }
    let offset = column.saturating_sub(inner.x).min(inner.width - 1);
    slider_value(f64::from(offset) / f64::from(inner.width - 1) * 100.0)
}

/// Resolve a mouse position against the current layout.
///
/// `total` and `selected` describe the playlist so the row window matches the
/// one that was drawn.
pub fn hit_test(
    ui: &UiLayout,
    column: u16,
    row: u16,
    total: usize,
    selected: usize,
) -> Option<Hit> {
    let at = Position::new(column, row);

    if ui.seek_bar.contains(at) {
        return percent_at(ui.seek_bar, column).map(Hit::Seek);
    }
    if ui.volume_bar.contains(at) {
        return percent_at(ui.volume_bar, column).map(Hit::Volume);
    }
    if ui.transport.contains(at) {
        return button_rects(ui.transport)
            .into_iter()
            .find(|(_, rect)| rect.contains(at))
            .map(|(button, _)| Hit::Button(button));
    }

    let list = inner(ui.list);
    if list.contains(at) {
        let (start, end, _) = visible_window(total, list.height as usize, selected);
        let index = start + (row - list.y) as usize;
        return (index < end).then_some(Hit::Row(index));
    }
    None
}
