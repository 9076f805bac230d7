//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. All
//! percentages and labels are derived from the adapter on every draw.

pub mod layout;
pub mod progress;
pub mod slider;


use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::library::Track;
use crate::playback::MediaBackend;

use layout::{Button, UiLayout, button_rects, inner, visible_window};
use progress::{bar_cells, buffered_percent, progress_percent, time_summary};

/// Render the controls help text, incorporating config-driven steps.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] up/down".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
        format!("[+/-] volume ±{}%", controls.volume_step),
        "[m] mute".to_string(),
        "[enter] play selected song".to_string(),
        "[space/p] play/pause".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[zz] jump to playing".to_string(),
        "[:] seek to %".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn track_line(track: &Track) -> String {
    format!("{} — {}", track.title, track.subtitle)
}

fn button_label(button: Button, playing: bool, muted: bool) -> &'static str {
    match button {
        Button::Prev => "|◀ prev",
        Button::PlayPause if playing => "❚❚ stop",
        Button::PlayPause => "▶ play",
        Button::Next => "next ▶|",
        Button::Mute if muted => "unmute",
        Button::Mute => "mute",
    }
}

fn draw_now_playing<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let player = app.player();
    let mut lines: Vec<Line> = Vec::new();

    match app.now_playing_track() {
        Some(track) => {
            lines.push(Line::from(Span::from(track.title.as_str()).bold()));
            let state = if player.is_playing() {
                "Playing"
            } else {
                "Paused"
            };
            lines.push(Line::from(format!("{} • {}", track.subtitle, state)));
        }
        None => {
            lines.push(Line::from("Nothing to play".italic()));
            lines.push(Line::from(""));
        }
    }

    let mut block = Block::bordered()
        .padding(Padding::horizontal(1))
        .title(" now playing ");
    if let Some(err) = player.last_error() {
        block = block.title_bottom(Line::from(format!(" {err} ")).fg(Color::Red));
    } else if !app.follow_playback {
        block = block.title_bottom(" CURSOR: Free-roam ");
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_seek_bar<B: MediaBackend>(frame: &mut Frame, app: &App<B>, ui: &UiSettings, area: Rect) {
    let player = app.player();
    let duration = player.duration();
    let progress = progress_percent(player.current_time(), duration);
    let buffered = buffered_percent(player.buffered(), duration);

    let title = time_summary(
        player.current_time(),
        duration,
        &ui.now_playing_time_fields,
        &ui.now_playing_time_separator,
    )
    .map(|t| format!(" {t} "))
    .unwrap_or_else(|| " seek ".to_string());

    let width = inner(area).width as usize;
    let bar = Paragraph::new(bar_cells(width, progress, buffered))
        .fg(Color::Cyan)
        .block(Block::bordered().title(title));
    frame.render_widget(bar, area);
}

fn draw_transport<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let player = app.player();
    frame.render_widget(Block::bordered(), area);
    for (button, rect) in button_rects(area) {
        let label = button_label(button, player.is_playing(), player.is_muted());
        let widget = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_widget(widget, rect);
    }
}

fn draw_volume_bar<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let player = app.player();
    let shown = player.effective_volume() * 100.0;
    let title = if player.is_muted() {
        format!(" volume {:.0}% (muted) ", app.volume_percent())
    } else {
        format!(" volume {:.0}% ", app.volume_percent())
    };

    let width = inner(area).width as usize;
    let bar = Paragraph::new(bar_cells(width, shown, 0.0))
        .fg(Color::Green)
        .block(Block::bordered().title(title));
    frame.render_widget(bar, area);
}

fn draw_list<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let catalog = app.catalog();
    let block = Block::bordered().title(" tracks ");

    if catalog.is_empty() {
        let dir = app.current_dir.as_deref().unwrap_or(".");
        let placeholder = Paragraph::new(format!("No tracks found in {dir}"))
            .alignment(Alignment::Center)
            .italic()
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Only build ListItems for the visible window.
    let height = inner(area).height as usize;
    let (start, end, selected_in_window) = visible_window(catalog.len(), height, app.selected);
    let playing = app.now_playing();

    let items: Vec<ListItem> = (start..end)
        .filter_map(|i| catalog.get(i).map(|t| (i, t)))
        .map(|(i, track)| {
            let marker = if Some(i) == playing { "♪ " } else { "  " };
            let item = ListItem::new(format!("{marker}{}", track_line(track)));
            if Some(i) == playing {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(selected_in_window));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer<B: MediaBackend>(
    frame: &mut Frame,
    app: &App<B>,
    controls: &ControlsSettings,
    area: Rect,
) {
    let (text, title) = match app.prompt.as_deref() {
        Some(input) => (
            format!("seek to %: {input}▏  [enter] go | [esc] cancel"),
            " seek ",
        ),
        None => (controls_text(controls), " controls "),
    };
    let footer = Paragraph::new(text)
        .block(
            Block::bordered()
                .title(title)
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<B: MediaBackend>(
    frame: &mut Frame,
    app: &App<B>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let UiLayout {
        header,
        now_playing,
        seek_bar,
        transport,
        volume_bar,
        list,
        footer,
    } = layout::layout(frame.area());

    let mut title = String::from(" segue ");
    if let Some(dir) = &app.current_dir {
        title = format!(" segue • {dir} ");
    }
    let header_par = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header_par, header);

    draw_now_playing(frame, app, now_playing);
    draw_seek_bar(frame, app, ui_settings, seek_bar);
    draw_transport(frame, app, transport);
    draw_volume_bar(frame, app, volume_bar);
    draw_list(frame, app, list);
    draw_footer(frame, app, controls_settings, footer);
}
