use std::io::Stdout;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::App;
use crate::config;
use crate::playback::MediaBackend;
use crate::ui;
use crate::ui::layout::{Slider, hit_test, layout, percent_at};

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
    pending_zz: bool,
}

/// Main terminal event loop: drains playback signals, draws, and handles
/// input. Returns `Ok(())` when quit is requested.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App<B>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.pump();

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, state) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(mouse, area, settings, app);
            }
            _ => {}
        }
    }
}

fn handle_mouse_event<B: MediaBackend>(
    mouse: MouseEvent,
    area: Rect,
    settings: &config::Settings,
    app: &mut App<B>,
) {
    let regions = layout(area);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = hit_test(
                &regions,
                mouse.column,
                mouse.row,
                app.catalog().len(),
                app.selected,
            );
            if let Some(hit) = hit {
                app.click(hit, settings.playback.autoplay_on_select);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let bar = match app.drag {
                Some(Slider::Seek) => regions.seek_bar,
                Some(Slider::Volume) => regions.volume_bar,
                None => return,
            };
            if let Some(percent) = percent_at(bar, mouse.column) {
                app.drag_to(percent);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.release_drag(),
        MouseEventKind::ScrollDown => app.next(),
        MouseEventKind::ScrollUp => app.prev(),
        _ => {}
    }
}

/// Keys while the seek prompt is open.
fn handle_prompt_key<B: MediaBackend>(key: KeyEvent, app: &mut App<B>) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Char(c) => app.push_prompt_char(c),
        _ => {}
    }
}

/// Returns `true` when quit was requested.
fn handle_key_event<B: MediaBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<B>,
    state: &mut EventLoopState,
) -> bool {
    if app.prompt.is_some() {
        handle_prompt_key(key, app);
        return false;
    }

    // Two-key prefixes only survive until the next key.
    let gg = std::mem::take(&mut state.pending_gg);
    let zz = std::mem::take(&mut state.pending_zz);
    let scrub = settings.controls.scrub_seconds as f64;
    let volume_step = f64::from(settings.controls.volume_step);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if gg {
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Char('z') => {
            if zz {
                app.follow_playback_on();
            } else {
                state.pending_zz = true;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => app.play_selected(true),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_playing(),
        KeyCode::Char('l') => app.next_track(),
        KeyCode::Char('h') => app.prev_track(),
        KeyCode::Char('L') | KeyCode::Right => app.scrub(scrub),
        KeyCode::Char('H') | KeyCode::Left => app.scrub(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => app.step_volume(volume_step),
        KeyCode::Char('-') => app.step_volume(-volume_step),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char(':') => app.open_prompt(),
        _ => {}
    }
    false
}
