use std::io::{self, Write};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioBackend;
use crate::cli::Args;
use crate::library::{Catalog, build_catalog, scan};
use crate::logging;
use crate::playback::PlaybackSession;

mod event_loop;
mod settings;

/// Print one `title`/`subtitle` line per track, in playlist order.
fn print_catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    for track in catalog {
        writeln!(out, "{} — {}", track.title, track.subtitle)?;
    }
    Ok(())
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = settings::load_settings(args.config.clone());
    let _log_guard = logging::init(&settings.logging);

    let dir = args.library_dir();
    tracing::info!(dir = %dir.display(), "starting");

    let catalog = build_catalog(scan(&dir, &settings.library), &settings.library);

    if args.list {
        let stdout = io::stdout();
        print_catalog(&mut stdout.lock(), &catalog)?;
        return Ok(());
    }

    let mut session = PlaybackSession::new(catalog, RodioBackend::new(&settings.audio));
    {
        let player = session.adapter_mut();
        player.set_volume(settings.audio.initial_volume);
        if settings.audio.start_muted {
            player.set_muted(true);
        }
    }

    let mut app = App::new(session);
    app.follow_playback = settings.ui.follow_playback;
    app.set_current_dir(dir.display().to_string());
    if args.autoplay || settings.playback.autoplay_on_start {
        app.play_selected(true);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut state);

    // Fade out and stop audio before giving the terminal back.
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &run_result {
        tracing::error!(%err, "event loop failed");
    }
    tracing::info!("exiting");
    run_result
}
