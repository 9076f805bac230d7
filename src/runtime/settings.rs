use std::path::PathBuf;

use crate::config;

/// Load and validate settings. Config is optional: any failure falls back to
/// defaults with a notice on stderr, before the TUI takes the screen.
pub fn load_settings(config_path: Option<PathBuf>) -> config::Settings {
    let loaded = match config_path {
        Some(path) => config::Settings::load_required(path),
        None => config::Settings::load(),
    };
    match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("segue: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("segue: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
