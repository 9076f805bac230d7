use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SEGUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume level at startup, `0.0..=1.0`.
    pub initial_volume: f64,
    /// Whether the player starts muted.
    pub start_muted: bool,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// How often the audio thread publishes time updates (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            start_muted: false,
            quit_fade_out_ms: 500,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the cursor starts in "follow playback" mode.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the seek bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ segue ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change in percent when pressing `+` / `-`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing when a track is picked from the list.
    pub autoplay_on_select: bool,
    /// Start playing the first track as soon as the player opens.
    pub autoplay_on_start: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_select: true,
            autoplay_on_start: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    /// The same list is stripped from filenames when deriving titles.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Let embedded tags override the `Artist - Title` filename convention.
    pub prefer_tags: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "wav", "ogg", "m4a", "aac", "opus"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            prefer_tags: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Write a log file at all.
    pub enabled: bool,
    /// Default filter directive; `SEGUE_LOG` overrides it.
    pub level: String,
    /// Directory holding `segue.log`. Defaults to the XDG state dir.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            directory: None,
        }
    }
}
