use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SEGUE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and the default config file location.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path())
    }

    /// Load settings from environment and an optional config file that may be missing.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        Self::build(config_path, false)
    }

    /// Load settings from a file the user named explicitly. A missing file is an error.
    pub fn load_required(config_path: PathBuf) -> Result<Self, ::config::ConfigError> {
        Self::build(Some(config_path), true)
    }

    fn build(config_path: Option<PathBuf>, required: bool) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(required));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SEGUE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        let v = self.audio.initial_volume;
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err("audio.initial_volume must be between 0.0 and 1.0".to_string());
        }
        if !(1..=100).contains(&self.controls.volume_step) {
            return Err("controls.volume_step must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SEGUE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SEGUE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/segue/config.toml`
/// or `~/.config/segue/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("segue").join("config.toml"))
}

/// Compute the default log directory: `$XDG_STATE_HOME/segue` or
/// `~/.local/state/segue`.
pub fn default_log_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("segue"))
}
