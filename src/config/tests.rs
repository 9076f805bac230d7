use super::load::{default_config_path, default_log_dir, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

/// One path-resolution case: environment to apply, resolver, expected path.
struct PathCase {
    name: &'static str,
    env: &'static [(&'static str, Option<&'static str>)],
    resolve: fn() -> Option<PathBuf>,
    expected: &'static str,
}

#[test]
fn config_and_log_paths_follow_env_precedence() {
    let cases = [
        PathCase {
            name: "explicit config path wins",
            env: &[("SEGUE_CONFIG_PATH", Some("/tmp/segue-test-config.toml"))],
            resolve: resolve_config_path,
            expected: "/tmp/segue-test-config.toml",
        },
        PathCase {
            name: "config under XDG_CONFIG_HOME",
            env: &[
                ("SEGUE_CONFIG_PATH", None),
                ("XDG_CONFIG_HOME", Some("/tmp/xdg-config-home")),
                ("HOME", Some("/tmp/home-should-not-win")),
            ],
            resolve: default_config_path,
            expected: "/tmp/xdg-config-home/segue/config.toml",
        },
        PathCase {
            name: "config under HOME/.config",
            env: &[("XDG_CONFIG_HOME", None), ("HOME", Some("/tmp/home-dir"))],
            resolve: default_config_path,
            expected: "/tmp/home-dir/.config/segue/config.toml",
        },
        PathCase {
            name: "logs under XDG_STATE_HOME",
            env: &[("XDG_STATE_HOME", Some("/tmp/xdg-state"))],
            resolve: default_log_dir,
            expected: "/tmp/xdg-state/segue",
        },
        PathCase {
            name: "logs under HOME/.local/state",
            env: &[("XDG_STATE_HOME", None), ("HOME", Some("/tmp/home-dir"))],
            resolve: default_log_dir,
            expected: "/tmp/home-dir/.local/state/segue",
        },
    ];

    let _lock = env_lock();
    for case in &cases {
        let _guards: Vec<EnvGuard> = case
            .env
            .iter()
            .map(|&(key, val)| match val {
                Some(v) => EnvGuard::set(key, v),
                None => EnvGuard::remove(key),
            })
            .collect();
        assert_eq!(
            (case.resolve)(),
            Some(PathBuf::from(case.expected)),
            "{}",
            case.name
        );
    }
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
autoplay_on_select = false
autoplay_on_start = true

[audio]
initial_volume = 0.4
start_muted = true
quit_fade_out_ms = 123
tick_ms = 100

[controls]
scrub_seconds = 9
volume_step = 10

[ui]
follow_playback = false
header_text = "hello"
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
prefer_tags = true

[logging]
enabled = false
level = "debug"
directory = "/tmp/segue-logs"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("SEGUE__AUDIO__TICK_MS");

    let s = Settings::load_from(Some(cfg_path)).unwrap();
    assert!(!s.playback.autoplay_on_select);
    assert!(s.playback.autoplay_on_start);
    assert_eq!(s.audio.initial_volume, 0.4);
    assert!(s.audio.start_muted);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert!(s.library.prefer_tags);
    assert!(!s.logging.enabled);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(s.logging.directory, Some(PathBuf::from("/tmp/segue-logs")));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SEGUE__AUDIO__TICK_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 40);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();

    let s = Settings::load_from(Some(dir.path().join("nope.toml"))).unwrap();
    assert_eq!(s.controls.scrub_seconds, 5);
    assert!(s.playback.autoplay_on_select);
    assert!(s.library.extensions.iter().any(|e| e == "mp3"));
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());
    s.audio.tick_ms = 250;

    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());
    s.audio.initial_volume = f64::NAN;
    assert!(s.validate().is_err());
    s.audio.initial_volume = 0.5;

    s.controls.volume_step = 0;
    assert!(s.validate().is_err());
    s.controls.volume_step = 101;
    assert!(s.validate().is_err());
}

#[test]
fn explicitly_named_config_must_exist() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();

    assert!(Settings::load_required(dir.path().join("typo.toml")).is_err());

    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[controls]\nscrub_seconds = 3\n").unwrap();
    let s = Settings::load_required(cfg_path).unwrap();
    assert_eq!(s.controls.scrub_seconds, 3);
}
