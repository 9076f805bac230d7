//! Observable playback state over a single `MediaBackend`.
//!
//! The adapter is the only sanctioned way to change playback. It mirrors the
//! backend's live fields (position, duration, buffered ranges, playing) and
//! owns the volume/mute pair, composing them into the gain the backend sees.

use std::path::{Path, PathBuf};

use crate::error::BackendError;

use super::backend::{MediaBackend, MediaEvent, TimeRange};

pub struct PlaybackAdapter<B: MediaBackend> {
    backend: B,
    source: Option<PathBuf>,
    playing: bool,
    current_time: f64,
    duration: f64,
    buffered: Vec<TimeRange>,
    volume: f64,
    muted: bool,
    last_error: Option<String>,
}

/// Normalize a backend-reported length: unknown, negative or non-finite is 0.
fn known_duration(d: Option<f64>) -> f64 {
    match d {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => 0.0,
    }
}

impl<B: MediaBackend> PlaybackAdapter<B> {
    pub fn new(backend: B) -> Self {
        let mut adapter = Self {
            backend,
            source: None,
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            buffered: Vec::new(),
            volume: 1.0,
            muted: false,
            last_error: None,
        };
        adapter.push_volume();
        adapter
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Length of the bound source in seconds; `0.0` while unknown.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn buffered(&self) -> &[TimeRange] {
        &self.buffered
    }

    /// Stored volume level, independent of `muted`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain actually applied: 0 while muted, the stored level otherwise.
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Most recent backend failure, for the status line.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Attach a new source and wait for the backend to acknowledge it.
    ///
    /// Position resets to 0; duration and buffered ranges take whatever the
    /// backend knows right after the swap. Returns whether the source is
    /// usable.
    pub fn bind_source(&mut self, locator: &Path) -> bool {
        self.source = Some(locator.to_path_buf());
        self.current_time = 0.0;
        self.duration = 0.0;
        self.buffered.clear();

        match self.backend.load(locator) {
            Ok(()) => {
                self.last_error = None;
                self.duration = known_duration(self.backend.duration());
                self.buffered = self.backend.buffered_ranges();
                self.playing = self.backend.is_playing();
                tracing::debug!(source = %locator.display(), duration = self.duration, "source bound");
                true
            }
            Err(err) => {
                tracing::warn!(source = %locator.display(), %err, "failed to bind source");
                self.last_error = Some(err.to_string());
                self.playing = false;
                false
            }
        }
    }

    /// Request playback. Rejections are recorded, never propagated.
    pub fn play(&mut self) {
        if self.source.is_none() {
            return;
        }
        match self.backend.play() {
            Ok(()) => self.last_error = None,
            Err(err) => {
                tracing::warn!(%err, "play request rejected");
                // A failed load already said why there is nothing to play.
                let unbound = matches!(err, BackendError::NoSource);
                if !(unbound && self.last_error.is_some()) {
                    self.last_error = Some(err.to_string());
                }
            }
        }
        self.playing = self.backend.is_playing();
    }

    pub fn pause(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.backend.pause();
        self.playing = self.backend.is_playing();
    }

    pub fn toggle_playing(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to `seconds`, clamped to `[0, duration]`. Non-finite input is ignored.
    ///
    /// The position is read back from the backend, so a seek it could not
    /// honor leaves the old position visible.
    pub fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() || self.source.is_none() {
            return;
        }
        let target = seconds.clamp(0.0, self.duration);
        self.backend.seek(target);
        let landed = self.backend.current_time();
        if landed.is_finite() {
            self.current_time = landed.max(0.0);
        }
    }

    /// Relative seek, used by the scrub keys.
    pub fn seek_by(&mut self, delta: f64) {
        self.set_current_time(self.current_time + delta);
    }

    /// Set the stored level, clamped to `[0, 1]`. Exactly 0 also mutes; a
    /// positive level never unmutes.
    pub fn set_volume(&mut self, level: f64) {
        if !level.is_finite() {
            return;
        }
        self.volume = level.clamp(0.0, 1.0);
        if self.volume == 0.0 {
            self.muted = true;
        }
        self.push_volume();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.push_volume();
    }

    pub fn toggle_muted(&mut self) {
        self.set_muted(!self.muted);
    }

    fn push_volume(&mut self) {
        let gain = self.effective_volume();
        self.backend.set_volume(gain);
    }

    /// Fold one backend signal into the observable state.
    pub fn handle_event(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = known_duration(*duration);
                self.current_time = self.current_time.clamp(0.0, self.duration);
            }
            MediaEvent::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    self.current_time = current_time.max(0.0);
                }
            }
            MediaEvent::Progress { buffered } => {
                self.buffered = buffered.clone();
            }
            MediaEvent::PlayingChanged { playing } => {
                self.playing = *playing;
            }
            MediaEvent::Ended => {
                self.playing = false;
                self.current_time = self.duration;
            }
        }
    }

    /// Release the backend. The adapter stays readable but inert.
    pub fn release(&mut self) {
        self.backend.release();
        self.source = None;
        self.playing = false;
    }
}
