//! The capability boundary around the native playback primitive.

use std::path::Path;

use crate::error::BackendResult;

/// A buffered `[start, end)` interval, in seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Asynchronous signals emitted by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata for the bound source is known. `None` means the length
    /// could not be determined.
    MetadataLoaded { duration: Option<f64> },
    /// Playback position moved.
    TimeUpdate { current_time: f64 },
    /// More of the source became available.
    Progress { buffered: Vec<TimeRange> },
    /// The backend started or stopped producing audio on its own.
    PlayingChanged { playing: bool },
    /// The bound source reached its natural end.
    Ended,
}

/// One active audio output that can be bound to a single source at a time.
///
/// Mutators are commands; the getters report what the backend actually does,
/// which may differ from what was requested.
pub trait MediaBackend {
    /// Attach `source`, replacing whatever was bound. Returns once the swap
    /// is acknowledged. The new source starts paused at position 0, and no
    /// signal from the previous source is delivered afterwards.
    fn load(&mut self, source: &Path) -> BackendResult<()>;
    /// Request playback. May be rejected by the platform.
    fn play(&mut self) -> BackendResult<()>;
    fn pause(&mut self);
    /// Jump to `seconds`. Returns once `current_time` reflects the outcome.
    fn seek(&mut self, seconds: f64);
    /// Output gain, `0.0..=1.0`.
    fn set_volume(&mut self, level: f64);

    fn is_playing(&self) -> bool;
    fn current_time(&self) -> f64;
    /// Length of the bound source, if known.
    fn duration(&self) -> Option<f64>;
    fn buffered_ranges(&self) -> Vec<TimeRange>;

    /// Next pending signal, if any. Never blocks.
    fn poll_event(&mut self) -> Option<MediaEvent>;

    /// Tear the output down. Further commands are ignored.
    fn release(&mut self) {}
}
