//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread and the
//! playback snapshot it shares with the UI thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::BackendResult;
use crate::playback::MediaEvent;

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the bound source. Replies once the new sink is ready (paused).
    Load {
        path: PathBuf,
        reply: Sender<BackendResult<()>>,
    },
    /// Start or resume playback. Replies with the outcome.
    Play { reply: Sender<BackendResult<()>> },
    /// Pause playback.
    Pause,
    /// Jump to an absolute position. Replies once the position is published,
    /// whether or not the seek worked.
    Seek { target: Duration, reply: Sender<()> },
    /// Output gain, `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Events tagged with the load generation that produced them.
pub(super) type Envelope = (u64, MediaEvent);

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Bumped on every load; events from older generations are stale.
    pub generation: u64,
    /// Whether a source is currently bound and decodable.
    pub loaded: bool,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Playback position within the bound source.
    pub position: Duration,
    /// Length of the bound source, when known.
    pub duration: Option<Duration>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
