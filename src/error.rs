//! Error types shared by the playback backends.

use std::path::PathBuf;

/// Result alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Failures reported by a [`MediaBackend`](crate::playback::MediaBackend).
///
/// None of these are fatal to the player: the adapter logs them, records the
/// message for the status line and keeps running in a stopped state.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The platform refused to open an audio output.
    #[error("no audio output device available: {0}")]
    NoOutputDevice(String),
    /// The source could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source was opened but could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// A playback command arrived before any source was bound.
    #[error("no source is bound")]
    NoSource,
    /// The audio thread is gone (it panicked or was shut down).
    #[error("audio thread is not running")]
    Disconnected,
}
