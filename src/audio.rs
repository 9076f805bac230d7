//! `rodio` playback backend.
//!
//! A dedicated thread owns the output stream and the current `Sink`; the UI
//! thread drives it through `RodioBackend`, which implements `MediaBackend`.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioBackend;
