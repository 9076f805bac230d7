//! Playback core: the backend capability trait, the state adapter over it,
//! and the session that decides which track is bound.

mod adapter;
mod backend;
mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use adapter::PlaybackAdapter;
pub use backend::{MediaBackend, MediaEvent, TimeRange};
pub use session::PlaybackSession;
