//! Track selection and the end-of-track transition.

use crate::library::{Catalog, Track};

use super::adapter::PlaybackAdapter;
use super::backend::{MediaBackend, MediaEvent};

/// The single mutable playback entity: which track is bound, and the adapter
/// driving it.
///
/// `current_index` is `None` exactly when the catalog is empty; otherwise the
/// adapter is bound to `catalog[current_index]`.
pub struct PlaybackSession<B: MediaBackend> {
    catalog: Catalog,
    current_index: Option<usize>,
    adapter: PlaybackAdapter<B>,
}

impl<B: MediaBackend> PlaybackSession<B> {
    /// Create the session bound to the first track (paused).
    pub fn new(catalog: Catalog, backend: B) -> Self {
        let mut session = Self {
            catalog,
            current_index: None,
            adapter: PlaybackAdapter::new(backend),
        };
        session.select_track(0, false);
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn bound_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.catalog.get(i))
    }

    pub fn adapter(&self) -> &PlaybackAdapter<B> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut PlaybackAdapter<B> {
        &mut self.adapter
    }

    /// Bind the track at `index` (wrapped onto the catalog) and optionally
    /// start it. No-op on an empty catalog.
    ///
    /// The play request is only issued after the backend acknowledged the
    /// new source.
    pub fn select_track(&mut self, index: i64, autoplay: bool) {
        let Some(index) = self.catalog.wrap_index(index) else {
            return;
        };
        let Some(track) = self.catalog.get(index) else {
            return;
        };

        self.current_index = Some(index);
        tracing::info!(index, title = %track.title, autoplay, "track selected");
        let bound = self.adapter.bind_source(&track.source);
        if autoplay && bound {
            self.adapter.play();
        }
    }

    pub fn play_next(&mut self) {
        self.step(1);
    }

    pub fn play_prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: i64) {
        if let Some(i) = self.current_index {
            self.select_track(i as i64 + delta, true);
        }
    }

    /// Play/pause. No-op on an empty catalog.
    pub fn toggle_playing(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        self.adapter.toggle_playing();
    }

    /// Drain pending backend signals in order. Natural end of a track
    /// advances to the next one. Returns whether anything was processed.
    pub fn pump_events(&mut self) -> bool {
        let mut processed = false;
        while let Some(event) = self.adapter.backend_mut().poll_event() {
            processed = true;
            self.adapter.handle_event(&event);
            if event == MediaEvent::Ended {
                tracing::debug!("track ended, advancing");
                self.play_next();
            }
        }
        processed
    }

    /// Release the backend. The session must not be used for playback after this.
    pub fn shutdown(&mut self) {
        tracing::info!("releasing playback backend");
        self.adapter.release();
    }
}
