//! In-memory `MediaBackend` for tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{BackendError, BackendResult};

use super::backend::{MediaBackend, MediaEvent, TimeRange};

#[derive(Debug, Default)]
pub struct FakeState {
    pub loaded: Option<PathBuf>,
    pub loads: Vec<PathBuf>,
    pub playing: bool,
    pub position: f64,
    pub volume: f64,
    pub seeks: Vec<f64>,
    pub play_requests: usize,
    pub reject_play: bool,
    /// Seeks are recorded but the position stays put.
    pub reject_seek: bool,
    pub released: bool,
    /// Per-source lengths; sources not listed report an unknown duration.
    pub durations: HashMap<PathBuf, f64>,
    /// Sources whose `load` fails.
    pub broken: Vec<PathBuf>,
    pub events: VecDeque<MediaEvent>,
}

/// Clonable handle: tests keep one copy to steer and inspect the backend.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durations(durations: impl IntoIterator<Item = (PathBuf, f64)>) -> Self {
        let fake = Self::new();
        fake.state.borrow_mut().durations = durations.into_iter().collect();
        fake
    }

    pub fn state(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn push_event(&self, event: MediaEvent) {
        self.state.borrow_mut().events.push_back(event);
    }
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, source: &Path) -> BackendResult<()> {
        let mut s = self.state.borrow_mut();
        s.loads.push(source.to_path_buf());
        s.events.clear();
        s.playing = false;
        s.position = 0.0;
        if s.broken.iter().any(|b| b == source) {
            s.loaded = None;
            return Err(BackendError::Decode {
                path: source.to_path_buf(),
                reason: "unsupported format".to_string(),
            });
        }
        s.loaded = Some(source.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> BackendResult<()> {
        let mut s = self.state.borrow_mut();
        s.play_requests += 1;
        if s.loaded.is_none() {
            return Err(BackendError::NoSource);
        }
        if s.reject_play {
            return Err(BackendError::NoOutputDevice("policy".to_string()));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        let mut s = self.state.borrow_mut();
        s.seeks.push(seconds);
        if !s.reject_seek {
            s.position = seconds;
        }
    }

    fn set_volume(&mut self, level: f64) {
        self.state.borrow_mut().volume = level;
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<f64> {
        let s = self.state.borrow();
        s.loaded.as_ref().and_then(|p| s.durations.get(p).copied())
    }

    fn buffered_ranges(&self) -> Vec<TimeRange> {
        self.duration()
            .map(|d| vec![TimeRange::new(0.0, d)])
            .unwrap_or_default()
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.state.borrow_mut().events.pop_front()
    }

    fn release(&mut self) {
        let mut s = self.state.borrow_mut();
        s.released = true;
        s.playing = false;
    }
}
