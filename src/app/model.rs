//! Application model: the playback session plus cursor and input state.
//!
//! Every user gesture ends up as one method call here, so key and mouse
//! handling in the runtime stay thin and the translation is testable without
//! a terminal.

use crate::library::{Catalog, Track};
use crate::playback::{MediaBackend, PlaybackAdapter, PlaybackSession};
use crate::ui::layout::{Button, Hit, Slider};
use crate::ui::slider::{SEEK_STEP, VOLUME_STEP, parse_slider_input, slider_value, snap};

/// The main application model.
pub struct App<B: MediaBackend> {
    session: PlaybackSession<B>,
    pub selected: usize,
    pub follow_playback: bool,
    pub current_dir: Option<String>,
    /// Text typed into the seek prompt, when it is open.
    pub prompt: Option<String>,
    /// Slider grabbed by the last mouse-down, for drags.
    pub drag: Option<Slider>,
}

impl<B: MediaBackend> App<B> {
    pub fn new(session: PlaybackSession<B>) -> Self {
        let selected = session.current_index().unwrap_or(0);
        Self {
            session,
            selected,
            follow_playback: true,
            current_dir: None,
            prompt: None,
            drag: None,
        }
    }

    pub fn player(&self) -> &PlaybackAdapter<B> {
        self.session.adapter()
    }

    pub fn catalog(&self) -> &Catalog {
        self.session.catalog()
    }

    pub fn has_tracks(&self) -> bool {
        !self.catalog().is_empty()
    }

    pub fn now_playing(&self) -> Option<usize> {
        self.session.current_index()
    }

    pub fn now_playing_track(&self) -> Option<&Track> {
        self.session.bound_track()
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.sync_cursor();
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Snap the cursor to the playing track when following playback.
    fn sync_cursor(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(i) = self.now_playing() {
            self.selected = i;
        }
    }

    /// Drain backend signals and keep the cursor in step with playback.
    pub fn pump(&mut self) -> bool {
        let processed = self.session.pump_events();
        if processed {
            self.sync_cursor();
        }
        processed
    }

    // Cursor

    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.catalog().len().saturating_sub(1));
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.catalog().len();
        if len == 0 {
            return;
        }
        self.follow_playback_off();
        self.selected = (self.selected + 1) % len;
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.catalog().len();
        if len == 0 {
            return;
        }
        self.follow_playback_off();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn first(&mut self) {
        self.follow_playback_off();
        self.set_selected(0);
    }

    pub fn last(&mut self) {
        self.follow_playback_off();
        self.set_selected(usize::MAX);
    }

    // Transport

    /// Bind the track under the cursor.
    pub fn play_selected(&mut self, autoplay: bool) {
        if !self.has_tracks() {
            return;
        }
        self.session.select_track(self.selected as i64, autoplay);
        self.follow_playback_on();
    }

    /// A click on a playlist row.
    pub fn select_row(&mut self, index: usize, autoplay: bool) {
        if index >= self.catalog().len() {
            return;
        }
        self.selected = index;
        self.play_selected(autoplay);
    }

    pub fn toggle_playing(&mut self) {
        self.session.toggle_playing();
    }

    pub fn next_track(&mut self) {
        self.session.play_next();
        self.follow_playback_on();
    }

    pub fn prev_track(&mut self) {
        self.session.play_prev();
        self.follow_playback_on();
    }

    pub fn toggle_mute(&mut self) {
        self.session.adapter_mut().toggle_muted();
    }

    /// Relative seek by `seconds`.
    pub fn scrub(&mut self, seconds: f64) {
        self.session.adapter_mut().seek_by(seconds);
    }

    // Sliders

    /// Seek slider: `percent` of the known duration, at 0.1 granularity.
    pub fn seek_to_percent(&mut self, percent: f64) {
        let Some(percent) = slider_value(percent) else {
            return;
        };
        let percent = snap(percent, SEEK_STEP);
        let adapter = self.session.adapter_mut();
        let target = percent / 100.0 * adapter.duration();
        adapter.set_current_time(target);
    }

    /// Volume slider: whole percent of full volume.
    pub fn set_volume_percent(&mut self, percent: f64) {
        let Some(percent) = slider_value(percent) else {
            return;
        };
        let percent = snap(percent, VOLUME_STEP);
        self.session.adapter_mut().set_volume(percent / 100.0);
    }

    /// Stored volume as a whole percentage.
    pub fn volume_percent(&self) -> f64 {
        (self.player().volume() * 100.0).round()
    }

    /// Volume keys: move the stored level by `delta` percent.
    pub fn step_volume(&mut self, delta: f64) {
        self.set_volume_percent(self.volume_percent() + delta);
    }

    // Seek prompt

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Append to the seek prompt. Only characters of a decimal number are kept.
    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(input) = self.prompt.as_mut() {
            if c.is_ascii_digit() || c == '.' || c == '%' {
                input.push(c);
            }
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(input) = self.prompt.as_mut() {
            input.pop();
        }
    }

    /// Close the prompt and seek to the typed percentage. Unparseable input is
    /// dropped.
    pub fn submit_prompt(&mut self) {
        let Some(input) = self.prompt.take() else {
            return;
        };
        match parse_slider_input(&input) {
            Some(percent) => self.seek_to_percent(percent),
            None => tracing::debug!(%input, "ignoring seek prompt input"),
        }
    }

    // Mouse

    /// Mouse-down on whatever `hit` resolved to.
    pub fn click(&mut self, hit: Hit, autoplay: bool) {
        match hit {
            Hit::Seek(percent) => {
                self.drag = Some(Slider::Seek);
                self.seek_to_percent(percent);
            }
            Hit::Volume(percent) => {
                self.drag = Some(Slider::Volume);
                self.set_volume_percent(percent);
            }
            Hit::Button(Button::Prev) => self.prev_track(),
            Hit::Button(Button::PlayPause) => self.toggle_playing(),
            Hit::Button(Button::Next) => self.next_track(),
            Hit::Button(Button::Mute) => self.toggle_mute(),
            Hit::Row(index) => self.select_row(index, autoplay),
        }
    }

    /// Continue a drag on the slider grabbed at mouse-down.
    pub fn drag_to(&mut self, percent: f64) {
        match self.drag {
            Some(Slider::Seek) => self.seek_to_percent(percent),
            Some(Slider::Volume) => self.set_volume_percent(percent),
            None => {}
        }
    }

    pub fn release_drag(&mut self) {
        self.drag = None;
    }

    /// Release the playback backend.
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}
