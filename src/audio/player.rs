use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::{BackendError, BackendResult};
use crate::playback::{MediaBackend, MediaEvent, TimeRange};

use super::thread::{buffered_for, next_current_event, spawn_audio_thread};
use super::types::{AudioCmd, Envelope, PlaybackHandle, PlaybackInfo};

/// `MediaBackend` backed by a `rodio` sink on a dedicated audio thread.
///
/// Commands go over a channel; `load` and `play` block until the thread
/// answers, so a play request never races the source swap.
pub struct RodioBackend {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    events: Receiver<Envelope>,
    join: Option<JoinHandle<()>>,
    fade_out: Duration,
}

impl RodioBackend {
    pub fn new(audio_settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<Envelope>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_audio_thread(
            rx,
            playback_info.clone(),
            event_tx,
            Duration::from_millis(audio_settings.tick_ms.max(1)),
        );

        Self {
            tx,
            playback: playback_info,
            events: event_rx,
            join: Some(join),
            fade_out: Duration::from_millis(audio_settings.quit_fade_out_ms),
        }
    }

    fn info(&self) -> PlaybackInfo {
        match self.playback.lock() {
            Ok(info) => info.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn send(&self, cmd: AudioCmd) -> BackendResult<()> {
        self.tx.send(cmd).map_err(|_| BackendError::Disconnected)
    }

    /// Send a command carrying a reply channel and wait for the answer.
    fn request(
        &self,
        make: impl FnOnce(Sender<BackendResult<()>>) -> AudioCmd,
    ) -> BackendResult<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(make(reply_tx))?;
        reply_rx.recv().map_err(|_| BackendError::Disconnected)?
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, source: &Path) -> BackendResult<()> {
        let path = source.to_path_buf();
        self.request(|reply| AudioCmd::Load { path, reply })
    }

    fn play(&mut self) -> BackendResult<()> {
        self.request(|reply| AudioCmd::Play { reply })
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        let target = Duration::try_from_secs_f64(seconds).unwrap_or_default();
        // Wait for the thread so `current_time` reflects where the sink landed.
        let (reply, done) = mpsc::channel();
        if self.send(AudioCmd::Seek { target, reply }).is_ok() {
            let _ = done.recv();
        }
    }

    fn set_volume(&mut self, level: f64) {
        let _ = self.send(AudioCmd::SetVolume(level.clamp(0.0, 1.0) as f32));
    }

    fn is_playing(&self) -> bool {
        self.info().playing
    }

    fn current_time(&self) -> f64 {
        self.info().position.as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        self.info().duration.map(|d| d.as_secs_f64())
    }

    fn buffered_ranges(&self) -> Vec<TimeRange> {
        buffered_for(&self.info())
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        next_current_event(&self.events, self.info().generation)
    }

    fn release(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: self.fade_out.as_millis() as u64,
        });
        if join.join().is_err() {
            tracing::error!("audio thread panicked");
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.release();
    }
}
