use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::{BackendError, BackendResult};
use crate::playback::{MediaEvent, TimeRange};

use super::sink::{create_sink_at, header_duration};
use super::types::{AudioCmd, Envelope, PlaybackHandle, PlaybackInfo};

/// Buffered ranges for a local file: everything, once the length is known.
pub(super) fn buffered_for(info: &PlaybackInfo) -> Vec<TimeRange> {
    match info.duration {
        Some(d) if info.loaded && !d.is_zero() => vec![TimeRange::new(0.0, d.as_secs_f64())],
        _ => Vec::new(),
    }
}

/// Next queued event belonging to load `generation`; older ones are discarded.
pub(super) fn next_current_event(events: &Receiver<Envelope>, generation: u64) -> Option<MediaEvent> {
    loop {
        match events.try_recv() {
            Ok((tag, event)) if tag == generation => return Some(event),
            Ok(_) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
        }
    }
}

/// Step count and per-step sleep for a fade of `fade_out_ms`.
pub(super) fn fade_schedule(fade_out_ms: u64) -> (u64, u64) {
    let steps: u64 = 20;
    (steps, (fade_out_ms / steps).max(1))
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let (steps, step_ms) = fade_schedule(fade_out_ms);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Everything the audio thread owns besides the output stream.
struct AudioState {
    sink: Option<Sink>,
    path: Option<PathBuf>,
    paused: bool,
    volume: f32,
    /// Where the current sink's source starts, when it was built with a skip.
    offset: Duration,
    ended_sent: bool,
    generation: u64,
    playback_info: PlaybackHandle,
    events: Sender<Envelope>,
}

impl AudioState {
    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    fn publish(&self, update: impl FnOnce(&mut PlaybackInfo)) {
        let mut info = match self.playback_info.lock() {
            Ok(info) => info,
            Err(poisoned) => poisoned.into_inner(),
        };
        update(&mut info);
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only disappears during shutdown.
        let _ = self.events.send((self.generation, event));
    }

    fn do_load(&mut self, stream: Result<&OutputStream, &str>, path: PathBuf) -> BackendResult<()> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.generation += 1;
        self.path = None;
        self.paused = true;
        self.offset = Duration::ZERO;
        self.ended_sent = false;

        let generation = self.generation;
        self.publish(|info| {
            *info = PlaybackInfo {
                generation,
                ..PlaybackInfo::default()
            }
        });

        let stream = stream.map_err(|e| BackendError::NoOutputDevice(e.to_string()))?;
        let (sink, decoder_total) = create_sink_at(stream, &path, Duration::ZERO)?;
        sink.set_volume(self.volume);

        let duration = header_duration(&path).or(decoder_total);
        tracing::debug!(path = %path.display(), ?duration, generation, "sink ready");

        self.sink = Some(sink);
        self.path = Some(path);
        self.publish(|info| {
            info.loaded = true;
            info.duration = duration;
        });
        Ok(())
    }

    /// Rebuild the sink at `at`, keeping the paused state.
    fn rebuild_at(&mut self, stream: &OutputStream, at: Duration) -> BackendResult<()> {
        let Some(path) = self.path.clone() else {
            return Err(BackendError::NoSource);
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let (sink, _) = create_sink_at(stream, &path, at)?;
        sink.set_volume(self.volume);
        if !self.paused {
            sink.play();
        }
        self.sink = Some(sink);
        self.offset = at;
        self.ended_sent = false;
        Ok(())
    }

    fn do_play(&mut self, stream: Result<&OutputStream, &str>) -> BackendResult<()> {
        let stream = stream.map_err(|e| BackendError::NoOutputDevice(e.to_string()))?;
        let Some(sink) = self.sink.as_ref() else {
            return Err(BackendError::NoSource);
        };

        // A drained sink restarts from the top.
        if sink.empty() {
            self.rebuild_at(stream, Duration::ZERO)?;
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.paused = false;
        self.ended_sent = false;
        self.publish(|info| info.playing = true);
        self.emit(MediaEvent::PlayingChanged { playing: true });
        Ok(())
    }

    fn do_pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.paused = true;
        let position = self.position();
        self.publish(|info| {
            info.playing = false;
            info.position = position;
        });
        self.emit(MediaEvent::PlayingChanged { playing: false });
    }

    fn do_seek(&mut self, stream: Result<&OutputStream, &str>, target: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        let seeked = self.offset.is_zero() && sink.try_seek(target).is_ok();
        if !seeked {
            // Fall back to rebuilding the sink and skipping into the file.
            let rebuilt = match stream {
                Ok(stream) => self.rebuild_at(stream, target),
                Err(e) => Err(BackendError::NoOutputDevice(e.to_string())),
            };
            if let Err(err) = rebuilt {
                tracing::warn!(%err, "seek failed");
                return;
            }
        }
        self.ended_sent = false;

        let position = self.position();
        self.publish(|info| info.position = position);
        self.emit(MediaEvent::TimeUpdate {
            current_time: position.as_secs_f64(),
        });
    }

    fn do_set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume);
        }
    }

    /// Periodic tick: publish position and detect natural end of media.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let drained = sink.empty();
        let position = self.position();

        self.publish(|info| info.position = position);
        self.emit(MediaEvent::TimeUpdate {
            current_time: position.as_secs_f64(),
        });

        if drained && !self.ended_sent {
            self.ended_sent = true;
            self.paused = true;
            self.publish(|info| info.playing = false);
            self.emit(MediaEvent::PlayingChanged { playing: false });
            self.emit(MediaEvent::Ended);
        }
    }

    fn announce_metadata(&self) {
        let info = match self.playback_info.lock() {
            Ok(info) => info.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        self.emit(MediaEvent::MetadataLoaded {
            duration: info.duration.map(|d| d.as_secs_f64()),
        });
        self.emit(MediaEvent::Progress {
            buffered: buffered_for(&info),
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.sink.take() {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(&sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
        // Update shared state so the UI doesn't keep showing Playing.
        self.publish(|info| info.playing = false);
    }
}

fn open_stream() -> Result<OutputStream, String> {
    let mut stream = OutputStreamBuilder::open_default_stream().map_err(|e| e.to_string())?;
    // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
    // but noisy for a TUI app.
    stream.log_on_drop(false);
    Ok(stream)
}

fn as_stream_ref(stream: &Result<OutputStream, String>) -> Result<&OutputStream, &str> {
    stream.as_ref().map_err(String::as_str)
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    events: Sender<Envelope>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = open_stream();
        match &stream {
            Ok(_) => tracing::info!("audio output opened"),
            Err(err) => tracing::error!(%err, "no audio output device; playback disabled"),
        }

        let mut state = AudioState {
            sink: None,
            path: None,
            paused: true,
            volume: 1.0,
            offset: Duration::ZERO,
            ended_sent: false,
            generation: 0,
            playback_info,
            events,
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { path, reply } => {
                        let result = state.do_load(as_stream_ref(&stream), path);
                        let loaded = result.is_ok();
                        let _ = reply.send(result);
                        if loaded {
                            state.announce_metadata();
                        }
                    }
                    AudioCmd::Play { reply } => {
                        let _ = reply.send(state.do_play(as_stream_ref(&stream)));
                    }
                    AudioCmd::Pause => state.do_pause(),
                    AudioCmd::Seek { target, reply } => {
                        state.do_seek(as_stream_ref(&stream), target);
                        let _ = reply.send(());
                    }
                    AudioCmd::SetVolume(level) => state.do_set_volume(level),
                    AudioCmd::Quit { fade_out_ms } => {
                        state.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => state.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    state.quit(0);
                    break;
                }
            }
        }
        tracing::debug!("audio thread finished");
    })
}

