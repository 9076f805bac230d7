//! Utilities for creating `rodio` sinks from source paths.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::{BackendError, BackendResult};

/// Open and decode `path`, skipping to `start_at`.
///
/// Returns the source and the decoder's own length estimate.
pub(super) fn open_source(
    path: &Path,
    start_at: Duration,
) -> BackendResult<(impl Source + Send + 'static, Option<Duration>)> {
    let file = File::open(path).map_err(|source| BackendError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| BackendError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is our fallback seeking primitive; even Duration::ZERO is fine.
    Ok((decoder.skip_duration(start_at), total))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> BackendResult<(Sink, Option<Duration>)> {
    let (source, total) = open_source(path, start_at)?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Length from the container headers; cheaper and more reliable than the
/// decoder's estimate for VBR mp3.
pub(super) fn header_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
