//! Display-only quantities derived from playback state.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every draw.

use crate::config::TimeField;
use crate::playback::TimeRange;

const PLAYED: char = '█';
const BUFFERED: char = '▒';
const EMPTY: char = '░';

/// `current / duration` as a percentage in `[0, 100]`.
///
/// Unknown, zero or non-finite durations yield 0.
pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / duration * 100.0).clamp(0.0, 100.0)
}

/// How much of the source is available, from the end of the last range.
pub fn buffered_percent(ranges: &[TimeRange], duration: f64) -> f64 {
    ranges
        .last()
        .map_or(0.0, |r| progress_percent(r.end, duration))
}

/// `MM:SS`, minutes at least two digits and otherwise unbounded.
pub fn time_label(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Build the time summary (elapsed/total/remaining) shown on the seek bar.
pub fn time_summary(
    current: f64,
    duration: f64,
    fields: &[TimeField],
    separator: &str,
) -> Option<String> {
    let known = duration.is_finite() && duration > 0.0;
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(time_label(current)),
            TimeField::Total => known.then(|| time_label(duration)),
            TimeField::Remaining => {
                known.then(|| format!("-{}", time_label((duration - current).max(0.0))))
            }
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}

/// Render a `width`-cell bar: played, then buffered-but-unplayed, then empty.
pub fn bar_cells(width: usize, progress: f64, buffered: f64) -> String {
    let cells = |pct: f64| -> usize {
        let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
        ((pct / 100.0) * width as f64).round() as usize
    };
    let played = cells(progress).min(width);
    let loaded = cells(buffered).clamp(played, width);

    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n(PLAYED, played));
    bar.extend(std::iter::repeat_n(BUFFERED, loaded - played));
    bar.extend(std::iter::repeat_n(EMPTY, width - loaded));
    bar
}
