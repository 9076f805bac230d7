//! Numeric input for the seek and volume sliders (range 0–100).

/// Granularity of the seek slider, in percent.
pub const SEEK_STEP: f64 = 0.1;
/// Granularity of the volume slider, in percent.
pub const VOLUME_STEP: f64 = 1.0;

/// Accept a raw slider value: non-finite is rejected, the rest clamped to `[0, 100]`.
pub fn slider_value(raw: f64) -> Option<f64> {
    raw.is_finite().then(|| raw.clamp(0.0, 100.0))
}

/// Parse typed slider input such as `"42"`, `" 12.5 "` or `"80%"`.
pub fn parse_slider_input(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw).trim();
    raw.parse::<f64>().ok().and_then(slider_value)
}

/// Round `value` to the nearest multiple of `step`, staying inside `[0, 100]`.
pub fn snap(value: f64, step: f64) -> f64 {
    ((value / step).round() * step).clamp(0.0, 100.0)
}
