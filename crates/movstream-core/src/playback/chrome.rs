//! Player chrome: whatever renders status, controls and errors around the element.

use super::element::ElementStatus;
use super::PlaybackState;
use crate::preferences::Preferences;

pub trait PlayerChrome: Send {
    /// Applies theme and control-style preferences.
    fn apply_preferences(&mut self, prefs: &Preferences);

    /// Loading/progress text while the pipeline works.
    fn show_status(&mut self, message: &str);

    /// Media is ready; refresh play/pause, volume, progress and time displays.
    fn on_loaded(&mut self, status: &ElementStatus);

    /// Replaces the video with an error message.
    fn show_error(&mut self, message: &str);

    fn on_state(&mut self, _state: &PlaybackState) {}
}

/// `M:SS` clock text; `0:00` for NaN or negative input.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Played fraction as a percentage, clamped to `0..=100`.
pub fn progress_percent(status: &ElementStatus) -> f64 {
    if !status.duration.is_finite() || status.duration <= 0.0 {
        return 0.0;
    }
    (status.current_time / status.duration * 100.0).clamp(0.0, 100.0)
}
