//! Progress reflection values
//!
//! Converts `currentTime`/`duration` into what the host page's progress
//! controls display: the elapsed label, the total label, and the fill
//! percentage shared by the progress bar width and the scrub input value.

use crate::time::format_seconds;

/// Display values for one `timeupdate`
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Elapsed time, `MM:SS`
    pub elapsed: String,

    /// Total duration, `MM:SS` (`00:00` until known)
    pub total: String,

    /// Played share of the track, in `[0, 100]`
    pub percent: f64,
}

impl ProgressSnapshot {
    pub fn new(current_time: f64, duration: f64) -> Self {
        let percent = if duration.is_finite() && duration > 0.0 && current_time.is_finite() {
            (current_time / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            elapsed: format_seconds(current_time),
            total: format_seconds(duration),
            percent,
        }
    }

    /// CSS width for the progress fill element
    pub fn fill_width(&self) -> String {
        format!("{:.2}%", self.percent)
    }

    /// Value for the scrub input
    pub fn input_value(&self) -> String {
        format!("{:.2}", self.percent)
    }
}

/// Position in seconds for a scrub input value in percent
///
/// `None` while the duration is unknown or the value is not a number.
pub fn seek_position(percent: f64, duration: f64) -> Option<f64> {
    if !percent.is_finite() || !duration.is_finite() || duration <= 0.0 {
        return None;
    }
    Some(percent.clamp(0.0, 100.0) / 100.0 * duration)
}
