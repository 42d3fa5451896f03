//! Elapsed-time labels

/// Format a duration in seconds as `MM:SS`
///
/// Seconds are truncated, not rounded, and minutes grow past two digits
/// instead of rolling over into hours (`3900.0` is `"65:00"`).
///
/// Negative, NaN and infinite inputs format as `"00:00"`. Media elements
/// report a NaN duration until metadata arrives, so the label stays
/// well-formed while loading.
pub fn format_seconds(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
