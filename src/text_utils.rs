//! Display helpers shared by the player and the upload flow.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("extension pattern is valid"));

/// Format whole seconds as `m:ss`; minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Strip the last extension from a file name: `notes.final.pdf` -> `notes.final`.
pub fn title_from_filename(file_name: &str) -> String {
    TRAILING_EXTENSION.replace(file_name, "").into_owned()
}
