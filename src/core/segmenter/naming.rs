//! Output name synthesis for split files.

use regex::Regex;
use std::sync::OnceLock;

/// Trailing extension: a dot followed by anything but dots and slashes
fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.[^/.]+$").expect("static pattern is valid"))
}

/// Remove the trailing extension from a file name, if it has one
pub fn strip_extension(name: &str) -> &str {
    match extension_pattern().find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Name for the still half of a split motion photo
pub fn image_name(original: &str) -> String {
    format!("{}.jpg", strip_extension(original))
}

/// Name for the video half of a split motion photo
pub fn video_name(original: &str) -> String {
    format!("{}.mp4", strip_extension(original))
}
