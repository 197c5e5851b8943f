//! Helpers for whoever presents captures to the user.

use crate::capture::Capture;
use crate::classify::MediaType;

/// Base name used when no usable title is available.
pub const DEFAULT_BASENAME: &str = "Kaltura_Video";

/// Extension of every suggested file; captures are progressive MP4 downloads.
pub const DEFAULT_EXTENSION: &str = "mp4";

const MAX_BASENAME_CHARS: usize = 140;

/// One selectable line: `"<n>. [Audio] <label>"` with 0-based `index`.
pub fn display_line(index: usize, capture: &Capture) -> String {
    let tag = match capture.media_type {
        MediaType::Audio => "[Audio]",
        MediaType::Video => "[Video]",
    };
    format!("{}. {} {}", index + 1, tag, capture.label)
}

/// Sanitize a page title into a file base name.
///
/// - Replaces `<>:"/\|?*` and control characters with a space
/// - Collapses whitespace runs and trims
/// - Limits length to 140 characters
/// - Falls back to [`DEFAULT_BASENAME`] when nothing is left
pub fn sanitize_basename(title: Option<&str>) -> String {
    let Some(title) = title else {
        return DEFAULT_BASENAME.to_string();
    };

    let replaced: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(MAX_BASENAME_CHARS).collect();

    if capped.is_empty() {
        DEFAULT_BASENAME.to_string()
    } else {
        capped
    }
}

/// File name to save a capture under, e.g. `"Lecture 3.mp4"`.
pub fn suggested_filename(title: Option<&str>) -> String {
    format!("{}.{}", sanitize_basename(title), DEFAULT_EXTENSION)
}
