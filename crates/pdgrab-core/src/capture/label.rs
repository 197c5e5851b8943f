//! Human-readable capture labels derived from the source URL.

use std::sync::LazyLock;

use regex::Regex;

static FLAVOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/flavorId/([^/]+)").expect("static regex"));

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/name/([^/]+)").expect("static regex"));

/// Label for the capture at 0-based position `index`.
///
/// Priority: `/flavorId/<id>` verbatim, then the percent-decoded
/// `/name/<name>` segment, then `Candidate <index + 1>`. A name segment that
/// does not decode to UTF-8 is used as-is.
pub fn preview_label(source_url: &str, index: usize) -> String {
    if let Some(flavor) = FLAVOR_ID.captures(source_url) {
        return flavor[1].to_string();
    }

    if let Some(name) = NAME.captures(source_url) {
        let raw = &name[1];
        return urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string());
    }

    format!("Candidate {}", index + 1)
}
