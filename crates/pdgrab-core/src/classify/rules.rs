//! Rewrite rules applied to the query-less part of a request URL.
//!
//! Each rule returns `Some(rewritten)` when it applies and `None` when it
//! leaves the input alone, so the canonicalizer can compose them in order.

use std::sync::LazyLock;

use regex::Regex;

/// A single rewrite step.
pub type Rule = fn(&str) -> Option<String>;

/// Delivery root used by segmented-flavor (`scf`) HLS packaging.
pub const SEGMENTED_FLAVOR_ROOT: &str = "/scf/hls/";

/// Delivery root that serves the whole asset in one response.
pub const PROGRESSIVE_ROOT: &str = "/pd/";

/// Markers that start the segment/fragment/chunk-list specific tail of a path.
pub const SEGMENT_MARKERS: [&str; 4] = ["/seg-", "/segment/", "/chunklist", "/frag-"];

static HLS_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/hls/").expect("static regex"));

static MANIFEST_SUFFIXES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)/(master|playlist|index)\.m3u8$").expect("static regex"),
        Regex::new(r"(?i)\.ts$").expect("static regex"),
        Regex::new(r"(?i)\.m3u8$").expect("static regex"),
    ]
});

/// Rules that rewrite the delivery root. Only the first one that applies runs.
pub const ROOT_RULES: [Rule; 2] = [rewrite_segmented_flavor_root, rewrite_hls_root];

/// Rules that trim the path down to the asset stem. All of them run, in order.
pub const STEM_RULES: [Rule; 2] = [truncate_at_segment_marker, strip_manifest_suffix];

/// `/scf/hls/` -> `/pd/` (first occurrence, exact case).
pub fn rewrite_segmented_flavor_root(path: &str) -> Option<String> {
    path.contains(SEGMENTED_FLAVOR_ROOT)
        .then(|| path.replacen(SEGMENTED_FLAVOR_ROOT, PROGRESSIVE_ROOT, 1))
}

/// `/hls/` (any case) -> `/pd/` (first occurrence).
pub fn rewrite_hls_root(path: &str) -> Option<String> {
    HLS_ROOT
        .is_match(path)
        .then(|| HLS_ROOT.replace(path, PROGRESSIVE_ROOT).into_owned())
}

/// Cut the path at the first occurrence of each segment marker.
pub fn truncate_at_segment_marker(path: &str) -> Option<String> {
    let mut stem = path;
    for marker in SEGMENT_MARKERS {
        if let Some(at) = stem.find(marker) {
            stem = &stem[..at];
        }
    }
    (stem.len() != path.len()).then(|| stem.to_string())
}

/// Drop a trailing manifest name, `.ts`, `.m3u8` and one trailing `/`.
pub fn strip_manifest_suffix(path: &str) -> Option<String> {
    let mut stem = path.to_string();
    for suffix in MANIFEST_SUFFIXES.iter() {
        if let Some(found) = suffix.find(&stem) {
            stem.truncate(found.start());
        }
    }
    if stem.ends_with('/') {
        stem.pop();
    }
    (stem.len() != path.len()).then_some(stem)
}
