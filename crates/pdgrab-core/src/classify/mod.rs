//! Request classification: segment/manifest URL -> progressive download URL.
//!
//! The classifier is stateless and purely syntactic. It never fetches the
//! rewritten URL, so a candidate may turn out to be unfetchable; that is the
//! price for adding no latency and no extra requests to the page.
//!
//! Pipeline for one request URL:
//! 1. relevance filter (segment, playlist and manifest path conventions);
//! 2. canonicalization via the rules in [`rules`];
//! 3. acceptance gate (must land on a progressive root or end in `.mp4`);
//! 4. query string reattachment;
//! 5. media kind detection on the untouched request URL.

pub mod rules;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use rules::{ROOT_RULES, STEM_RULES};

static MEDIA_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)/scf/hls/|/hls/|/serveFlavor/|/seg-|/segment/|/chunklist|/frag-|\.m3u8(\?|$)|\.ts(\?|$)",
    )
    .expect("static regex")
});

static PROGRESSIVE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/pd/").expect("static regex"));

static MP4_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.mp4$").expect("static regex"));

static AUDIO_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/audio/|audio").expect("static regex"));

/// Kind of media a capture points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl MediaType {
    /// Detect the media kind from the request URL as observed.
    pub fn detect(source_url: &str) -> Self {
        if AUDIO_MARKER.is_match(source_url) {
            MediaType::Audio
        } else {
            MediaType::Video
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// An accepted request: where to download the whole asset, and what it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub download_url: String,
    pub media_type: MediaType,
}

/// True if the URL follows a known segment, playlist or manifest convention.
pub fn is_media_request(url: &str) -> bool {
    MEDIA_REQUEST.is_match(url)
}

/// Classify a raw request URL. `None` means the request is not a candidate,
/// which is the expected outcome for most traffic on a page.
pub fn classify(request_url: &str) -> Option<Classification> {
    if !is_media_request(request_url) {
        return None;
    }
    let download_url = canonicalize(request_url)?;
    Some(Classification {
        download_url,
        media_type: MediaType::detect(request_url),
    })
}

/// Rewrite a URL into its whole-asset form, keeping its query string.
///
/// Returns `None` when the rewritten URL is empty or still does not point at
/// a fetchable asset. Applying this to its own output yields the same URL,
/// unless the path carries a second `/hls/` root after `/scf/hls/`: only one
/// root is rewritten per pass.
pub fn canonicalize(url: &str) -> Option<String> {
    let (base, query) = match url.find('?') {
        Some(at) => url.split_at(at),
        None => (url, ""),
    };

    let mut stem = ROOT_RULES
        .iter()
        .find_map(|rule| rule(base))
        .unwrap_or_else(|| base.to_string());
    for rule in STEM_RULES {
        if let Some(next) = rule(&stem) {
            stem = next;
        }
    }

    if stem.is_empty() {
        return None;
    }
    if !PROGRESSIVE_PATH.is_match(&stem) && !MP4_SUFFIX.is_match(&stem) {
        return None;
    }

    if !stem.contains('?') && !query.is_empty() {
        stem.push_str(query);
    }
    Some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCF_SEGMENT: &str = "https://cfvod.kaltura.com/scf/hls/p/2323111/sp/232311100/serveFlavor/entryId/1_abc/v/1/ev/3/flavorId/1_xyz/name/a.mp4/seg-3-v1-a1.ts?token=x";

    #[test]
    fn unrelated_requests_are_rejected() {
        for url in [
            "https://canvas.ucsd.edu/courses/1/modules",
            "https://cdnapisec.kaltura.com/api_v3/service/session",
            "https://cdn.example.com/static/app.js",
            "https://cdn.example.com/thumbs/poster.jpg?width=300",
            "https://cdn.example.com/tsconfig.json",
        ] {
            assert!(!is_media_request(url), "{url}");
            assert_eq!(classify(url), None, "{url}");
        }
    }

    #[test]
    fn segmented_flavor_segment_becomes_progressive_url() {
        let c = classify(SCF_SEGMENT).expect("accepted");
        assert_eq!(
            c.download_url,
            "https://cfvod.kaltura.com/pd/p/2323111/sp/232311100/serveFlavor/entryId/1_abc/v/1/ev/3/flavorId/1_xyz/name/a.mp4?token=x"
        );
        assert_eq!(c.media_type, MediaType::Video);
    }

    #[test]
    fn generic_hls_master_playlist() {
        let c = classify("https://host.example.com/p/1/hls/name/Lecture1/master.m3u8")
            .expect("accepted");
        assert_eq!(c.download_url, "https://host.example.com/p/1/pd/name/Lecture1");
        assert_eq!(c.media_type, MediaType::Video);
    }

    #[test]
    fn chunklist_collapses_to_asset_stem() {
        let c = classify("https://host.example.com/hls/vod/asset42/chunklist_b800000.m3u8")
            .expect("accepted");
        assert_eq!(c.download_url, "https://host.example.com/pd/vod/asset42");
    }

    #[test]
    fn mp4_stem_is_accepted_without_progressive_root() {
        let c = classify("https://cdn.example.com/vod/clip.mp4/seg-12-v1-a1.ts")
            .expect("accepted");
        assert_eq!(c.download_url, "https://cdn.example.com/vod/clip.mp4");
    }

    #[test]
    fn manifest_without_progressive_target_is_rejected() {
        assert!(is_media_request("https://cdn.example.com/live/stream.m3u8"));
        assert_eq!(classify("https://cdn.example.com/live/stream.m3u8"), None);
        assert_eq!(classify("https://cdn.example.com/live/seg-1.ts"), None);
    }

    #[test]
    fn empty_stem_is_rejected() {
        assert_eq!(canonicalize("/seg-1.ts"), None);
        assert_eq!(classify("/seg-1.ts?x=1"), None);
    }

    #[test]
    fn query_is_reattached() {
        let c = classify("https://h.example.com/hls/name/L2/index.m3u8?ks=abc&ref=1")
            .expect("accepted");
        assert_eq!(c.download_url, "https://h.example.com/pd/name/L2?ks=abc&ref=1");
    }

    #[test]
    fn ts_suffix_before_query_is_relevant() {
        assert!(is_media_request("https://h.example.com/v/clip.mp4.ts?x=1"));
        let c = classify("https://h.example.com/v/clip.mp4.ts?x=1").expect("accepted");
        assert_eq!(c.download_url, "https://h.example.com/v/clip.mp4?x=1");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for url in [
            SCF_SEGMENT,
            "https://host.example.com/p/1/hls/name/Lecture1/master.m3u8",
            "https://cdn.example.com/vod/clip.mp4/seg-12-v1-a1.ts",
            "https://h.example.com/hls/name/L2/index.m3u8?ks=abc",
        ] {
            let once = canonicalize(url).expect("accepted");
            let twice = canonicalize(&once).expect("still accepted");
            assert_eq!(once, twice, "{url}");
        }
    }

    #[test]
    fn second_hls_root_is_rewritten_on_each_pass() {
        // Only the first delivery root is rewritten per pass, so a path that
        // carries both `/scf/hls/` and `/hls/` keeps changing.
        let once = canonicalize("https://h/scf/hls/a/hls/b/seg-1.ts").expect("accepted");
        assert_eq!(once, "https://h/pd/a/hls/b");
        let twice = canonicalize(&once).expect("still accepted");
        assert_eq!(twice, "https://h/pd/a/pd/b");
        assert_eq!(canonicalize(&twice).as_deref(), Some("https://h/pd/a/pd/b"));
    }

    #[test]
    fn segments_of_one_asset_share_a_download_url() {
        let a = classify("https://h.example.com/scf/hls/p/1/entryId/0_e/seg-1-v1-a1.ts").unwrap();
        let b = classify("https://h.example.com/scf/hls/p/1/entryId/0_e/seg-2-v1-a1.ts").unwrap();
        assert_eq!(a.download_url, b.download_url);
    }

    #[test]
    fn audio_is_detected_on_the_source_url() {
        assert_eq!(
            MediaType::detect("https://h.example.com/hls/audio/track1/seg-1.ts"),
            MediaType::Audio
        );
        assert_eq!(
            MediaType::detect("https://h.example.com/hls/AudioOnly/seg-1.ts"),
            MediaType::Audio
        );
        assert_eq!(
            MediaType::detect("https://h.example.com/hls/video/seg-1.ts"),
            MediaType::Video
        );
        let c = classify("https://h.example.com/hls/p/1/audio/en/seg-4.ts").unwrap();
        assert_eq!(c.download_url, "https://h.example.com/pd/p/1/audio/en");
        assert_eq!(c.media_type, MediaType::Audio);
    }

    #[test]
    fn media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Audio).unwrap(), "\"audio\"");
        assert_eq!(MediaType::Video.to_string(), "video");
    }
}
