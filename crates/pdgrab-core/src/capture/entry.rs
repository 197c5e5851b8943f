//! Capture record and its logical identity.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::classify::MediaType;

use super::label::preview_label;

/// One discovered, user-selectable media asset for a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    /// `<unix-millis>-<index>`; unique within a tab, ordered by discovery.
    pub id: String,
    /// Canonical download URL.
    pub url: String,
    /// Request URL the capture was derived from.
    pub source_url: String,
    pub label: String,
    pub media_type: MediaType,
}

impl Capture {
    /// Build the capture appended at position `index` (0-based) of a tab.
    pub fn new(index: usize, url: &str, source_url: &str, media_type: MediaType) -> Self {
        Self {
            id: format!("{}-{}", now_millis(), index),
            url: url.to_string(),
            source_url: source_url.to_string(),
            label: preview_label(source_url, index),
            media_type,
        }
    }

    /// Dedup key of this capture.
    pub fn identity(&self) -> String {
        capture_identity(&self.url)
    }
}

/// Logical identity of a download URL: query string stripped, lowercased.
pub fn capture_identity(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_lowercase()
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
