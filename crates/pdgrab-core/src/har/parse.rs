//! Minimal HAR 1.2 structures: just enough to replay the recorded requests.

use serde::Deserialize;

/// Root HAR log (top-level wrapper).
#[derive(Debug, Deserialize)]
pub struct HarLog {
    pub log: HarRoot,
}

#[derive(Debug, Deserialize)]
pub struct HarRoot {
    #[serde(default)]
    pub pages: Vec<HarPage>,
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarPage {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct HarEntry {
    #[serde(default)]
    pub pageref: Option<String>,
    pub request: HarRequest,
}

#[derive(Debug, Deserialize)]
pub struct HarRequest {
    pub url: String,
}
