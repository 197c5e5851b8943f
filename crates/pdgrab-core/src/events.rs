//! Host events and the JSON-lines event log used to replay a browsing session.
//!
//! One event per line, tagged by `type`:
//!
//! ```text
//! {"type":"request","url":"https://.../seg-1.ts","tabId":12}
//! {"type":"tabActivated","tabId":12}
//! {"type":"tabUpdated","tabId":12,"status":"loading"}
//! {"type":"tabRemoved","tabId":12}
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::lifecycle::{TabEvent, TabStatus};

/// Outbound request observed by the host networking layer.
///
/// `tab_id` is the raw host value; negative means "not tied to a tab yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEvent {
    pub url: String,
    #[serde(rename = "tabId")]
    pub tab_id: i64,
}

impl RequestEvent {
    pub fn new(url: impl Into<String>, tab_id: i64) -> Self {
        Self {
            url: url.into(),
            tab_id,
        }
    }
}

/// Any event the host can deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BrowserEvent {
    Request {
        url: String,
        #[serde(rename = "tabId", default = "untracked_tab")]
        tab_id: i64,
    },
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    TabActivated {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    TabUpdated {
        #[serde(rename = "tabId")]
        tab_id: i64,
        #[serde(default)]
        status: Option<TabStatus>,
    },
}

fn untracked_tab() -> i64 {
    -1
}

/// Either half of the pipeline an event feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Request(RequestEvent),
    Tab(TabEvent),
}

impl From<BrowserEvent> for Dispatch {
    fn from(event: BrowserEvent) -> Self {
        match event {
            BrowserEvent::Request { url, tab_id } => {
                Dispatch::Request(RequestEvent { url, tab_id })
            }
            BrowserEvent::TabRemoved { tab_id } => Dispatch::Tab(TabEvent::Removed(tab_id)),
            BrowserEvent::TabActivated { tab_id } => Dispatch::Tab(TabEvent::Activated(tab_id)),
            BrowserEvent::TabUpdated { tab_id, status } => {
                Dispatch::Tab(TabEvent::Updated { tab_id, status })
            }
        }
    }
}

/// Parse a JSON-lines event log. Blank lines are skipped.
pub fn parse_event_lines(text: &str) -> Result<Vec<BrowserEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("parse event on line {}", i + 1))
        })
        .collect()
}

/// Read and parse an event log file.
pub fn load_event_log(path: &Path) -> Result<Vec<BrowserEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read event log: {}", path.display()))?;
    parse_event_lines(&text).with_context(|| format!("parse event log: {}", path.display()))
}
