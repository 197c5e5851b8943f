//! Turn a HAR file into the request events a browser would have reported.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::events::RequestEvent;

use super::parse::HarLog;

/// How recorded requests are assigned to tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAssignment {
    /// Every request belongs to the given raw tab id.
    Single(i64),
    /// Each HAR page gets its own tab, numbered upward from `first` in page
    /// order. Entries without a known page go to `first`.
    PerPage { first: i64 },
}

/// Reads a HAR file and returns one request event per entry, in file order.
pub fn load_har_requests(path: &Path, tabs: TabAssignment) -> Result<Vec<RequestEvent>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read HAR file: {}", path.display()))?;
    let har: HarLog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse HAR JSON: {}", path.display()))?;
    Ok(request_events(har, tabs))
}

pub(super) fn request_events(har: HarLog, tabs: TabAssignment) -> Vec<RequestEvent> {
    let (first, page_tabs) = match tabs {
        TabAssignment::Single(tab) => (tab, HashMap::new()),
        TabAssignment::PerPage { first } => {
            let page_tabs: HashMap<String, i64> = har
                .log
                .pages
                .iter()
                .zip(first..)
                .map(|(page, tab)| (page.id.clone(), tab))
                .collect();
            (first, page_tabs)
        }
    };

    har.log
        .entries
        .into_iter()
        .map(|entry| {
            let tab = entry
                .pageref
                .as_deref()
                .and_then(|page| page_tabs.get(page).copied())
                .unwrap_or(first);
            RequestEvent::new(entry.request.url, tab)
        })
        .collect()
}
