//! Per-tab ordered capture sequences with write-through storage.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::badge::{BadgeIndicator, DEFAULT_BADGE_COLOR};
use crate::classify::MediaType;
use crate::store::{CaptureStore, StoreError};
use crate::tab::TabId;

use super::entry::{capture_identity, Capture};

/// Result of [`CaptureRegistry::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Appended at 0-based `index`; the tab now holds `total` captures.
    Added { index: usize, total: usize },
    /// A capture with the same logical identity already exists for the tab.
    Duplicate,
    /// The store could not be read or rejected the write; nothing changed.
    StoreFailed,
}

/// Owner of every tab's capture sequence.
///
/// The store is authoritative across processes; the in-memory map is a
/// write-through cache of it. A sequence only changes in memory after the
/// store accepted the change, so a storage failure leaves the registry as it
/// was and the next matching request retries naturally.
pub struct CaptureRegistry {
    tabs: HashMap<TabId, Vec<Capture>>,
    store: Arc<dyn CaptureStore>,
    badge: Arc<dyn BadgeIndicator>,
    badge_color: String,
}

impl CaptureRegistry {
    pub fn new(store: Arc<dyn CaptureStore>, badge: Arc<dyn BadgeIndicator>) -> Self {
        Self {
            tabs: HashMap::new(),
            store,
            badge,
            badge_color: DEFAULT_BADGE_COLOR.to_string(),
        }
    }

    pub fn with_badge_color(mut self, color: impl Into<String>) -> Self {
        self.badge_color = color.into();
        self
    }

    /// Append a capture unless the tab already holds one with the same identity.
    pub fn record(
        &mut self,
        tab: TabId,
        canonical_url: &str,
        source_url: &str,
        media_type: MediaType,
    ) -> RecordOutcome {
        let identity = capture_identity(canonical_url);
        let current = match self.hydrate(tab) {
            Ok(current) => current,
            Err(err) => {
                warn!(tab = %tab, error = %err, "failed to read stored captures; not recording");
                return RecordOutcome::StoreFailed;
            }
        };
        if current.iter().any(|c| c.identity() == identity) {
            debug!(tab = %tab, url = canonical_url, "duplicate capture dropped");
            return RecordOutcome::Duplicate;
        }

        let index = current.len();
        let mut next = current.to_vec();
        next.push(Capture::new(index, canonical_url, source_url, media_type));

        if let Err(err) = self.store.save(&tab.storage_key(), &next) {
            warn!(tab = %tab, error = %err, "failed to persist capture; retry on next request");
            return RecordOutcome::StoreFailed;
        }

        let total = next.len();
        debug!(tab = %tab, index, url = canonical_url, "capture recorded");
        self.tabs.insert(tab, next);
        self.badge.set_text(tab, &total.to_string());
        self.badge.set_color(tab, &self.badge_color);
        RecordOutcome::Added { index, total }
    }

    /// Drop every capture of a tab and reset its badge. Unknown tabs are fine.
    pub fn clear(&mut self, tab: TabId) {
        match self.store.remove(&tab.storage_key()) {
            Ok(()) => {
                self.tabs.remove(&tab);
            }
            Err(err) => {
                warn!(tab = %tab, error = %err, "failed to remove stored captures");
                // Keep an empty entry so stale stored data is not loaded back.
                self.tabs.insert(tab, Vec::new());
            }
        }
        self.badge.set_text(tab, "");
    }

    /// Current captures of a tab in discovery order. An unreadable store reads as empty.
    pub fn snapshot(&self, tab: TabId) -> Vec<Capture> {
        if let Some(captures) = self.tabs.get(&tab) {
            return captures.clone();
        }
        self.load_stored(tab).unwrap_or_else(|err| {
            warn!(tab = %tab, error = %err, "failed to read stored captures");
            Vec::new()
        })
    }

    /// Tabs that currently hold captures, in memory or in the store.
    pub fn tabs(&self) -> Vec<TabId> {
        let mut tabs: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|(_, captures)| !captures.is_empty())
            .map(|(tab, _)| *tab)
            .collect();
        match self.store.keys() {
            Ok(keys) => tabs.extend(
                keys.iter()
                    .filter_map(|k| TabId::from_storage_key(k))
                    .filter(|t| !self.tabs.contains_key(t)),
            ),
            Err(err) => warn!(error = %err, "failed to list stored captures"),
        }
        tabs.sort();
        tabs.dedup();
        tabs
    }

    /// Make sure the tab's sequence is cached, loading it from the store once.
    ///
    /// A failed read caches nothing, so the next call reads the store again.
    pub fn hydrate(&mut self, tab: TabId) -> Result<&[Capture], StoreError> {
        if !self.tabs.contains_key(&tab) {
            let stored = self.load_stored(tab)?;
            self.tabs.insert(tab, stored);
        }
        Ok(self.tabs.get(&tab).map(Vec::as_slice).unwrap_or(&[]))
    }

    fn load_stored(&self, tab: TabId) -> Result<Vec<Capture>, StoreError> {
        Ok(self.store.load(&tab.storage_key())?.unwrap_or_default())
    }
}

impl std::fmt::Debug for CaptureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureRegistry")
            .field("tabs", &self.tabs)
            .field("badge_color", &self.badge_color)
            .finish_non_exhaustive()
    }
}
