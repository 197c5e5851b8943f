//! Per-tab badge indicator (candidate count shown on the toolbar button).

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::tab::TabId;

/// Default badge background color.
pub const DEFAULT_BADGE_COLOR: &str = "#4CAF50";

/// Sink for badge updates. Implementations must not fail the caller.
pub trait BadgeIndicator: Send + Sync {
    /// Set the badge text for a tab: empty, or the decimal candidate count.
    fn set_text(&self, tab: TabId, text: &str);

    fn set_color(&self, tab: TabId, color: &str);
}

/// Badge sink that only emits tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBadge;

impl BadgeIndicator for TracingBadge {
    fn set_text(&self, tab: TabId, text: &str) {
        tracing::debug!(tab = %tab, text, "badge text");
    }

    fn set_color(&self, tab: TabId, color: &str) {
        tracing::debug!(tab = %tab, color, "badge color");
    }
}

/// Last badge state seen for a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeState {
    pub text: String,
    pub color: Option<String>,
}

/// Badge sink that keeps the latest state per tab in memory.
#[derive(Debug, Default)]
pub struct MemoryBadge {
    tabs: RwLock<BTreeMap<TabId, BadgeState>>,
}

impl MemoryBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab: TabId) -> Option<BadgeState> {
        self.tabs.read().ok()?.get(&tab).cloned()
    }

    /// All tabs that received a badge update, ordered by tab id.
    pub fn all(&self) -> Vec<(TabId, BadgeState)> {
        self.tabs
            .read()
            .map(|tabs| tabs.iter().map(|(t, s)| (*t, s.clone())).collect())
            .unwrap_or_default()
    }
}

impl BadgeIndicator for MemoryBadge {
    fn set_text(&self, tab: TabId, text: &str) {
        if let Ok(mut tabs) = self.tabs.write() {
            tabs.entry(tab).or_default().text = text.to_string();
        }
    }

    fn set_color(&self, tab: TabId, color: &str) {
        if let Ok(mut tabs) = self.tabs.write() {
            tabs.entry(tab).or_default().color = Some(color.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_badge_tracks_latest_state() {
        let badge = MemoryBadge::new();
        let tab = TabId::from(5);
        assert_eq!(badge.get(tab), None);

        badge.set_text(tab, "2");
        badge.set_color(tab, DEFAULT_BADGE_COLOR);
        badge.set_text(tab, "3");
        assert_eq!(
            badge.get(tab),
            Some(BadgeState {
                text: "3".to_string(),
                color: Some(DEFAULT_BADGE_COLOR.to_string()),
            })
        );

        badge.set_text(TabId::from(1), "");
        let all = badge.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, TabId::from(1));
    }

    #[test]
    fn tracing_badge_accepts_registry_updates() {
        use crate::capture::{CaptureRegistry, RecordOutcome};
        use crate::classify::MediaType;
        use crate::store::MemoryStore;
        use std::sync::Arc;

        let mut reg = CaptureRegistry::new(Arc::new(MemoryStore::new()), Arc::new(TracingBadge));
        let tab = TabId::from(2);
        assert_eq!(
            reg.record(tab, "https://h/pd/a", "s", MediaType::Video),
            RecordOutcome::Added { index: 0, total: 1 }
        );
        reg.clear(tab);
        assert!(reg.snapshot(tab).is_empty());
    }
}
