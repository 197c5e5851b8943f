//! Tab lifecycle binding: which tab signals reset a tab's captures.
//!
//! Closing a tab, activating it, and starting a new top-level load all clear
//! the tab. A load start inside a single-page app clears too, even if the
//! captured streams would still be valid.

use serde::{Deserialize, Serialize};

use crate::capture::CaptureRegistry;
use crate::tab::TabId;

/// Loading status reported with a tab update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Lifecycle signal from the host. Tab ids are raw host values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    Removed(i64),
    Activated(i64),
    Updated { tab_id: i64, status: Option<TabStatus> },
}

impl TabEvent {
    /// The tab this event clears, if any.
    pub fn cleared_tab(&self) -> Option<TabId> {
        match *self {
            TabEvent::Removed(raw) | TabEvent::Activated(raw) => TabId::new(raw),
            TabEvent::Updated {
                tab_id,
                status: Some(TabStatus::Loading),
            } => TabId::new(tab_id),
            TabEvent::Updated { .. } => None,
        }
    }
}

/// Apply a lifecycle event to the registry. Returns the tab that was cleared.
pub fn apply(registry: &mut CaptureRegistry, event: TabEvent) -> Option<TabId> {
    let tab = event.cleared_tab()?;
    tracing::debug!(tab = %tab, ?event, "clearing captures on tab lifecycle event");
    registry.clear(tab);
    Some(tab)
}
