//! Target tab resolution for requests not tied to a tab.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

/// Looks up the active tab of the last focused window.
///
/// This may suspend (a host query); the request pipeline treats it as a real
/// await point and does not hold the registry lock across it.
#[async_trait]
pub trait TabResolver: Send + Sync {
    /// Raw host id of the active tab, or `None` if there is no usable tab.
    async fn active_tab(&self) -> Option<i64>;

    /// Called for every tab activation the service sees.
    fn tab_activated(&self, _raw_tab: i64) {}
}

/// Resolver for hosts that never report an active tab.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActiveTab;

#[async_trait]
impl TabResolver for NoActiveTab {
    async fn active_tab(&self) -> Option<i64> {
        None
    }
}

/// Resolver that follows tab activations seen so far.
#[derive(Debug)]
pub struct TrackedActiveTab {
    active: AtomicI64,
}

impl TrackedActiveTab {
    pub fn new() -> Self {
        Self {
            active: AtomicI64::new(-1),
        }
    }

    pub fn set_active(&self, raw_tab: i64) {
        self.active.store(raw_tab, Ordering::SeqCst);
    }
}

impl Default for TrackedActiveTab {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabResolver for TrackedActiveTab {
    async fn active_tab(&self) -> Option<i64> {
        let raw = self.active.load(Ordering::SeqCst);
        (raw >= 0).then_some(raw)
    }

    fn tab_activated(&self, raw_tab: i64) {
        self.set_active(raw_tab);
    }
}
