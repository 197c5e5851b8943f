//! Request pipeline: classify, resolve the target tab, record.
//!
//! `CaptureService` is the process-wide state object the host feeds. It owns
//! the registry behind one async mutex. Tab resolution happens before the
//! lock is taken, and the dedup check plus append run under it, so two
//! in-flight requests for the same tab can never both append the same asset.

mod resolve;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::allow_list::AllowList;
use crate::capture::{Capture, CaptureRegistry, RecordOutcome};
use crate::classify::{classify, Classification};
use crate::events::{Dispatch, RequestEvent};
use crate::lifecycle::{self, TabEvent};
use crate::tab::TabId;

pub use resolve::{NoActiveTab, TabResolver, TrackedActiveTab};

/// What happened to one observed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Host not on the allow-list; the host would never have reported it.
    NotObserved,
    /// Not a streaming-media candidate.
    Rejected,
    /// Accepted, but no valid tab could be resolved.
    NoTab,
    Recorded {
        tab: TabId,
        classification: Classification,
        outcome: RecordOutcome,
    },
}

pub struct CaptureService {
    registry: Arc<Mutex<CaptureRegistry>>,
    resolver: Arc<dyn TabResolver>,
    allow_list: Option<AllowList>,
}

impl CaptureService {
    pub fn new(registry: CaptureRegistry, resolver: Arc<dyn TabResolver>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            resolver,
            allow_list: None,
        }
    }

    /// Drop requests whose origin is not on `allow_list`.
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = Some(allow_list);
        self
    }

    /// Shared handle to the registry.
    pub fn registry(&self) -> Arc<Mutex<CaptureRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Handle one outbound request. Never fails; see [`PipelineOutcome`].
    pub async fn on_before_request(&self, event: &RequestEvent) -> PipelineOutcome {
        if let Some(list) = &self.allow_list {
            if !list.allows(&event.url) {
                trace!(url = %event.url, "request outside allow-list");
                return PipelineOutcome::NotObserved;
            }
        }

        let Some(classification) = classify(&event.url) else {
            trace!(url = %event.url, "request rejected");
            return PipelineOutcome::Rejected;
        };

        let Some(tab) = self.resolve_tab(event.tab_id).await else {
            debug!(url = %event.url, raw_tab = event.tab_id, "no target tab; dropping candidate");
            return PipelineOutcome::NoTab;
        };

        let outcome = self.registry.lock().await.record(
            tab,
            &classification.download_url,
            &event.url,
            classification.media_type,
        );
        PipelineOutcome::Recorded {
            tab,
            classification,
            outcome,
        }
    }

    /// Apply a tab lifecycle event. Returns the tab that was cleared.
    ///
    /// Activations are also passed to the resolver, so requests without a
    /// tab land on the tab activated last.
    pub async fn on_tab_event(&self, event: TabEvent) -> Option<TabId> {
        if let TabEvent::Activated(raw) = event {
            self.resolver.tab_activated(raw);
        }
        lifecycle::apply(&mut *self.registry.lock().await, event)
    }

    /// Route any host event to the matching handler.
    pub async fn dispatch(&self, event: impl Into<Dispatch>) -> Option<PipelineOutcome> {
        match event.into() {
            Dispatch::Request(request) => Some(self.on_before_request(&request).await),
            Dispatch::Tab(tab_event) => {
                self.on_tab_event(tab_event).await;
                None
            }
        }
    }

    pub async fn snapshot(&self, tab: TabId) -> Vec<Capture> {
        self.registry.lock().await.snapshot(tab)
    }

    pub async fn clear(&self, tab: TabId) {
        self.registry.lock().await.clear(tab);
    }

    async fn resolve_tab(&self, raw: i64) -> Option<TabId> {
        if let Some(tab) = TabId::new(raw) {
            return Some(tab);
        }
        TabId::new(self.resolver.active_tab().await?)
    }
}

#[cfg(test)]
mod tests;
