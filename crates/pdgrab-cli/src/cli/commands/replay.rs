//! `pdgrab replay <path>` – replay a browser event log through the pipeline.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use pdgrab_core::badge::MemoryBadge;
use pdgrab_core::config::PdgrabConfig;
use pdgrab_core::events::load_event_log;
use pdgrab_core::service::TrackedActiveTab;

use super::super::session::open_service;
use super::print_tab;

pub async fn run_replay(cfg: &PdgrabConfig, path: &Path) -> Result<()> {
    let events = load_event_log(path)?;

    let badge = Arc::new(MemoryBadge::new());
    let service = open_service(cfg, badge.clone(), Arc::new(TrackedActiveTab::new()))?;

    for event in events {
        if let Some(outcome) = service.dispatch(event).await {
            tracing::debug!(?outcome, "replayed request");
        }
    }

    let badges = badge.all();
    if badges.is_empty() {
        println!("No tab received a badge update.");
    }
    for (tab, state) in badges {
        let text = if state.text.is_empty() { "-" } else { state.text.as_str() };
        println!("badge tab={tab} text={text}");
        let captures = service.snapshot(tab).await;
        if !captures.is_empty() {
            print_tab(tab, &captures);
        }
    }
    Ok(())
}
