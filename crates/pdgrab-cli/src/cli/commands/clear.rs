//! `pdgrab clear <tab>` – drop a tab's captures.

use std::sync::Arc;

use anyhow::Result;
use pdgrab_core::config::PdgrabConfig;
use pdgrab_core::lifecycle::TabEvent;
use pdgrab_core::service::NoActiveTab;

use super::super::session::{log_badge, open_service, tab_arg};

pub async fn run_clear(cfg: &PdgrabConfig, tab: i64) -> Result<()> {
    let tab_id = tab_arg(tab)?;
    let service = open_service(cfg, log_badge(), Arc::new(NoActiveTab))?;
    service.on_tab_event(TabEvent::Removed(tab)).await;
    println!("Cleared captures for tab {tab_id}.");
    Ok(())
}
