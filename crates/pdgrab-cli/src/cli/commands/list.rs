//! `pdgrab list` – show stored captures.

use anyhow::Result;
use pdgrab_core::config::PdgrabConfig;

use super::super::session::{log_badge, open_registry, tab_arg};
use super::print_tab;

pub fn run_list(cfg: &PdgrabConfig, tab: Option<i64>) -> Result<()> {
    let registry = open_registry(cfg, log_badge())?;
    let tabs = match tab {
        Some(raw) => vec![tab_arg(raw)?],
        None => registry.tabs(),
    };

    if tabs.is_empty() {
        println!("No stream candidates recorded.");
    }
    for tab in tabs {
        print_tab(tab, &registry.snapshot(tab));
    }
    Ok(())
}
