//! `pdgrab pick <tab> <n>` – choose a capture to hand to a downloader.

use anyhow::{bail, Result};
use pdgrab_core::config::PdgrabConfig;
use pdgrab_core::present::suggested_filename;

use super::super::session::{log_badge, open_registry, tab_arg};

pub fn run_pick(cfg: &PdgrabConfig, tab: i64, index: usize, title: Option<&str>) -> Result<()> {
    let tab = tab_arg(tab)?;
    let registry = open_registry(cfg, log_badge())?;
    let captures = registry.snapshot(tab);
    if captures.is_empty() {
        bail!("no stream candidate available for tab {tab}");
    }
    let Some(capture) = index.checked_sub(1).and_then(|i| captures.get(i)) else {
        bail!(
            "candidate {index} out of range for tab {tab} (1..={})",
            captures.len()
        );
    };

    println!("{}", capture.url);
    println!("  file: {}", suggested_filename(title));
    Ok(())
}
