//! Wiring shared by the commands: config -> store, registry, service.

use std::sync::Arc;

use anyhow::{Context, Result};
use pdgrab_core::badge::{BadgeIndicator, TracingBadge};
use pdgrab_core::capture::CaptureRegistry;
use pdgrab_core::config::PdgrabConfig;
use pdgrab_core::service::{CaptureService, TabResolver};
use pdgrab_core::store::JsonFileStore;
use pdgrab_core::tab::TabId;

pub fn open_store(cfg: &PdgrabConfig) -> Result<Arc<JsonFileStore>> {
    let path = match &cfg.store_path {
        Some(p) => p.clone(),
        None => JsonFileStore::default_path()?,
    };
    tracing::debug!("capture store at {}", path.display());
    Ok(Arc::new(JsonFileStore::open(path)))
}

/// Badge sink for commands that do not report badge state.
pub fn log_badge() -> Arc<dyn BadgeIndicator> {
    Arc::new(TracingBadge)
}

pub fn open_registry(
    cfg: &PdgrabConfig,
    badge: Arc<dyn BadgeIndicator>,
) -> Result<CaptureRegistry> {
    let store = open_store(cfg)?;
    Ok(CaptureRegistry::new(store, badge).with_badge_color(cfg.badge_color.clone()))
}

pub fn open_service(
    cfg: &PdgrabConfig,
    badge: Arc<dyn BadgeIndicator>,
    resolver: Arc<dyn TabResolver>,
) -> Result<CaptureService> {
    let registry = open_registry(cfg, badge)?;
    let service = CaptureService::new(registry, resolver);
    Ok(match cfg.allow_list()? {
        Some(list) => service.with_allow_list(list),
        None => service,
    })
}

pub fn tab_arg(raw: i64) -> Result<TabId> {
    TabId::new(raw).with_context(|| format!("tab id must be a non-negative integer, got {raw}"))
}
