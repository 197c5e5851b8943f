//! `pdgrab import-har <path>` – record candidates from a HAR file.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use pdgrab_core::badge::MemoryBadge;
use pdgrab_core::config::PdgrabConfig;
use pdgrab_core::har::{self, TabAssignment};
use pdgrab_core::service::{NoActiveTab, PipelineOutcome};

use super::super::session::{open_service, tab_arg};
use super::print_tab;

pub async fn run_import_har(
    cfg: &PdgrabConfig,
    path: &Path,
    tab: i64,
    per_page: bool,
) -> Result<()> {
    tab_arg(tab)?;
    let assignment = if per_page {
        TabAssignment::PerPage { first: tab }
    } else {
        TabAssignment::Single(tab)
    };
    let requests = har::load_har_requests(path, assignment)?;

    let badge = Arc::new(MemoryBadge::new());
    let service = open_service(cfg, badge, Arc::new(NoActiveTab))?;

    let mut touched = BTreeSet::new();
    let mut rejected = 0usize;
    for request in &requests {
        match service.on_before_request(request).await {
            PipelineOutcome::Recorded { tab, .. } => {
                touched.insert(tab);
            }
            PipelineOutcome::Rejected | PipelineOutcome::NotObserved | PipelineOutcome::NoTab => {
                rejected += 1;
            }
        }
    }
    tracing::info!(
        "import-har path={} requests={} ignored={}",
        path.display(),
        requests.len(),
        rejected
    );

    if touched.is_empty() {
        println!("No stream candidates found in {}.", path.display());
    }
    for tab in touched {
        print_tab(tab, &service.snapshot(tab).await);
    }
    Ok(())
}
