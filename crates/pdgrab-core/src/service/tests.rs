//! Pipeline tests: allow-list, rejection, tab resolution, concurrency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::allow_list::AllowList;
use crate::badge::MemoryBadge;
use crate::capture::{CaptureRegistry, RecordOutcome};
use crate::classify::MediaType;
use crate::events::{BrowserEvent, RequestEvent};
use crate::lifecycle::{TabEvent, TabStatus};
use crate::store::MemoryStore;
use crate::tab::TabId;

use super::{CaptureService, NoActiveTab, PipelineOutcome, TabResolver, TrackedActiveTab};

/// Resolver that suspends before answering, so requests interleave.
struct SlowResolver {
    tab: i64,
    delay: Duration,
}

#[async_trait]
impl TabResolver for SlowResolver {
    async fn active_tab(&self) -> Option<i64> {
        tokio::time::sleep(self.delay).await;
        Some(self.tab)
    }
}

fn service(resolver: Arc<dyn TabResolver>) -> (CaptureService, Arc<MemoryBadge>) {
    let badge = Arc::new(MemoryBadge::new());
    let registry = CaptureRegistry::new(Arc::new(MemoryStore::new()), badge.clone());
    (CaptureService::new(registry, resolver), badge)
}

const SEGMENT: &str = "https://cfvod.kaltura.com/scf/hls/p/1/sp/100/serveFlavor/entryId/1_e/flavorId/1_f/seg-3-a1.ts?token=x";

#[tokio::test]
async fn accepted_request_is_recorded_for_its_tab() {
    let (svc, badge) = service(Arc::new(NoActiveTab));
    let outcome = svc.on_before_request(&RequestEvent::new(SEGMENT, 4)).await;
    let PipelineOutcome::Recorded {
        tab,
        classification,
        outcome,
    } = outcome
    else {
        panic!("expected Recorded, got {outcome:?}");
    };
    assert_eq!(tab, TabId::from(4));
    assert_eq!(
        classification.download_url,
        "https://cfvod.kaltura.com/pd/p/1/sp/100/serveFlavor/entryId/1_e/flavorId/1_f?token=x"
    );
    assert_eq!(outcome, RecordOutcome::Added { index: 0, total: 1 });

    let snap = svc.snapshot(TabId::from(4)).await;
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].label, "1_f");
    assert_eq!(snap[0].source_url, SEGMENT);
    assert_eq!(badge.get(TabId::from(4)).unwrap().text, "1");
}

#[tokio::test]
async fn rejected_requests_record_nothing() {
    let (svc, badge) = service(Arc::new(NoActiveTab));
    let outcome = svc
        .on_before_request(&RequestEvent::new("https://cfvod.kaltura.com/api_v3/index.php", 4))
        .await;
    assert_eq!(outcome, PipelineOutcome::Rejected);
    assert!(svc.snapshot(TabId::from(4)).await.is_empty());
    assert!(badge.get(TabId::from(4)).is_none());
}

#[tokio::test]
async fn untracked_request_without_active_tab_is_dropped() {
    let (svc, _) = service(Arc::new(NoActiveTab));
    let outcome = svc.on_before_request(&RequestEvent::new(SEGMENT, -1)).await;
    assert_eq!(outcome, PipelineOutcome::NoTab);
}

#[tokio::test]
async fn untracked_request_goes_to_active_tab() {
    let resolver = Arc::new(TrackedActiveTab::new());
    resolver.set_active(9);
    let (svc, _) = service(resolver);
    let outcome = svc.on_before_request(&RequestEvent::new(SEGMENT, -1)).await;
    assert!(matches!(outcome, PipelineOutcome::Recorded { tab, .. } if tab == TabId::from(9)));
    assert_eq!(svc.snapshot(TabId::from(9)).await.len(), 1);
}

#[tokio::test]
async fn allow_list_filters_origins() {
    let (svc, _) = service(Arc::new(NoActiveTab));
    let svc = svc.with_allow_list(AllowList::default());
    let outside = "https://cdn.example.com/hls/p/1/seg-1.ts";
    assert_eq!(
        svc.on_before_request(&RequestEvent::new(outside, 1)).await,
        PipelineOutcome::NotObserved
    );
    assert!(matches!(
        svc.on_before_request(&RequestEvent::new(SEGMENT, 1)).await,
        PipelineOutcome::Recorded { .. }
    ));
}

#[tokio::test]
async fn concurrent_segments_of_one_asset_record_once() {
    let resolver = Arc::new(SlowResolver {
        tab: 5,
        delay: Duration::from_millis(5),
    });
    let (svc, badge) = service(resolver);
    let svc = Arc::new(svc);

    let mut handles = Vec::new();
    for i in 0..32 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            let url = format!("https://h.kaltura.com/scf/hls/p/1/entryId/0_e/seg-{i}-v1-a1.ts");
            svc.on_before_request(&RequestEvent::new(url, -1)).await
        }));
    }

    let mut added = 0;
    for handle in handles {
        match handle.await.unwrap() {
            PipelineOutcome::Recorded {
                outcome: RecordOutcome::Added { .. },
                ..
            } => added += 1,
            PipelineOutcome::Recorded {
                outcome: RecordOutcome::Duplicate,
                ..
            } => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!(added, 1);
    assert_eq!(svc.snapshot(TabId::from(5)).await.len(), 1);
    assert_eq!(badge.get(TabId::from(5)).unwrap().text, "1");
}

#[tokio::test]
async fn concurrent_distinct_assets_keep_unique_labels() {
    let (svc, _) = service(Arc::new(NoActiveTab));
    let svc = Arc::new(svc);
    let mut handles = Vec::new();
    for i in 0..10 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            let url = format!("https://h.kaltura.com/hls/p/1/entryId/0_{i}/seg-1.ts");
            svc.on_before_request(&RequestEvent::new(url, 2)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let snap = svc.snapshot(TabId::from(2)).await;
    assert_eq!(snap.len(), 10);
    let mut labels: Vec<String> = snap.iter().map(|c| c.label.clone()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), 10);
    for (i, capture) in snap.iter().enumerate() {
        assert_eq!(capture.label, format!("Candidate {}", i + 1));
    }
}

#[tokio::test]
async fn lifecycle_events_clear_through_dispatch() {
    let (svc, badge) = service(Arc::new(NoActiveTab));
    let tab = TabId::from(3);

    svc.dispatch(BrowserEvent::Request {
        url: "https://h.kaltura.com/hls/p/1/audio/en/seg-1.ts".to_string(),
        tab_id: 3,
    })
    .await;
    assert_eq!(svc.snapshot(tab).await[0].media_type, MediaType::Audio);

    svc.dispatch(BrowserEvent::TabUpdated {
        tab_id: 3,
        status: Some(TabStatus::Complete),
    })
    .await;
    assert_eq!(svc.snapshot(tab).await.len(), 1);

    assert_eq!(svc.on_tab_event(TabEvent::Activated(3)).await, Some(tab));
    assert!(svc.snapshot(tab).await.is_empty());
    assert_eq!(badge.get(tab).unwrap().text, "");

    // A stale request landing after navigation is recorded, then wiped again.
    svc.dispatch(BrowserEvent::Request {
        url: SEGMENT.to_string(),
        tab_id: 3,
    })
    .await;
    assert_eq!(svc.snapshot(tab).await.len(), 1);
    svc.dispatch(BrowserEvent::TabRemoved { tab_id: 3 }).await;
    assert!(svc.snapshot(tab).await.is_empty());
}

#[tokio::test]
async fn activation_retargets_untracked_requests() {
    let (svc, _) = service(Arc::new(TrackedActiveTab::new()));
    assert_eq!(
        svc.on_before_request(&RequestEvent::new(SEGMENT, -1)).await,
        PipelineOutcome::NoTab
    );

    svc.dispatch(BrowserEvent::TabActivated { tab_id: 12 }).await;
    let outcome = svc.on_before_request(&RequestEvent::new(SEGMENT, -1)).await;
    assert!(matches!(outcome, PipelineOutcome::Recorded { tab, .. } if tab == TabId::from(12)));
}

#[tokio::test]
async fn clear_on_absent_tab_is_noop() {
    let (svc, _) = service(Arc::new(NoActiveTab));
    svc.clear(TabId::from(77)).await;
    assert_eq!(svc.on_tab_event(TabEvent::Removed(-2)).await, None);
    assert!(svc.snapshot(TabId::from(77)).await.is_empty());
}
