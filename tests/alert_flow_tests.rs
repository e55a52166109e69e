use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use dealwatch::dispatch::{ChannelSender, DispatchError, Dispatcher};
use dealwatch::models::{
    Alert, ChannelKind, ListingSnapshot, NotifyPrefs, SavedSearch, SearchFilter, Thresholds,
    UwMetrics, ValuationEvent,
};
use dealwatch::repos::memory::{MemoryAlertStore, MemoryReadAdapter, MemorySavedSearchRepo};
use dealwatch::repos::AlertStore;
use dealwatch::services::alert_service::AlertService;

struct RecordingSender {
    kind: ChannelKind,
    seen: Mutex<Vec<ObjectId>>,
}

impl RecordingSender {
    fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<ObjectId> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSender for RecordingSender {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, alert: &Alert) -> Result<(), DispatchError> {
        self.seen.lock().unwrap().push(alert.id);
        Ok(())
    }
}

fn listing() -> ListingSnapshot {
    ListingSnapshot {
        id: "lst-1".to_string(),
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        property_type: "Condo".to_string(),
        beds: 2,
        baths: 2.0,
        price: 750000.0,
    }
}

fn metrics() -> UwMetrics {
    UwMetrics {
        result_id: "res-1".to_string(),
        dscr: 1.35,
        cash_on_cash_pct: 0.09,
        cash_flow_annual: 2400.0,
        cap_rate_pct: None,
        irr_pct: None,
    }
}

fn winning_search() -> SavedSearch {
    SavedSearch {
        id: ObjectId::new(),
        user_id: ObjectId::new(),
        name: "Toronto condos under 800k".to_string(),
        filter: SearchFilter {
            city: Some("Toronto".to_string()),
            province: Some("ON".to_string()),
            property_type: Some("Condo".to_string()),
            max_price: Some(800000.0),
            min_beds: None,
        },
        thresholds: Thresholds {
            min_dscr: Some(1.2),
            min_coc: Some(0.08),
            require_non_negative_cf: Some(true),
            min_score: None,
        },
        notify: NotifyPrefs {
            channels: vec![ChannelKind::Push],
        },
        is_active: true,
        created_at: 0,
    }
}

fn event(score: Option<f64>) -> ValuationEvent {
    ValuationEvent {
        id: "lst-1".to_string(),
        result_id: "res-1".to_string(),
        score,
        source: Some("underwriter".to_string()),
        kind: Some("underwrite_completed".to_string()),
        ts: None,
    }
}

fn service(
    reads: MemoryReadAdapter,
    searches: Vec<SavedSearch>,
    store: Arc<MemoryAlertStore>,
    dispatcher: Dispatcher,
) -> AlertService {
    AlertService::new(
        Arc::new(reads),
        Arc::new(MemorySavedSearchRepo::new(searches)),
        store as Arc<dyn AlertStore>,
        dispatcher,
    )
}

#[tokio::test]
async fn missing_listing_is_a_benign_noop() {
    let store = Arc::new(MemoryAlertStore::new());
    let svc = service(
        MemoryReadAdapter::new(),
        vec![winning_search()],
        store.clone(),
        Dispatcher::new(),
    );

    svc.handle_underwrite_completed(&event(None)).await.unwrap();

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn winning_search_persists_and_dispatches_alert() {
    let mut reads = MemoryReadAdapter::new();
    reads.insert_listing(listing());
    reads.insert_metrics(metrics());

    let search = winning_search();
    let push = Arc::new(RecordingSender::new(ChannelKind::Push));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(push.clone());

    let store = Arc::new(MemoryAlertStore::new());
    let svc = service(reads, vec![search.clone()], store.clone(), dispatcher);

    svc.handle_underwrite_completed(&event(None)).await.unwrap();

    let alerts = store.list().await.unwrap();
    assert_eq!(alerts.len(), 1);

    let alert = &alerts[0];
    assert_eq!(alert.user_id, search.user_id);
    assert_eq!(alert.saved_search_id, search.id);
    assert_eq!(alert.listing_id, "lst-1");
    assert_eq!(alert.result_id, "res-1");
    assert_eq!(
        alert.payload.matched,
        vec!["dscr>=1.2", "coc>=0.08", "cf>=0"]
    );
    assert_eq!(alert.delivery.channels, vec![ChannelKind::Push]);

    assert_eq!(push.seen(), vec![alert.id]);
}

#[tokio::test]
async fn absent_metrics_still_allows_score_only_match() {
    let mut reads = MemoryReadAdapter::new();
    reads.insert_listing(listing());
    // no metrics inserted for res-1

    let mut search = winning_search();
    search.thresholds = Thresholds {
        min_score: Some(8.0),
        ..Default::default()
    };

    let store = Arc::new(MemoryAlertStore::new());
    let svc = service(reads, vec![search], store.clone(), Dispatcher::new());

    svc.handle_underwrite_completed(&event(Some(8.2)))
        .await
        .unwrap();

    let alerts = store.list().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].payload.metrics.is_none());
    assert_eq!(alerts[0].payload.score, Some(8.2));
    assert_eq!(alerts[0].payload.matched, vec!["score>=8"]);
}

#[tokio::test]
async fn each_winning_search_gets_its_own_alert() {
    let mut reads = MemoryReadAdapter::new();
    reads.insert_listing(listing());
    reads.insert_metrics(metrics());

    let first = winning_search();
    let mut second = winning_search();
    second.id = ObjectId::new();
    second.user_id = ObjectId::new();
    second.thresholds = Thresholds::default();
    second.notify.channels = vec![ChannelKind::Email];

    let store = Arc::new(MemoryAlertStore::new());
    let svc = service(
        reads,
        vec![first.clone(), second.clone()],
        store.clone(),
        Dispatcher::new(),
    );

    svc.handle_underwrite_completed(&event(None)).await.unwrap();

    let alerts = store.list().await.unwrap();
    assert_eq!(alerts.len(), 2);

    let for_second = alerts
        .iter()
        .find(|a| a.saved_search_id == second.id)
        .unwrap();
    assert!(for_second.payload.matched.is_empty());
    assert_eq!(for_second.delivery.channels, vec![ChannelKind::Email]);
}

#[tokio::test]
async fn losing_searches_produce_nothing() {
    let mut reads = MemoryReadAdapter::new();
    reads.insert_listing(listing());
    reads.insert_metrics(metrics());

    let mut search = winning_search();
    search.filter.max_price = Some(500000.0);

    let store = Arc::new(MemoryAlertStore::new());
    let svc = service(reads, vec![search], store.clone(), Dispatcher::new());

    svc.handle_underwrite_completed(&event(None)).await.unwrap();

    assert!(store.list().await.unwrap().is_empty());
}
