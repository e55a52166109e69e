use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use dealwatch::bus::consumer::{ConsumerConfig, spawn_topic_consumer};
use dealwatch::bus::{EventBus, RawMessage};
use dealwatch::dispatch::Dispatcher;
use dealwatch::error::AppError;
use dealwatch::models::{
    ChannelKind, ListingSnapshot, NotifyPrefs, SavedSearch, SearchFilter, Thresholds,
};
use dealwatch::repos::memory::{MemoryAlertStore, MemoryReadAdapter, MemorySavedSearchRepo};
use dealwatch::repos::AlertStore;
use dealwatch::services::alert_service::AlertService;

// Scripted bus: hands out the prepared batches once, then behaves like a
// stream with nothing new (blocking read that times out empty).
struct ScriptedBus {
    batches: Mutex<VecDeque<Result<Vec<RawMessage>, ()>>>,
    acks: Mutex<Vec<String>>,
}

impl ScriptedBus {
    fn new(batches: Vec<Result<Vec<RawMessage>, ()>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            acks: Mutex::new(Vec::new()),
        }
    }

    fn acks(&self) -> Vec<String> {
        self.acks.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBus for ScriptedBus {
    async fn ensure_group(&self, _topic: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn read_batch(
        &self,
        _topic: &str,
        _consumer: &str,
        _count: usize,
        block_ms: u64,
    ) -> Result<Vec<RawMessage>, AppError> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(())) => Err(AppError::Decode("scripted read failure".to_string())),
            None => {
                tokio::time::sleep(Duration::from_millis(block_ms)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn ack(&self, _topic: &str, message_id: &str) -> Result<(), AppError> {
        self.acks.lock().unwrap().push(message_id.to_string());
        Ok(())
    }
}

fn msg(id: &str, fields: &[(&str, &str)]) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn test_service(store: Arc<MemoryAlertStore>) -> Arc<AlertService> {
    let mut reads = MemoryReadAdapter::new();
    reads.insert_listing(ListingSnapshot {
        id: "lst-1".to_string(),
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        property_type: "Condo".to_string(),
        beds: 2,
        baths: 1.0,
        price: 650000.0,
    });

    let search = SavedSearch {
        id: ObjectId::new(),
        user_id: ObjectId::new(),
        name: "any Toronto listing".to_string(),
        filter: SearchFilter {
            city: Some("Toronto".to_string()),
            ..Default::default()
        },
        thresholds: Thresholds::default(),
        notify: NotifyPrefs {
            channels: vec![ChannelKind::Push],
        },
        is_active: true,
        created_at: 0,
    };

    Arc::new(AlertService::new(
        Arc::new(reads),
        Arc::new(MemorySavedSearchRepo::new(vec![search])),
        store as Arc<dyn AlertStore>,
        Dispatcher::new(),
    ))
}

fn cfg() -> ConsumerConfig {
    ConsumerConfig {
        read_count: 10,
        block_ms: 20,
        backoff: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn handled_message_is_acked() {
    let bus = Arc::new(ScriptedBus::new(vec![Ok(vec![msg(
        "1-0",
        &[("id", "\"lst-1\""), ("resultId", "\"res-1\"")],
    )])]));
    let store = Arc::new(MemoryAlertStore::new());

    let handle = spawn_topic_consumer(
        bus.clone(),
        test_service(store.clone()),
        "underwrite_completed",
        "test-consumer".to_string(),
        cfg(),
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort();

    assert_eq!(bus.acks(), vec!["1-0"]);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn undecodable_message_is_left_pending() {
    // No resultId: decode fails, so the message must stay un-acked.
    let bus = Arc::new(ScriptedBus::new(vec![Ok(vec![msg(
        "1-0",
        &[("id", "\"lst-1\"")],
    )])]));
    let store = Arc::new(MemoryAlertStore::new());

    let handle = spawn_topic_consumer(
        bus.clone(),
        test_service(store.clone()),
        "underwrite_completed",
        "test-consumer".to_string(),
        cfg(),
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort();

    assert!(bus.acks().is_empty());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn read_error_backs_off_and_recovers() {
    let bus = Arc::new(ScriptedBus::new(vec![
        Err(()),
        Ok(vec![msg(
            "2-0",
            &[("id", "\"lst-1\""), ("resultId", "\"res-1\"")],
        )]),
    ]));
    let store = Arc::new(MemoryAlertStore::new());

    let handle = spawn_topic_consumer(
        bus.clone(),
        test_service(store.clone()),
        "underwrite_completed",
        "test-consumer".to_string(),
        cfg(),
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.abort();

    assert_eq!(bus.acks(), vec!["2-0"]);
}

#[tokio::test]
async fn remaining_batch_still_processed_after_one_failure() {
    // First message is malformed, second is fine; the second must still be
    // handled and acked on the same pass.
    let bus = Arc::new(ScriptedBus::new(vec![Ok(vec![
        msg("3-0", &[("id", "\"lst-1\"")]),
        msg("3-1", &[("id", "\"lst-1\""), ("resultId", "\"res-1\"")]),
    ])]));
    let store = Arc::new(MemoryAlertStore::new());

    let handle = spawn_topic_consumer(
        bus.clone(),
        test_service(store.clone()),
        "underwrite_completed",
        "test-consumer".to_string(),
        cfg(),
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort();

    assert_eq!(bus.acks(), vec!["3-1"]);
    assert_eq!(store.list().await.unwrap().len(), 1);
}
