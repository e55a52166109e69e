//! Durable event log access. Redis Streams with a competing-consumer group:
//! at-least-once delivery, FIFO only within one stream.

pub mod consumer;
pub mod decode;
pub mod stream;

use async_trait::async_trait;

use crate::error::AppError;

/// Stream key for a topic is `events:<topic>`.
pub const TOPIC_UNDERWRITE_COMPLETED: &str = "underwrite_completed";
pub const TOPIC_PROPERTY_SCORED: &str = "property_scored";

/// Fixed consumer group name shared by every alerts worker.
pub const CONSUMER_GROUP: &str = "alerts";

/// One undecoded stream entry: the bus-assigned id plus the flat
/// alternating key/value fields the producer wrote.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: String,
    pub fields: Vec<(String, String)>,
}

#[async_trait]
pub trait EventBus: Send + Sync {
    /// Idempotently creates the consumer group positioned at the stream
    /// tail (new messages only). "Group already exists" is not an error.
    async fn ensure_group(&self, topic: &str) -> Result<(), AppError>;

    /// Blocking read of up to `count` undelivered messages for this
    /// consumer. Empty on timeout. `block_ms` bounds only the wait for new
    /// messages, never handler execution.
    async fn read_batch(
        &self,
        topic: &str,
        consumer: &str,
        count: usize,
        block_ms: u64,
    ) -> Result<Vec<RawMessage>, AppError>;

    /// Marks the message processed for the group. Unacked messages stay
    /// pending; reclaiming abandoned ones is an operational concern outside
    /// this subsystem.
    async fn ack(&self, topic: &str, message_id: &str) -> Result<(), AppError>;
}

pub fn stream_key(topic: &str) -> String {
    format!("events:{topic}")
}
