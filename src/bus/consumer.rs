use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{EventBus, RawMessage, decode};
use crate::config::Settings;
use crate::services::alert_service::AlertService;

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub read_count: usize,
    pub block_ms: u64,
    pub backoff: Duration,
}

impl ConsumerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            read_count: settings.read_count,
            block_ms: settings.block_ms,
            backoff: Duration::from_millis(settings.backoff_ms),
        }
    }
}

// The loop is a four-state machine rather than nested branches so the
// read/handle/ack/backoff transitions stay visible in one place.
enum Phase {
    Reading,
    Handling(VecDeque<RawMessage>),
    Acking {
        message_id: String,
        rest: VecDeque<RawMessage>,
    },
    BackingOff,
}

/// Spawns the long-lived consumer task for one topic. Strictly sequential
/// per consumer identity: a slow handler blocks subsequent reads and acks
/// on this loop. Runs until process shutdown.
pub fn spawn_topic_consumer(
    bus: Arc<dyn EventBus>,
    service: Arc<AlertService>,
    topic: &'static str,
    consumer_name: String,
    cfg: ConsumerConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = bus.ensure_group(topic).await {
            tracing::warn!(topic, error = %e, "consumer group create failed");
        }

        tracing::info!(topic, consumer = %consumer_name, "consumer loop started");

        let mut phase = Phase::Reading;
        loop {
            phase = match phase {
                Phase::Reading => {
                    match bus
                        .read_batch(topic, &consumer_name, cfg.read_count, cfg.block_ms)
                        .await
                    {
                        Ok(batch) => Phase::Handling(batch.into()),
                        Err(e) => {
                            tracing::warn!(topic, error = %e, "read failed");
                            Phase::BackingOff
                        }
                    }
                }

                Phase::Handling(mut queue) => match queue.pop_front() {
                    None => Phase::Reading,
                    Some(msg) => match handle_message(&service, topic, &msg).await {
                        Ok(()) => Phase::Acking {
                            message_id: msg.id,
                            rest: queue,
                        },
                        Err(e) => {
                            // Left un-acked: the bus keeps it pending for
                            // later redelivery. No in-process retry.
                            tracing::error!(
                                topic,
                                message_id = %msg.id,
                                error = %e,
                                "handler failed, message left pending"
                            );
                            Phase::Handling(queue)
                        }
                    },
                },

                Phase::Acking { message_id, rest } => {
                    if let Err(e) = bus.ack(topic, &message_id).await {
                        tracing::warn!(topic, message_id = %message_id, error = %e, "ack failed");
                    }
                    Phase::Handling(rest)
                }

                Phase::BackingOff => {
                    tokio::time::sleep(cfg.backoff).await;
                    Phase::Reading
                }
            };
        }
    })
}

async fn handle_message(
    service: &AlertService,
    topic: &str,
    msg: &RawMessage,
) -> Result<(), crate::error::AppError> {
    let event = decode::decode(msg)?;
    tracing::debug!(topic, listing_id = %event.id, result_id = %event.result_id, "event received");
    service.handle_underwrite_completed(&event).await
}
