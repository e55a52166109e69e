//! Multi-channel alert delivery. Senders are independent: one channel
//! failing never blocks the others, and dispatch itself never fails.

pub mod push;
pub mod webhook;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Alert, ChannelKind};

#[derive(Debug, Error)]
#[error("{channel} delivery failed: {reason}")]
pub struct DispatchError {
    pub channel: ChannelKind,
    pub reason: String,
}

impl DispatchError {
    pub fn new(channel: ChannelKind, reason: impl Into<String>) -> Self {
        Self {
            channel,
            reason: reason.into(),
        }
    }
}

/// One delivery mechanism. Retry policy, if any, lives inside the sender.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn send(&self, alert: &Alert) -> Result<(), DispatchError>;
}

/// Explicit kind-to-sender registry. A requested kind with no registered
/// sender is a logged no-op, not an error.
#[derive(Default)]
pub struct Dispatcher {
    senders: HashMap<ChannelKind, Arc<dyn ChannelSender>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sender: Arc<dyn ChannelSender>) {
        self.senders.insert(sender.kind(), sender);
    }

    /// Attempts every channel the alert asks for. Returns once all
    /// attempts have been made; failures are logged per channel.
    pub async fn dispatch(&self, alert: &Alert) {
        for kind in &alert.delivery.channels {
            let Some(sender) = self.senders.get(kind) else {
                tracing::debug!(channel = %kind, alert_id = %alert.id, "no sender registered, skipping");
                continue;
            };

            if let Err(e) = sender.send(alert).await {
                tracing::warn!(
                    channel = %kind,
                    alert_id = %alert.id,
                    error = %e,
                    "channel delivery failed"
                );
            }
        }
    }
}
