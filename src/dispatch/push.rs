use async_trait::async_trait;

use super::{ChannelSender, DispatchError};
use crate::models::{Alert, ChannelKind};
use crate::push::PushRegistry;

/// Fans the alert out to every live browser connection. Writes to clients
/// that are gone but not yet pruned fail silently inside the registry, so
/// this sender itself never fails.
pub struct PushSender {
    registry: PushRegistry,
}

impl PushSender {
    pub fn new(registry: PushRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ChannelSender for PushSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Push
    }

    async fn send(&self, alert: &Alert) -> Result<(), DispatchError> {
        self.registry.broadcast("alert", alert);
        Ok(())
    }
}
