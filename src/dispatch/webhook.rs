use async_trait::async_trait;
use reqwest::Client;

use super::{ChannelSender, DispatchError};
use crate::models::{Alert, ChannelKind};

/// POSTs the alert JSON to a configured endpoint. No retry: a failed
/// delivery is reported to the dispatcher, which logs and moves on.
pub struct WebhookSender {
    http: Client,
    url: String,
}

impl WebhookSender {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ChannelSender for WebhookSender {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    async fn send(&self, alert: &Alert) -> Result<(), DispatchError> {
        let res = self
            .http
            .post(&self.url)
            .json(alert)
            .send()
            .await
            .map_err(|e| DispatchError::new(ChannelKind::Webhook, e.to_string()))?;

        if !res.status().is_success() {
            return Err(DispatchError::new(
                ChannelKind::Webhook,
                format!("HTTP {}", res.status()),
            ));
        }

        Ok(())
    }
}
