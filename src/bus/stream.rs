use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};

use super::{CONSUMER_GROUP, EventBus, RawMessage, stream_key};
use crate::error::AppError;

/// Redis Streams implementation of the event bus.
#[derive(Clone)]
pub struct RedisEventBus {
    conn: ConnectionManager,
}

impl RedisEventBus {
    /// Opens a managed connection; the manager reconnects on its own after
    /// transient failures.
    pub async fn connect(client: redis::Client) -> Result<Self, AppError> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn ensure_group(&self, topic: &str) -> Result<(), AppError> {
        let key = stream_key(topic);
        let mut conn = self.conn.clone();

        // "$" = tail: the group only sees messages appended after creation.
        let res: Result<(), redis::RedisError> = conn
            .xgroup_create_mkstream(&key, CONSUMER_GROUP, "$")
            .await;

        match res {
            Ok(()) => Ok(()),
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_batch(
        &self,
        topic: &str,
        consumer: &str,
        count: usize,
        block_ms: u64,
    ) -> Result<Vec<RawMessage>, AppError> {
        let key = stream_key(topic);
        let mut conn = self.conn.clone();

        let opts = StreamReadOptions::default()
            .group(CONSUMER_GROUP, consumer)
            .count(count)
            .block(block_ms as usize);

        // ">" = messages never delivered to any consumer in the group.
        let reply: StreamReadReply = conn
            .xread_options(&[key.as_str()], &[">"], &opts)
            .await?;

        let mut out = Vec::new();
        for stream in reply.keys {
            for entry in stream.ids {
                let mut fields = Vec::with_capacity(entry.map.len());
                for (field, value) in entry.map {
                    let text: String = redis::from_redis_value(&value)?;
                    fields.push((field, text));
                }
                out.push(RawMessage {
                    id: entry.id,
                    fields,
                });
            }
        }

        Ok(out)
    }

    async fn ack(&self, topic: &str, message_id: &str) -> Result<(), AppError> {
        let key = stream_key(topic);
        let mut conn = self.conn.clone();

        let _acked: i64 = conn.xack(&key, CONSUMER_GROUP, &[message_id]).await?;
        Ok(())
    }
}
