use thiserror::Error;

/// Failure taxonomy for the subsystem. Nothing here is fatal to the
/// process: bus errors back the consumer off, db errors leave the message
/// un-acked for redelivery, decode errors mark a message malformed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event bus error: {0}")]
    Bus(#[from] redis::RedisError),

    #[error("database error: {0}")]
    Db(#[from] mongodb::error::Error),

    #[error("malformed event: {0}")]
    Decode(String),
}
