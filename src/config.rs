use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub redis_url: String,
    pub host: String,
    pub port: u16,

    // consumer identity inside the "alerts" group; distinct per process
    pub consumer_name: String,
    pub read_count: usize,
    pub block_ms: u64,
    pub backoff_ms: u64,

    pub webhook_url: Option<String>,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "dealwatch".to_string());

    let redis_url = env::var("REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let consumer_name = env::var("CONSUMER_NAME")
        .unwrap_or_else(|_| "alerts-1".to_string());

    let read_count = env::var("READ_COUNT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10);

    let block_ms = env::var("BLOCK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5000);

    let backoff_ms = env::var("BACKOFF_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1000);

    let webhook_url = env::var("WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty());

    Settings {
        mongodb_uri,
        mongodb_db,
        redis_url,
        host,
        port,
        consumer_name,
        read_count,
        block_ms,
        backoff_ms,
        webhook_url,
    }
}
