use std::net::SocketAddr;
use std::sync::Arc;

use mongodb::Client;

use dealwatch::bus::consumer::{ConsumerConfig, spawn_topic_consumer};
use dealwatch::bus::stream::RedisEventBus;
use dealwatch::bus::{self, EventBus};
use dealwatch::dispatch::Dispatcher;
use dealwatch::dispatch::push::PushSender;
use dealwatch::dispatch::webhook::WebhookSender;
use dealwatch::push::PushRegistry;
use dealwatch::repos::mongo::{MongoAlertStore, MongoReadAdapter, MongoSavedSearchRepo};
use dealwatch::repos::AlertStore;
use dealwatch::services::alert_service::AlertService;
use dealwatch::services::db_init;
use dealwatch::{AppState, config, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db).await {
        tracing::warn!(error = %e, "index bootstrap failed");
    }

    // Redis event bus
    let redis_client =
        redis::Client::open(settings.redis_url.as_str()).expect("Invalid REDIS_URL");
    let bus: Arc<dyn EventBus> = Arc::new(
        RedisEventBus::connect(redis_client)
            .await
            .expect("Failed to connect to Redis"),
    );

    let push = PushRegistry::new();

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Arc::new(PushSender::new(push.clone())));
    if let Some(url) = settings.webhook_url.clone() {
        dispatcher.register(Arc::new(WebhookSender::new(url)));
    }

    let alerts: Arc<dyn AlertStore> = Arc::new(MongoAlertStore::new(db.clone()));

    let service = Arc::new(AlertService::new(
        Arc::new(MongoReadAdapter::new(db.clone())),
        Arc::new(MongoSavedSearchRepo::new(db.clone())),
        alerts.clone(),
        dispatcher,
    ));

    // One long-lived consumer loop per subscribed topic.
    for topic in [bus::TOPIC_UNDERWRITE_COMPLETED, bus::TOPIC_PROPERTY_SCORED] {
        let _ = spawn_topic_consumer(
            bus.clone(),
            service.clone(),
            topic,
            settings.consumer_name.clone(),
            ConsumerConfig::from_settings(&settings),
        );
    }

    let state = AppState {
        db,
        settings: settings.clone(),
        push,
        alerts,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
