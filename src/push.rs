//! Push gateway: a process-lifetime registry of open SSE connections and
//! the endpoint that feeds them.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::StreamExt;
use futures_util::stream::Stream;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::AppState;

/// One frame queued for a client: the SSE event name plus serialized JSON.
#[derive(Debug, Clone)]
pub struct PushFrame {
    pub event: String,
    pub data: String,
}

/// Registry of live client connections keyed by a generated id. Owned by
/// the gateway for the life of the process; removal on disconnect is the
/// only cleanup path.
#[derive(Clone, Default)]
pub struct PushRegistry {
    clients: Arc<Mutex<HashMap<String, mpsc::UnboundedSender<PushFrame>>>>,
}

impl PushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, id: &str, tx: mpsc::UnboundedSender<PushFrame>) {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        clients.insert(id.to_string(), tx);
    }

    pub fn remove(&self, id: &str) {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        clients.remove(id);
    }

    pub fn client_count(&self) -> usize {
        let clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        clients.len()
    }

    /// Writes one frame to every currently registered client. A send to a
    /// client that disconnected but is not yet pruned fails silently; no
    /// retry, no backpressure.
    pub fn broadcast<T: Serialize>(&self, event: &str, payload: &T) {
        let data = match serde_json::to_string(payload) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(event, error = %e, "push payload serialization failed");
                return;
            }
        };

        let clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        for tx in clients.values() {
            let _ = tx.send(PushFrame {
                event: event.to_string(),
                data: data.clone(),
            });
        }
    }
}

// Removes the client from the registry when the SSE stream is dropped,
// which is the disconnect signal axum gives us.
struct ClientGuard {
    id: String,
    registry: PushRegistry,
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
        tracing::debug!(client_id = %self.id, "push client disconnected");
    }
}

// GET /alerts/stream
pub async fn sse_alerts(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let client_id = ObjectId::new().to_hex();
    let (tx, rx) = mpsc::unbounded_channel::<PushFrame>();

    state.push.add(&client_id, tx);
    tracing::debug!(client_id = %client_id, "push client connected");

    let guard = ClientGuard {
        id: client_id,
        registry: state.push.clone(),
    };

    let handshake = Event::default().event("ping").data("\"ready\"");

    let frames = futures_util::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let frame = rx.recv().await?;
        let evt = Event::default().event(frame.event).data(frame.data);
        Some((Ok(evt), (rx, guard)))
    });

    Sse::new(futures_util::stream::iter([Ok::<_, Infallible>(handshake)]).chain(frames))
}
