//! Throwaway storage service on an ephemeral port.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

/// One request seen by [`SinkServer`]: `(path kind, JSON body)`.
pub type Received = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

/// Storage stand-in answering every `POST /api/{kind}` with a fixed status.
pub struct SinkServer {
    pub base_url: String,
    pub received: Received,
}

impl SinkServer {
    pub fn requests(&self) -> Vec<(String, serde_json::Value)> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct SinkServerState {
    status: StatusCode,
    delay: Duration,
    received: Received,
}

async fn record(
    State(state): State<SinkServerState>,
    Path(kind): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.received.lock().unwrap().push((kind, body));
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, Json(serde_json::json!({"message": "stored"})))
}

/// Serve on an ephemeral port until the test runtime shuts down.
pub async fn spawn_sink_server(status: StatusCode) -> SinkServer {
    spawn_sink_server_with_delay(status, Duration::ZERO).await
}

pub async fn spawn_sink_server_with_delay(status: StatusCode, delay: Duration) -> SinkServer {
    let received: Received = Arc::default();
    let state = SinkServerState {
        status,
        delay,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/api/{kind}", post(record))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SinkServer {
        base_url: format!("http://{}", addr),
        received,
    }
}

/// Address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
