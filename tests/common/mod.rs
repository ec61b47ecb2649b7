//! In-process artifact server for integration tests
//!
//! Serves the dorky routes on 127.0.0.1 from a background tokio runtime so
//! the blocking client under test can run on the test thread.
//!
//! Besides the normal routes it mounts failure variants under prefixes, so a
//! client pointed at `{base}/broken` always gets HTTP 500 and one pointed at
//! `{base}/empty-id` gets a success response with an empty id.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// An artifact as the test server received it
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub metadata: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Default)]
struct ServerState {
    artifacts: HashMap<String, StoredArtifact>,
    by_key: HashMap<String, String>,
    uploads: usize,
}

type Shared = Arc<Mutex<ServerState>>;

pub struct TestServer {
    base_url: String,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        let state: Shared = Arc::default();
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = router(state.clone());
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind test server");
                addr_tx
                    .send(listener.local_addr().expect("local addr"))
                    .expect("report address");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("serve");
            });
        });

        let addr = addr_rx.recv().expect("test server failed to start");
        Self {
            base_url: format!("http://{}", addr),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Root URL of the healthy routes
    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    /// Root URL of the routes that always answer 500
    pub fn broken_url(&self) -> String {
        format!("{}/broken", self.base_url)
    }

    /// Root URL of an upload route that answers with an empty id
    pub fn empty_id_url(&self) -> String {
        format!("{}/empty-id", self.base_url)
    }

    pub fn artifact(&self, id: &str) -> Option<StoredArtifact> {
        self.state.lock().unwrap().artifacts.get(id).cloned()
    }

    /// Number of upload requests that reached the healthy route
    pub fn upload_count(&self) -> usize {
        self.state.lock().unwrap().uploads
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/artifacts", post(upload))
        .route("/artifacts/{id}", get(download))
        .route("/artifacts/{id}/metadata", get(metadata))
        .route("/broken/artifacts", post(broken_upload))
        .route("/broken/artifacts/{id}", get(broken_download))
        .route("/empty-id/artifacts", post(empty_id_upload))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut file = None;
    let mut file_name = None;
    let mut metadata = None;
    let mut idempotency_key = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => file = Some(bytes.to_vec()),
                    Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
                }
            },
            "metadata" => metadata = field.text().await.ok(),
            "idempotency_key" => idempotency_key = field.text().await.ok(),
            _ => {},
        }
    }

    let Some(bytes) = file else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "no file" }))).into_response();
    };

    let mut state = state.lock().unwrap();
    state.uploads += 1;

    if let Some(existing) = idempotency_key
        .as_ref()
        .and_then(|key| state.by_key.get(key))
        .cloned()
    {
        return created(&existing, metadata.as_deref());
    }

    let id = format!("a{:05}", state.artifacts.len() + 1);
    if let Some(key) = &idempotency_key {
        state.by_key.insert(key.clone(), id.clone());
    }
    state.artifacts.insert(
        id.clone(),
        StoredArtifact {
            bytes,
            file_name,
            metadata: metadata.clone(),
            idempotency_key,
        },
    );

    created(&id, metadata.as_deref())
}

fn created(id: &str, metadata: Option<&str>) -> Response {
    let metadata = metadata.map_or_else(|| json!({}), |m| Value::String(m.to_string()));
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "url": format!("/artifacts/{}", id), "metadata": metadata })),
    )
        .into_response()
}

async fn download(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.lock().unwrap().artifacts.get(&id) {
        Some(artifact) => (StatusCode::OK, artifact.bytes.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn metadata(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if !state.lock().unwrap().artifacts.contains_key(&id) {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
    }
    Json(json!({ "id": id, "created": "2026-10-19T00:00:00.000Z" })).into_response()
}

async fn broken_upload(_body: Bytes) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "storage offline").into_response()
}

async fn broken_download(Path(_id): Path<String>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "storage offline").into_response()
}

async fn empty_id_upload(_body: Bytes) -> Response {
    (StatusCode::CREATED, Json(json!({ "id": "" }))).into_response()
}
