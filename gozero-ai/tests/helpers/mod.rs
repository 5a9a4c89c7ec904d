//! Test helpers: a local stand-in for the inference provider
//!
//! Serves an OpenAI-compatible chat-completions endpoint on an ephemeral
//! port with a scripted reply.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use gozero_ai::config::VisionConfig;
use gozero_ai::recognition::SampleCatalog;

/// What the stub answers with
#[derive(Clone)]
pub enum StubReply {
    /// 200 with `choices[0].message.content = text`
    Content(String),
    /// Arbitrary status and raw body
    Status(u16, String),
    /// 200 with a raw (possibly non-JSON) body
    RawBody(String),
    /// Sleep, then answer with content
    Delayed(Duration, String),
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(Option<String>, Value)>>>,
}

/// Running stub provider; stops when dropped
pub struct StubProvider {
    pub endpoint: String,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(Option<String>, Value)>>>,
    handle: JoinHandle<()>,
}

impl StubProvider {
    pub async fn spawn(reply: StubReply) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(None));
        let state = StubState {
            reply,
            hits: hits.clone(),
            last_request: last_request.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{}/v1/chat/completions", addr),
            hits,
            last_request,
            handle,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Authorization header of the last request
    pub fn last_authorization(&self) -> Option<String> {
        self.last_request
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|(auth, _)| auth.clone())
    }

    /// JSON body of the last request
    pub fn last_body(&self) -> Option<Value> {
        self.last_request
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, body)| body.clone())
    }

    /// Vision config pointing at this stub
    pub fn vision_config(&self, timeout: Duration) -> VisionConfig {
        VisionConfig {
            api_key: Some("sk-test".to_string()),
            endpoint: self.endpoint.clone(),
            timeout,
            chat_timeout: timeout,
            ..VisionConfig::default()
        }
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_completion(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_request.lock().unwrap() = Some((auth, body));

    match state.reply {
        StubReply::Content(text) => Json(completion(&text)).into_response(),
        StubReply::Status(code, body) => {
            (StatusCode::from_u16(code).unwrap(), body).into_response()
        }
        StubReply::RawBody(body) => (StatusCode::OK, body).into_response(),
        StubReply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Json(completion(&text)).into_response()
        }
    }
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ]
    })
}

/// Built-in catalog, shared
pub fn catalog() -> Arc<SampleCatalog> {
    Arc::new(SampleCatalog::builtin().unwrap())
}

/// base64 of ten zero bytes
pub const TEN_ZEROS_BASE64: &str = "AAAAAAAAAAAAAA==";

/// A well-formed model answer in the canonical shape
pub fn canonical_answer() -> Value {
    json!({
        "itemName": "Glass Jar",
        "category": "Glass",
        "recyclable": true,
        "reusable": true,
        "materialType": "Clear soda-lime glass",
        "disposalInstructions": "1. Rinse the jar. 2. Remove the lid. 3. Place in the glass bin.",
        "environmentalImpact": {
            "co2SavedKg": 0.4,
            "waterSavedL": 30.0,
            "energySavedKWh": 1.1,
            "description": "Glass can be recycled endlessly."
        }
    })
}
