//! In-process stand-in for a chat-completion provider.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Answers every `POST /v1/chat/completions` with a fixed status and body.
#[derive(Clone)]
pub struct MockProvider {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockProvider {
    pub fn new(status: StatusCode, reply: Value) -> Self {
        Self {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A successful completion whose first choice carries `content`.
    pub fn replying_with_content(content: &str) -> Self {
        Self::new(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            }),
        )
    }

    /// Serve on an ephemeral localhost port and return the API base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}/v1")
    }

    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().await.clone()
    }
}

async fn completions(
    State(mock): State<MockProvider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.seen.lock().await.push(SeenRequest {
        authorization,
        body,
    });
    (mock.status, Json(mock.reply.clone()))
}
