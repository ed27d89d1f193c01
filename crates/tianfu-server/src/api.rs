use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tianfu_shared::constants::{DEFAULT_NICKNAME, DEFAULT_TOPIC, TOPICS};
use tianfu_store::{LetterRecord, Mailbox, NewLetter};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::generator::Generator;

#[derive(Clone)]
pub struct AppState {
    pub mailbox: Arc<Mailbox>,
    pub generator: Arc<Generator>,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/healthz", get(health_check))
        .route("/favicon.ico", get(favicon))
        .route("/api/topics", get(topics))
        .route("/api/mailbox", get(mailbox_list).post(mailbox_create))
        .route("/api/mailbox/:id", delete(mailbox_delete))
        .route("/api/generate", post(generate))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    /// Seconds since startup.
    uptime: f64,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct MailboxListResponse {
    ok: bool,
    list: Vec<LetterRecord>,
}

#[derive(Serialize)]
struct MailboxCreateResponse {
    ok: bool,
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    topic: Option<String>,
    nickname: Option<String>,
}

#[derive(Serialize)]
struct GenerateResponse {
    ok: bool,
    data: Value,
    #[serde(skip_serializing_if = "is_false")]
    demo: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Decode an optional JSON body. An empty body or `null` means `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Serve `favicon.svg` from the static directory, or an empty 204 so browsers
/// stop logging 404s.
async fn favicon(State(state): State<AppState>) -> Response {
    let path = state.config.static_dir.join("favicon.svg");
    match tokio::fs::read(&path).await {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn topics() -> Json<[&'static str; 10]> {
    Json(TOPICS)
}

async fn mailbox_list(State(state): State<AppState>) -> Json<MailboxListResponse> {
    Json(MailboxListResponse {
        ok: true,
        list: state.mailbox.list().await,
    })
}

async fn mailbox_create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MailboxCreateResponse>, ApiError> {
    let letter: NewLetter = parse_body(&body)?;
    let id = state.mailbox.append(letter).await?;

    info!(id = %id, "Letter saved to mailbox");
    Ok(Json(MailboxCreateResponse { ok: true, id }))
}

/// Always succeeds: unknown ids are a no-op and write failures are only
/// logged.
async fn mailbox_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<OkResponse> {
    match state.mailbox.remove(&id).await {
        Ok(()) => info!(id = %id, "Letter removed from mailbox"),
        Err(e) => warn!(id = %id, error = %e, "Failed to persist mailbox after delete"),
    }
    Json(OkResponse { ok: true })
}

async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request: GenerateRequest = parse_body(&body)?;
    let topic = request.topic.as_deref().unwrap_or(DEFAULT_TOPIC);
    let nickname = request.nickname.as_deref().unwrap_or(DEFAULT_NICKNAME);

    let generation = state.generator.generate(topic, nickname).await?;

    info!(topic = %topic, demo = generation.demo, "Letter generated");
    Ok(Json(GenerateResponse {
        ok: true,
        data: generation.data,
        demo: generation.demo,
    }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
