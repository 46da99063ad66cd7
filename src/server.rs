//! Read-only JSON HTTP API over a content store.
//!
//! Lets a documentation site fetch documents and their derived structure
//! without touching the filesystem. Nothing here renders HTML.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/documents?topic=` | Document summaries, optionally one topic category |
//! | `GET`  | `/documents/{*path}` | Full parsed document |
//! | `GET`  | `/raw/{*path}` | Raw markdown body |
//! | `GET`  | `/lint` | Lint report for the whole store |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "document not found: aws/x.md" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::error::StoreError;
use crate::get::{get_document, DocumentResponse};
use crate::lint::{lint_store, LintReport};
use crate::models::DocumentSummary;
use crate::progress::NoProgress;
use crate::store::ContentStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn ContentStore>,
}

/// Build the router without binding, so tests can serve it on any listener.
pub fn router(config: Arc<Config>, store: Arc<dyn ContentStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/documents", get(handle_list))
        .route("/documents/{*path}", get(handle_get))
        .route("/raw/{*path}", get(handle_raw))
        .route("/lint", get(handle_lint))
        .layer(cors)
        .with_state(AppState { config, store })
}

/// Starts the HTTP server on `[server].bind` and runs until the process ends.
pub async fn run_server(config: &Config, store: Arc<dyn ContentStore>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()), store);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind = %bind_addr, root = %config.store.root.display(), "server listening");
    println!("corpus server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let (status, code) = match err {
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::InvalidPath { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            _ => {
                error!(error = %err, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

/// Run a blocking store call off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| internal(format!("store task failed: {}", e)))?
        .map_err(AppError::from)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ GET /documents ============

#[derive(Deserialize)]
struct ListQuery {
    topic: Option<String>,
}

#[derive(Serialize)]
struct ListResponse {
    documents: Vec<DocumentSummary>,
}

async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let store = state.store.clone();
    let documents = blocking(move || store.summaries(query.topic.as_deref())).await?;
    Ok(Json(ListResponse { documents }))
}

// ============ GET /documents/{*path} ============

async fn handle_get(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let store = state.store.clone();
    let doc = blocking(move || get_document(store.as_ref(), &path)).await?;
    Ok(Json(doc))
}

// ============ GET /raw/{*path} ============

async fn handle_raw(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let store = state.store.clone();
    let body = blocking(move || store.get_document(&path)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    )
        .into_response())
}

// ============ GET /lint ============

async fn handle_lint(State(state): State<AppState>) -> Result<Json<LintReport>, AppError> {
    let store = state.store.clone();
    let config = state.config.clone();
    let report = blocking(move || lint_store(store.as_ref(), &config.lint, &NoProgress)).await?;
    Ok(Json(report))
}
