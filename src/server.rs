//! HTTP API server.
//!
//! Exposes the query pipeline and the document/chat-history plumbing as
//! a JSON HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/query` | Answer a question about a stored PDF |
//! | `GET`  | `/documents` | List registered PDFs, newest first |
//! | `GET`  | `/documents/{id}/messages` | Chat history for one PDF |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Failures return `{ "error": "...", "details": "..." }` with `400` for
//! missing input, `404` for an unknown document, and `500` for storage,
//! extraction, and provider failures. Provider messages name the
//! quota/credential/transient cause where determinable.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front ends
//! can call the API cross-origin; `OPTIONS` preflights succeed with no
//! body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::error::QueryError;
use crate::models::{ChatMessage, PdfDocument};
use crate::provider::OpenAiProvider;
use crate::query::QueryPipeline;
use crate::storage;
use crate::store;

/// Shared application state, built once at startup and passed to all
/// route handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub pipeline: Arc<QueryPipeline>,
}

/// Starts the HTTP server: connects the database, constructs the storage
/// and provider collaborators (failing fast on missing configuration or
/// credentials), and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;

    let storage = storage::create_storage(&config.storage)?;
    let provider = Arc::new(OpenAiProvider::new(&config.provider)?);
    let pipeline = Arc::new(QueryPipeline::new(config, storage, provider));

    let state = AppState { pool, pipeline };
    let app = build_router(state);

    let bind_addr = &config.server.bind;
    info!("listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the router over an already-built state. Split out from
/// [`run_server`] so tests can serve against stub collaborators.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/query", post(handle_query))
        .route("/documents", get(handle_list_documents))
        .route("/documents/{id}/messages", get(handle_list_messages))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        let status = match &err {
            QueryError::Validation(_) => StatusCode::BAD_REQUEST,
            QueryError::NotFound(_) => StatusCode::NOT_FOUND,
            QueryError::Storage(_)
            | QueryError::Extraction(_)
            | QueryError::Provider(_)
            | QueryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError {
            status,
            error: err.to_string(),
            details: None,
        }
    }
}

/// Name the stage a query died in, for the failure log line.
fn failing_stage(err: &QueryError) -> &'static str {
    match err {
        QueryError::Validation(_) => "validation",
        QueryError::NotFound(_) => "lookup",
        QueryError::Storage(_) => "storage",
        QueryError::Extraction(_) => "extraction",
        QueryError::Provider(_) => "provider",
        QueryError::Database(_) => "database",
    }
}

// ============ POST /query ============

/// Request body. Both fields are required; they are `Option` here so the
/// handler can reject missing fields with a 400 and a useful message
/// instead of a deserializer rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    document_id: Option<String>,
    query: Option<String>,
}

#[derive(Serialize)]
struct QueryResponse {
    answer: String,
}

/// Handler for `POST /query`: runs the pipeline, then appends the
/// question and the answer to the document's chat history. Nothing is
/// persisted unless the answer was generated.
async fn handle_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let document_id = req.document_id.unwrap_or_default();
    let query = req.query.unwrap_or_default();

    let answer = state
        .pipeline
        .answer(&state.pool, &document_id, &query)
        .await
        .map_err(|err| {
            error!(
                document_id = %document_id,
                query = %query,
                stage = failing_stage(&err),
                error = %err,
                "query failed"
            );
            AppError::from(err)
        })?;

    store::insert_message(&state.pool, &document_id, &query, false)
        .await
        .map_err(|e| AppError::from(QueryError::Database(e)))?;
    store::insert_message(&state.pool, &document_id, &answer, true)
        .await
        .map_err(|e| AppError::from(QueryError::Database(e)))?;

    Ok(Json(QueryResponse { answer }))
}

// ============ GET /documents ============

async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<PdfDocument>>, AppError> {
    let docs = store::list_pdfs(&state.pool)
        .await
        .map_err(|e| AppError::from(QueryError::Database(e)))?;
    Ok(Json(docs))
}

// ============ GET /documents/{id}/messages ============

async fn handle_list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let doc = store::get_pdf(&state.pool, &id)
        .await
        .map_err(|e| AppError::from(QueryError::Database(e)))?;
    if doc.is_none() {
        return Err(AppError::from(QueryError::NotFound(id)));
    }

    let messages = store::list_messages(&state.pool, &id)
        .await
        .map_err(|e| AppError::from(QueryError::Database(e)))?;
    Ok(Json(messages))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
