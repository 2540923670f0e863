//! Axum router and handlers.
//!
//! `build_router` is the single entry point; `main.rs` attaches middleware
//! layers afterwards so tests can drive the bare router.

use std::error::Error as _;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use http_body_util::LengthLimitError;
use tracing::{debug, info};

use crate::document;
use crate::error::{AppError, Result};
use crate::http::api_types::HealthResponse;
use crate::http::state::AppState;

pub const CREATE_DOCUMENT_PATH: &str = "/api/v3/lk/documents/create";
pub const HEALTH_PATH: &str = "/health";

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CREATE_DOCUMENT_PATH, post(create_document))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// POST /api/v3/lk/documents/create
// ---------------------------------------------------------------------------

/// Reads the declaration, then parses and signs it inside one admission slot.
/// Responds `201 Created` with the signed document.
pub(crate) async fn create_document(
    State(st): State<Arc<AppState>>,
    body: Body,
) -> Result<Response> {
    let bytes = to_bytes(body, st.max_body_bytes)
        .await
        .map_err(|e| body_error(e, st.max_body_bytes))?;
    let raw = String::from_utf8(bytes.to_vec())
        .map_err(|e| AppError::Parse(format!("request body is not valid UTF-8: {}", e)))?;
    debug!("Received document ({} bytes)", raw.len());

    let signer = Arc::clone(&st.signer);
    let signed = st
        .limiter
        .submit(move || document::process(&raw, signer.as_ref()))
        .await?;

    let payload = serde_json::to_vec(&signed)?;
    info!(
        "Document {:?} signed on {}",
        signed.document.doc_id, signed.signature_date
    );

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response())
}

fn body_error(err: axum::Error, limit: usize) -> AppError {
    let too_large = err
        .source()
        .map_or(false, |source| source.is::<LengthLimitError>());

    if too_large {
        AppError::BodyTooLarge(limit)
    } else {
        AppError::Transport(format!("failed to read request body: {}", err))
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let closed = st.limiter.is_closed();
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: !closed,
            service: st.build.service,
            version: st.build.version,
            capacity: st.limiter.capacity(),
            available_slots: st.limiter.available_slots(),
            closed,
            limiter: st.limiter.stats().snapshot(),
        }),
    )
}
