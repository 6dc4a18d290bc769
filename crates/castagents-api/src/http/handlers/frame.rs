//! Frame card endpoint.
//!
//! - GET  /api/frame - Agent gallery card
//! - POST /api/frame - Next card for the reported interaction
//!
//! Responses are bare cards (no envelope) and always 200. An unparseable
//! POST body is treated as an empty interaction.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::HOST;

use castagents_core::frame::FrameResponder;
use castagents_types::frame::{FrameCard, FrameRequest};

use crate::state::AppState;

/// Configured public URL, else `https://{Host}`.
fn responder(state: &AppState, headers: &HeaderMap) -> FrameResponder {
    if let Some(base) = state.config.server.public_base_url.as_deref() {
        return FrameResponder::new(base);
    }
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    FrameResponder::new(format!("https://{host}"))
}

/// GET /api/frame
pub async fn gallery(State(state): State<AppState>, headers: HeaderMap) -> Json<FrameCard> {
    Json(responder(&state, &headers).gallery())
}

/// POST /api/frame
pub async fn interact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<FrameCard> {
    let request: FrameRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        if !body.is_empty() {
            tracing::debug!(error = %e, "Unparseable frame body, treating as empty");
        }
        FrameRequest::default()
    });
    Json(responder(&state, &headers).respond(&request))
}
