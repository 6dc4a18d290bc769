//! Message handler: runs one conversation turn.
//!
//! - POST /api/v1/sessions/{id}/messages - `{text}` → the model's reply
//!
//! The request waits for the model. A second message while a turn is in
//! flight is rejected with 409.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use castagents_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::handlers::session::find_session;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub text: String,
}

/// POST /api/v1/sessions/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let clock = RequestClock::start();
    let (_, service) = find_session(&state, &session_id)?;

    let reply = service.send(&body.text).await?;
    tracing::info!(
        session_id = %session_id,
        has_proposal = reply.proposal().is_some(),
        "Message answered"
    );
    Ok(Json(clock.respond(reply)))
}
