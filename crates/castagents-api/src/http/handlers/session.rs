//! Session handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions              - Open a session with a persona
//! - GET    /api/v1/sessions/{id}         - Session view with transcript
//! - PUT    /api/v1/sessions/{id}/persona - Switch persona (clears transcript)
//! - DELETE /api/v1/sessions/{id}         - Drop the session

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use castagents_core::chat::ChatService;
use castagents_types::chat::ChatMessage;
use castagents_types::error::SessionError;
use castagents_types::persona::PersonaId;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Body of `POST /sessions` and `PUT /sessions/{id}/persona`.
#[derive(Debug, Default, Deserialize)]
pub struct PersonaBody {
    /// Persona identifier; the default persona when omitted on create.
    #[serde(default)]
    pub persona: Option<String>,
}

/// Public view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub persona: PersonaId,
    pub processing: bool,
    pub messages: Vec<ChatMessage>,
}

impl SessionView {
    pub fn of(id: Uuid, service: &ChatService) -> Self {
        Self {
            id,
            persona: service.persona(),
            processing: service.is_processing(),
            messages: service.transcript(),
        }
    }
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Look up a live session by path id.
pub fn find_session(state: &AppState, id: &str) -> Result<(Uuid, Arc<ChatService>), AppError> {
    let sid = parse_uuid(id)?;
    let service = state
        .session(&sid)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
    Ok((sid, service))
}

fn persona_from(state: &AppState, requested: Option<&str>) -> Result<PersonaId, AppError> {
    match requested {
        None => Ok(PersonaId::default()),
        Some(raw) => state
            .resolve_persona(raw)
            .ok_or_else(|| SessionError::PersonaNotFound(raw.to_string()).into()),
    }
}

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let clock = RequestClock::start();
    let body: PersonaBody = if body.is_empty() {
        PersonaBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid body: {e}")))?
    };
    let persona = persona_from(&state, body.persona.as_deref())?;

    let (id, service) = state.open_session(persona);
    let link = format!("/api/v1/sessions/{id}");
    Ok(Json(
        clock
            .respond(SessionView::of(id, &service))
            .with_link("self", &link)
            .with_link("messages", &format!("{link}/messages")),
    ))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let clock = RequestClock::start();
    let (id, service) = find_session(&state, &session_id)?;
    Ok(Json(clock.respond(SessionView::of(id, &service))))
}

/// PUT /api/v1/sessions/{id}/persona
pub async fn select_persona(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<PersonaBody>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let clock = RequestClock::start();
    let (id, service) = find_session(&state, &session_id)?;
    let requested = body
        .persona
        .as_deref()
        .ok_or_else(|| AppError::Validation("persona is required".to_string()))?;
    let persona = persona_from(&state, Some(requested))?;

    service.select_persona(persona)?;
    Ok(Json(clock.respond(SessionView::of(id, &service))))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let clock = RequestClock::start();
    let sid = parse_uuid(&session_id)?;
    if !state.close_session(&sid) {
        return Err(AppError::SessionNotFound(session_id));
    }
    Ok(Json(clock.respond(serde_json::json!({ "deleted": true }))))
}
