//! Persona catalogue handlers.
//!
//! Endpoints:
//! - GET /api/v1/personas      - List all personas
//! - GET /api/v1/personas/{id} - Get one persona (`SWAP_AGENT` or `swap-agent`)

use axum::Json;
use axum::extract::{Path, State};

use castagents_types::error::SessionError;
use castagents_types::persona::Persona;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// GET /api/v1/personas
pub async fn list_personas(State(state): State<AppState>) -> Json<ApiResponse<Vec<Persona>>> {
    let clock = RequestClock::start();
    let personas = state.registry.list().to_vec();
    Json(clock.respond(personas).with_link("self", "/api/v1/personas"))
}

/// GET /api/v1/personas/{id}
pub async fn get_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Persona>>, AppError> {
    let clock = RequestClock::start();
    let persona = state
        .registry
        .find(&id)
        .cloned()
        .ok_or(SessionError::PersonaNotFound(id))?;
    let link = format!("/api/v1/personas/{}", persona.id);
    Ok(Json(clock.respond(persona).with_link("self", &link)))
}
