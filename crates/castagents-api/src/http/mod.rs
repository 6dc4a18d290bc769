//! HTTP/REST API layer for CastAgents.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format,
//! plus the frame card endpoint at `/api/frame`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
