//! Axum router configuration with middleware.
//!
//! REST routes live under `/api/v1/`; the frame card endpoint sits at
//! `/api/frame` for social clients. Middleware: permissive CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Personas
        .route("/personas", get(handlers::persona::list_personas))
        .route("/personas/{id}", get(handlers::persona::get_persona))
        // Sessions
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/sessions/{id}/messages",
            post(handlers::message::send_message),
        )
        .route(
            "/sessions/{id}/persona",
            put(handlers::session::select_persona),
        )
        // Wallet
        .route("/wallet", get(handlers::wallet::get_wallet))
        .route("/wallet/connect", post(handlers::wallet::connect_wallet))
        .route(
            "/wallet/disconnect",
            post(handlers::wallet::disconnect_wallet),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route(
            "/api/frame",
            get(handlers::frame::gallery).post(handlers::frame::interact),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
