//! Simulated wallet handlers.
//!
//! - GET  /api/v1/wallet            - Current snapshot
//! - POST /api/v1/wallet/connect    - Connect (after the configured delay)
//! - POST /api/v1/wallet/disconnect - Disconnect
//!
//! The wallet is shared by every session on this server.

use axum::Json;
use axum::extract::State;

use castagents_core::wallet::WalletSource;
use castagents_types::wallet::WalletSnapshot;

use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

pub async fn get_wallet(State(state): State<AppState>) -> Json<ApiResponse<WalletSnapshot>> {
    let clock = RequestClock::start();
    Json(clock.respond(state.wallet.snapshot()))
}

pub async fn connect_wallet(State(state): State<AppState>) -> Json<ApiResponse<WalletSnapshot>> {
    let clock = RequestClock::start();
    let snapshot = state.wallet.connect().await;
    Json(clock.respond(snapshot))
}

pub async fn disconnect_wallet(
    State(state): State<AppState>,
) -> Json<ApiResponse<WalletSnapshot>> {
    let clock = RequestClock::start();
    Json(clock.respond(state.wallet.disconnect()))
}
