//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin scoreboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::control;
use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML scoreboard
/// - `GET /ws/match` -- `WebSocket` snapshot stream
/// - `GET /api/match` -- current snapshot
/// - `GET /api/match/events` -- query events
/// - `GET /api/match/summary` -- outcome summary
/// - `GET /api/players` -- roster
/// - `POST /api/match/start` -- kick off
/// - `POST /api/match/reset` -- start over
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Scoreboard
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/match", get(ws::ws_match))
        // Read API
        .route("/api/match", get(handlers::get_match))
        .route("/api/match/events", get(handlers::list_events))
        .route("/api/match/summary", get(handlers::get_summary))
        .route("/api/players", get(handlers::list_players))
        // Control
        .route("/api/match/start", post(control::start_match))
        .route("/api/match/reset", post(control::reset_match))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
