//! Match control handlers.
//!
//! These are the only endpoints that mutate the match. Each one sends a
//! command to the engine actor and answers with the snapshot taken right
//! after the command was applied.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/match/start` | Kick off (ignored unless not started) |
//! | `POST` | `/api/match/reset` | Cancel all timers and start over |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

/// Kick off the match.
pub async fn start_match(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.engine.start().await?;
    info!(phase = ?snapshot.phase, "start requested");
    Ok(Json(snapshot))
}

/// Reset the match to 0-0 at minute 0 and kick off again.
pub async fn reset_match(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.engine.reset().await?;
    info!(match_id = %snapshot.match_id, "reset requested");
    Ok(Json(snapshot))
}
