//! `WebSocket` handler for live snapshot streaming.
//!
//! Clients connect to `GET /ws/match`, receive the current snapshot
//! immediately, then one JSON-encoded [`MatchSnapshot`] every time the
//! engine publishes a change. The feed is a `watch` channel, so a slow
//! client skips straight to the newest snapshot instead of lagging.
//!
//! [`MatchSnapshot`]: matchday_types::MatchSnapshot

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use matchday_types::MatchSnapshot;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming match snapshots.
///
/// # Route
///
/// `GET /ws/match`
pub async fn ws_match(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Send one snapshot as a text frame. Returns `false` once the client
/// is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &MatchSnapshot) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize match snapshot: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.engine.subscribe();
    let initial = rx.borrow_and_update().clone();
    if !send_snapshot(&mut socket, &initial).await {
        debug!("WebSocket client disconnected (send failed)");
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Engine stopped, closing WebSocket");
                    let _ = socket.send(Message::Close(None)).await;
                    return;
                }
                let snapshot = rx.borrow_and_update().clone();
                if !send_snapshot(&mut socket, &snapshot).await {
                    debug!("WebSocket client disconnected (send failed)");
                    return;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
