//! Observer server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_observer`] which launches the Observer HTTP +
//! `WebSocket` server on a background Tokio task, so the API runs
//! alongside the engine actor.

use std::future::Future;
use std::sync::Arc;

use matchday_core::config::ServerConfig;
use tokio::task::JoinHandle;

use crate::server::{ServerError, bind_addr, start_server};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the Observer HTTP server on a background Tokio task.
///
/// The address is validated before the task is spawned, so an obviously
/// bad host or port fails here instead of inside the task. The server
/// stops once `shutdown` resolves; the caller should await the returned
/// handle to let in-flight requests drain.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse.
pub fn spawn_observer<F>(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<JoinHandle<()>, StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = bind_addr(&config)?;

    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(&config, state, shutdown).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%addr, "Observer server spawned on background task");

    Ok(handle)
}
