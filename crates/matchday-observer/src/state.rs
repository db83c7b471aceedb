//! Shared application state for the Observer API server.

use matchday_core::EngineHandle;
use matchday_core::config::TeamsConfig;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the running engine.
    pub engine: EngineHandle,
    /// Team names for display.
    pub teams: TeamsConfig,
}

impl AppState {
    /// Create application state around a running engine.
    pub const fn new(engine: EngineHandle, teams: TeamsConfig) -> Self {
        Self { engine, teams }
    }
}
