//! Observer API server for the Matchday simulator.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/match`) streaming a JSON snapshot after
//!   every engine transition
//! - **REST endpoints** for reading the match (snapshot, event log,
//!   summary, roster)
//! - **Command endpoints** for `start` and `reset`
//! - **Minimal HTML scoreboard** (`GET /`)
//!
//! # Architecture
//!
//! The observer holds an [`EngineHandle`] and nothing else. Reads come from
//! the engine's `watch` channel and never block the engine; commands go
//! through the engine mailbox and return the snapshot taken right after
//! they were applied.
//!
//! [`EngineHandle`]: matchday_core::EngineHandle

pub mod control;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::spawn_observer;
pub use state::AppState;
