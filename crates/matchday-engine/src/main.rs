//! Engine binary for the Matchday simulator.
//!
//! Wires together the engine actor, the roster source, the observer API
//! server, and the log commentary, then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `matchday-config.yaml` (or `MATCHDAY_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Spawn the engine actor with the configured roster source
//! 4. Start the log commentary
//! 5. Start the Observer API server
//! 6. Kick off, if `server.auto_start` is set
//! 7. Wait for `Ctrl-C`, then stop the server and the engine

mod commentary;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use matchday_core::config::{LogFormat, LoggingConfig};
use matchday_core::{Engine, MatchConfig, RosterSource};
use matchday_observer::AppState;
use matchday_observer::startup::spawn_observer;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default config file, relative to the working directory.
const CONFIG_FILE: &str = "matchday-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the observer cannot
/// start, or a background task fails during shutdown.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("matchday-engine starting");
    info!(
        source = %source,
        tick_interval_ms = config.timing.tick_interval_ms,
        event_probability = config.rules.event_probability,
        roster = ?config.roster.source,
        home = config.teams.home.code,
        away = config.teams.away.code,
        "Configuration loaded"
    );

    run(config).await?;
    info!("matchday-engine stopped");
    Ok(())
}

async fn run(config: MatchConfig) -> Result<(), AppError> {
    // 3. Spawn the engine actor.
    let roster = RosterSource::from_config(&config.roster);
    info!(roster = roster.name(), "Spawning engine");
    let engine = Engine::spawn(&config, roster)?;
    let handle = engine.handle();

    // 4. Log commentary.
    let commentary = tokio::spawn(commentary::run(handle.subscribe(), config.teams.clone()));

    // 5. Observer API server.
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let state = Arc::new(AppState::new(handle.clone(), config.teams.clone()));
    let observer = spawn_observer(config.server.clone(), state, async move {
        // A dropped sender also means stop.
        let _ = stop_rx.await;
    })?;

    // 6. Kick off.
    if config.server.auto_start {
        let snapshot = handle.start().await?;
        info!(match_id = %snapshot.match_id, "Match started automatically");
    } else {
        info!("Waiting for POST /api/match/start");
    }

    // 7. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    let _ = stop_tx.send(());
    observer.await?;
    engine.shutdown().await?;
    commentary.await?;

    let summary = handle.summary();
    info!(
        home = config.teams.home.code,
        away = config.teams.away.code,
        home_score = summary.home_score,
        away_score = summary.away_score,
        result = ?summary.result,
        is_final = summary.is_final,
        "Final state"
    );
    Ok(())
}

/// Load configuration from `MATCHDAY_CONFIG` or `matchday-config.yaml`.
///
/// A missing file means defaults, with environment overrides still
/// applied. Returns the config and a description of where it came from.
fn load_config() -> Result<(MatchConfig, String), AppError> {
    let path = std::env::var_os("MATCHDAY_CONFIG")
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if path.exists() {
        let config = MatchConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        let config = MatchConfig::parse("")?;
        Ok((config, String::from("defaults")))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
