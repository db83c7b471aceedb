//! Match clock, event generation, and the engine actor for the Matchday
//! simulator.
//!
//! This crate owns the whole simulation: the phase state machine that
//! drives kickoff, halftime, stoppage, and full time; the weighted event
//! generator and its side effects; the possession random walk; the expiry
//! of transient notices; and the actor that serializes every transition.
//!
//! # Modules
//!
//! - [`clock`] -- Minute counter, added time, and phase derivation.
//! - [`config`] -- Configuration loading from `matchday-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- The actor task, its [`EngineHandle`], and commands.
//! - [`generator`] -- Weighted categorical event sampler.
//! - [`outcome`] -- Summary statistics recomputed from the event log.
//! - [`possession`] -- Bounded random walk over the home possession share.
//! - [`roster`] -- Generated, static, and HTTP roster sources.
//! - [`scheduler`] -- Cancellable one-shot timers keyed by slot.
//! - [`state`] -- The match aggregate and its transition reducer.
//!
//! [`EngineHandle`]: engine::EngineHandle

pub mod clock;
pub mod config;
pub mod engine;
pub mod generator;
pub mod outcome;
pub mod possession;
pub mod roster;
pub mod scheduler;
pub mod state;

pub use config::MatchConfig;
pub use engine::{Command, Engine, EngineError, EngineHandle};
pub use roster::{RosterError, RosterSource};
