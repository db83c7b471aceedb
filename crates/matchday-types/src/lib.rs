//! Shared type definitions for the Matchday match simulator.
//!
//! This crate is the single source of truth for the data that crosses the
//! engine boundary: generated events, state snapshots, and summaries. Types
//! flow downstream to `TypeScript` via `ts-rs` for the scoreboard front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for event and match identifiers
//! - [`enums`] -- Teams, event types, penalty outcomes, phases, verdicts
//! - [`structs`] -- Match events, state snapshots, and outcome summaries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EventType, FlashWinner, MatchResult, PenaltyOutcome, Phase, Team};
pub use ids::{EventId, MatchId};
pub use structs::{MatchEvent, MatchSnapshot, MatchSummary, TeamStats};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::MatchId::export_all();

        let _ = crate::enums::Team::export_all();
        let _ = crate::enums::EventType::export_all();
        let _ = crate::enums::PenaltyOutcome::export_all();
        let _ = crate::enums::Phase::export_all();
        let _ = crate::enums::FlashWinner::export_all();
        let _ = crate::enums::MatchResult::export_all();

        let _ = crate::structs::MatchEvent::export_all();
        let _ = crate::structs::MatchSnapshot::export_all();
        let _ = crate::structs::TeamStats::export_all();
        let _ = crate::structs::MatchSummary::export_all();
    }
}
