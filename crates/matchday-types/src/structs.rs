//! Core record structs: match events, state snapshots, and summaries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventType, FlashWinner, MatchResult, PenaltyOutcome, Phase, Team};
use crate::ids::{EventId, MatchId};

// ---------------------------------------------------------------------------
// Match events
// ---------------------------------------------------------------------------

/// A single generated match occurrence.
///
/// Events are immutable once appended to the match log. Only penalties carry
/// a [`PenaltyOutcome`] and only substitutions carry a replacement player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// What happened.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The side the event is attributed to.
    pub team: Team,
    /// The player involved.
    pub player: String,
    /// Match minute at which the event was generated.
    pub minute: u8,
    /// Outcome of a penalty kick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sub_action: Option<PenaltyOutcome>,
    /// Player coming on in a substitution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub replacement_player: Option<String>,
}

impl MatchEvent {
    /// Create an event with no penalty outcome and no replacement.
    pub fn new(event_type: EventType, team: Team, player: impl Into<String>, minute: u8) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            team,
            player: player.into(),
            minute,
            sub_action: None,
            replacement_player: None,
        }
    }

    /// The team this event scores for, if it is a goal or a converted
    /// penalty.
    pub fn scoring_team(&self) -> Option<Team> {
        match (self.event_type, self.sub_action) {
            (EventType::Goal, _) | (EventType::Penalty, Some(PenaltyOutcome::Scored)) => {
                Some(self.team)
            }
            _ => None,
        }
    }
}

impl core::fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}' {} {}",
            self.minute,
            self.player,
            self.event_type.describe(self.sub_action)
        )?;
        if let Some(replacement) = &self.replacement_player {
            write!(f, " ({replacement} on)")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the match state, published after every transition.
///
/// This is the whole state surface exposed to collaborators. The engine
/// owns the live state; readers only ever see snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchSnapshot {
    /// Identifier of the current match run (changes on reset).
    pub match_id: MatchId,
    /// Current phase, derived from the clock flags.
    pub phase: Phase,
    /// Home goals.
    pub home_score: u32,
    /// Away goals.
    pub away_score: u32,
    /// Match minute, 0 to 90.
    pub game_time: u8,
    /// Remaining added time, 0 to 5.
    pub added_time: u8,
    /// Whether the clock is running.
    pub is_playing: bool,
    /// Whether the match is at the break.
    pub is_halftime: bool,
    /// Whether the break notice is showing.
    pub show_halftime_notice: bool,
    /// Whether the match has finished.
    pub is_game_over: bool,
    /// Home possession share in percent, 30 to 70.
    pub possession_home: f64,
    /// Away possession share in percent.
    pub possession_away: f64,
    /// Chronological event log.
    pub events: Vec<MatchEvent>,
    /// Loaded roster.
    pub players: Vec<String>,
    /// Most recently announced event, while its notice lasts.
    pub recent_event: Option<MatchEvent>,
    /// Winner highlight, while it lasts.
    pub flash_winner: Option<FlashWinner>,
}

// ---------------------------------------------------------------------------
// Outcome summary
// ---------------------------------------------------------------------------

/// Per-team tallies derived from the event log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamStats {
    /// Goals and converted penalties.
    pub goals: u32,
    /// Shots on and off target.
    pub shots: u32,
    /// Shots on target only.
    pub shots_on_target: u32,
    /// Corners taken.
    pub corners: u32,
    /// Fouls committed.
    pub fouls: u32,
    /// Yellow cards.
    pub yellow_cards: u32,
    /// Red cards.
    pub red_cards: u32,
    /// Goalkeeper saves.
    pub saves: u32,
    /// Offside calls.
    pub offsides: u32,
}

/// Match statistics summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchSummary {
    /// Home goals on the scoreboard.
    pub home_score: u32,
    /// Away goals on the scoreboard.
    pub away_score: u32,
    /// Home tallies.
    pub home: TeamStats,
    /// Away tallies.
    pub away: TeamStats,
    /// Home possession share at the time of reading.
    pub possession_home: f64,
    /// Away possession share at the time of reading.
    pub possession_away: f64,
    /// Current verdict.
    pub result: MatchResult,
    /// Whether the match has reached full time.
    pub is_final: bool,
}

impl MatchSummary {
    /// Tallies for one side.
    pub const fn team(&self, team: Team) -> &TeamStats {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_type_field() {
        let event = MatchEvent::new(EventType::Corner, Team::Home, "Neves", 12);
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["type"], "corner");
        assert_eq!(json["team"], "home");
        assert_eq!(json["minute"], 12);
        assert!(json.get("sub_action").is_none());
        assert!(json.get("replacement_player").is_none());
    }

    #[test]
    fn only_goals_and_scored_penalties_score() {
        let goal = MatchEvent::new(EventType::Goal, Team::Away, "Adams", 30);
        assert_eq!(goal.scoring_team(), Some(Team::Away));

        let mut penalty = MatchEvent::new(EventType::Penalty, Team::Home, "Cunha", 60);
        penalty.sub_action = Some(PenaltyOutcome::Missed);
        assert_eq!(penalty.scoring_team(), None);
        penalty.sub_action = Some(PenaltyOutcome::Scored);
        assert_eq!(penalty.scoring_team(), Some(Team::Home));

        let save = MatchEvent::new(EventType::Save, Team::Home, "Sa", 61);
        assert_eq!(save.scoring_team(), None);
    }

    #[test]
    fn display_reads_like_commentary() {
        let mut sub = MatchEvent::new(EventType::Substitution, Team::Home, "Lemina", 70);
        sub.replacement_player = Some(String::from("Doyle"));
        assert_eq!(sub.to_string(), "70' Lemina substituted (Doyle on)");

        let wide = MatchEvent::new(EventType::ShotOffTarget, Team::Away, "Armstrong", 8);
        assert_eq!(wide.to_string(), "8' Armstrong shoots wide");
    }
}
