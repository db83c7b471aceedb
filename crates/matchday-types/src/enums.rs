//! Enumeration types for the Matchday simulator.
//!
//! All enums serialize in `snake_case` so the JSON surface matches the
//! event vocabulary the scoreboard front end already speaks
//! (`"yellow_card"`, `"shot_on_target"`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One side of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Team {
    /// The home side.
    Home,
    /// The away side.
    Away,
}

impl Team {
    /// Return the wire name of the team (`"home"` or `"away"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// The kind of a generated match event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// A goal from open play. Scores for the event's team.
    Goal,
    /// A caution.
    YellowCard,
    /// A dismissal.
    RedCard,
    /// A penalty kick; carries a [`PenaltyOutcome`].
    Penalty,
    /// A corner kick.
    Corner,
    /// A foul committed by the event's player.
    Foul,
    /// A substitution; carries a replacement player.
    Substitution,
    /// An injury stoppage. Accrues added time.
    Injury,
    /// An offside call.
    Offside,
    /// A goalkeeper save.
    Save,
    /// A shot that tested the goalkeeper.
    ShotOnTarget,
    /// A shot that missed the frame.
    ShotOffTarget,
    /// The event's team won the ball. Nudges the possession share.
    PossessionChange,
}

impl EventType {
    /// Every event type, in weight-table order.
    pub const ALL: [Self; 13] = [
        Self::Goal,
        Self::YellowCard,
        Self::RedCard,
        Self::Penalty,
        Self::Corner,
        Self::Foul,
        Self::Substitution,
        Self::Injury,
        Self::Offside,
        Self::Save,
        Self::ShotOnTarget,
        Self::ShotOffTarget,
        Self::PossessionChange,
    ];

    /// Return the wire name of the event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::YellowCard => "yellow_card",
            Self::RedCard => "red_card",
            Self::Penalty => "penalty",
            Self::Corner => "corner",
            Self::Foul => "foul",
            Self::Substitution => "substitution",
            Self::Injury => "injury",
            Self::Offside => "offside",
            Self::Save => "save",
            Self::ShotOnTarget => "shot_on_target",
            Self::ShotOffTarget => "shot_off_target",
            Self::PossessionChange => "possession_change",
        }
    }

    /// Parse a wire name back into an event type.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether this event counts as a shot attempt.
    pub const fn is_shot(self) -> bool {
        matches!(self, Self::ShotOnTarget | Self::ShotOffTarget)
    }

    /// Commentary phrase for the event, as shown on the match timeline.
    ///
    /// Penalties read differently depending on how they ended; a penalty
    /// without an outcome is one that was only awarded.
    pub const fn describe(self, outcome: Option<PenaltyOutcome>) -> &'static str {
        match self {
            Self::Goal => "scores!",
            Self::YellowCard => "booked",
            Self::RedCard => "sent off",
            Self::Penalty => match outcome {
                Some(PenaltyOutcome::Scored) => "scores penalty!",
                Some(PenaltyOutcome::Missed) => "misses penalty",
                Some(PenaltyOutcome::Blocked) => "penalty saved",
                None => "wins penalty",
            },
            Self::Corner => "takes corner",
            Self::Foul => "commits foul",
            Self::Substitution => "substituted",
            Self::Injury => "injured",
            Self::Offside => "caught offside",
            Self::Save => "makes save",
            Self::ShotOnTarget => "shot on target",
            Self::ShotOffTarget => "shoots wide",
            Self::PossessionChange => "wins possession",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a penalty kick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PenaltyOutcome {
    /// The goalkeeper stopped it.
    Blocked,
    /// The taker missed the frame.
    Missed,
    /// The penalty went in. Scores for the taker's team.
    Scored,
}

impl PenaltyOutcome {
    /// Every outcome, drawn uniformly by the event generator.
    pub const ALL: [Self; 3] = [Self::Blocked, Self::Missed, Self::Scored];
}

// ---------------------------------------------------------------------------
// Match lifecycle
// ---------------------------------------------------------------------------

/// Phase of the match clock.
///
/// Derived from the clock flags; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// Before kickoff.
    NotStarted,
    /// The clock is running in either half.
    Playing,
    /// The break. The clock is frozen.
    Halftime,
    /// Regulation time is up and added time is being consumed.
    Stoppage,
    /// The match is over until the next reset.
    FullTime,
}

impl Phase {
    /// Human-readable label for scoreboards and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Playing => "playing",
            Self::Halftime => "half time",
            Self::Stoppage => "stoppage time",
            Self::FullTime => "full time",
        }
    }
}

/// Winner highlight raised at full time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FlashWinner {
    /// The home side won.
    Home,
    /// The away side won.
    Away,
    /// The match was drawn.
    Both,
}

impl FlashWinner {
    /// Pick the highlight for a final score.
    pub const fn from_score(home: u32, away: u32) -> Self {
        if home > away {
            Self::Home
        } else if away > home {
            Self::Away
        } else {
            Self::Both
        }
    }
}

/// Verdict of a match summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MatchResult {
    /// Home side ahead.
    HomeWin,
    /// Away side ahead.
    AwayWin,
    /// Level.
    Draw,
}

impl MatchResult {
    /// The winning team, if any.
    pub const fn winner(self) -> Option<Team> {
        match self {
            Self::HomeWin => Some(Team::Home),
            Self::AwayWin => Some(Team::Away),
            Self::Draw => None,
        }
    }
}

impl From<FlashWinner> for MatchResult {
    fn from(flash: FlashWinner) -> Self {
        match flash {
            FlashWinner::Home => Self::HomeWin,
            FlashWinner::Away => Self::AwayWin,
            FlashWinner::Both => Self::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::ShotOnTarget).ok();
        assert_eq!(json.as_deref(), Some("\"shot_on_target\""));
    }

    #[test]
    fn wire_names_match_serde() {
        for ty in EventType::ALL {
            let json = serde_json::to_string(&ty).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            assert_eq!(EventType::from_wire(ty.as_str()), Some(ty));
        }
        assert_eq!(EventType::from_wire("throw_in"), None);
    }

    #[test]
    fn penalty_phrases_follow_outcome() {
        assert_eq!(EventType::Penalty.describe(None), "wins penalty");
        assert_eq!(
            EventType::Penalty.describe(Some(PenaltyOutcome::Scored)),
            "scores penalty!"
        );
        assert_eq!(
            EventType::Penalty.describe(Some(PenaltyOutcome::Blocked)),
            "penalty saved"
        );
        assert_eq!(EventType::Goal.describe(None), "scores!");
    }

    #[test]
    fn flash_winner_from_score() {
        assert_eq!(FlashWinner::from_score(2, 1), FlashWinner::Home);
        assert_eq!(FlashWinner::from_score(0, 3), FlashWinner::Away);
        assert_eq!(FlashWinner::from_score(1, 1), FlashWinner::Both);
    }
}
