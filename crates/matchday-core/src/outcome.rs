//! Outcome aggregation.
//!
//! Summaries are recomputed from the full event log on every call, never
//! maintained incrementally, so they always agree with the log.

use matchday_types::{
    EventType, FlashWinner, MatchEvent, MatchResult, MatchSnapshot, MatchSummary, Team, TeamStats,
};

/// Tally the event log into a summary.
///
/// Possession is taken as given: it is the share at the moment of reading,
/// not an average over the match.
pub fn summarize(
    events: &[MatchEvent],
    home_score: u32,
    away_score: u32,
    possession_home: f64,
    is_final: bool,
) -> MatchSummary {
    let mut home = TeamStats::default();
    let mut away = TeamStats::default();

    for event in events {
        let stats = match event.team {
            Team::Home => &mut home,
            Team::Away => &mut away,
        };
        tally(stats, event);
    }

    MatchSummary {
        home_score,
        away_score,
        home,
        away,
        possession_home,
        possession_away: 100.0 - possession_home,
        result: MatchResult::from(FlashWinner::from_score(home_score, away_score)),
        is_final,
    }
}

/// Summarize a published snapshot.
pub fn summarize_snapshot(snapshot: &MatchSnapshot) -> MatchSummary {
    summarize(
        &snapshot.events,
        snapshot.home_score,
        snapshot.away_score,
        snapshot.possession_home,
        snapshot.is_game_over,
    )
}

fn tally(stats: &mut TeamStats, event: &MatchEvent) {
    let bump = |count: &mut u32| *count = count.saturating_add(1);

    if event.scoring_team().is_some() {
        bump(&mut stats.goals);
    }
    if event.event_type.is_shot() {
        bump(&mut stats.shots);
    }
    match event.event_type {
        EventType::ShotOnTarget => bump(&mut stats.shots_on_target),
        EventType::Corner => bump(&mut stats.corners),
        EventType::Foul => bump(&mut stats.fouls),
        EventType::YellowCard => bump(&mut stats.yellow_cards),
        EventType::RedCard => bump(&mut stats.red_cards),
        EventType::Save => bump(&mut stats.saves),
        EventType::Offside => bump(&mut stats.offsides),
        EventType::Goal
        | EventType::Penalty
        | EventType::Substitution
        | EventType::Injury
        | EventType::ShotOffTarget
        | EventType::PossessionChange => {}
    }
}
