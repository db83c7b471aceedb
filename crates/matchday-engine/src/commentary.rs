//! Log commentary for the running match.
//!
//! Follows the engine's snapshot feed and writes one `info` line per
//! notable change: a new match, a phase change, each new event, and the
//! winner highlight at full time.

use matchday_core::config::TeamsConfig;
use matchday_types::{FlashWinner, MatchSnapshot};
use tokio::sync::watch;
use tracing::{debug, info};

/// Follow `rx` until the engine stops, logging every notable change.
pub async fn run(mut rx: watch::Receiver<MatchSnapshot>, teams: TeamsConfig) {
    let mut last = rx.borrow_and_update().clone();
    while rx.changed().await.is_ok() {
        let current = rx.borrow_and_update().clone();
        for line in describe_changes(&last, &current, &teams) {
            info!(match_id = %current.match_id, "{line}");
        }
        last = current;
    }
    debug!("engine stopped, commentary finished");
}

/// Lines describing what changed between two snapshots.
pub fn describe_changes(
    last: &MatchSnapshot,
    current: &MatchSnapshot,
    teams: &TeamsConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    let home = &teams.home.code;
    let away = &teams.away.code;

    let same_match = last.match_id == current.match_id;
    if !same_match {
        lines.push(format!("new match: {home} v {away}"));
    }
    if !same_match || last.phase != current.phase {
        lines.push(format!(
            "{} at {}' ({home} {}-{} {away})",
            current.phase.label(),
            current.game_time,
            current.home_score,
            current.away_score
        ));
    }

    let seen = if same_match { last.events.len() } else { 0 };
    for event in current.events.iter().skip(seen) {
        let code = &teams.info(event.team).code;
        lines.push(format!("[{code}] {event}"));
    }

    if let (None, Some(winner)) = (last.flash_winner, current.flash_winner) {
        lines.push(match winner {
            FlashWinner::Home => format!("{} win", teams.home.name),
            FlashWinner::Away => format!("{} win", teams.away.name),
            FlashWinner::Both => "honours even".to_owned(),
        });
    }

    lines
}
