//! REST API read handlers for the Observer server.
//!
//! All handlers read the latest snapshot from the engine's `watch`
//! channel; none of them wait on the engine.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML scoreboard |
//! | `GET` | `/api/match` | Current match snapshot |
//! | `GET` | `/api/match/events` | Event log (by team or type) |
//! | `GET` | `/api/match/summary` | Outcome summary |
//! | `GET` | `/api/players` | Loaded roster |

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use matchday_types::{EventType, MatchEvent, Team};

use crate::error::ObserverError;
use crate::state::AppState;

/// Default number of events returned by `GET /api/match/events`.
const DEFAULT_EVENT_LIMIT: usize = 100;

/// Upper bound on `limit` for `GET /api/match/events`.
const MAX_EVENT_LIMIT: usize = 1000;

/// Number of events listed on the scoreboard page.
const SCOREBOARD_EVENTS: usize = 10;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/match/events` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct EventsQuery {
    /// Filter by side: `home` or `away`.
    pub team: Option<String>,
    /// Filter by event type wire name, e.g. `shot_on_target`.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Maximum number of events to return, newest kept (default 100).
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML scoreboard
// ---------------------------------------------------------------------------

/// Serve a minimal HTML scoreboard with the latest events and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.engine.snapshot();
    let home = escape(&state.teams.home.code);
    let away = escape(&state.teams.away.code);
    let home_name = escape(&state.teams.home.name);
    let away_name = escape(&state.teams.away.name);
    let home_score = snapshot.home_score;
    let away_score = snapshot.away_score;
    let phase = snapshot.phase.label();
    let minute = if snapshot.added_time > 0 {
        format!("{}' +{}", snapshot.game_time, snapshot.added_time)
    } else {
        format!("{}'", snapshot.game_time)
    };
    let possession_home = snapshot.possession_home.round();
    let possession_away = snapshot.possession_away.round();
    let recent = snapshot
        .recent_event
        .as_ref()
        .map(|event| format!("<p class=\"recent\">{}</p>", escape(&event.to_string())))
        .unwrap_or_default();

    let mut timeline = String::new();
    for event in snapshot.events.iter().rev().take(SCOREBOARD_EVENTS) {
        let side = match event.team {
            Team::Home => &home,
            Team::Away => &away,
        };
        // Writing into a String cannot fail.
        let _ = writeln!(
            timeline,
            "        <li><span class=\"side\">{side}</span> {}</li>",
            escape(&event.to_string())
        );
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="1">
    <title>{home} {home_score} - {away_score} {away}</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        .board {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
        }}
        .team {{ text-align: center; }}
        .team .code {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        .team .name {{ color: #8b949e; font-size: 0.85rem; }}
        .score {{ font-size: 2.5rem; font-weight: bold; }}
        .clock {{ text-align: center; color: #8b949e; }}
        .recent {{ color: #7ee787; font-weight: bold; }}
        .side {{ color: #58a6ff; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <div class="board">
        <div class="team"><div class="code">{home}</div><div class="name">{home_name}</div></div>
        <div class="score">{home_score} - {away_score}</div>
        <div class="team"><div class="code">{away}</div><div class="name">{away_name}</div></div>
    </div>
    <p class="clock">{minute} &middot; {phase} &middot; possession {possession_home}% / {possession_away}%</p>
    {recent}
    <ul>
{timeline}    </ul>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/match">/api/match</a> -- Current snapshot</li>
        <li>GET <a href="/api/match/events">/api/match/events</a> -- Event log (?team=home&amp;type=goal&amp;limit=N)</li>
        <li>GET <a href="/api/match/summary">/api/match/summary</a> -- Outcome summary</li>
        <li>GET <a href="/api/players">/api/players</a> -- Roster</li>
        <li>POST /api/match/start -- Kick off</li>
        <li>POST /api/match/reset -- Start over</li>
        <li>WS <code>/ws/match</code> -- Live snapshot stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/match -- current snapshot
// ---------------------------------------------------------------------------

/// Return the full current match snapshot.
pub async fn get_match(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.snapshot())
}

// ---------------------------------------------------------------------------
// GET /api/match/events -- query events
// ---------------------------------------------------------------------------

/// Query the event log by team and event type.
///
/// # Query Parameters
///
/// - `team`: `home` | `away`
/// - `type`: an event type wire name
/// - `limit`: keep only the newest N matches (default 100, max 1000)
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let team = params.team.as_deref().map(parse_team).transpose()?;
    let event_type = params
        .event_type
        .as_deref()
        .map(|name| {
            EventType::from_wire(name)
                .ok_or_else(|| ObserverError::InvalidQuery(format!("unknown event type: {name}")))
        })
        .transpose()?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .min(MAX_EVENT_LIMIT);

    let snapshot = state.engine.snapshot();
    let matching: Vec<&MatchEvent> = snapshot
        .events
        .iter()
        .filter(|e| team.is_none_or(|t| e.team == t))
        .filter(|e| event_type.is_none_or(|t| e.event_type == t))
        .collect();
    let skip = matching.len().saturating_sub(limit);
    let events: Vec<&MatchEvent> = matching.into_iter().skip(skip).collect();

    Ok(Json(serde_json::json!({
        "count": events.len(),
        "events": events,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/match/summary -- outcome summary
// ---------------------------------------------------------------------------

/// Return the summary statistics recomputed from the event log.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.summary())
}

// ---------------------------------------------------------------------------
// GET /api/players -- roster
// ---------------------------------------------------------------------------

/// Return the loaded roster.
pub async fn list_players(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let players = state.engine.snapshot().players;
    Json(serde_json::json!({
        "count": players.len(),
        "players": players,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_team(s: &str) -> Result<Team, ObserverError> {
    match s {
        "home" => Ok(Team::Home),
        "away" => Ok(Team::Away),
        other => Err(ObserverError::InvalidQuery(format!(
            "team must be home or away, got {other}"
        ))),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(escape("<b>O'Neil & co</b>"), "&lt;b&gt;O&#39;Neil &amp; co&lt;/b&gt;");
    }

    #[test]
    fn parse_team_rejects_unknown_side() {
        assert!(matches!(parse_team("home"), Ok(Team::Home)));
        assert!(matches!(parse_team("neutral"), Err(ObserverError::InvalidQuery(_))));
    }
}
