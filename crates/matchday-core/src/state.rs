//! Match state and the single-writer transition reducer.
//!
//! [`MatchState`] is the one owned aggregate. Every change to it goes
//! through [`MatchState::apply`], which runs a [`Transition`] to completion
//! and returns the [`TimerCommand`]s the scheduler must carry out. The
//! reducer never sleeps and never spawns; it only decides what should
//! happen later, and the engine actor makes it happen.
//!
//! # Transitions
//!
//! | Transition               | Source                         |
//! |--------------------------|--------------------------------|
//! | `Start`, `Reset`         | external commands              |
//! | `Tick`                   | the tick timer                 |
//! | `RosterLoaded`           | roster fetch completion        |
//! | `HalftimeNoticeElapsed`  | one-shot, armed at the break   |
//! | `SecondHalfKickoff`      | one-shot, armed at the break   |
//! | `RecentEventExpired`     | one-shot, armed per event      |
//! | `FlashWinnerExpired`     | one-shot, armed at full time   |

use matchday_types::{EventId, FlashWinner, MatchEvent, MatchId, MatchSnapshot, Phase, Team};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::{ClockStep, MatchClock};
use crate::config::MatchConfig;
use crate::generator::{EventDraw, EventGenerator};
use crate::possession::Possession;

// ---------------------------------------------------------------------------
// Transitions and timer commands
// ---------------------------------------------------------------------------

/// One serialized change to the match state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Kick off from the not-started phase.
    Start,
    /// Discard the match and kick off a fresh one, keeping the roster.
    Reset,
    /// One clock tick.
    Tick,
    /// The roster source resolved.
    RosterLoaded {
        /// Player names, possibly empty.
        players: Vec<String>,
    },
    /// The halftime notice has been shown long enough.
    HalftimeNoticeElapsed,
    /// The break is over.
    SecondHalfKickoff,
    /// The announcement of an event has run its course.
    RecentEventExpired {
        /// The event whose announcement expires.
        event_id: EventId,
    },
    /// The full-time winner highlight has run its course.
    FlashWinnerExpired,
}

/// A timer slot. At most one timer per slot is pending at any moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// The next clock tick.
    Tick,
    /// Clearing the halftime notice.
    HalftimeNotice,
    /// Restarting play after the break.
    SecondHalfKickoff,
    /// Clearing the most recent event.
    RecentEvent,
    /// Clearing the winner highlight.
    FlashWinner,
}

impl TimerKind {
    /// Every slot.
    pub const ALL: [Self; 5] = [
        Self::Tick,
        Self::HalftimeNotice,
        Self::SecondHalfKickoff,
        Self::RecentEvent,
        Self::FlashWinner,
    ];

    /// Short name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::HalftimeNotice => "halftime_notice",
            Self::SecondHalfKickoff => "second_half_kickoff",
            Self::RecentEvent => "recent_event",
            Self::FlashWinner => "flash_winner",
        }
    }
}

/// Instruction for the scheduler, produced by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Arm the slot, replacing whatever was pending in it, so that `fire`
    /// is applied once the slot's delay has elapsed.
    Arm {
        /// Which slot.
        kind: TimerKind,
        /// The transition to apply when it fires.
        fire: Transition,
    },
    /// Drop every pending timer.
    CancelAll,
}

impl TimerCommand {
    const fn arm(kind: TimerKind, fire: Transition) -> Self {
        Self::Arm { kind, fire }
    }
}

// ---------------------------------------------------------------------------
// Match state
// ---------------------------------------------------------------------------

/// The single owned match aggregate.
#[derive(Debug, Clone)]
pub struct MatchState {
    match_id: MatchId,
    clock: MatchClock,
    possession: Possession,
    initial_possession: Possession,
    generator: EventGenerator,
    event_probability: f64,
    home_score: u32,
    away_score: u32,
    events: Vec<MatchEvent>,
    players: Vec<String>,
    recent_event: Option<MatchEvent>,
    flash_winner: Option<FlashWinner>,
}

impl MatchState {
    /// Fresh, not-started match with an empty roster.
    pub fn new(config: &MatchConfig) -> Self {
        let possession = Possession::new(&config.rules);
        Self {
            match_id: MatchId::new(),
            clock: MatchClock::new(&config.rules),
            possession,
            initial_possession: possession,
            generator: EventGenerator::new(config.events.clone(), &config.rules),
            event_probability: config.rules.event_probability.clamp(0.0, 1.0),
            home_score: 0,
            away_score: 0,
            events: Vec::new(),
            players: Vec::new(),
            recent_event: None,
            flash_winner: None,
        }
    }

    /// Apply one transition and return the timers it asks for.
    ///
    /// Transitions that do not fit the current phase are ignored.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        transition: Transition,
        rng: &mut R,
    ) -> Vec<TimerCommand> {
        match transition {
            Transition::Start => self.start(),
            Transition::Reset => self.reset(),
            Transition::Tick => self.tick(rng),
            Transition::RosterLoaded { players } => {
                self.load_roster(players);
                Vec::new()
            }
            Transition::HalftimeNoticeElapsed => {
                if !self.clock.hide_halftime_notice() {
                    debug!(match_id = %self.match_id, "halftime notice already cleared");
                }
                Vec::new()
            }
            Transition::SecondHalfKickoff => self.kick_off_second_half(),
            Transition::RecentEventExpired { event_id } => {
                if self.recent_event.as_ref().is_some_and(|e| e.id == event_id) {
                    self.recent_event = None;
                } else {
                    debug!(%event_id, "recent event already superseded");
                }
                Vec::new()
            }
            Transition::FlashWinnerExpired => {
                self.flash_winner = None;
                Vec::new()
            }
        }
    }

    fn start(&mut self) -> Vec<TimerCommand> {
        if !self.clock.start() {
            debug!(match_id = %self.match_id, phase = ?self.phase(), "start ignored");
            return Vec::new();
        }
        info!(match_id = %self.match_id, "kick-off");
        vec![TimerCommand::arm(TimerKind::Tick, Transition::Tick)]
    }

    fn reset(&mut self) -> Vec<TimerCommand> {
        let previous = self.match_id;
        self.match_id = MatchId::new();
        self.clock.restart();
        self.possession = self.initial_possession;
        self.home_score = 0;
        self.away_score = 0;
        self.events.clear();
        self.recent_event = None;
        self.flash_winner = None;
        info!(%previous, match_id = %self.match_id, "match reset");
        vec![
            TimerCommand::CancelAll,
            TimerCommand::arm(TimerKind::Tick, Transition::Tick),
        ]
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<TimerCommand> {
        let step = self.clock.tick();
        let mut commands = Vec::new();

        if let Some(minute) = step.event_minute() {
            if rng.random_bool(self.event_probability) {
                match self
                    .generator
                    .draw(rng, minute, &self.players, &self.possession)
                {
                    Some(draw) => commands.extend(self.apply_event(draw)),
                    None => debug!(minute, "event generation skipped"),
                }
            }
        }

        match step {
            ClockStep::Frozen => {
                debug!(phase = ?self.phase(), "tick outside a running half ignored");
            }
            ClockStep::Regular { .. } | ClockStep::Stoppage { .. } => {
                commands.push(TimerCommand::arm(TimerKind::Tick, Transition::Tick));
            }
            ClockStep::Halftime => {
                info!(
                    match_id = %self.match_id,
                    minute = self.clock.game_time(),
                    home = self.home_score,
                    away = self.away_score,
                    "halftime"
                );
                commands.push(TimerCommand::arm(
                    TimerKind::HalftimeNotice,
                    Transition::HalftimeNoticeElapsed,
                ));
                commands.push(TimerCommand::arm(
                    TimerKind::SecondHalfKickoff,
                    Transition::SecondHalfKickoff,
                ));
            }
            ClockStep::FullTime => {
                let winner = FlashWinner::from_score(self.home_score, self.away_score);
                self.flash_winner = Some(winner);
                info!(
                    match_id = %self.match_id,
                    home = self.home_score,
                    away = self.away_score,
                    winner = ?winner,
                    "full time"
                );
                commands.push(TimerCommand::arm(
                    TimerKind::FlashWinner,
                    Transition::FlashWinnerExpired,
                ));
            }
        }

        commands
    }

    fn kick_off_second_half(&mut self) -> Vec<TimerCommand> {
        if !self.clock.kick_off_second_half() {
            debug!(phase = ?self.phase(), "second-half kickoff outside halftime ignored");
            return Vec::new();
        }
        info!(match_id = %self.match_id, minute = self.clock.game_time(), "second half");
        vec![TimerCommand::arm(TimerKind::Tick, Transition::Tick)]
    }

    fn load_roster(&mut self, players: Vec<String>) {
        if players.is_empty() {
            warn!("roster is empty, events will not be generated");
        } else {
            info!(count = players.len(), "roster loaded");
        }
        self.players = players;
    }

    /// Append a generated event and apply every side effect it carries.
    ///
    /// Returns the command that schedules the end of its announcement.
    pub fn apply_event(&mut self, draw: EventDraw) -> Vec<TimerCommand> {
        let EventDraw {
            event,
            added_minutes,
            possession_delta,
        } = draw;

        match event.scoring_team() {
            Some(Team::Home) => self.home_score = self.home_score.saturating_add(1),
            Some(Team::Away) => self.away_score = self.away_score.saturating_add(1),
            None => {}
        }
        if let Some(minutes) = added_minutes {
            self.clock.accrue_added_time(minutes);
        }
        if let Some(delta) = possession_delta {
            self.possession.nudge(delta);
        }

        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            team = %event.team,
            minute = event.minute,
            "event"
        );

        let event_id = event.id;
        self.recent_event = Some(event.clone());
        self.events.push(event);
        vec![TimerCommand::arm(
            TimerKind::RecentEvent,
            Transition::RecentEventExpired { event_id },
        )]
    }

    /// Current phase, derived from the clock.
    pub const fn phase(&self) -> Phase {
        self.clock.phase()
    }

    /// Identifier of the current match run.
    pub const fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Goals for one side.
    pub const fn score(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home_score,
            Team::Away => self.away_score,
        }
    }

    /// The clock.
    pub const fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// The possession share.
    pub const fn possession(&self) -> &Possession {
        &self.possession
    }

    /// The event log, oldest first.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// The roster.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// The event currently being announced.
    pub const fn recent_event(&self) -> Option<&MatchEvent> {
        self.recent_event.as_ref()
    }

    /// The winner highlight.
    pub const fn flash_winner(&self) -> Option<FlashWinner> {
        self.flash_winner
    }

    /// Copy the whole state into a read-only snapshot.
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.match_id,
            phase: self.phase(),
            home_score: self.home_score,
            away_score: self.away_score,
            game_time: self.clock.game_time(),
            added_time: self.clock.added_time(),
            is_playing: self.clock.is_playing(),
            is_halftime: self.clock.is_halftime(),
            show_halftime_notice: self.clock.show_halftime_notice(),
            is_game_over: self.clock.is_game_over(),
            possession_home: self.possession.home(),
            possession_away: self.possession.away(),
            events: self.events.clone(),
            players: self.players.clone(),
            recent_event: self.recent_event.clone(),
            flash_winner: self.flash_winner,
        }
    }
}
