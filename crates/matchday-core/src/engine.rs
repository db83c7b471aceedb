//! The engine actor.
//!
//! One tokio task owns the [`MatchState`], the [`Scheduler`], and the random
//! number generator. Commands from collaborators, expired timers, and the
//! roster fetch all arrive as messages and are applied one at a time, so
//! every transition runs to completion before the next begins. After each
//! transition the new [`MatchSnapshot`] is published on a `watch` channel.
//!
//! ```text
//!   EngineHandle ──request──┐
//!   Scheduler ────fired─────┼──> actor ──apply──> MatchState
//!   roster fetch ──players──┘        │
//!                                    └──snapshot──> watch::Receiver
//! ```

use matchday_types::{MatchSnapshot, MatchSummary};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, MatchConfig};
use crate::outcome;
use crate::roster::{RosterError, RosterSource};
use crate::scheduler::{Scheduler, TimerFired};
use crate::state::{MatchState, Transition};

/// Capacity of the command mailbox.
const MAILBOX_CAPACITY: usize = 64;

/// Errors returned by the engine handle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine task has stopped and no longer accepts commands.
    #[error("engine is not running")]
    Stopped,

    /// The configuration failed validation; the engine was not spawned.
    #[error("engine config rejected: {source}")]
    Config {
        /// The validation failure.
        #[from]
        source: ConfigError,
    },

    /// The engine task panicked or was cancelled.
    #[error("engine task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// A command a collaborator may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin play from the not-started phase.
    Start,
    /// Return to minute 0 with a clean slate, keeping the roster, and play.
    Reset,
}

impl From<Command> for Transition {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Self::Start,
            Command::Reset => Self::Reset,
        }
    }
}

#[derive(Debug)]
enum Request {
    Command {
        command: Command,
        reply: oneshot::Sender<MatchSnapshot>,
    },
    Shutdown,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cheap, cloneable access to a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<MatchSnapshot>,
}

impl EngineHandle {
    /// Send a command and wait for the snapshot taken right after it was
    /// applied.
    pub async fn send(&self, command: Command) -> Result<MatchSnapshot, EngineError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Command { command, reply })
            .await
            .map_err(|_err| EngineError::Stopped)?;
        response.await.map_err(|_err| EngineError::Stopped)
    }

    /// Issue [`Command::Start`].
    pub async fn start(&self) -> Result<MatchSnapshot, EngineError> {
        self.send(Command::Start).await
    }

    /// Issue [`Command::Reset`].
    pub async fn reset(&self) -> Result<MatchSnapshot, EngineError> {
        self.send(Command::Reset).await
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> MatchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Summary of the latest published snapshot.
    pub fn summary(&self) -> MatchSummary {
        outcome::summarize_snapshot(&self.snapshots.borrow())
    }

    /// A receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.snapshots.clone()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A running engine task and its handle.
#[derive(Debug)]
pub struct Engine {
    handle: EngineHandle,
    task: JoinHandle<()>,
}

impl Engine {
    /// Spawn the engine with an OS-seeded random number generator.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &MatchConfig, roster: RosterSource) -> Result<Self, EngineError> {
        Self::spawn_with_rng(config, roster, StdRng::from_os_rng())
    }

    /// Spawn the engine with a caller-supplied generator.
    ///
    /// The config is validated first, so a hand-built [`MatchConfig`]
    /// gets the same checks as one loaded from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `config` fails validation.
    pub fn spawn_with_rng(
        config: &MatchConfig,
        roster: RosterSource,
        rng: StdRng,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let state = MatchState::new(config);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let (request_tx, request_rx) = mpsc::channel(MAILBOX_CAPACITY);
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();

        let actor = Actor {
            state,
            scheduler: Scheduler::new(config.timing.clone(), fired_tx),
            rng,
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(actor.run(request_rx, fired_rx, roster));

        Ok(Self {
            handle: EngineHandle {
                requests: request_tx,
                snapshots: snapshot_rx,
            },
            task,
        })
    }

    /// A handle to the engine.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Stop the engine, cancelling all pending timers, and wait for the task
    /// to finish.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        if self.handle.requests.send(Request::Shutdown).await.is_err() {
            debug!("engine already stopped");
        }
        self.task.await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Actor {
    state: MatchState,
    scheduler: Scheduler,
    rng: StdRng,
    snapshots: watch::Sender<MatchSnapshot>,
}

impl Actor {
    async fn run(
        mut self,
        mut requests: mpsc::Receiver<Request>,
        mut fired: mpsc::UnboundedReceiver<TimerFired>,
        roster: RosterSource,
    ) {
        let source_name = roster.name();
        let (roster_tx, mut roster_rx) = oneshot::channel::<Result<Vec<String>, RosterError>>();
        tokio::spawn(async move {
            if roster_tx.send(roster.fetch().await).is_err() {
                debug!("engine gone before roster resolved");
            }
        });
        let mut roster_pending = true;

        info!(match_id = %self.state.match_id(), "engine started");

        loop {
            tokio::select! {
                request = requests.recv() => match request {
                    Some(Request::Command { command, reply }) => {
                        debug!(?command, "command received");
                        self.step(Transition::from(command));
                        if reply.send(self.state.snapshot()).is_err() {
                            debug!(?command, "command issuer went away");
                        }
                    }
                    Some(Request::Shutdown) | None => break,
                },
                Some(timer) = fired.recv() => {
                    if self.scheduler.claim(&timer) {
                        self.step(timer.transition);
                    }
                }
                result = &mut roster_rx, if roster_pending => {
                    roster_pending = false;
                    match result {
                        Ok(Ok(players)) => self.step(Transition::RosterLoaded { players }),
                        Ok(Err(err)) => {
                            warn!(source = source_name, error = %err, "roster unavailable, events suppressed");
                        }
                        Err(_) => warn!(source = source_name, "roster fetch task dropped"),
                    }
                }
            }
        }

        self.scheduler.cancel_all();
        info!(match_id = %self.state.match_id(), "engine stopped");
    }

    fn step(&mut self, transition: Transition) {
        let commands = self.state.apply(transition, &mut self.rng);
        self.scheduler.execute(commands);
        self.snapshots.send_replace(self.state.snapshot());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use matchday_types::{FlashWinner, Phase};

    use super::*;
    use crate::config::EventWeights;

    fn roster() -> RosterSource {
        RosterSource::Static {
            players: ["Neves", "Cunha", "Sa", "Adams", "Armstrong"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    fn quiet_config() -> MatchConfig {
        let mut config = MatchConfig::default();
        config.rules.event_probability = 0.0;
        config
    }

    fn spawn(config: &MatchConfig) -> Engine {
        Engine::spawn_with_rng(config, roster(), StdRng::seed_from_u64(7)).unwrap()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn roster_loads_before_kickoff() {
        let engine = spawn(&quiet_config());
        sleep_ms(10).await;
        let snapshot = engine.handle().snapshot();
        assert_eq!(snapshot.players.len(), 5);
        assert_eq!(snapshot.phase, Phase::NotStarted);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn clock_stays_put_until_started() {
        let engine = spawn(&quiet_config());
        sleep_ms(5_000).await;
        assert_eq!(engine.handle().snapshot().game_time, 0);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn first_half_runs_into_halftime() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        let snapshot = handle.start().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Playing);

        sleep_ms(22_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.game_time, 22);
        assert!(snapshot.is_playing);

        sleep_ms(1_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::Halftime);
        assert_eq!(snapshot.game_time, 23);
        assert!(!snapshot.is_playing);
        assert!(snapshot.show_halftime_notice);

        // Frozen through the break.
        sleep_ms(1_000).await;
        assert_eq!(handle.snapshot().game_time, 23);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn halftime_notice_then_second_half() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        handle.start().await.unwrap();

        // Halftime begins at t = 23 s.
        sleep_ms(25_400).await;
        assert!(handle.snapshot().show_halftime_notice);

        sleep_ms(200).await;
        let snapshot = handle.snapshot();
        assert!(!snapshot.show_halftime_notice);
        assert!(snapshot.is_halftime);

        sleep_ms(500).await;
        let snapshot = handle.snapshot();
        assert!(!snapshot.is_halftime);
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.game_time, 45);

        sleep_ms(2_000).await;
        assert_eq!(handle.snapshot().game_time, 47);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn full_time_flashes_then_clears_winner() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        handle.start().await.unwrap();

        // Kickoff at 26 s, minute 90 at 71 s, full time at 72 s.
        sleep_ms(71_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.game_time, 90);
        assert!(!snapshot.is_game_over);

        sleep_ms(1_000).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.is_game_over);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.phase, Phase::FullTime);
        assert_eq!(snapshot.flash_winner, Some(FlashWinner::Both));
        assert!(handle.summary().is_final);

        sleep_ms(3_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.flash_winner, None);
        assert!(snapshot.is_game_over);

        // Start does not leave full time; only reset does.
        assert_eq!(handle.start().await.unwrap().phase, Phase::FullTime);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_halftime_cancels_the_restart() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        let first = handle.start().await.unwrap();

        sleep_ms(23_500).await;
        assert_eq!(handle.snapshot().phase, Phase::Halftime);

        let snapshot = handle.reset().await.unwrap();
        assert_ne!(snapshot.match_id, first.match_id);
        assert_eq!(snapshot.game_time, 0);
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.players.len(), 5);

        // The stale restart would have fired at 26 s.
        sleep_ms(3_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.game_time, 3);
        assert!(!snapshot.is_halftime);
        assert!(!snapshot.show_halftime_notice);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn recent_event_clears_three_seconds_after_last_event() {
        let mut config = MatchConfig::default();
        config.rules.event_probability = 1.0;
        config.events = EventWeights {
            goal: 0,
            yellow_card: 0,
            red_card: 0,
            penalty: 0,
            corner: 1,
            foul: 0,
            substitution: 0,
            injury: 0,
            offside: 0,
            save: 0,
            shot_on_target: 0,
            shot_off_target: 0,
            possession_change: 0,
        };
        let engine = spawn(&config);
        let handle = engine.handle();
        sleep_ms(10).await;
        handle.start().await.unwrap();

        // Every first-half tick announces a corner; the last one at 22 s.
        sleep_ms(22_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.events.len(), 22);
        assert_eq!(snapshot.recent_event.as_ref().map(|e| e.minute), Some(21));

        sleep_ms(2_400).await;
        assert!(handle.snapshot().recent_event.is_some());

        sleep_ms(200).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.recent_event.is_none());
        assert_eq!(snapshot.events.len(), 22);
        assert_eq!(handle.summary().home.corners + handle.summary().away.corners, 22);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_transition() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        sleep_ms(10).await;
        let mut rx = handle.subscribe();
        rx.borrow_and_update();

        handle.start().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase, Phase::Playing);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().game_time, 1);
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_config_is_rejected_at_spawn() {
        let mut config = MatchConfig::default();
        config.rules.possession_min = 80.0;
        config.rules.possession_max = 20.0;
        let result = Engine::spawn_with_rng(&config, roster(), StdRng::seed_from_u64(7));
        assert!(matches!(result, Err(EngineError::Config { .. })));

        let mut config = MatchConfig::default();
        config.rules.possession_step = f64::INFINITY;
        let result = Engine::spawn_with_rng(&config, roster(), StdRng::seed_from_u64(7));
        assert!(matches!(result, Err(EngineError::Config { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn commands_fail_after_shutdown() {
        let engine = spawn(&quiet_config());
        let handle = engine.handle();
        engine.shutdown().await.unwrap();
        assert!(matches!(handle.start().await, Err(EngineError::Stopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_roster_still_ticks() {
        let mut config = MatchConfig::default();
        config.rules.event_probability = 1.0;
        let engine = Engine::spawn_with_rng(
            &config,
            RosterSource::Static {
                players: Vec::new(),
            },
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        let handle = engine.handle();
        handle.start().await.unwrap();
        sleep_ms(5_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.game_time, 5);
        assert!(snapshot.events.is_empty());
        engine.shutdown().await.unwrap();
    }
}
