//! Match clock and phase state machine.
//!
//! The clock owns the minute counter, the added-time budget, and the four
//! flags the phase is derived from. It knows nothing about events or
//! timers: [`MatchClock::tick`] reports what kind of minute just passed and
//! the caller decides whether an event fires in it.
//!
//! # Design Principles
//!
//! - The phase is computed from the flags, never stored on its own.
//! - Every mutator checks its precondition and reports whether it did
//!   anything. Out-of-phase calls are no-ops, not errors.
//! - All minute arithmetic saturates; nothing leaves `[0, full_time]`.

use matchday_types::Phase;

use crate::config::RulesConfig;

/// What a single tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStep {
    /// The tick was delivered outside a running half and changed nothing.
    Frozen,
    /// A regular minute passed. `minute` is the counter before it advanced.
    Regular {
        /// Minute in which the tick occurred.
        minute: u8,
    },
    /// One minute of added time was consumed at full time.
    Stoppage {
        /// The frozen full-time minute.
        minute: u8,
        /// Added time left after this tick.
        remaining: u8,
    },
    /// The clock reached the break threshold and stopped.
    Halftime,
    /// The clock reached full time with no added time left.
    FullTime,
}

impl ClockStep {
    /// Minute an event generated during this step is stamped with, if the
    /// step allows an event at all.
    pub const fn event_minute(self) -> Option<u8> {
        match self {
            Self::Regular { minute } | Self::Stoppage { minute, .. } => Some(minute),
            Self::Frozen | Self::Halftime | Self::FullTime => None,
        }
    }
}

/// The minute counter and phase flags of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClock {
    game_time: u8,
    added_time: u8,
    is_playing: bool,
    is_halftime: bool,
    show_halftime_notice: bool,
    is_game_over: bool,

    halftime_minute: u8,
    second_half_minute: u8,
    full_time_minute: u8,
    max_added_time: u8,
}

impl MatchClock {
    /// Create a stopped clock at minute 0.
    pub const fn new(rules: &RulesConfig) -> Self {
        Self {
            game_time: 0,
            added_time: 0,
            is_playing: false,
            is_halftime: false,
            show_halftime_notice: false,
            is_game_over: false,
            halftime_minute: rules.halftime_minute,
            second_half_minute: rules.second_half_minute,
            full_time_minute: rules.full_time_minute,
            max_added_time: rules.max_added_time,
        }
    }

    /// Kick off from [`Phase::NotStarted`]. Returns `false` in any other
    /// phase.
    pub const fn start(&mut self) -> bool {
        if self.is_playing || self.is_halftime || self.is_game_over || self.game_time != 0 {
            return false;
        }
        self.is_playing = true;
        true
    }

    /// Return to minute 0 with every flag cleared and the clock running.
    pub const fn restart(&mut self) {
        self.game_time = 0;
        self.added_time = 0;
        self.is_halftime = false;
        self.show_halftime_notice = false;
        self.is_game_over = false;
        self.is_playing = true;
    }

    /// Advance the clock by one tick.
    pub fn tick(&mut self) -> ClockStep {
        if !self.is_playing || self.is_halftime || self.is_game_over {
            return ClockStep::Frozen;
        }

        if self.game_time == self.halftime_minute {
            self.game_time = self.game_time.saturating_add(1);
            self.is_halftime = true;
            self.show_halftime_notice = true;
            self.is_playing = false;
            return ClockStep::Halftime;
        }

        if self.game_time >= self.full_time_minute {
            self.game_time = self.full_time_minute;
            if self.added_time > 0 {
                self.added_time = self.added_time.saturating_sub(1);
                return ClockStep::Stoppage {
                    minute: self.game_time,
                    remaining: self.added_time,
                };
            }
            self.is_playing = false;
            self.is_game_over = true;
            return ClockStep::FullTime;
        }

        let minute = self.game_time;
        self.game_time = self.game_time.saturating_add(1);
        ClockStep::Regular { minute }
    }

    /// Clear the halftime notice. Returns `false` if it was not showing.
    pub const fn hide_halftime_notice(&mut self) -> bool {
        if !self.show_halftime_notice {
            return false;
        }
        self.show_halftime_notice = false;
        true
    }

    /// Leave the break and restart the clock at the second-half minute.
    /// Returns `false` outside [`Phase::Halftime`].
    pub const fn kick_off_second_half(&mut self) -> bool {
        if !self.is_halftime {
            return false;
        }
        self.is_halftime = false;
        self.show_halftime_notice = false;
        self.is_playing = true;
        self.game_time = self.second_half_minute;
        true
    }

    /// Add injury time, capped at the configured maximum. Returns the
    /// amount actually added.
    pub fn accrue_added_time(&mut self, minutes: u8) -> u8 {
        let before = self.added_time;
        self.added_time = before.saturating_add(minutes).min(self.max_added_time);
        self.added_time.saturating_sub(before)
    }

    /// Derive the phase from the clock flags.
    pub const fn phase(&self) -> Phase {
        if self.is_game_over {
            Phase::FullTime
        } else if self.is_halftime {
            Phase::Halftime
        } else if self.is_playing {
            if self.game_time >= self.full_time_minute && self.added_time > 0 {
                Phase::Stoppage
            } else {
                Phase::Playing
            }
        } else {
            Phase::NotStarted
        }
    }

    /// Current match minute.
    pub const fn game_time(&self) -> u8 {
        self.game_time
    }

    /// Remaining added time.
    pub const fn added_time(&self) -> u8 {
        self.added_time
    }

    /// Whether the clock is running.
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the match is at the break.
    pub const fn is_halftime(&self) -> bool {
        self.is_halftime
    }

    /// Whether the break notice is showing.
    pub const fn show_halftime_notice(&self) -> bool {
        self.show_halftime_notice
    }

    /// Whether the match has finished.
    pub const fn is_game_over(&self) -> bool {
        self.is_game_over
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn clock() -> MatchClock {
        MatchClock::new(&RulesConfig::default())
    }

    #[test]
    fn new_clock_is_not_started() {
        let clock = clock();
        assert_eq!(clock.phase(), Phase::NotStarted);
        assert_eq!(clock.game_time(), 0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn ticks_are_frozen_before_start() {
        let mut clock = clock();
        assert_eq!(clock.tick(), ClockStep::Frozen);
        assert_eq!(clock.game_time(), 0);
    }

    #[test]
    fn start_only_from_not_started() {
        let mut clock = clock();
        assert!(clock.start());
        assert!(!clock.start());
        assert_eq!(clock.phase(), Phase::Playing);
    }

    #[test]
    fn regular_tick_reports_pre_increment_minute() {
        let mut clock = clock();
        clock.start();
        assert_eq!(clock.tick(), ClockStep::Regular { minute: 0 });
        assert_eq!(clock.tick(), ClockStep::Regular { minute: 1 });
        assert_eq!(clock.game_time(), 2);
    }

    #[test]
    fn twenty_third_tick_enters_halftime_at_minute_23() {
        let mut clock = clock();
        clock.start();
        for _ in 0..22 {
            assert!(matches!(clock.tick(), ClockStep::Regular { .. }));
        }
        assert_eq!(clock.game_time(), 22);
        assert_eq!(clock.tick(), ClockStep::Halftime);
        assert_eq!(clock.phase(), Phase::Halftime);
        assert_eq!(clock.game_time(), 23);
        assert!(!clock.is_playing());
        assert!(clock.show_halftime_notice());

        // Frozen for the whole break.
        assert_eq!(clock.tick(), ClockStep::Frozen);
        assert_eq!(clock.game_time(), 23);
    }

    #[test]
    fn second_half_jumps_to_minute_45() {
        let mut clock = clock();
        clock.start();
        for _ in 0..23 {
            clock.tick();
        }
        assert!(clock.hide_halftime_notice());
        assert!(!clock.hide_halftime_notice());
        assert_eq!(clock.phase(), Phase::Halftime);

        assert!(clock.kick_off_second_half());
        assert_eq!(clock.game_time(), 45);
        assert_eq!(clock.phase(), Phase::Playing);
        assert!(!clock.kick_off_second_half());
    }

    fn run_to_full_time_minute(clock: &mut MatchClock) {
        clock.start();
        for _ in 0..23 {
            clock.tick();
        }
        clock.kick_off_second_half();
        for _ in 45..90 {
            clock.tick();
        }
        assert_eq!(clock.game_time(), 90);
    }

    #[test]
    fn full_time_without_added_time() {
        let mut clock = clock();
        run_to_full_time_minute(&mut clock);
        assert_eq!(clock.tick(), ClockStep::FullTime);
        assert!(clock.is_game_over());
        assert!(!clock.is_playing());
        assert_eq!(clock.phase(), Phase::FullTime);
        assert_eq!(clock.tick(), ClockStep::Frozen);
    }

    #[test]
    fn added_time_is_consumed_at_full_time() {
        let mut clock = clock();
        run_to_full_time_minute(&mut clock);
        clock.accrue_added_time(2);
        assert_eq!(clock.phase(), Phase::Stoppage);
        assert_eq!(
            clock.tick(),
            ClockStep::Stoppage {
                minute: 90,
                remaining: 1
            }
        );
        assert_eq!(
            clock.tick(),
            ClockStep::Stoppage {
                minute: 90,
                remaining: 0
            }
        );
        assert_eq!(clock.game_time(), 90);
        assert_eq!(clock.tick(), ClockStep::FullTime);
    }

    #[test]
    fn added_time_caps_at_five() {
        let mut clock = clock();
        assert_eq!(clock.accrue_added_time(2), 2);
        assert_eq!(clock.accrue_added_time(3), 3);
        assert_eq!(clock.accrue_added_time(2), 0);
        assert_eq!(clock.added_time(), 5);
    }

    #[test]
    fn restart_returns_to_running_baseline() {
        let mut clock = clock();
        clock.start();
        for _ in 0..23 {
            clock.tick();
        }
        clock.accrue_added_time(1);
        clock.restart();
        assert_eq!(clock.game_time(), 0);
        assert_eq!(clock.added_time(), 0);
        assert_eq!(clock.phase(), Phase::Playing);
        assert!(!clock.show_halftime_notice());
    }

    #[test]
    fn event_minute_only_for_running_steps() {
        assert_eq!(ClockStep::Regular { minute: 7 }.event_minute(), Some(7));
        assert_eq!(
            ClockStep::Stoppage {
                minute: 90,
                remaining: 2
            }
            .event_minute(),
            Some(90)
        );
        assert_eq!(ClockStep::Halftime.event_minute(), None);
        assert_eq!(ClockStep::FullTime.event_minute(), None);
    }
}
