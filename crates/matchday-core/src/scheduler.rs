//! Cancellable one-shot timers.
//!
//! Each [`TimerKind`] owns one slot. Arming a slot aborts whatever was
//! pending in it and stamps the new timer with a fresh token. When a timer
//! fires it sends a [`TimerFired`] back to the engine, which only applies it
//! if the token still matches the slot. Abort stops the sleeping task; the
//! token check catches a fire that was already queued in the channel when
//! the slot was re-armed or cleared.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::TimingConfig;
use crate::state::{TimerCommand, TimerKind, Transition};

/// Message sent by an expired timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerFired {
    /// Slot the timer was armed in.
    pub kind: TimerKind,
    /// Token the slot held when the timer was armed.
    pub token: u64,
    /// Transition to apply.
    pub transition: Transition,
}

#[derive(Debug)]
struct Slot {
    token: u64,
    handle: JoinHandle<()>,
}

/// Owner of every pending timer.
#[derive(Debug)]
pub struct Scheduler {
    timing: TimingConfig,
    fired: mpsc::UnboundedSender<TimerFired>,
    slots: HashMap<TimerKind, Slot>,
    next_token: u64,
}

impl Scheduler {
    /// Create a scheduler that reports expiries on `fired`.
    pub fn new(timing: TimingConfig, fired: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            timing,
            fired,
            slots: HashMap::new(),
            next_token: 0,
        }
    }

    /// Carry out the commands produced by one transition, in order.
    pub fn execute(&mut self, commands: Vec<TimerCommand>) {
        for command in commands {
            match command {
                TimerCommand::Arm { kind, fire } => self.arm(kind, fire),
                TimerCommand::CancelAll => self.cancel_all(),
            }
        }
    }

    /// Arm `kind` to deliver `transition` after the slot's delay, replacing
    /// any timer pending in the slot.
    pub fn arm(&mut self, kind: TimerKind, transition: Transition) {
        self.next_token = self.next_token.wrapping_add(1);
        let token = self.next_token;
        let delay = self.timing.delay_for(kind);
        let fired = self.fired.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let message = TimerFired {
                kind,
                token,
                transition,
            };
            if fired.send(message).is_err() {
                debug!(timer = kind.as_str(), "engine gone before timer fired");
            }
        });

        if let Some(previous) = self.slots.insert(kind, Slot { token, handle }) {
            previous.handle.abort();
            debug!(timer = kind.as_str(), "pending timer replaced");
        }
    }

    /// Abort every pending timer.
    pub fn cancel_all(&mut self) {
        let count = self.slots.len();
        for (_, slot) in self.slots.drain() {
            slot.handle.abort();
        }
        if count > 0 {
            debug!(count, "pending timers cancelled");
        }
    }

    /// Claim a fired timer. Returns `true` if it is the one currently armed
    /// in its slot, freeing the slot; stale fires return `false`.
    pub fn claim(&mut self, fired: &TimerFired) -> bool {
        let current = self
            .slots
            .get(&fired.kind)
            .is_some_and(|slot| slot.token == fired.token);
        if current {
            self.slots.remove(&fired.kind);
        } else {
            debug!(timer = fired.kind.as_str(), token = fired.token, "stale timer ignored");
        }
        current
    }

    #[cfg(test)]
    fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots.contains_key(&kind)
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.handle.abort();
        }
    }
}
