//! Bounded random walk over the home possession share.

use rand::Rng;

use crate::config::RulesConfig;

/// Home possession share in percent, held within configured bounds.
///
/// The away share is always the complement. The only mutator is
/// [`Possession::nudge`]; the passage of time alone never moves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Possession {
    home: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Possession {
    /// An even split, clamped into the configured bounds.
    pub fn new(rules: &RulesConfig) -> Self {
        let mut possession = Self {
            home: 50.0,
            min: rules.possession_min,
            max: rules.possession_max,
            step: rules.possession_step,
        };
        possession.set_home(50.0);
        possession
    }

    /// Home share, percent.
    pub const fn home(&self) -> f64 {
        self.home
    }

    /// Away share, percent.
    pub fn away(&self) -> f64 {
        100.0 - self.home
    }

    /// Set the home share directly, clamped. Non-finite input leaves the
    /// share unchanged.
    pub fn set_home(&mut self, home: f64) {
        if home.is_finite() {
            self.home = home.clamp(self.min, self.max);
        }
    }

    /// Draw a uniform swing in `[-step, +step]`. A non-finite or
    /// non-positive step never moves the share.
    pub fn draw_delta<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.step.is_finite() && self.step > 0.0 {
            rng.random_range(-self.step..=self.step)
        } else {
            0.0
        }
    }

    /// Shift the home share by `delta` and clamp. Returns the new share.
    pub fn nudge(&mut self, delta: f64) -> f64 {
        self.set_home(self.home + delta);
        self.home
    }

    /// Probability that the next event is attributed to the home side.
    pub fn home_bias(&self) -> f64 {
        (self.home / 100.0).clamp(0.0, 1.0)
    }
}
