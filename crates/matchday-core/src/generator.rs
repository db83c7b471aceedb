//! Weighted event generator.
//!
//! Produces one [`MatchEvent`] per invocation together with the side
//! effects it carries. The generator never touches match state itself: it
//! returns an [`EventDraw`] and the state reducer applies the whole draw in
//! one step, so no reader can observe a half-applied event.

use matchday_types::{EventType, MatchEvent, PenaltyOutcome, Team};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::{EventWeights, RulesConfig};
use crate::possession::Possession;

/// A generated event and the state changes that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraw {
    /// The event to append to the log.
    pub event: MatchEvent,
    /// Injury time to accrue, before capping.
    pub added_minutes: Option<u8>,
    /// Swing to apply to the home possession share, before clamping.
    pub possession_delta: Option<f64>,
}

impl EventDraw {
    /// A draw with no side effects beyond what the event itself implies.
    pub const fn plain(event: MatchEvent) -> Self {
        Self {
            event,
            added_minutes: None,
            possession_delta: None,
        }
    }
}

/// Weighted categorical sampler over the event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGenerator {
    weights: EventWeights,
    total_weight: u32,
    max_injury_accrual: u8,
}

impl EventGenerator {
    /// Build a generator from the weight table and rules.
    pub fn new(weights: EventWeights, rules: &RulesConfig) -> Self {
        let total_weight = weights.total();
        Self {
            weights,
            total_weight,
            max_injury_accrual: rules.max_injury_accrual.max(1),
        }
    }

    /// Pick an event type by cumulative weight from a single uniform draw.
    ///
    /// Returns `None` when every weight is zero.
    pub fn pick_type<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EventType> {
        if self.total_weight == 0 {
            return None;
        }
        let roll = rng.random_range(0..self.total_weight);
        let mut cumulative: u32 = 0;
        for event_type in EventType::ALL {
            cumulative = cumulative.saturating_add(self.weights.weight(event_type));
            if roll < cumulative {
                return Some(event_type);
            }
        }
        None
    }

    /// Generate one event at `minute`.
    ///
    /// Returns `None` with an empty roster: player-dependent generation is
    /// suppressed rather than allowed to produce a nameless event.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        minute: u8,
        players: &[String],
        possession: &Possession,
    ) -> Option<EventDraw> {
        if players.is_empty() {
            return None;
        }
        let event_type = self.pick_type(rng)?;
        self.draw_of_type(rng, event_type, minute, players, possession)
    }

    /// Generate an event of a fixed type, drawing everything else.
    pub fn draw_of_type<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        event_type: EventType,
        minute: u8,
        players: &[String],
        possession: &Possession,
    ) -> Option<EventDraw> {
        let team = if rng.random_bool(possession.home_bias()) {
            Team::Home
        } else {
            Team::Away
        };
        let player = players.choose(rng)?;
        let mut draw = EventDraw::plain(MatchEvent::new(event_type, team, player.as_str(), minute));

        match event_type {
            EventType::Penalty => {
                draw.event.sub_action = PenaltyOutcome::ALL.choose(rng).copied();
            }
            EventType::Substitution => {
                // Independent draw; may name the outgoing player again.
                draw.event.replacement_player = players.choose(rng).cloned();
            }
            EventType::Injury => {
                draw.added_minutes = Some(rng.random_range(1..=self.max_injury_accrual));
            }
            EventType::PossessionChange => {
                draw.possession_delta = Some(possession.draw_delta(rng));
            }
            EventType::Goal
            | EventType::YellowCard
            | EventType::RedCard
            | EventType::Corner
            | EventType::Foul
            | EventType::Offside
            | EventType::Save
            | EventType::ShotOnTarget
            | EventType::ShotOffTarget => {}
        }

        Some(draw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn roster() -> Vec<String> {
        ["Neves", "Cunha", "Sa", "Adams", "Armstrong"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn generator() -> EventGenerator {
        EventGenerator::new(EventWeights::default(), &RulesConfig::default())
    }

    fn possession() -> Possession {
        Possession::new(&RulesConfig::default())
    }

    #[test]
    fn infinite_possession_step_draws_a_still_swing() {
        let rules = RulesConfig {
            possession_step: f64::INFINITY,
            ..RulesConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let draw = generator()
            .draw_of_type(
                &mut rng,
                EventType::PossessionChange,
                10,
                &roster(),
                &Possession::new(&rules),
            )
            .unwrap();
        assert!(draw.possession_delta.unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn empty_roster_suppresses_generation() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generator().draw(&mut rng, 10, &[], &possession()).is_none());
    }

    #[test]
    fn all_zero_weights_pick_nothing() {
        let weights = EventWeights {
            goal: 0,
            yellow_card: 0,
            red_card: 0,
            penalty: 0,
            corner: 0,
            foul: 0,
            substitution: 0,
            injury: 0,
            offside: 0,
            save: 0,
            shot_on_target: 0,
            shot_off_target: 0,
            possession_change: 0,
        };
        let generator = EventGenerator::new(weights, &RulesConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generator.pick_type(&mut rng).is_none());
    }

    #[test]
    fn single_weight_always_wins() {
        let weights = EventWeights {
            goal: 0,
            yellow_card: 0,
            red_card: 0,
            penalty: 0,
            corner: 7,
            foul: 0,
            substitution: 0,
            injury: 0,
            offside: 0,
            save: 0,
            shot_on_target: 0,
            shot_off_target: 0,
            possession_change: 0,
        };
        let generator = EventGenerator::new(weights, &RulesConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(generator.pick_type(&mut rng), Some(EventType::Corner));
        }
    }

    #[test]
    fn every_type_is_reachable() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashMap<EventType, u32> = HashMap::new();
        for _ in 0..20_000 {
            let ty = generator.pick_type(&mut rng).unwrap();
            *seen.entry(ty).or_default() += 1;
        }
        assert_eq!(seen.len(), EventType::ALL.len());
        // Shots on target carry four times the weight of goals.
        let count = |ty: EventType| seen.get(&ty).copied().unwrap_or_default();
        assert!(count(EventType::ShotOnTarget) > count(EventType::Goal) * 2);
    }

    #[test]
    fn substitution_carries_replacement_from_roster() {
        let generator = generator();
        let players = roster();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let draw = generator
                .draw_of_type(&mut rng, EventType::Substitution, 60, &players, &possession())
                .unwrap();
            assert!(players.contains(&draw.event.player));
            let replacement = draw.event.replacement_player.unwrap();
            assert!(players.contains(&replacement));
            assert!(draw.event.sub_action.is_none());
        }
    }

    #[test]
    fn only_substitutions_name_a_replacement() {
        let generator = generator();
        let players = roster();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..2_000 {
            let draw = generator.draw(&mut rng, 30, &players, &possession()).unwrap();
            let is_sub = draw.event.event_type == EventType::Substitution;
            assert_eq!(draw.event.replacement_player.is_some(), is_sub);
            let is_penalty = draw.event.event_type == EventType::Penalty;
            assert_eq!(draw.event.sub_action.is_some(), is_penalty);
        }
    }

    #[test]
    fn injury_accrues_one_or_two_minutes() {
        let generator = generator();
        let players = roster();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let draw = generator
                .draw_of_type(&mut rng, EventType::Injury, 70, &players, &possession())
                .unwrap();
            let minutes = draw.added_minutes.unwrap();
            assert!((1..=2).contains(&minutes));
        }
    }

    #[test]
    fn possession_change_draws_bounded_delta() {
        let generator = generator();
        let players = roster();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let draw = generator
                .draw_of_type(&mut rng, EventType::PossessionChange, 5, &players, &possession())
                .unwrap();
            let delta = draw.possession_delta.unwrap();
            assert!((-5.0..=5.0).contains(&delta));
            assert!(draw.added_minutes.is_none());
        }
    }

    #[test]
    fn full_home_possession_attributes_home() {
        let rules = RulesConfig {
            possession_min: 0.0,
            possession_max: 100.0,
            ..RulesConfig::default()
        };
        let mut possession = Possession::new(&rules);
        possession.set_home(100.0);
        let generator = generator();
        let players = roster();
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let draw = generator.draw(&mut rng, 1, &players, &possession).unwrap();
            assert_eq!(draw.event.team, Team::Home);
        }
    }

    #[test]
    fn event_is_stamped_with_given_minute() {
        let mut rng = StdRng::seed_from_u64(23);
        let draw = generator()
            .draw(&mut rng, 88, &roster(), &possession())
            .unwrap();
        assert_eq!(draw.event.minute, 88);
    }
}
