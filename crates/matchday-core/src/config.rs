//! Configuration loading and typed config structures for the simulator.
//!
//! The canonical configuration lives in `matchday-config.yaml` at the
//! project root. Every field has a default, so an empty or missing file
//! yields the standard accelerated match: one tick per second, the break at
//! minute 22, the restart at 45, full time at 90.

use std::path::Path;
use std::time::Duration;

use matchday_types::{EventType, Team};
use serde::Deserialize;

use crate::state::TimerKind;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible match.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
///
/// Mirrors the structure of `matchday-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchConfig {
    /// Real-time delays for ticks and transient notices.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Match clock thresholds and probabilities.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Relative event weights.
    #[serde(default)]
    pub events: EventWeights,

    /// Team names.
    #[serde(default)]
    pub teams: TeamsConfig,

    /// Where the roster comes from.
    #[serde(default)]
    pub roster: RosterConfig,

    /// Observer server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `MATCHDAY_PORT` overrides `server.port`
    /// - `MATCHDAY_ROSTER_URL` overrides `roster.url` and selects the HTTP source
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("MATCHDAY_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("MATCHDAY_ROSTER_URL") {
            self.roster.source = RosterSourceKind::Http;
            self.roster.url = url;
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.timing.tick_interval_ms == 0 {
            return invalid("timing.tick_interval_ms must be at least 1");
        }
        if self.timing.second_half_delay_ms < self.timing.halftime_notice_ms {
            return invalid("timing.second_half_delay_ms must not be shorter than the halftime notice");
        }

        let rules = &self.rules;
        if !(rules.halftime_minute < rules.second_half_minute
            && rules.second_half_minute < rules.full_time_minute)
        {
            return invalid("rules must satisfy halftime_minute < second_half_minute < full_time_minute");
        }
        if !(0.0..=1.0).contains(&rules.event_probability) {
            return invalid("rules.event_probability must be within [0, 1]");
        }
        if !(0.0..=100.0).contains(&rules.possession_min)
            || !(0.0..=100.0).contains(&rules.possession_max)
            || rules.possession_min > rules.possession_max
        {
            return invalid("rules.possession_min..possession_max must be an ordered range within [0, 100]");
        }
        if !rules.possession_step.is_finite() || rules.possession_step < 0.0 {
            return invalid("rules.possession_step must be finite and non-negative");
        }
        if rules.max_injury_accrual == 0 {
            return invalid("rules.max_injury_accrual must be at least 1");
        }

        if self.events.total() == 0 {
            return invalid("events: at least one event type needs a non-zero weight");
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Real-time delays, in milliseconds.
///
/// One tick interval is one "time unit" of the match: the defaults keep the
/// break notice at 2.5 units and every other notice at 3 units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Interval between clock ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// How long the halftime notice shows.
    #[serde(default = "default_halftime_notice_ms")]
    pub halftime_notice_ms: u64,

    /// Delay from the break to the second-half kickoff.
    #[serde(default = "default_second_half_delay_ms")]
    pub second_half_delay_ms: u64,

    /// How long the most recent event stays announced.
    #[serde(default = "default_notice_ms")]
    pub recent_event_ms: u64,

    /// How long the full-time winner highlight lasts.
    #[serde(default = "default_notice_ms")]
    pub flash_winner_ms: u64,
}

impl TimingConfig {
    /// Delay before a timer of the given kind fires.
    pub const fn delay_for(&self, kind: TimerKind) -> Duration {
        let ms = match kind {
            TimerKind::Tick => self.tick_interval_ms,
            TimerKind::HalftimeNotice => self.halftime_notice_ms,
            TimerKind::SecondHalfKickoff => self.second_half_delay_ms,
            TimerKind::RecentEvent => self.recent_event_ms,
            TimerKind::FlashWinner => self.flash_winner_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            halftime_notice_ms: default_halftime_notice_ms(),
            second_half_delay_ms: default_second_half_delay_ms(),
            recent_event_ms: default_notice_ms(),
            flash_winner_ms: default_notice_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Match clock thresholds and probabilities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RulesConfig {
    /// Minute at which the clock breaks for halftime.
    #[serde(default = "default_halftime_minute")]
    pub halftime_minute: u8,

    /// Minute the second half always restarts at.
    #[serde(default = "default_second_half_minute")]
    pub second_half_minute: u8,

    /// Last minute of regulation; added time is consumed here.
    #[serde(default = "default_full_time_minute")]
    pub full_time_minute: u8,

    /// Cap on accrued added time.
    #[serde(default = "default_max_added_time")]
    pub max_added_time: u8,

    /// Largest added-time accrual from a single injury (smallest is 1).
    #[serde(default = "default_max_injury_accrual")]
    pub max_injury_accrual: u8,

    /// Chance that a tick generates an event.
    #[serde(default = "default_event_probability")]
    pub event_probability: f64,

    /// Lower bound of the home possession share.
    #[serde(default = "default_possession_min")]
    pub possession_min: f64,

    /// Upper bound of the home possession share.
    #[serde(default = "default_possession_max")]
    pub possession_max: f64,

    /// Largest single possession swing, in percentage points.
    #[serde(default = "default_possession_step")]
    pub possession_step: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            halftime_minute: default_halftime_minute(),
            second_half_minute: default_second_half_minute(),
            full_time_minute: default_full_time_minute(),
            max_added_time: default_max_added_time(),
            max_injury_accrual: default_max_injury_accrual(),
            event_probability: default_event_probability(),
            possession_min: default_possession_min(),
            possession_max: default_possession_max(),
            possession_step: default_possession_step(),
        }
    }
}

// ---------------------------------------------------------------------------
// Event weights
// ---------------------------------------------------------------------------

/// Relative weights of the event types. They need not sum to anything.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct EventWeights {
    #[serde(default = "default_weight_goal")]
    pub goal: u32,
    #[serde(default = "default_weight_yellow_card")]
    pub yellow_card: u32,
    #[serde(default = "default_weight_red_card")]
    pub red_card: u32,
    #[serde(default = "default_weight_penalty")]
    pub penalty: u32,
    #[serde(default = "default_weight_corner")]
    pub corner: u32,
    #[serde(default = "default_weight_foul")]
    pub foul: u32,
    #[serde(default = "default_weight_substitution")]
    pub substitution: u32,
    #[serde(default = "default_weight_injury")]
    pub injury: u32,
    #[serde(default = "default_weight_offside")]
    pub offside: u32,
    #[serde(default = "default_weight_save")]
    pub save: u32,
    #[serde(default = "default_weight_shot_on_target")]
    pub shot_on_target: u32,
    #[serde(default = "default_weight_shot_off_target")]
    pub shot_off_target: u32,
    #[serde(default = "default_weight_possession_change")]
    pub possession_change: u32,
}

impl EventWeights {
    /// Weight of a single event type.
    pub const fn weight(&self, event_type: EventType) -> u32 {
        match event_type {
            EventType::Goal => self.goal,
            EventType::YellowCard => self.yellow_card,
            EventType::RedCard => self.red_card,
            EventType::Penalty => self.penalty,
            EventType::Corner => self.corner,
            EventType::Foul => self.foul,
            EventType::Substitution => self.substitution,
            EventType::Injury => self.injury,
            EventType::Offside => self.offside,
            EventType::Save => self.save,
            EventType::ShotOnTarget => self.shot_on_target,
            EventType::ShotOffTarget => self.shot_off_target,
            EventType::PossessionChange => self.possession_change,
        }
    }

    /// Sum of all weights, saturating.
    pub fn total(&self) -> u32 {
        EventType::ALL
            .into_iter()
            .fold(0_u32, |acc, ty| acc.saturating_add(self.weight(ty)))
    }
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            goal: default_weight_goal(),
            yellow_card: default_weight_yellow_card(),
            red_card: default_weight_red_card(),
            penalty: default_weight_penalty(),
            corner: default_weight_corner(),
            foul: default_weight_foul(),
            substitution: default_weight_substitution(),
            injury: default_weight_injury(),
            offside: default_weight_offside(),
            save: default_weight_save(),
            shot_on_target: default_weight_shot_on_target(),
            shot_off_target: default_weight_shot_off_target(),
            possession_change: default_weight_possession_change(),
        }
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Display information for one side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamInfo {
    /// Three-letter scoreboard code.
    pub code: String,
    /// Full display name.
    pub name: String,
}

/// Both sides of the fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamsConfig {
    /// The home side.
    #[serde(default = "default_home_team")]
    pub home: TeamInfo,
    /// The away side.
    #[serde(default = "default_away_team")]
    pub away: TeamInfo,
}

impl TeamsConfig {
    /// Display information for a side.
    pub const fn info(&self, team: Team) -> &TeamInfo {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            home: default_home_team(),
            away: default_away_team(),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Which roster source the engine fetches from at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSourceKind {
    /// Random surnames drawn from a built-in pool.
    #[default]
    Generated,
    /// The names listed in `roster.players`.
    Static,
    /// A JSON array of names fetched from `roster.url`.
    Http,
}

/// Roster configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterConfig {
    /// Source selection.
    #[serde(default)]
    pub source: RosterSourceKind,

    /// Endpoint for the HTTP source.
    #[serde(default = "default_roster_url")]
    pub url: String,

    /// Names for the static source.
    #[serde(default)]
    pub players: Vec<String>,

    /// Number of names the generated source draws.
    #[serde(default = "default_roster_size")]
    pub size: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            source: RosterSourceKind::default(),
            url: default_roster_url(),
            players: Vec::new(),
            size: default_roster_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Server and logging
// ---------------------------------------------------------------------------

/// Observer server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Kick off as soon as the engine is up, without waiting for a start
    /// command.
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auto_start: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_halftime_notice_ms() -> u64 {
    2_500
}

const fn default_second_half_delay_ms() -> u64 {
    3_000
}

const fn default_notice_ms() -> u64 {
    3_000
}

const fn default_halftime_minute() -> u8 {
    22
}

const fn default_second_half_minute() -> u8 {
    45
}

const fn default_full_time_minute() -> u8 {
    90
}

const fn default_max_added_time() -> u8 {
    5
}

const fn default_max_injury_accrual() -> u8 {
    2
}

const fn default_event_probability() -> f64 {
    0.3
}

const fn default_possession_min() -> f64 {
    30.0
}

const fn default_possession_max() -> f64 {
    70.0
}

const fn default_possession_step() -> f64 {
    5.0
}

const fn default_weight_goal() -> u32 {
    5
}

const fn default_weight_yellow_card() -> u32 {
    8
}

const fn default_weight_red_card() -> u32 {
    2
}

const fn default_weight_penalty() -> u32 {
    3
}

const fn default_weight_corner() -> u32 {
    12
}

const fn default_weight_foul() -> u32 {
    15
}

const fn default_weight_substitution() -> u32 {
    8
}

const fn default_weight_injury() -> u32 {
    5
}

const fn default_weight_offside() -> u32 {
    10
}

const fn default_weight_save() -> u32 {
    12
}

const fn default_weight_shot_on_target() -> u32 {
    20
}

const fn default_weight_shot_off_target() -> u32 {
    10
}

const fn default_weight_possession_change() -> u32 {
    10
}

fn default_home_team() -> TeamInfo {
    TeamInfo {
        code: "WOL".to_owned(),
        name: "Wolves".to_owned(),
    }
}

fn default_away_team() -> TeamInfo {
    TeamInfo {
        code: "SOU".to_owned(),
        name: "Southampton".to_owned(),
    }
}

fn default_roster_url() -> String {
    "http://127.0.0.1:8080/api/players".to_owned()
}

const fn default_roster_size() -> usize {
    22
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_file_spells_out_the_defaults() {
        let yaml = include_str!("../../../matchday-config.yaml");
        let config: MatchConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config, MatchConfig::default());
    }

    #[test]
    fn default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.tick_interval_ms, 1_000);
        assert_eq!(config.rules.halftime_minute, 22);
        assert_eq!(config.rules.second_half_minute, 45);
        assert_eq!(config.rules.full_time_minute, 90);
        assert_eq!(config.rules.max_added_time, 5);
        assert_eq!(config.teams.home.code, "WOL");
        assert_eq!(config.roster.source, RosterSourceKind::Generated);
    }

    #[test]
    fn default_weights_match_event_table() {
        let weights = EventWeights::default();
        assert_eq!(weights.weight(EventType::Goal), 5);
        assert_eq!(weights.weight(EventType::Foul), 15);
        assert_eq!(weights.weight(EventType::ShotOnTarget), 20);
        assert_eq!(weights.weight(EventType::ShotOffTarget), 10);
        assert_eq!(weights.total(), 120);
    }

    #[test]
    fn parse_partial_yaml_keeps_defaults() {
        let yaml = r"
timing:
  tick_interval_ms: 250
rules:
  event_probability: 0.5
events:
  possession_change: 0
teams:
  home:
    code: ARS
    name: Arsenal
roster:
  source: static
  players: [Saka, Rice, Odegaard]
logging:
  format: json
";
        let config = MatchConfig::parse(yaml).unwrap();
        assert_eq!(config.timing.tick_interval_ms, 250);
        assert_eq!(config.timing.halftime_notice_ms, 2_500);
        assert!((config.rules.event_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.rules.halftime_minute, 22);
        assert_eq!(config.events.possession_change, 0);
        assert_eq!(config.events.goal, 5);
        assert_eq!(config.teams.home.name, "Arsenal");
        assert_eq!(config.teams.away.code, "SOU");
        assert_eq!(config.roster.source, RosterSourceKind::Static);
        assert_eq!(config.roster.players.len(), 3);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let config = MatchConfig::parse("").unwrap();
        assert_eq!(config.rules, RulesConfig::default());
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let result = MatchConfig::parse("timing:\n  tick_interval_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_inverted_possession_bounds() {
        let result = MatchConfig::parse("rules:\n  possession_min: 80\n  possession_max: 20\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_infinite_possession_step() {
        let result = MatchConfig::parse("rules:\n  possession_step: .inf\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        let result = MatchConfig::parse("rules:\n  possession_step: .nan\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_restart_before_notice_ends() {
        let yaml = "timing:\n  halftime_notice_ms: 4000\n  second_half_delay_ms: 3000\n";
        assert!(MatchConfig::parse(yaml).is_err());
    }

    #[test]
    fn rejects_all_zero_weights() {
        let yaml = r"
events:
  goal: 0
  yellow_card: 0
  red_card: 0
  penalty: 0
  corner: 0
  foul: 0
  substitution: 0
  injury: 0
  offside: 0
  save: 0
  shot_on_target: 0
  shot_off_target: 0
  possession_change: 0
";
        assert!(MatchConfig::parse(yaml).is_err());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = MatchConfig::parse("timing: [not, a, mapping");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn delay_for_maps_each_timer() {
        let timing = TimingConfig::default();
        assert_eq!(timing.delay_for(TimerKind::Tick), Duration::from_secs(1));
        assert_eq!(
            timing.delay_for(TimerKind::HalftimeNotice),
            Duration::from_millis(2_500)
        );
        assert_eq!(
            timing.delay_for(TimerKind::SecondHalfKickoff),
            Duration::from_secs(3)
        );
        assert_eq!(timing.delay_for(TimerKind::RecentEvent), Duration::from_secs(3));
        assert_eq!(timing.delay_for(TimerKind::FlashWinner), Duration::from_secs(3));
    }
}
