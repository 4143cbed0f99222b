//! Round lifecycle configuration.
//!
//! Every knob has a default so a bare environment yields a working setup:
//!
//! | Variable | Default |
//! |---|---|
//! | `ROUND_SPAN_SECS` | `300` (at most `86400`) |
//! | `ROUND_CAPACITY` | `10` |
//! | `ROUND_TICK_MS` | `5000` |
//! | `ROUND_SELECTION_WINDOW` | `until_resolved` |
//! | `ROUND_ACTIVATION` | `on_tick` |
//! | `ROUND_START_CLOCK` | `keep_creation` |
//! | `ROUND_DRAW_SEED` | unset (OS entropy) |

use std::env;
use std::str::FromStr;

use time::Duration;

use super::ConfigError;

pub const DEFAULT_SPAN_SECS: i64 = 300;
/// Longest accepted round span: one day
pub const MAX_SPAN_SECS: i64 = 86_400;
pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_TICK_MS: u64 = 5_000;

/// When a participant may still change their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionWindow {
    /// Only before the round starts counting down
    WaitingOnly,
    /// Any time before resolution
    #[default]
    UntilResolved,
}

/// Who moves rounds from Waiting to Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationPolicy {
    /// Only an explicit `start_round` call
    Manual,
    /// Every scheduler tick promotes Waiting rounds
    #[default]
    OnTick,
}

/// Whether an explicit start restarts the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartClock {
    /// Countdown keeps running from creation
    #[default]
    KeepCreation,
    /// `start_time` and `end_time` move to the moment of start
    ResetOnStart,
}

impl FromStr for SelectionWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting_only" | "waiting" => Ok(Self::WaitingOnly),
            "until_resolved" | "any" => Ok(Self::UntilResolved),
            other => Err(format!(
                "expected waiting_only or until_resolved, got {other}"
            )),
        }
    }
}

impl FromStr for ActivationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "on_tick" | "auto" => Ok(Self::OnTick),
            other => Err(format!("expected manual or on_tick, got {other}")),
        }
    }
}

impl FromStr for StartClock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep_creation" | "keep" => Ok(Self::KeepCreation),
            "reset_on_start" | "reset" => Ok(Self::ResetOnStart),
            other => Err(format!(
                "expected keep_creation or reset_on_start, got {other}"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub span: Duration,
    pub capacity: usize,
    pub tick_interval: std::time::Duration,
    pub selection_window: SelectionWindow,
    pub activation: ActivationPolicy,
    pub start_clock: StartClock,
    /// Base seed for reproducible draws; `None` draws from OS entropy
    pub draw_seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            span: Duration::seconds(DEFAULT_SPAN_SECS),
            capacity: DEFAULT_CAPACITY,
            tick_interval: std::time::Duration::from_millis(DEFAULT_TICK_MS),
            selection_window: SelectionWindow::default(),
            activation: ActivationPolicy::default(),
            start_clock: StartClock::default(),
            draw_seed: None,
        }
    }
}

impl RoundConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = var("ROUND_SPAN_SECS") {
            let secs: i64 = parse_number("ROUND_SPAN_SECS", &raw)?;
            if !(1..=MAX_SPAN_SECS).contains(&secs) {
                return Err(ConfigError::invalid(
                    "ROUND_SPAN_SECS",
                    raw,
                    format!("span must be between 1 and {MAX_SPAN_SECS} seconds"),
                ));
            }
            config.span = Duration::seconds(secs);
        }

        if let Some(raw) = var("ROUND_CAPACITY") {
            config.capacity = parse_number("ROUND_CAPACITY", &raw)?;
        }

        if let Some(raw) = var("ROUND_TICK_MS") {
            let ms: u64 = parse_number("ROUND_TICK_MS", &raw)?;
            config.tick_interval = std::time::Duration::from_millis(ms);
        }

        if let Some(raw) = var("ROUND_SELECTION_WINDOW") {
            config.selection_window = raw
                .parse()
                .map_err(|reason: String| {
                    ConfigError::invalid("ROUND_SELECTION_WINDOW", raw.clone(), reason)
                })?;
        }

        if let Some(raw) = var("ROUND_ACTIVATION") {
            config.activation = raw.parse().map_err(|reason: String| {
                ConfigError::invalid("ROUND_ACTIVATION", raw.clone(), reason)
            })?;
        }

        if let Some(raw) = var("ROUND_START_CLOCK") {
            config.start_clock = raw.parse().map_err(|reason: String| {
                ConfigError::invalid("ROUND_START_CLOCK", raw.clone(), reason)
            })?;
        }

        if let Some(raw) = var("ROUND_DRAW_SEED") {
            config.draw_seed = Some(parse_number("ROUND_DRAW_SEED", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::invalid(
                "ROUND_CAPACITY",
                "0",
                "capacity must be at least 1",
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::invalid(
                "ROUND_TICK_MS",
                "0",
                "tick interval must be positive",
            ));
        }
        if !self.span.is_positive() || self.span > Duration::seconds(MAX_SPAN_SECS) {
            return Err(ConfigError::invalid(
                "ROUND_SPAN_SECS",
                self.span.whole_seconds().to_string(),
                format!("span must be positive and at most {MAX_SPAN_SECS} seconds"),
            ));
        }
        Ok(())
    }

    pub fn with_span(mut self, span: Duration) -> Self {
        self.span = span;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_tick_interval(mut self, interval: std::time::Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_selection_window(mut self, window: SelectionWindow) -> Self {
        self.selection_window = window;
        self
    }

    pub fn with_activation(mut self, activation: ActivationPolicy) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_start_clock(mut self, start_clock: StartClock) -> Self {
        self.start_clock = start_clock;
        self
    }

    pub fn with_draw_seed(mut self, seed: u64) -> Self {
        self.draw_seed = Some(seed);
        self
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(var, raw, e.to_string()))
}
