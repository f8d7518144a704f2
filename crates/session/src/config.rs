//! Session configuration

use crate::types::{AUTOPLAY_INTERVAL_MS, FALL_STEP_MS};

/// Timing and seeding for a [`GameSession`](crate::GameSession)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Duration of each half of the fall cycle, in logical milliseconds
    pub fall_step_ms: u64,

    /// Cadence of the autoplay bot, in wall-clock milliseconds
    pub autoplay_interval_ms: u64,

    /// Shape RNG seed (random per game if None)
    pub seed: Option<u32>,

    /// Capacity of the bounded command queue
    pub command_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fall_step_ms: FALL_STEP_MS,
            autoplay_interval_ms: AUTOPLAY_INTERVAL_MS,
            seed: None,
            command_queue_capacity: 64,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `TETRIS_*` environment variables.
    ///
    /// Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            fall_step_ms: parse("TETRIS_FALL_STEP_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.fall_step_ms),
            autoplay_interval_ms: parse("TETRIS_AUTOPLAY_INTERVAL_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.autoplay_interval_ms),
            seed: lookup("TETRIS_SEED").and_then(|s| s.trim().parse().ok()),
            command_queue_capacity: parse("TETRIS_COMMAND_QUEUE")
                .map(|n| n as usize)
                .filter(|&n| n > 0)
                .unwrap_or(defaults.command_queue_capacity),
        }
    }

    /// Set the fall step duration (clamped to at least 1 ms)
    pub fn with_fall_step_ms(mut self, ms: u64) -> Self {
        self.fall_step_ms = ms.max(1);
        self
    }

    /// Set the autoplay cadence (clamped to at least 1 ms)
    pub fn with_autoplay_interval_ms(mut self, ms: u64) -> Self {
        self.autoplay_interval_ms = ms.max(1);
        self
    }

    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_command_queue_capacity(mut self, capacity: usize) -> Self {
        self.command_queue_capacity = capacity.max(1);
        self
    }
}
