use std::time::Duration;

use maze_core::{
    MazeError, DEFAULT_SIZE, DEFAULT_STEP_DELAY_MS, MAX_STEP_DELAY_MS, MIN_SIZE,
    MIN_STEP_DELAY_MS, REPLAY_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};

/// Settings for a simulator session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Cells per side of generated mazes.
    pub size: usize,
    /// Pause between solver steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Pause between replay frames, in milliseconds.
    pub replay_interval_ms: u64,
    /// Seed for the first maze; drawn at random when absent.
    pub seed: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            replay_interval_ms: REPLAY_INTERVAL_MS,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the solver pace, clamped into the 50-500 ms window.
    pub fn with_step_delay_ms(mut self, ms: u64) -> Self {
        self.step_delay_ms = clamp_step_delay(ms);
        self
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        if self.size < MIN_SIZE {
            return Err(MazeError::InvalidSize { size: self.size });
        }
        Ok(())
    }
}

/// Clamp a requested solver delay into the recommended window.
pub fn clamp_step_delay(ms: u64) -> u64 {
    ms.clamp(MIN_STEP_DELAY_MS, MAX_STEP_DELAY_MS)
}
