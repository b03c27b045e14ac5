use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::observation::ObservationKind;

/// Largest grid an episode accepts, in cells
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Reward magnitudes returned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for eating food
    pub food: f32,
    /// Penalty for each non-eating step (encourages efficiency)
    pub step: f32,
    /// Penalty for running into a wall
    pub wall: f32,
    /// Penalty for running into the snake's own body
    pub body: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            food: 1.0,
            step: -0.01,
            wall: -1.0,
            body: -2.0,
        }
    }
}

impl RewardConfig {
    /// Check the relative ordering the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.food > 0.0) {
            return Err(ConfigError::Rewards("food reward must be positive"));
        }
        if self.step > 0.0 {
            return Err(ConfigError::Rewards("step penalty must not be positive"));
        }
        if !(self.wall < self.step) {
            return Err(ConfigError::Rewards(
                "wall penalty must be below the step penalty",
            ));
        }
        if !(self.body < self.wall) {
            return Err(ConfigError::Rewards(
                "body penalty must be below the wall penalty",
            ));
        }
        Ok(())
    }
}

/// Configuration for the game and its episode loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid columns
    pub grid_width: usize,
    /// Number of grid rows
    pub grid_height: usize,
    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Milliseconds an action provider gets before the tick falls back to `Continue`
    pub action_timeout_ms: u64,
    /// Which view is published and handed to providers by default
    pub observation: ObservationKind,
    pub rewards: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            seed: None,
            tick_interval_ms: 100,
            action_timeout_ms: 80,
            observation: ObservationKind::Features,
            rewards: RewardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config in {:?}", path))?;
        Ok(config)
    }

    /// Fail fast on configurations an episode cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(ConfigError::DegenerateGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        // Also keeps every coordinate within i32
        let within_cap = self
            .grid_width
            .checked_mul(self.grid_height)
            .is_some_and(|cells| cells <= MAX_GRID_CELLS);
        if !within_cap {
            return Err(ConfigError::OversizedGrid {
                width: self.grid_width,
                height: self.grid_height,
                max_cells: MAX_GRID_CELLS,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.action_timeout_ms == 0 {
            return Err(ConfigError::ZeroActionTimeout);
        }
        self.rewards.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }
}
