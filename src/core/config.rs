//! Planner and driver tunables
//!
//! Loaded from RON so difficulty and budgets can be tweaked without a
//! rebuild. Missing fields fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Heuristic weight used when nothing else is configured
pub const DEFAULT_HEURISTIC_WEIGHT: f32 = 10.0;

/// AI planning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Frontier budget per search
    pub max_iters: u32,
    /// Weight `w` in `g + w * h`
    pub heuristic_weight: f32,
    /// Plans with fewer waypoints are treated as unusable
    pub min_waypoints: usize,
    /// Index of the waypoint the driver steers toward
    pub lookahead: usize,
    /// Cross products smaller than this keep the wheel straight
    pub turn_deadzone: f32,
    /// Higher values make AI cars lift off the gas less often
    pub difficulty: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iters: 90,
            heuristic_weight: DEFAULT_HEURISTIC_WEIGHT,
            min_waypoints: 7,
            lookahead: 5,
            turn_deadzone: 0.5,
            difficulty: 0,
        }
    }
}

impl PlannerConfig {
    /// Set the frontier budget
    #[must_use]
    pub fn with_max_iters(mut self, max_iters: u32) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the heuristic weight
    #[must_use]
    pub fn with_heuristic_weight(mut self, weight: f32) -> Self {
        self.heuristic_weight = weight;
        self
    }

    /// Set the minimum usable waypoint count
    #[must_use]
    pub fn with_min_waypoints(mut self, min_waypoints: usize) -> Self {
        self.min_waypoints = min_waypoints;
        self
    }

    /// Set the steering lookahead
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the AI difficulty
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Check the values make sense together
    ///
    /// # Errors
    ///
    /// Returns an error if the lookahead would index past the shortest usable
    /// plan or the weight is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead >= self.min_waypoints {
            return Err(ConfigError::Invalid(format!(
                "lookahead {} must be below min_waypoints {}",
                self.lookahead, self.min_waypoints
            )));
        }
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "heuristic_weight {} must be a finite, non-negative number",
                self.heuristic_weight
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig =
            ron::from_str(source).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Serialize to a pretty RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

/// Errors that can occur while loading a config
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// Values that parse but do not fit together
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
