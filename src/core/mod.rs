//! Core module
//!
//! Contains planner configuration and statistics

mod config;
mod debug;

pub use config::{ConfigError, DEFAULT_HEURISTIC_WEIGHT, PlannerConfig};
pub use debug::PlannerStats;
