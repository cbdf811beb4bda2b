//! AI route planning for a top-down racing game
//!
//! This crate provides:
//! - A generic weighted best-first search over caller-defined state spaces
//! - 4-connected grid pathfinding on top of it
//! - A per-frame driver that turns grid plans into car controls
//! - Two-layer track tile maps with RON/JSON loading

pub mod ai;
pub mod core;
pub mod search;
pub mod track;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        CarPose, DriveAction, DriveDecision, GridPath, GridPlanner, PlannerDriver, find_waypoints,
    };
    pub use crate::core::{PlannerConfig, PlannerStats};
    pub use crate::search::{AgentId, Plan, SearchNode, StateSpace, Termination, search};
    pub use crate::track::{Layer, TrackMap};
    pub use glam::{IVec2, Vec2};
}
