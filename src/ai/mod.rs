//! AI and navigation module
//!
//! Grid pathfinding on top of the search core, and the per-frame driver that
//! turns plans into car controls.

mod pathfinding;
mod steering;

pub use pathfinding::{
    GridMove, GridPath, GridPlanner, GridState, find_waypoints, grid_cost, snap_to_cell,
};
pub use steering::{CarPose, DriveAction, DriveDecision, PlannerDriver, gas_roll, turn_toward};
