//! Planner-driven steering for AI cars
//!
//! Each frame the driver plans a fresh grid path to the goal, picks a
//! waypoint a few cells ahead and turns toward it. Gas is on most of the
//! time; how often it drops out depends on difficulty.

use glam::{IVec2, Vec2};

use crate::core::PlannerConfig;

use super::pathfinding::{GridPath, GridPlanner};

/// Discrete car controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveAction {
    /// Throttle on or off
    pub gas: bool,
    /// -1 right, 0 straight, +1 left
    pub turn: i8,
}

impl DriveAction {
    /// No gas, wheel straight
    pub const IDLE: Self = Self {
        gas: false,
        turn: 0,
    };
}

/// Position and heading of a car
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarPose {
    /// World position
    pub position: Vec2,
    /// Heading in radians, 0 along +x
    pub angle: f32,
}

impl CarPose {
    /// Create a pose
    #[must_use]
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Unit vector the car is facing
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

/// Turn direction toward `target`: sign of the cross product of the
/// heading and the offset, or 0 inside the deadzone
#[must_use]
pub fn turn_toward(pose: &CarPose, target: Vec2, deadzone: f32) -> i8 {
    let cross = pose.forward().perp_dot(target - pose.position);
    if cross.abs() < deadzone {
        0
    } else if cross < 0.0 {
        -1
    } else {
        1
    }
}

/// Decide the throttle from a random roll.
///
/// Gas is off when `roll` is a multiple of `2 + difficulty - agent_index`
/// (at least 1), so higher difficulty means fewer dropouts and later agents
/// drop out more.
#[must_use]
pub fn gas_roll(roll: u32, difficulty: i32, agent_index: usize) -> bool {
    let agent = i32::try_from(agent_index).unwrap_or(i32::MAX);
    let period = 2_i32.saturating_add(difficulty).saturating_sub(agent).max(1);
    roll % period.unsigned_abs() != 0
}

/// What the driver decided this frame and why
#[derive(Debug, Clone)]
pub struct DriveDecision {
    /// Controls to apply
    pub action: DriveAction,
    /// Waypoint the car is steering toward, if the plan was usable
    pub target: Option<Vec2>,
    /// The plan the decision was made from
    pub path: GridPath,
}

/// Steers a car along freshly planned grid paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerDriver {
    /// Grid planner used every frame
    pub planner: GridPlanner,
    /// Plans shorter than this are ignored
    pub min_waypoints: usize,
    /// Waypoint index to steer toward
    pub lookahead: usize,
    /// Cross product deadzone for going straight
    pub turn_deadzone: f32,
    /// AI difficulty
    pub difficulty: i32,
}

impl PlannerDriver {
    /// Create a driver from config
    #[must_use]
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            planner: GridPlanner::from_config(config),
            min_waypoints: config.min_waypoints,
            lookahead: config.lookahead,
            turn_deadzone: config.turn_deadzone,
            difficulty: config.difficulty,
        }
    }

    /// Plan and pick controls for one frame.
    ///
    /// `roll` is a random number supplied by the caller for the throttle
    /// decision. An unusable plan yields [`DriveAction::IDLE`].
    pub fn drive<F>(
        &self,
        agent_index: usize,
        pose: &CarPose,
        goal: Vec2,
        is_legal: F,
        roll: u32,
    ) -> DriveDecision
    where
        F: Fn(IVec2) -> bool,
    {
        let path = self.planner.plan(pose.position, goal, is_legal);

        let target = if path.is_usable(self.min_waypoints) {
            path.waypoints.get(self.lookahead).copied()
        } else {
            None
        };

        let Some(target) = target else {
            log::warn!(
                "AI {} could not find waypoints ({} of {} needed, {})",
                agent_index,
                path.len(),
                self.min_waypoints,
                path.termination
            );
            return DriveDecision {
                action: DriveAction::IDLE,
                target: None,
                path,
            };
        };

        let action = DriveAction {
            gas: gas_roll(roll, self.difficulty, agent_index),
            turn: turn_toward(pose, target, self.turn_deadzone),
        };

        DriveDecision {
            action,
            target: Some(target),
            path,
        }
    }
}

impl Default for PlannerDriver {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}
