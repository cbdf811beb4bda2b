//! Weighted best-first pathfinding on a 4-connected grid
//!
//! Wraps the generic search core with a single agent walking toward a
//! single goal cell. Cells are integer coordinates; whether a cell can be
//! entered is up to the caller's legality predicate.

use std::fmt;

use glam::{IVec2, Vec2};

use crate::core::{DEFAULT_HEURISTIC_WEIGHT, PlannerConfig};
use crate::search::{self, AgentId, SearchNode, SearchStats, StateSpace, Termination};

/// One grid step, in action-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    /// +x
    Right,
    /// -x
    Left,
    /// -y
    Up,
    /// +y
    Down,
}

impl GridMove {
    /// All moves, indexed by action id
    pub const ALL: [Self; 4] = [Self::Right, Self::Left, Self::Up, Self::Down];

    /// Move for an action id
    #[must_use]
    pub fn from_index(action: usize) -> Option<Self> {
        Self::ALL.get(action).copied()
    }

    /// Cell offset of this move
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::Right => IVec2::new(1, 0),
            Self::Left => IVec2::new(-1, 0),
            Self::Up => IVec2::new(0, -1),
            Self::Down => IVec2::new(0, 1),
        }
    }
}

/// Search state: the agent's cell, the goal cell, and the legality check
pub struct GridState<'a, F> {
    /// Agent cell
    pub agent: IVec2,
    /// Goal cell
    pub goal: IVec2,
    is_legal: &'a F,
}

impl<'a, F> GridState<'a, F> {
    /// Create a state with the agent at `agent`
    #[must_use]
    pub fn new(agent: IVec2, goal: IVec2, is_legal: &'a F) -> Self {
        Self {
            agent,
            goal,
            is_legal,
        }
    }

    /// Euclidean distance from the agent to the goal
    #[must_use]
    pub fn heuristic(&self) -> f32 {
        self.agent.as_vec2().distance(self.goal.as_vec2())
    }
}

impl<F> Clone for GridState<'_, F> {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent,
            goal: self.goal,
            is_legal: self.is_legal,
        }
    }
}

impl<F> fmt::Debug for GridState<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridState")
            .field("agent", &self.agent)
            .field("goal", &self.goal)
            .finish_non_exhaustive()
    }
}

impl<F: Fn(IVec2) -> bool> StateSpace for GridState<'_, F> {
    type Key = IVec2;

    fn num_actions(&self) -> usize {
        GridMove::ALL.len()
    }

    fn apply_action(&mut self, _agent: AgentId, action: usize) -> bool {
        let Some(step) = GridMove::from_index(action) else {
            return false;
        };
        self.agent += step.offset();
        (self.is_legal)(self.agent)
    }

    fn is_goal(&self) -> bool {
        self.agent == self.goal
    }

    fn fingerprint(&self, _agent: AgentId) -> IVec2 {
        self.agent
    }
}

/// Score a grid node as `g + weight * h`.
///
/// `g` counts transitions from the start (one per step), `h` is the
/// Euclidean distance to the goal. With the default weight of 10 the
/// heuristic dominates, so paths are found fast but are not guaranteed
/// shortest.
#[must_use]
pub fn grid_cost<F>(
    parent: Option<&SearchNode<GridState<'_, F>>>,
    state: &GridState<'_, F>,
    weight: f32,
) -> f32 {
    let g = parent.map_or(0, |p| p.depth + 1) as f32;
    g + weight * state.heuristic()
}

/// Snap a world position to the nearest cell, rounding halves up
#[must_use]
pub fn snap_to_cell(pos: Vec2) -> IVec2 {
    (pos + Vec2::splat(0.5)).floor().as_ivec2()
}

/// Result of grid planning
#[derive(Debug, Clone)]
pub struct GridPath {
    /// Cells to visit after the start, as world positions
    pub waypoints: Vec<Vec2>,
    /// Why the search stopped
    pub termination: Termination,
    /// Search counters
    pub stats: SearchStats,
}

impl GridPath {
    /// Number of waypoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if there are no waypoints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check if the path ends on the goal
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.termination == Termination::GoalReached
    }

    /// Check if the path is long enough to steer by
    #[must_use]
    pub fn is_usable(&self, min_waypoints: usize) -> bool {
        self.waypoints.len() >= min_waypoints
    }
}

/// Grid planner with a fixed budget and heuristic weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlanner {
    /// Frontier budget per call
    pub max_iters: u32,
    /// Weight `w` in `g + w * h`
    pub heuristic_weight: f32,
}

impl GridPlanner {
    /// Create a planner with the default heuristic weight
    #[must_use]
    pub fn new(max_iters: u32) -> Self {
        Self {
            max_iters,
            heuristic_weight: DEFAULT_HEURISTIC_WEIGHT,
        }
    }

    /// Create a planner from config
    #[must_use]
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            max_iters: config.max_iters,
            heuristic_weight: config.heuristic_weight,
        }
    }

    /// Override the heuristic weight
    #[must_use]
    pub fn with_heuristic_weight(mut self, weight: f32) -> Self {
        self.heuristic_weight = weight;
        self
    }

    /// Plan from `start` toward `goal`.
    ///
    /// Both positions are snapped to cells first. The start cell itself is
    /// not part of the returned waypoints. When the goal is not reached the
    /// waypoints lead to the last cell the search expanded.
    pub fn plan<F>(&self, start: Vec2, goal: Vec2, is_legal: F) -> GridPath
    where
        F: Fn(IVec2) -> bool,
    {
        let state = GridState::new(snap_to_cell(start), snap_to_cell(goal), &is_legal);
        let weight = self.heuristic_weight;

        let plan = search::search(self.max_iters, 0, state, |parent, _agent, s| {
            grid_cost(parent, s, weight)
        });

        GridPath {
            waypoints: plan.states().skip(1).map(|s| s.agent.as_vec2()).collect(),
            termination: plan.termination,
            stats: plan.stats,
        }
    }
}

impl Default for GridPlanner {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

/// Find waypoints from `start` toward `goal` with the default weight
#[must_use]
pub fn find_waypoints<F>(start: Vec2, goal: Vec2, is_legal: F, max_iters: u32) -> Vec<Vec2>
where
    F: Fn(IVec2) -> bool,
{
    GridPlanner::new(max_iters)
        .plan(start, goal, is_legal)
        .waypoints
}
