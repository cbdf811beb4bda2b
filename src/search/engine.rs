//! Weighted best-first search over an abstract state space
//!
//! The caller describes the space through [`StateSpace`] and ranks nodes with
//! a cost closure. The loop pops the cheapest open node, closes its
//! fingerprint, and offers one successor per legal action. A call always
//! returns a plan: the path to the goal when one is popped, otherwise the
//! path to the last node that was expanded.

use std::fmt;
use std::hash::Hash;

use smallvec::SmallVec;

use super::frontier::{ClosedSet, OpenList, Slot};
use super::node::{NodeArena, NodeId, SearchNode};

/// Index of the agent being planned for
pub type AgentId = usize;

/// A state space the search engine can walk.
///
/// Implementations hold everything needed to step the state forward, so a
/// clone of the state is a self-contained search node payload.
pub trait StateSpace: Clone {
    /// Fingerprint used for duplicate detection.
    ///
    /// Keys compare exactly. Floating-point coordinates should be snapped to
    /// integers before they end up in a key.
    type Key: Eq + Hash + Clone + fmt::Debug;

    /// Number of actions available to every agent
    fn num_actions(&self) -> usize;

    /// Apply `action` for `agent` in place and report whether the result is legal
    fn apply_action(&mut self, agent: AgentId, action: usize) -> bool;

    /// Goal test
    fn is_goal(&self) -> bool;

    /// Fingerprint of this state from `agent`'s point of view
    fn fingerprint(&self, agent: AgentId) -> Self::Key;
}

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A goal state was popped
    GoalReached,
    /// The frontier budget ran out first
    BudgetExhausted,
    /// Every reachable state was expanded without finding a goal
    FrontierExhausted,
}

impl Termination {
    /// Short name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoalReached => "goal reached",
            Self::BudgetExhausted => "budget exhausted",
            Self::FrontierExhausted => "frontier exhausted",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters collected during one search call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the open list
    pub expansions: usize,
    /// Candidates appended to the open list (each one costs a unit of budget)
    pub generated: usize,
    /// Open entries replaced by a cheaper candidate
    pub relaxed: usize,
    /// Candidates dropped because their fingerprint was already closed
    pub discarded_closed: usize,
    /// Size of the closed set at return
    pub closed: usize,
}

/// Result of a search: a root-first chain of nodes
#[derive(Debug, Clone)]
pub struct Plan<S> {
    /// Nodes from the root to the final node; parents index into this vector
    pub nodes: Vec<SearchNode<S>>,
    /// Why the search stopped
    pub termination: Termination,
    /// Search counters
    pub stats: SearchStats,
}

impl<S> Plan<S> {
    /// Number of nodes in the plan, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A returned plan always holds at least the root
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if the plan ends in a goal state
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.termination == Termination::GoalReached
    }

    /// Final node of the plan
    #[must_use]
    pub fn last(&self) -> Option<&SearchNode<S>> {
        self.nodes.last()
    }

    /// States along the plan, root first
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.nodes.iter().map(|n| &n.state)
    }

    /// Actions taken along the plan (the root has none)
    pub fn actions(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| n.action)
    }
}

/// Run a weighted best-first search from `initial`.
///
/// `max_iters` bounds how many candidates may be appended to the open list;
/// the count is signed internally and the loop runs while it is not
/// negative, so one more pop happens after it reaches zero. Relaxing an open
/// entry never costs budget.
///
/// `cost` is called with the parent of the state being scored (`None` for
/// the root) and must be the same function for the whole call.
pub fn search<S, C>(max_iters: u32, agent: AgentId, initial: S, cost: C) -> Plan<S>
where
    S: StateSpace,
    C: Fn(Option<&SearchNode<S>>, AgentId, &S) -> f32,
{
    let mut arena = NodeArena::new();
    let mut open = OpenList::new();
    let mut closed = ClosedSet::new();
    let mut stats = SearchStats::default();
    let mut budget = i64::from(max_iters);

    let root_cost = cost(None, agent, &initial);
    let root_key = initial.fingerprint(agent);
    let root = arena.push(SearchNode::root(initial, root_cost));
    open.push(root, root_key, root_cost);

    let mut current = root;
    while budget >= 0 {
        let Some(entry) = open.pop_min() else {
            break;
        };
        current = entry.node;
        stats.expansions += 1;

        log::trace!(
            "expand {} key={:?} cost={:.3} depth={}",
            current,
            entry.key,
            entry.cost,
            arena.get(current).depth
        );

        let newly_closed = closed.close(entry.key);
        debug_assert!(newly_closed, "a closed fingerprint was popped again");

        if arena.get(current).state.is_goal() {
            return finish(&arena, current, Termination::GoalReached, stats, &closed);
        }

        for candidate in successors(&arena, current, agent, &cost) {
            let key = candidate.state.fingerprint(agent);
            if closed.contains(&key) {
                stats.discarded_closed += 1;
                continue;
            }

            match open.slot_for(&key, candidate.cost) {
                Slot::Vacant => {
                    let cost = candidate.cost;
                    let id = arena.push(candidate);
                    open.push(id, key, cost);
                    stats.generated += 1;
                    budget -= 1;
                }
                Slot::Cheaper(index) => {
                    let cost = candidate.cost;
                    let id = arena.push(candidate);
                    open.replace(index, id, cost);
                    stats.relaxed += 1;
                }
                Slot::NotCheaper => {}
            }
        }
    }

    let termination = if budget < 0 {
        Termination::BudgetExhausted
    } else {
        Termination::FrontierExhausted
    };
    finish(&arena, current, termination, stats, &closed)
}

/// Legal successors of `parent`, in action order
fn successors<S, C>(
    arena: &NodeArena<S>,
    parent: NodeId,
    agent: AgentId,
    cost: &C,
) -> SmallVec<[SearchNode<S>; 4]>
where
    S: StateSpace,
    C: Fn(Option<&SearchNode<S>>, AgentId, &S) -> f32,
{
    let node = arena.get(parent);
    let mut out = SmallVec::new();

    for action in 0..node.state.num_actions() {
        let mut next = node.state.clone();
        if !next.apply_action(agent, action) {
            continue;
        }
        let score = cost(Some(node), agent, &next);
        out.push(SearchNode {
            parent: Some(parent),
            state: next,
            action: Some(action),
            cost: score,
            depth: node.depth + 1,
        });
    }

    out
}

fn finish<S: StateSpace>(
    arena: &NodeArena<S>,
    last: NodeId,
    termination: Termination,
    mut stats: SearchStats,
    closed: &ClosedSet<S::Key>,
) -> Plan<S> {
    stats.closed = closed.len();
    let nodes = arena.extract_chain(last);

    log::debug!(
        "search finished: {} after {} expansions, plan of {} nodes",
        termination,
        stats.expansions,
        nodes.len()
    );

    Plan {
        nodes,
        termination,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk along the integer line toward `goal`, legal inside `[min, max]`
    #[derive(Debug, Clone)]
    struct LineWorld {
        pos: i32,
        goal: i32,
        min: i32,
        max: i32,
    }

    impl LineWorld {
        fn new(pos: i32, goal: i32) -> Self {
            Self {
                pos,
                goal,
                min: i32::MIN / 2,
                max: i32::MAX / 2,
            }
        }

        fn bounded(pos: i32, goal: i32, min: i32, max: i32) -> Self {
            Self {
                pos,
                goal,
                min,
                max,
            }
        }
    }

    impl StateSpace for LineWorld {
        type Key = i32;

        fn num_actions(&self) -> usize {
            2
        }

        fn apply_action(&mut self, _agent: AgentId, action: usize) -> bool {
            self.pos += if action == 0 { 1 } else { -1 };
            (self.min..=self.max).contains(&self.pos)
        }

        fn is_goal(&self) -> bool {
            self.pos == self.goal
        }

        fn fingerprint(&self, _agent: AgentId) -> i32 {
            self.pos
        }
    }

    fn line_cost(parent: Option<&SearchNode<LineWorld>>, _agent: AgentId, s: &LineWorld) -> f32 {
        let g = parent.map_or(0, |p| p.depth + 1) as f32;
        g + (s.goal - s.pos).abs() as f32
    }

    /// Directed weighted graph; action `i` follows edge `i` when it starts here
    #[derive(Debug, Clone)]
    struct GraphWorld {
        at: usize,
        edges: &'static [(usize, usize, f32)],
        goals: &'static [usize],
    }

    impl StateSpace for GraphWorld {
        type Key = usize;

        fn num_actions(&self) -> usize {
            self.edges.len()
        }

        fn apply_action(&mut self, _agent: AgentId, action: usize) -> bool {
            let (from, to, _) = self.edges[action];
            if from != self.at {
                return false;
            }
            self.at = to;
            true
        }

        fn is_goal(&self) -> bool {
            self.goals.contains(&self.at)
        }

        fn fingerprint(&self, _agent: AgentId) -> usize {
            self.at
        }
    }

    /// Accumulated edge weight along the path
    fn graph_cost(parent: Option<&SearchNode<GraphWorld>>, _agent: AgentId, s: &GraphWorld) -> f32 {
        parent.map_or(0.0, |p| {
            let weight = s
                .edges
                .iter()
                .find(|(from, to, _)| *from == p.state.at && *to == s.at)
                .map_or(f32::INFINITY, |e| e.2);
            p.cost + weight
        })
    }

    fn graph_path(plan: &Plan<GraphWorld>) -> Vec<usize> {
        plan.states().map(|s| s.at).collect()
    }

    #[test]
    fn test_reaches_goal_on_line() {
        let plan = search(1000, 0, LineWorld::new(0, 7), line_cost);

        assert!(plan.reached_goal());
        assert_eq!(plan.len(), 8);
        assert_eq!(plan.last().unwrap().state.pos, 7);
        let positions: Vec<i32> = plan.states().map(|s| s.pos).collect();
        assert_eq!(positions, (0..=7).collect::<Vec<_>>());
        assert!(plan.actions().all(|a| a == 0));
    }

    #[test]
    fn test_goal_at_start_is_single_node() {
        let plan = search(50, 0, LineWorld::new(4, 4), line_cost);

        assert!(plan.reached_goal());
        assert_eq!(plan.len(), 1);
        assert!(plan.nodes[0].is_root());
        assert_eq!(plan.nodes[0].action, None);
    }

    #[test]
    fn test_zero_budget_returns_initial_state_only() {
        let plan = search(0, 0, LineWorld::new(0, 5), line_cost);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.nodes[0].state.pos, 0);
        assert_eq!(plan.termination, Termination::BudgetExhausted);
        assert_eq!(plan.stats.expansions, 1);
    }

    #[test]
    fn test_no_legal_actions_returns_initial_state_only() {
        let world = GraphWorld {
            at: 0,
            edges: &[(1, 2, 1.0)],
            goals: &[2],
        };
        let plan = search(100, 0, world, graph_cost);

        assert_eq!(graph_path(&plan), vec![0]);
        assert_eq!(plan.termination, Termination::FrontierExhausted);
        assert_eq!(plan.stats.generated, 0);
    }

    #[test]
    fn test_budget_is_spent_per_added_node() {
        // Pop 0 adds +1 and -1 (budget 3 -> 1), pop 1 adds 2 (-> 0),
        // pop 2 adds 3 (-> -1) and the loop stops.
        let plan = search(3, 0, LineWorld::new(0, 100), line_cost);

        let positions: Vec<i32> = plan.states().map(|s| s.pos).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(plan.termination, Termination::BudgetExhausted);
        assert_eq!(plan.stats.expansions, 3);
        assert_eq!(plan.stats.generated, 4);
    }

    #[test]
    fn test_expansions_bounded_by_budget() {
        for max_iters in [0_u32, 1, 2, 5, 17, 40] {
            let plan = search(max_iters, 0, LineWorld::new(0, 1000), line_cost);
            let actions = 2;

            assert!(plan.stats.generated <= max_iters as usize + actions);
            assert!(plan.stats.expansions <= plan.stats.generated + 1);
            assert!(!plan.reached_goal());
        }
    }

    #[test]
    fn test_frontier_exhausted_returns_last_popped() {
        // Goal outside the legal range: everything in [-2, 2] gets expanded.
        let plan = search(1000, 0, LineWorld::bounded(0, 10, -2, 2), line_cost);

        assert_eq!(plan.termination, Termination::FrontierExhausted);
        assert_eq!(plan.stats.expansions, 5);
        let last = plan.last().unwrap().state.pos;
        assert_eq!(last, -2);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_no_state_is_expanded_twice() {
        let plan = search(1000, 0, LineWorld::bounded(0, 50, -20, 20), line_cost);

        assert_eq!(plan.stats.closed, plan.stats.expansions);
        assert_eq!(plan.stats.closed, 41);
    }

    #[test]
    fn test_relaxation_keeps_cheaper_parent() {
        // 0 -> 2 directly costs 5; via 1 it costs 2, found after 2 is open.
        let world = GraphWorld {
            at: 0,
            edges: &[(0, 1, 1.0), (0, 2, 5.0), (1, 2, 1.0), (2, 3, 1.0)],
            goals: &[3],
        };
        let plan = search(100, 0, world, graph_cost);

        assert!(plan.reached_goal());
        assert_eq!(graph_path(&plan), vec![0, 1, 2, 3]);
        assert_eq!(plan.stats.relaxed, 1);
        assert_eq!(plan.stats.generated, 3);
        assert!((plan.last().unwrap().cost - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_relaxation_ignores_costlier_duplicate() {
        let world = GraphWorld {
            at: 0,
            edges: &[(0, 1, 1.0), (0, 2, 1.5), (1, 2, 1.0), (2, 3, 1.0)],
            goals: &[3],
        };
        let plan = search(100, 0, world, graph_cost);

        assert_eq!(graph_path(&plan), vec![0, 2, 3]);
        assert_eq!(plan.stats.relaxed, 0);
    }

    #[test]
    fn test_relaxation_does_not_spend_budget() {
        // Budget 2 covers exactly the two nodes added from the root; the
        // relaxed entry and the goal pop still fit.
        let world = GraphWorld {
            at: 0,
            edges: &[(0, 1, 1.0), (0, 2, 5.0), (1, 2, 1.0)],
            goals: &[2],
        };
        let plan = search(2, 0, world, graph_cost);

        assert!(plan.reached_goal());
        assert_eq!(graph_path(&plan), vec![0, 1, 2]);
    }

    #[test]
    fn test_equal_costs_pop_first_added() {
        let first = GraphWorld {
            at: 0,
            edges: &[(0, 1, 1.0), (0, 2, 1.0)],
            goals: &[1, 2],
        };
        let plan = search(10, 0, first, graph_cost);
        assert_eq!(graph_path(&plan), vec![0, 1]);

        let swapped = GraphWorld {
            at: 0,
            edges: &[(0, 2, 1.0), (0, 1, 1.0)],
            goals: &[1, 2],
        };
        let plan = search(10, 0, swapped, graph_cost);
        assert_eq!(graph_path(&plan), vec![0, 2]);
    }

    #[test]
    fn test_plan_parents_index_into_plan() {
        let plan = search(1000, 0, LineWorld::new(0, 3), line_cost);

        for (i, node) in plan.nodes.iter().enumerate() {
            assert_eq!(node.parent, i.checked_sub(1).map(NodeId));
            assert_eq!(node.depth as usize, i);
        }
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::GoalReached.to_string(), "goal reached");
        assert_eq!(
            Termination::BudgetExhausted.to_string(),
            "budget exhausted"
        );
    }
}
