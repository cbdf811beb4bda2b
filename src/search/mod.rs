//! Generic best-first search
//!
//! Domain-agnostic search core: callers describe their state space through
//! [`StateSpace`] and rank nodes with a cost closure. Everything the search
//! allocates lives for a single call.

mod engine;
mod frontier;
mod node;

pub use engine::{AgentId, Plan, SearchStats, StateSpace, Termination, search};
pub use frontier::{ClosedSet, OpenEntry, OpenList, Slot};
pub use node::{NodeArena, NodeId, SearchNode};
