//! Search nodes and the per-call node arena
//!
//! Nodes form a parent chain by index rather than by shared pointer, so a
//! chain can never cycle and the whole tree is dropped in one go when a
//! search returns.

use std::fmt;

/// Index of a node inside a [`NodeArena`] (or inside a returned plan)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Raw index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One expanded or frontier state in the search tree
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    /// Preceding node, `None` for the root
    pub parent: Option<NodeId>,
    /// Full copy of the state at this node
    pub state: S,
    /// Action that produced this node from its parent, `None` for the root
    pub action: Option<usize>,
    /// Frontier ordering score
    pub cost: f32,
    /// Transitions from the root (root = 0)
    pub depth: u32,
}

impl<S> SearchNode<S> {
    /// Create the root node of a search
    #[must_use]
    pub fn root(state: S, cost: f32) -> Self {
        Self {
            parent: None,
            state,
            action: None,
            cost,
            depth: 0,
        }
    }

    /// Check if this is a root node
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Append-only storage for the nodes created by one search call
#[derive(Debug)]
pub struct NodeArena<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> NodeArena<S> {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Store a node and return its id
    pub fn push(&mut self, node: SearchNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Get a node by id
    ///
    /// Ids are only ever handed out by `push`, so an id from this arena is
    /// always in range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    /// Number of nodes stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids from `id` back to the root, newest first
    #[must_use]
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::with_capacity(self.get(id).depth as usize + 1);
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.get(node_id).parent;
        }
        chain
    }
}

impl<S: Clone> NodeArena<S> {
    /// Copy the chain ending at `id` out of the arena, root first.
    ///
    /// Parent links of the returned nodes index into the returned vector.
    #[must_use]
    pub fn extract_chain(&self, id: NodeId) -> Vec<SearchNode<S>> {
        let mut chain = self.ancestry(id);
        chain.reverse();

        chain
            .into_iter()
            .enumerate()
            .map(|(i, node_id)| {
                let node = self.get(node_id);
                SearchNode {
                    parent: i.checked_sub(1).map(NodeId),
                    state: node.state.clone(),
                    action: node.action,
                    cost: node.cost,
                    depth: node.depth,
                }
            })
            .collect()
    }
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        Self::new()
    }
}
