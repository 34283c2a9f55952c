//! Selection policies for the search
//!
//! Selection policies decide which child to descend into while walking
//! down the tree, balancing exploration and exploitation.

use crate::{
    tree::{NodeId, SearchTree},
    utils,
};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy: Send + Sync {
    /// Selects the child of `node` to descend into
    ///
    /// Returns `None` only when the node has no children.
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId>;
}

/// Upper Confidence Bound 1 applied to trees (UCT)
///
/// Scores each child with:
///
/// ```text
/// UCT = wins / visits + exploration_constant * sqrt(ln(parent_visits) / visits)
/// ```
///
/// Unvisited children score infinity. Ties go to the earliest expanded
/// child, which keeps selection deterministic for a fixed seed.
///
/// The commonly used value for the exploration constant is sqrt(2),
/// which is the default in [`SearchConfig`](crate::SearchConfig).
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for a child
    pub fn ucb1_value(&self, child_wins: f64, child_visits: u64, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            child_wins,
            child_visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for UCB1Policy {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        let parent = tree.get(node);
        let mut best_value = f64::NEG_INFINITY;
        let mut best = None;

        for &child_id in &parent.children {
            let child = tree.get(child_id);
            let value = self.ucb1_value(child.wins, child.visits, parent.visits);
            if best.is_none() || value > best_value {
                best_value = value;
                best = Some(child_id);
            }
        }

        best
    }
}
