//! Arena-backed search tree for Monte Carlo Tree Search
//!
//! Nodes are stored in a single `Vec` and refer to each other by
//! [`NodeId`]. Ownership runs strictly from the arena downward; the parent
//! index is only read to walk back up during backpropagation and to fetch
//! the parent's visit count for the exploration term.

use std::fmt;

use rand::{Rng, RngCore};

use crate::{
    game_state::{GameState, Move},
    QuartoError, Result,
};

/// Index of a node in its [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents a node in the MCTS tree
///
/// Each node holds a snapshot of the game state, the move that produced
/// it, visit and win statistics, and the moves not yet expanded into
/// children.
#[derive(Debug, Clone)]
pub struct MCTSNode {
    /// The game state at this node
    pub state: GameState,

    /// The move that led to this state (None for root)
    pub mv: Option<Move>,

    /// Parent index (None for root)
    pub parent: Option<NodeId>,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Number of playouts that passed through this node
    pub visits: u64,

    /// Sum of playout results, from the root mover's perspective
    pub wins: f64,

    /// Legal moves that have not been expanded yet
    pub untried: Vec<Move>,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,
}

impl MCTSNode {
    fn new(state: GameState, mv: Option<Move>, parent: Option<NodeId>, depth: usize) -> Self {
        let untried = state.legal_moves();
        MCTSNode {
            state,
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
            untried,
            depth,
        }
    }

    /// Returns the average result (win rate) of this node
    pub fn value(&self) -> f64 {
        crate::utils::win_rate(self.wins, self.visits)
    }

    /// Returns true if every legal move has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Returns true if the game is over at this node
    pub fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The search tree of one `search` call
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<MCTSNode>,
}

impl SearchTree {
    /// Creates a tree holding only the root
    pub fn new(root_state: GameState) -> Self {
        SearchTree {
            nodes: vec![MCTSNode::new(root_state, None, None, 0)],
        }
    }

    /// The root node id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrows a node
    #[inline]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0]
    }

    /// Number of nodes in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root exists from construction
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expands one untried move of `id` into a new child
    ///
    /// The move is chosen uniformly from the untried list. Calling this on
    /// a node with no untried moves means the caller's guard is broken, so
    /// it fails with [`QuartoError::NodeFullyExpanded`] instead of doing
    /// nothing.
    pub fn expand(&mut self, id: NodeId, rng: &mut dyn RngCore) -> Result<NodeId> {
        let node = &mut self.nodes[id.0];
        if node.untried.is_empty() {
            return Err(QuartoError::NodeFullyExpanded(id.0));
        }

        let index = rng.gen_range(0..node.untried.len());
        let mv = node.untried.swap_remove(index);
        let child_state = node.state.apply_move(&mv)?;
        let depth = node.depth + 1;

        let child_id = NodeId(self.nodes.len());
        self.nodes[id.0].children.push(child_id);
        self.nodes
            .push(MCTSNode::new(child_state, Some(mv), Some(id), depth));
        Ok(child_id)
    }

    /// Adds one visit and `result` to `id` and every ancestor
    pub fn backpropagate(&mut self, id: NodeId, result: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.0];
            node.visits += 1;
            node.wins += result;
            current = node.parent;
        }
    }

    /// The root child with the most visits; the earliest expanded wins ties
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in &self.get(id).children {
            match best {
                Some(current) if self.get(current).visits >= self.get(child).visits => {}
                _ => best = Some(child),
            }
        }
        best
    }

    /// Renders the tree down to `max_depth` with visit counts and values
    pub fn visualize(&self, max_depth: usize) -> String {
        let mut output = String::new();
        self.visualize_node(self.root(), max_depth, &mut output);
        output
    }

    fn visualize_node(&self, id: NodeId, max_depth: usize, output: &mut String) {
        let node = self.get(id);
        let indent = "  ".repeat(node.depth);
        let label = match &node.mv {
            Some(mv) => mv.to_string(),
            None => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, value: {:.3})\n",
            indent,
            label,
            node.visits,
            node.value()
        ));

        if node.depth >= max_depth {
            return;
        }
        for &child in &node.children {
            self.visualize_node(child, max_depth, output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_expand_links_parent_and_child() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut tree = SearchTree::new(GameState::new());
        let root = tree.root();
        assert_eq!(tree.get(root).untried.len(), 16);

        let child = tree.expand(root, &mut rng).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child).parent, Some(root));
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(root).children, vec![child]);
        assert_eq!(tree.get(root).untried.len(), 15);
        // The child's state has a staged piece and 15 * 16 replies
        assert_eq!(tree.get(child).untried.len(), 16 * 15);
    }

    #[test]
    fn test_expanding_exhausted_node_fails() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut tree = SearchTree::new(GameState::new());
        let root = tree.root();
        for _ in 0..16 {
            tree.expand(root, &mut rng).unwrap();
        }
        assert!(tree.get(root).is_fully_expanded());
        assert_eq!(
            tree.expand(root, &mut rng),
            Err(QuartoError::NodeFullyExpanded(0))
        );
    }

    #[test]
    fn test_backpropagate_reaches_root() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut tree = SearchTree::new(GameState::new());
        let child = tree.expand(tree.root(), &mut rng).unwrap();
        let grandchild = tree.expand(child, &mut rng).unwrap();

        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(child, 0.5);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(child).visits, 2);
        assert_eq!(tree.get(tree.root()).visits, 2);
        assert!((tree.get(tree.root()).wins - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_most_visited_child_prefers_first_on_ties() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut tree = SearchTree::new(GameState::new());
        let a = tree.expand(tree.root(), &mut rng).unwrap();
        let b = tree.expand(tree.root(), &mut rng).unwrap();
        tree.backpropagate(a, 0.0);
        tree.backpropagate(b, 1.0);
        assert_eq!(tree.most_visited_child(tree.root()), Some(a));

        tree.backpropagate(b, 1.0);
        assert_eq!(tree.most_visited_child(tree.root()), Some(b));
    }
}
