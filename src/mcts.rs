//! Main implementation of the Monte Carlo Tree Search engine
//!
//! This module orchestrates the four phases of selection, expansion,
//! simulation and backpropagation over a [`SearchTree`] that lives only
//! for the duration of one search call.

use std::time::Instant;

use log::{debug, trace};
use rand::RngCore;

use crate::{
    config::SearchConfig,
    game_state::{GameState, Move, Player},
    policy::{
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{PlayoutPolicy, SimulationPolicy},
    },
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    QuartoError, Result,
};

/// The Monte Carlo Tree Search engine
///
/// Holds the position to search, the configuration and the policies used
/// for selection and simulation. Each call to [`MCTS::search`] builds a
/// fresh tree, so repeated searches never share nodes.
pub struct MCTS {
    /// Position the search starts from
    root_state: GameState,

    /// Configuration for the search
    config: SearchConfig,

    /// Statistics gathered during the last search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy>,

    /// Policy for simulating games during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy>,
}

impl MCTS {
    /// Creates a new engine for the given position and configuration
    ///
    /// Selection defaults to UCT with the configured exploration constant,
    /// simulation to playouts ordered by the configured strategy.
    pub fn new(initial_state: GameState, config: SearchConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy> =
            Box::new(UCB1Policy::new(config.exploration_constant));

        let simulation_policy: Box<dyn SimulationPolicy> =
            Box::new(PlayoutPolicy::from_config(&config));

        MCTS {
            root_state: initial_state,
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    ///
    /// A custom policy replaces the playout depth and move ordering taken
    /// from the configuration.
    pub fn with_simulation_policy<P: SimulationPolicy + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Runs the search and returns the move of the most visited root child
    pub fn search(&mut self, rng: &mut dyn RngCore) -> Result<Move> {
        let tree = self.build_tree(rng)?;
        let root = tree.root();

        let best = tree
            .most_visited_child(root)
            .ok_or(QuartoError::NoLegalMoves)?;
        let node = tree.get(best);
        let mv = node.mv.ok_or(QuartoError::NoLegalMoves)?;

        debug!(
            "search chose {} after {} iterations (visits: {}, value: {:.3}, tree: {} nodes)",
            mv,
            self.statistics.iterations,
            node.visits,
            node.value(),
            tree.len()
        );
        trace!("{}", self.statistics.summary());
        Ok(mv)
    }

    /// Runs the search and returns the finished tree
    ///
    /// Useful for inspecting visit counts or rendering the tree with
    /// [`SearchTree::visualize`].
    pub fn build_tree(&mut self, rng: &mut dyn RngCore) -> Result<SearchTree> {
        self.config.validate()?;
        self.root_state.validate()?;

        let root_moves = self.root_state.legal_moves().len();
        if root_moves == 0 {
            return Err(QuartoError::NoLegalMoves);
        }

        self.statistics = SearchStatistics {
            root_moves,
            ..SearchStatistics::new()
        };
        let perspective = self.root_state.current;
        let mut tree = SearchTree::new(self.root_state.clone());

        let start_time = Instant::now();
        let max_time = self.config.max_time;

        for i in 0..self.config.max_iterations {
            // At least one iteration always runs so the root has a child
            if let Some(max_duration) = max_time {
                if i > 0 && start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    debug!("search stopped early after {} iterations due to time limit", i);
                    break;
                }
            }

            self.execute_iteration(&mut tree, perspective, rng)?;
            self.statistics.iterations = i + 1;
        }

        self.statistics.elapsed = start_time.elapsed();
        self.statistics.tree_size = tree.len();
        Ok(tree)
    }

    /// Execute a single iteration of the search
    fn execute_iteration(
        &mut self,
        tree: &mut SearchTree,
        perspective: Player,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        // 1. Selection phase
        let selected = self.selection(tree);

        // 2. Expansion phase
        let leaf = self.expansion(tree, selected, rng)?;

        // 3. Simulation phase
        let playout = self
            .simulation_policy
            .simulate(&tree.get(leaf).state, perspective, rng)?;
        self.statistics.record_playout(&playout);

        // 4. Backpropagation phase
        tree.backpropagate(leaf, playout.value);
        trace!("iteration simulated node {} with result {}", leaf, playout.value);

        Ok(())
    }

    /// Selection phase: descend through fully expanded nodes
    fn selection(&mut self, tree: &SearchTree) -> NodeId {
        let mut current = tree.root();

        loop {
            let node = tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() || node.is_leaf() {
                break;
            }
            match self.selection_policy.select_child(tree, current) {
                Some(child) => current = child,
                None => break,
            }
        }

        self.statistics.max_depth = self.statistics.max_depth.max(tree.get(current).depth);
        current
    }

    /// Expansion phase: add one child to the selected node when allowed
    ///
    /// The node must be unfinished, have been visited before (the root is
    /// always eligible), sit above the depth limit and still have untried
    /// moves. Otherwise the selected node itself is simulated.
    fn expansion(
        &mut self,
        tree: &mut SearchTree,
        selected: NodeId,
        rng: &mut dyn RngCore,
    ) -> Result<NodeId> {
        let node = tree.get(selected);

        if node.is_terminal() {
            self.statistics.terminal_visits += 1;
            return Ok(selected);
        }

        let visited = node.parent.is_none() || node.visits > 0;
        if !visited || node.depth >= self.config.max_depth || node.is_fully_expanded() {
            return Ok(selected);
        }

        let child = tree.expand(selected, rng)?;
        self.statistics.max_depth = self.statistics.max_depth.max(tree.get(child).depth);
        Ok(child)
    }

    /// Returns the statistics of the last search
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Searches `state` with a fresh engine and returns the chosen move
///
/// Equivalent to `MCTS::new(state.clone(), config.clone()).search(rng)`.
pub fn search(state: &GameState, config: &SearchConfig, rng: &mut dyn RngCore) -> Result<Move> {
    MCTS::new(state.clone(), config.clone()).search(rng)
}
