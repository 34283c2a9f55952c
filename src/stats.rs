//! Per-search counters
//!
//! [`SearchStatistics`] describes how one search call spent its
//! iterations: how wide the root was, how deep the tree grew and how the
//! playouts ended.

use std::fmt;
use std::time::Duration;

use crate::policy::simulation::Playout;

/// Counters filled in by [`crate::MCTS::build_tree`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Completed iterations
    pub iterations: usize,
    /// Wall-clock time of the search
    pub elapsed: Duration,
    /// Legal moves at the root
    pub root_moves: usize,
    /// Nodes in the finished tree
    pub tree_size: usize,
    /// Deepest node selected or created
    pub max_depth: usize,
    /// Iterations whose selected node was already a finished game
    pub terminal_visits: usize,
    /// Playouts that reached a win or a full board
    pub finished_playouts: usize,
    /// Playouts stopped by the playout depth limit
    pub cutoff_playouts: usize,
    /// Moves played across all playouts
    pub playout_moves: usize,
    /// Whether the deadline ended the search
    pub stopped_early: bool,
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one playout
    pub fn record_playout(&mut self, playout: &Playout) {
        if playout.finished {
            self.finished_playouts += 1;
        } else {
            self.cutoff_playouts += 1;
        }
        self.playout_moves += playout.moves;
    }

    /// Playouts of any kind
    pub fn playouts(&self) -> usize {
        self.finished_playouts + self.cutoff_playouts
    }

    /// Average number of moves per playout, 0 before the first one
    pub fn mean_playout_length(&self) -> f64 {
        match self.playouts() {
            0 => 0.0,
            n => self.playout_moves as f64 / n as f64,
        }
    }

    /// Multi-line report for logs
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} iterations in {:.3}s{}",
            self.iterations,
            self.elapsed.as_secs_f64(),
            if self.stopped_early { " (deadline hit)" } else { "" }
        )?;
        writeln!(
            f,
            "root: {} moves, tree: {} nodes, depth {}",
            self.root_moves, self.tree_size, self.max_depth
        )?;
        write!(
            f,
            "playouts: {} finished, {} cut off, {:.1} moves on average, {} terminal visits",
            self.finished_playouts,
            self.cutoff_playouts,
            self.mean_playout_length(),
            self.terminal_visits
        )
    }
}
