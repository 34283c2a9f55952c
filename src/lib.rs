//! # quarto-ai
//!
//! Computer opponents for the board game Quarto.
//!
//! Quarto is played with sixteen pieces, each a combination of four binary
//! attributes. Players take turns placing the piece their opponent chose
//! for them on a 4x4 board and then choosing a piece for the opponent. The
//! player who completes a row, column or diagonal of four pieces sharing an
//! attribute wins.
//!
//! This crate provides two decision engines that both return a [`Move`],
//! a joint placement and give:
//!
//! - [`heuristic::decide`]: a single-ply policy tuned by a
//!   [`DifficultyConfig`]. It takes immediate wins, prefers placements that
//!   leave many safe pieces to give, and avoids giving pieces that let the
//!   opponent win.
//! - [`mcts::search`]: a Monte Carlo Tree Search using UCT selection and
//!   playouts biased by a pluggable move ordering.
//!
//! ## Basic Usage
//!
//! ```
//! use quarto_ai::{GameState, SearchConfig, MoveSortStrategy, Difficulty};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! fn main() -> Result<(), quarto_ai::QuartoError> {
//!     let mut rng = StdRng::seed_from_u64(7);
//!     let state = GameState::new();
//!
//!     // Heuristic opponent
//!     let mv = quarto_ai::heuristic::decide(&state, &Difficulty::Hard.config(), &mut rng)?;
//!     let state = state.apply_move(&mv)?;
//!
//!     // Tree search opponent
//!     let config = SearchConfig::default()
//!         .with_max_iterations(200)
//!         .with_move_sort_strategy(MoveSortStrategy::Defensive);
//!     let reply = quarto_ai::mcts::search(&state, &config, &mut rng)?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! ## How the search works
//!
//! Each iteration of the search runs four phases:
//!
//! 1. **Selection**: descend from the root through fully expanded nodes,
//!    picking the child with the highest UCT score.
//! 2. **Expansion**: add one child for an untried move.
//! 3. **Simulation**: play the game forward, sampling among the best few
//!    moves according to the configured [`MoveSortStrategy`].
//! 4. **Backpropagation**: add the playout result to every node on the
//!    path back to the root.
//!
//! The move of the most visited root child is returned.
//!
//! Host applications can use [`adapter::LiveGame`] to keep their own board
//! and turn bookkeeping and turn returned moves into discrete effects.

pub mod adapter;
pub mod board;
pub mod config;
pub mod game_state;
pub mod heuristic;
pub mod mcts;
pub mod piece;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use adapter::{Effect, LiveGame, Opponent};
pub use board::{Board, Coord};
pub use config::{Difficulty, DifficultyConfig, MoveSortStrategy, SearchConfig};
pub use game_state::{GameState, Move, Outcome, Player, ScoredMove};
pub use mcts::MCTS;
pub use piece::{Attribute, Piece};
pub use policy::{MoveOrdering, Playout, SelectionPolicy, SimulationPolicy};
pub use stats::SearchStatistics;
pub use tree::{MCTSNode, NodeId, SearchTree};

/// Error types for the Quarto engines
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuartoError {
    /// No legal moves are available from the current state
    #[error("No legal moves available from current state")]
    NoLegalMoves,

    /// A decision was requested on a finished game
    #[error("The game is already over")]
    GameOver,

    /// The supplied state breaks a consistency rule
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A move could not be applied
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The search tried to expand a node with no untried moves left
    #[error("Node {0} has no untried moves to expand")]
    NodeFullyExpanded(usize),
}

/// Result type for Quarto operations
pub type Result<T> = std::result::Result<T, QuartoError>;
