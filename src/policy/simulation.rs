//! Simulation policies for the search
//!
//! Simulation policies play a game forward from a given state to estimate
//! how good that state is for one player.

use log::trace;
use rand::{Rng, RngCore};

use crate::{
    config::{MoveSortStrategy, SearchConfig},
    game_state::{GameState, Player},
    policy::ordering::MoveOrdering,
    Result,
};

/// Result credited to a playout that stops before the game ends
pub const UNFINISHED_RESULT: f64 = 0.5;

/// A scored playout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playout {
    /// 1.0 for a win, 0.0 for a loss, [`UNFINISHED_RESULT`] for a tie or a
    /// playout cut off by the depth limit
    pub value: f64,
    /// Moves played from the simulated state
    pub moves: usize,
    /// Whether the game reached a terminal state
    pub finished: bool,
}

impl Playout {
    /// A playout that starts on a finished game
    pub fn finished(state: &GameState, perspective: Player) -> Self {
        Playout {
            value: state.result_for(perspective),
            moves: 0,
            finished: true,
        }
    }
}

/// Trait for policies that simulate games
pub trait SimulationPolicy: Send + Sync {
    /// Plays out a game from `state` and scores it for `perspective`
    ///
    /// A move the game rejects mid-playout is an error, never a score.
    fn simulate(
        &self,
        state: &GameState,
        perspective: Player,
        rng: &mut dyn RngCore,
    ) -> Result<Playout>;
}

/// Depth-limited playout biased by a move ordering
///
/// At each step the legal moves are ordered and one of the first
/// `top_k` is chosen uniformly, so better-ranked moves are favoured while
/// playouts stay random.
#[derive(Debug)]
pub struct PlayoutPolicy {
    ordering: Box<dyn MoveOrdering>,
    depth: usize,
    top_k: usize,
}

impl PlayoutPolicy {
    /// Creates a playout policy from an ordering, a move limit and a sample width
    pub fn new(ordering: Box<dyn MoveOrdering>, depth: usize, top_k: usize) -> Self {
        PlayoutPolicy {
            ordering,
            depth,
            top_k: top_k.max(1),
        }
    }

    /// Uniformly random playouts
    pub fn random(depth: usize) -> Self {
        Self::new(MoveSortStrategy::Random.ordering(), depth, 1)
    }

    /// Builds the playout described by a search configuration
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.move_sort_strategy.ordering(),
            config.playout_depth,
            config.playout_top_k,
        )
    }
}

impl SimulationPolicy for PlayoutPolicy {
    fn simulate(
        &self,
        state: &GameState,
        perspective: Player,
        rng: &mut dyn RngCore,
    ) -> Result<Playout> {
        let mut current = state.clone();
        let mut played = 0;

        while !current.terminal && played < self.depth {
            let mut moves = current.legal_moves();
            if moves.is_empty() {
                break;
            }
            self.ordering.order(&current, &mut moves, rng);

            let pick = rng.gen_range(0..self.top_k.min(moves.len()));
            current.play(&moves[pick])?;
            played += 1;
        }

        let playout = if current.terminal {
            Playout {
                moves: played,
                ..Playout::finished(&current, perspective)
            }
        } else {
            Playout {
                value: UNFINISHED_RESULT,
                moves: played,
                finished: false,
            }
        };
        trace!("playout of {} moves scored {}", played, playout.value);
        Ok(playout)
    }
}
