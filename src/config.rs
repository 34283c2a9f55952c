//! Configuration for both decision engines
//!
//! [`SearchConfig`] controls the tree search and [`DifficultyConfig`] the
//! heuristic player. Both are plain values built with consuming `with_*`
//! methods and checked with `validate`.

use std::time::Duration;

use crate::{QuartoError, Result};

/// How playout moves are ordered before sampling
///
/// Ordering only biases which moves playouts try; it never removes a move
/// from consideration in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveSortStrategy {
    /// Uniform shuffle
    #[default]
    Random,
    /// Placements closest to the centre first
    CenterFirst,
    /// Corners, then edges, then centre cells
    CornerFirst,
    /// Gives that do not hand over an immediate win first
    Defensive,
}

/// Configuration for the MCTS engine
///
/// # Example
///
/// ```
/// use quarto_ai::{MoveSortStrategy, SearchConfig};
/// use std::time::Duration;
///
/// let config = SearchConfig::default()
///     .with_exploration_constant(1.0)
///     .with_max_iterations(5_000)
///     .with_playout_depth(8)
///     .with_max_time(Duration::from_millis(500))
///     .with_move_sort_strategy(MoveSortStrategy::CenterFirst);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of select/expand/simulate/backpropagate iterations
    pub max_iterations: usize,

    /// Nodes at this depth or deeper are not expanded (root = 0)
    pub max_depth: usize,

    /// UCT exploration constant `C`
    ///
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,

    /// Maximum number of moves played out in one simulation
    ///
    /// A playout cut off before the game ends scores as a draw.
    pub playout_depth: usize,

    /// Ordering applied to playout moves
    pub move_sort_strategy: MoveSortStrategy,

    /// Playouts pick uniformly among this many best-ranked moves
    pub playout_top_k: usize,

    /// Optional wall-clock budget, checked once per iteration
    ///
    /// Leave unset for results that depend only on the seed.
    pub max_time: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 1_000,
            // a game has at most 17 moves: the opening give and 16 placements
            max_depth: 17,
            exploration_constant: std::f64::consts::SQRT_2,
            playout_depth: 17,
            move_sort_strategy: MoveSortStrategy::Random,
            playout_top_k: 3,
            max_time: None,
        }
    }
}

impl SearchConfig {
    /// Sets the maximum number of iterations
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the maximum tree depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the playout depth
    pub fn with_playout_depth(mut self, depth: usize) -> Self {
        self.playout_depth = depth;
        self
    }

    /// Sets the playout move ordering
    pub fn with_move_sort_strategy(mut self, strategy: MoveSortStrategy) -> Self {
        self.move_sort_strategy = strategy;
        self
    }

    /// Sets how many top-ranked moves playouts sample from
    pub fn with_playout_top_k(mut self, k: usize) -> Self {
        self.playout_top_k = k;
        self
    }

    /// Sets the wall-clock budget
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Checks that every field is inside its documented range
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(QuartoError::InvalidConfiguration(
                "max_iterations must be positive".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(QuartoError::InvalidConfiguration(
                "max_depth must be positive".into(),
            ));
        }
        if !(self.exploration_constant.is_finite() && self.exploration_constant > 0.0) {
            return Err(QuartoError::InvalidConfiguration(format!(
                "exploration_constant must be a positive number, got {}",
                self.exploration_constant
            )));
        }
        if self.playout_depth == 0 {
            return Err(QuartoError::InvalidConfiguration(
                "playout_depth must be positive".into(),
            ));
        }
        if self.playout_top_k == 0 {
            return Err(QuartoError::InvalidConfiguration(
                "playout_top_k must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Named difficulty levels for the heuristic player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Plays at random about half the time
    Easy,
    /// Occasionally careless
    Normal,
    /// Rarely careless, demands more safe pieces
    Hard,
    /// Never random, never misses a win
    Expert,
}

impl Difficulty {
    /// All levels, weakest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// The tuning record for this level
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                p_random: 0.5,
                p_miss_win: 0.2,
                min_safe: 2,
            },
            Difficulty::Normal => DifficultyConfig {
                p_random: 0.25,
                p_miss_win: 0.05,
                min_safe: 2,
            },
            Difficulty::Hard => DifficultyConfig {
                p_random: 0.08,
                p_miss_win: 0.01,
                min_safe: 3,
            },
            Difficulty::Expert => DifficultyConfig {
                p_random: 0.0,
                p_miss_win: 0.0,
                min_safe: 8,
            },
        }
    }
}

/// Tuning knobs for the heuristic player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Probability of ignoring strategy and choosing uniformly at random
    pub p_random: f64,
    /// Probability of not noticing an immediate winning placement
    pub p_miss_win: f64,
    /// Safe pieces a placement should leave to be preferred
    pub min_safe: usize,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::Normal.config()
    }
}

impl From<Difficulty> for DifficultyConfig {
    fn from(level: Difficulty) -> Self {
        level.config()
    }
}

impl DifficultyConfig {
    /// Sets the random-play probability
    pub fn with_p_random(mut self, p: f64) -> Self {
        self.p_random = p;
        self
    }

    /// Sets the missed-win probability
    pub fn with_p_miss_win(mut self, p: f64) -> Self {
        self.p_miss_win = p;
        self
    }

    /// Sets the safe-piece threshold
    pub fn with_min_safe(mut self, min_safe: usize) -> Self {
        self.min_safe = min_safe;
        self
    }

    /// Checks that both probabilities lie in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("p_random", self.p_random), ("p_miss_win", self.p_miss_win)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(QuartoError::InvalidConfiguration(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}
