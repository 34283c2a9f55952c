//! Bridge between a host application's game bookkeeping and the engines
//!
//! A host keeps a live, mutable game: the board, the pool of unused
//! pieces, the piece currently selected for the player to move, and whose
//! turn it is. [`LiveGame`] models that bookkeeping. It produces validated
//! [`GameState`] snapshots for the engines and applies the [`Move`] they
//! return as two discrete [`Effect`]s, a placement followed by a give, that
//! a front end can animate one after the other.

use log::debug;
use rand::RngCore;

use crate::{
    board::{Board, Coord},
    config::{DifficultyConfig, SearchConfig},
    game_state::{GameState, Move, Outcome, Player},
    heuristic, mcts,
    piece::Piece,
    Result,
};

/// One observable consequence of applying a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// `piece` was put on `coord`
    Place {
        /// Target cell
        coord: Coord,
        /// The piece that was staged
        piece: Piece,
    },
    /// `piece` was handed to `to`, who must place it next
    Give {
        /// The piece handed over
        piece: Piece,
        /// The player receiving it
        to: Player,
    },
}

/// Which engine plays for a computer-controlled seat
#[derive(Debug, Clone, PartialEq)]
pub enum Opponent {
    /// The single-ply heuristic player
    Heuristic(DifficultyConfig),
    /// The tree search
    Mcts(SearchConfig),
}

impl Opponent {
    /// Asks the configured engine for a move
    pub fn choose_move(&self, state: &GameState, rng: &mut dyn RngCore) -> Result<Move> {
        match self {
            Opponent::Heuristic(difficulty) => heuristic::decide(state, difficulty, rng),
            Opponent::Mcts(config) => mcts::search(state, config, rng),
        }
    }
}

/// A host application's live game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveGame {
    board: Board,
    pool: Vec<Piece>,
    selected: Option<Piece>,
    turn: Player,
}

impl Default for LiveGame {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveGame {
    /// A fresh game with player one to give the first piece
    pub fn new() -> Self {
        let start = GameState::new();
        LiveGame {
            board: start.board,
            pool: start.available,
            selected: start.staged,
            turn: start.current,
        }
    }

    /// Wraps existing bookkeeping after checking it forms a valid position
    pub fn from_parts(
        board: Board,
        pool: Vec<Piece>,
        selected: Option<Piece>,
        turn: Player,
    ) -> Result<Self> {
        let game = LiveGame {
            board,
            pool,
            selected,
            turn,
        };
        game.snapshot()?;
        Ok(game)
    }

    /// The current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pieces nobody has been handed yet
    pub fn pool(&self) -> &[Piece] {
        &self.pool
    }

    /// The piece the player to move must place
    pub fn selected(&self) -> Option<Piece> {
        self.selected
    }

    /// The player to move
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// An independent engine-facing copy of the live game
    pub fn snapshot(&self) -> Result<GameState> {
        GameState::from_parts(self.board, self.pool.clone(), self.selected, self.turn)
    }

    /// How the game ended, if it has
    ///
    /// Fails with [`crate::QuartoError::InvalidState`] when the
    /// bookkeeping no longer forms a valid position.
    pub fn outcome(&self) -> Result<Option<Outcome>> {
        Ok(self.snapshot()?.outcome)
    }

    /// Cells of the winning line, for highlighting
    pub fn winning_line(&self) -> Option<[Coord; 4]> {
        self.board.winning_line()
    }

    /// Applies a move and reports its effects in order
    ///
    /// The move is checked against a snapshot first, so an illegal move
    /// leaves the live game untouched. A give is only reported when the
    /// placement did not end the game.
    pub fn apply(&mut self, mv: &Move) -> Result<Vec<Effect>> {
        let before = self.snapshot()?;
        let after = before.apply_move(mv)?;

        let mut effects = Vec::with_capacity(2);
        if let (Some(coord), Some(piece)) = (mv.placement, before.staged) {
            effects.push(Effect::Place { coord, piece });
        }
        if !after.terminal {
            if let Some(piece) = after.staged {
                effects.push(Effect::Give {
                    piece,
                    to: after.current,
                });
            }
        }

        self.board = after.board;
        self.pool = after.available;
        self.selected = after.staged;
        self.turn = after.current;

        debug!("applied {} with effects {:?}", mv, effects);
        Ok(effects)
    }

    /// Lets `opponent` choose a move for the player to act and applies it
    pub fn play_turn(&mut self, opponent: &Opponent, rng: &mut dyn RngCore) -> Result<Vec<Effect>> {
        let state = self.snapshot()?;
        let mv = opponent.choose_move(&state, rng)?;
        self.apply(&mv)
    }
}
