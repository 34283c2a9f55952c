//! Game state, moves and legal-move enumeration
//!
//! A Quarto turn is a pair: the mover places the piece the opponent handed
//! them, then hands the opponent a piece to place next. The very first
//! move of a game is give-only and the final move is place-only.

use std::fmt;

use crate::{
    board::{Board, Coord},
    piece::Piece,
    QuartoError, Result,
};

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// The player who makes the opening give
    One,
    /// The player who makes the first placement
    Two,
}

impl Player {
    /// The other player
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player who completed a winning line
    Winner(Player),
    /// The board filled up with no winning line
    Tie,
}

/// A joint action: where to place the staged piece and what to give next
///
/// `placement` is `None` only on the opening give-only move. `give` is
/// `None` only on the final move, when no pieces remain to hand over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Cell receiving the staged piece
    pub placement: Option<Coord>,
    /// Piece handed to the opponent
    pub give: Option<Piece>,
}

impl Move {
    /// The opening move: give a piece without placing one
    pub fn give_only(piece: Piece) -> Self {
        Move {
            placement: None,
            give: Some(piece),
        }
    }

    /// A regular move: place, then give
    pub fn place_and_give(coord: Coord, piece: Piece) -> Self {
        Move {
            placement: Some(coord),
            give: Some(piece),
        }
    }

    /// The final move: place with nothing left to give
    pub fn place_only(coord: Coord) -> Self {
        Move {
            placement: Some(coord),
            give: None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.placement {
            Some(coord) => write!(f, "place {}", coord)?,
            None => write!(f, "no placement")?,
        }
        match self.give {
            Some(piece) => write!(f, ", give {}", piece),
            None => write!(f, ", no give"),
        }
    }
}

/// A move annotated with the value used to rank it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    /// The candidate move
    pub mv: Move,
    /// Higher is better
    pub value: f64,
}

/// A complete Quarto position
///
/// Every piece is in exactly one of the board, the available set or the
/// staged slot. [`GameState::validate`] checks this along with the other
/// consistency rules; [`GameState::play`] preserves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Pieces placed so far
    pub board: Board,
    /// Pieces not yet handed to anyone; order is irrelevant
    pub available: Vec<Piece>,
    /// Piece the current mover must place, `None` before the first give
    pub staged: Option<Piece>,
    /// Player to move
    pub current: Player,
    /// True once a line is won or the board is full
    pub terminal: bool,
    /// Set exactly when `terminal` is true
    pub outcome: Option<Outcome>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The start of a game: empty board, every piece available, player one
    /// to give
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            available: Piece::all().collect(),
            staged: None,
            current: Player::One,
            terminal: false,
            outcome: None,
        }
    }

    /// Builds a state from parts, deriving the terminal flag and outcome
    ///
    /// The turn does not pass after a game-ending placement, so a winning
    /// line on the board is credited to `current`.
    pub fn from_parts(
        board: Board,
        available: Vec<Piece>,
        staged: Option<Piece>,
        current: Player,
    ) -> Result<Self> {
        let mut state = GameState {
            board,
            available,
            staged,
            current,
            terminal: false,
            outcome: None,
        };
        if board.has_winning_line() {
            state.terminal = true;
            state.outcome = Some(Outcome::Winner(current));
        } else if board.is_full() {
            state.terminal = true;
            state.outcome = Some(Outcome::Tie);
        }
        state.validate()?;
        Ok(state)
    }

    /// Checks every consistency rule of a position
    ///
    /// Returns [`QuartoError::InvalidState`] describing the first rule
    /// broken. The state is never repaired.
    pub fn validate(&self) -> Result<()> {
        let mut seen = [false; Piece::COUNT];
        let placed = self.board.pieces().map(|(_, p)| p);
        for piece in placed
            .chain(self.available.iter().copied())
            .chain(self.staged)
        {
            if std::mem::replace(&mut seen[piece.index()], true) {
                return Err(QuartoError::InvalidState(format!(
                    "piece {} is accounted for twice",
                    piece
                )));
            }
        }

        let total = self.available.len() + self.board.piece_count() + usize::from(self.staged.is_some());
        if total != Piece::COUNT {
            return Err(QuartoError::InvalidState(format!(
                "{} pieces accounted for, expected {}",
                total,
                Piece::COUNT
            )));
        }

        let should_end = self.board.has_winning_line() || self.board.is_full();
        if self.terminal != should_end {
            return Err(QuartoError::InvalidState(format!(
                "terminal flag is {} but the board says {}",
                self.terminal, should_end
            )));
        }

        match (self.terminal, self.outcome) {
            (true, None) => {
                return Err(QuartoError::InvalidState(
                    "terminal state without an outcome".into(),
                ))
            }
            (false, Some(_)) => {
                return Err(QuartoError::InvalidState(
                    "game in progress already has an outcome".into(),
                ))
            }
            (true, Some(Outcome::Tie)) if self.board.has_winning_line() => {
                return Err(QuartoError::InvalidState(
                    "a board with a winning line cannot be a tie".into(),
                ))
            }
            (true, Some(Outcome::Winner(_))) if !self.board.has_winning_line() => {
                return Err(QuartoError::InvalidState(
                    "winner declared without a winning line".into(),
                ))
            }
            _ => {}
        }

        if !self.terminal && self.staged.is_none() && self.board.piece_count() > 0 {
            return Err(QuartoError::InvalidState(
                "only the opening move may lack a staged piece".into(),
            ));
        }

        Ok(())
    }

    /// Returns true if this is the opening give-only move
    pub fn is_first_move(&self) -> bool {
        !self.terminal && self.staged.is_none()
    }

    /// Enumerates every legal move
    ///
    /// Terminal states have none. With a staged piece, every empty cell is
    /// paired with every available piece (or with no give once the pool is
    /// empty). Without one, every available piece is a give-only move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.terminal {
            return Vec::new();
        }

        if self.is_first_move() {
            return self.available.iter().map(|&p| Move::give_only(p)).collect();
        }

        let cells = self.board.empty_cells();
        if self.available.is_empty() {
            return cells.into_iter().map(Move::place_only).collect();
        }

        let mut moves = Vec::with_capacity(cells.len() * self.available.len());
        for &cell in &cells {
            for &piece in &self.available {
                moves.push(Move::place_and_give(cell, piece));
            }
        }
        moves
    }

    /// Applies a move in place
    ///
    /// The staged piece is placed first. If that completes a line the mover
    /// wins; if it fills the board the game is a tie. Either way the game
    /// ends there and the give is not carried out. Otherwise the given
    /// piece moves from the available set to the staged slot and the turn
    /// passes to the opponent.
    pub fn play(&mut self, mv: &Move) -> Result<()> {
        if self.terminal {
            return Err(QuartoError::IllegalMove(format!(
                "{} played after the game ended",
                mv
            )));
        }

        match (self.staged, mv.placement) {
            (Some(piece), Some(coord)) => {
                if !self.board.is_empty_at(coord) {
                    return Err(QuartoError::IllegalMove(format!("cell {} is occupied", coord)));
                }
                self.check_give(mv)?;
                self.board.place(coord, piece)?;
                self.staged = None;

                if self.board.has_winning_line() {
                    self.terminal = true;
                    self.outcome = Some(Outcome::Winner(self.current));
                    return Ok(());
                }
                if self.board.is_full() {
                    self.terminal = true;
                    self.outcome = Some(Outcome::Tie);
                    return Ok(());
                }
            }
            (Some(piece), None) => {
                return Err(QuartoError::IllegalMove(format!(
                    "staged piece {} must be placed",
                    piece
                )))
            }
            (None, Some(coord)) => {
                return Err(QuartoError::IllegalMove(format!(
                    "nothing staged to place at {}",
                    coord
                )))
            }
            (None, None) => self.check_give(mv)?,
        }

        if let Some(piece) = mv.give {
            self.available.retain(|&p| p != piece);
            self.staged = Some(piece);
            self.current = self.current.opponent();
        }
        Ok(())
    }

    fn check_give(&self, mv: &Move) -> Result<()> {
        match mv.give {
            Some(piece) if !self.available.contains(&piece) => Err(QuartoError::IllegalMove(
                format!("piece {} is not available to give", piece),
            )),
            None if !self.available.is_empty() => Err(QuartoError::IllegalMove(
                "a piece must be given while pieces remain".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Returns the state after a move, leaving `self` untouched
    pub fn apply_move(&self, mv: &Move) -> Result<Self> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }

    /// Result of the game from one player's perspective
    ///
    /// 1.0 for a win, 0.0 for a loss, 0.5 for a tie or an unfinished game.
    pub fn result_for(&self, player: Player) -> f64 {
        match self.outcome {
            Some(Outcome::Winner(winner)) if winner == player => 1.0,
            Some(Outcome::Winner(_)) => 0.0,
            Some(Outcome::Tie) | None => 0.5,
        }
    }

    /// The winning player, if any
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(Outcome::Winner(player)) => Some(player),
            _ => None,
        }
    }
}

/// Free-function form of [`GameState::legal_moves`]
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    state.legal_moves()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(bits: u8) -> Piece {
        Piece::from_bits(bits).unwrap()
    }

    fn cell(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_first_move_is_give_only() {
        let state = GameState::new();
        let moves = state.legal_moves();
        assert_eq!(moves.len(), 16);
        assert!(moves.iter().all(|m| m.placement.is_none() && m.give.is_some()));
    }

    #[test]
    fn test_second_move_branching() {
        let state = GameState::new()
            .apply_move(&Move::give_only(piece(0)))
            .unwrap();
        assert_eq!(state.current, Player::Two);
        assert_eq!(state.staged, Some(piece(0)));
        assert_eq!(state.legal_moves().len(), 16 * 15);
    }

    #[test]
    fn test_terminal_has_no_moves() {
        let mut state = GameState::new();
        state.play(&Move::give_only(piece(0b0001))).unwrap();
        for (col, give) in [(0, 0b0011), (1, 0b0101), (2, 0b0111)] {
            state.play(&Move::place_and_give(cell(0, col), piece(give))).unwrap();
        }
        let mover = state.current;
        state.play(&Move::place_and_give(cell(0, 3), piece(0b1000))).unwrap();
        assert!(state.terminal);
        assert_eq!(state.winner(), Some(mover));
        // The give is not carried out once the game is over
        assert!(state.available.contains(&piece(0b1000)));
        assert_eq!(state.current, mover);
        assert!(state.legal_moves().is_empty());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let state = GameState::new();
        assert!(state.apply_move(&Move::place_and_give(cell(0, 0), piece(1))).is_err());

        let state = state.apply_move(&Move::give_only(piece(1))).unwrap();
        assert!(state.apply_move(&Move::give_only(piece(2))).is_err());
        // Giving the piece that is already staged
        assert!(state.apply_move(&Move::place_and_give(cell(0, 0), piece(1))).is_err());
        assert!(state.apply_move(&Move::place_only(cell(0, 0))).is_err());

        let state = state.apply_move(&Move::place_and_give(cell(0, 0), piece(2))).unwrap();
        assert!(state.apply_move(&Move::place_and_give(cell(0, 0), piece(3))).is_err());
    }

    #[test]
    fn test_result_for() {
        let mut state = GameState::new();
        assert_eq!(state.result_for(Player::One), 0.5);
        state.terminal = true;
        state.outcome = Some(Outcome::Winner(Player::Two));
        assert_eq!(state.result_for(Player::Two), 1.0);
        assert_eq!(state.result_for(Player::One), 0.0);
    }

    #[test]
    fn test_validate_catches_broken_states() {
        let mut duplicated = GameState::new();
        duplicated.staged = Some(piece(3));
        assert!(matches!(duplicated.validate(), Err(QuartoError::InvalidState(_))));

        let mut lost = GameState::new();
        lost.available.pop();
        assert!(lost.validate().is_err());

        let mut unstaged = GameState::new();
        unstaged.available.retain(|&p| p != piece(5));
        unstaged.board.place(cell(1, 1), piece(5)).unwrap();
        assert!(unstaged.validate().is_err());

        let mut premature = GameState::new();
        premature.terminal = true;
        premature.outcome = Some(Outcome::Tie);
        assert!(premature.validate().is_err());
    }

    #[test]
    fn test_from_parts_derives_outcome() {
        let mut board = Board::new();
        let row = [0b0001, 0b0011, 0b0101, 0b0111];
        for (col, &bits) in row.iter().enumerate() {
            board.place(cell(2, col), piece(bits)).unwrap();
        }
        let available: Vec<_> = Piece::all().filter(|p| !board.contains(*p)).collect();
        let state = GameState::from_parts(board, available, None, Player::One).unwrap();
        assert!(state.terminal);
        assert_eq!(state.winner(), Some(Player::One));
    }
}
