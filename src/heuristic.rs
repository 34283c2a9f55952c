//! Single-ply heuristic player
//!
//! The heuristic looks one move ahead. It takes an immediate win when it
//! notices one, otherwise it prefers placements that leave many safe
//! pieces to hand over, and it avoids giving pieces that let the opponent
//! win at once. A [`DifficultyConfig`] adds deliberate mistakes: missed
//! wins and purely random choices.
//!
//! All randomness comes from the generator passed in, so a seeded
//! generator reproduces decisions exactly.

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

use crate::{
    board::{Board, Coord},
    config::DifficultyConfig,
    game_state::{GameState, Move, ScoredMove},
    piece::Piece,
    QuartoError, Result,
};

/// Value given to a move whose placement wins outright
pub const WIN_SCORE: f64 = 100.0;

/// Value subtracted from a move whose give hands the opponent a win
pub const DANGER_PENALTY: f64 = 50.0;

/// Chooses a full move for the player to act in `state`
///
/// On the opening move only a give is chosen. Otherwise the placement is
/// chosen first and the give is judged on the board after that placement.
/// Fails with [`QuartoError::GameOver`] on a finished game and with
/// [`QuartoError::InvalidState`] if the state breaks a consistency rule.
pub fn decide<R: Rng + ?Sized>(
    state: &GameState,
    difficulty: &DifficultyConfig,
    rng: &mut R,
) -> Result<Move> {
    difficulty.validate()?;
    state.validate()?;
    if state.terminal {
        return Err(QuartoError::GameOver);
    }

    let mv = match state.staged {
        None => Move {
            placement: None,
            give: choose_give(&state.board, &state.available, difficulty, rng)?,
        },
        Some(piece) => {
            let placement = choose_placement(&state.board, piece, &state.available, difficulty, rng)?
                .ok_or_else(|| {
                    QuartoError::InvalidState("unfinished game with no empty cell".into())
                })?;
            let mut after = state.board;
            after.place(placement, piece)?;
            Move {
                placement: Some(placement),
                give: choose_give(&after, &state.available, difficulty, rng)?,
            }
        }
    };

    debug!("heuristic chose {}", mv);
    Ok(mv)
}

/// Chooses where to put the staged piece
///
/// Returns `None` only when the board has no empty cell. Fails with
/// [`QuartoError::InvalidConfiguration`] for probabilities outside [0, 1].
pub fn choose_placement<R: Rng + ?Sized>(
    board: &Board,
    staged: Piece,
    available: &[Piece],
    difficulty: &DifficultyConfig,
    rng: &mut R,
) -> Result<Option<Coord>> {
    difficulty.validate()?;
    let cells = board.empty_cells();
    if cells.is_empty() {
        return Ok(None);
    }

    if rng.gen_bool(difficulty.p_miss_win) {
        trace!("overlooking winning placements");
    } else if let Some(&cell) = cells.iter().find(|&&cell| board.completes_line(cell, staged)) {
        trace!("taking the win at {}", cell);
        return Ok(Some(cell));
    }

    if rng.gen_bool(difficulty.p_random) {
        return Ok(cells.choose(rng).copied());
    }

    let counts: Vec<(Coord, usize)> = cells
        .iter()
        .map(|&cell| (cell, safe_piece_count(board, cell, staged, available)))
        .collect();

    let mut pool: Vec<Coord> = counts
        .iter()
        .filter(|(_, safe)| *safe >= difficulty.min_safe)
        .map(|(cell, _)| *cell)
        .collect();

    if pool.is_empty() {
        let best = counts.iter().map(|(_, safe)| *safe).max().unwrap_or(0);
        trace!(
            "no cell leaves {} safe pieces, falling back to cells leaving {}",
            difficulty.min_safe,
            best
        );
        pool = counts
            .iter()
            .filter(|(_, safe)| *safe == best)
            .map(|(cell, _)| *cell)
            .collect();
    }

    Ok(pool.choose(rng).copied())
}

/// Chooses the piece to hand the opponent
///
/// Returns `None` when no pieces remain. When every piece is dangerous,
/// any available piece may be returned. Fails like [`choose_placement`]
/// on an invalid configuration.
pub fn choose_give<R: Rng + ?Sized>(
    board: &Board,
    available: &[Piece],
    difficulty: &DifficultyConfig,
    rng: &mut R,
) -> Result<Option<Piece>> {
    difficulty.validate()?;
    if available.is_empty() {
        return Ok(None);
    }

    if rng.gen_bool(difficulty.p_random) {
        return Ok(available.choose(rng).copied());
    }

    let safe: Vec<Piece> = available
        .iter()
        .copied()
        .filter(|&piece| !board.is_dangerous(piece))
        .collect();

    if safe.is_empty() {
        trace!("every piece hands over a win");
        Ok(available.choose(rng).copied())
    } else {
        Ok(safe.choose(rng).copied())
    }
}

/// Number of `available` pieces that would be safe to give after putting
/// `staged` on `cell`
pub fn safe_piece_count(board: &Board, cell: Coord, staged: Piece, available: &[Piece]) -> usize {
    let mut after = *board;
    if after.place(cell, staged).is_err() {
        return 0;
    }
    available
        .iter()
        .filter(|&&piece| !after.is_dangerous(piece))
        .count()
}

/// Scores every legal move of `state`, best first
///
/// A winning placement scores [`WIN_SCORE`]. Other moves score the safe
/// piece count of their placement, less [`DANGER_PENALTY`] when the give
/// lets the opponent win. Opening moves score by give danger alone.
pub fn score_moves(state: &GameState) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = state
        .legal_moves()
        .into_iter()
        .map(|mv| ScoredMove {
            mv,
            value: score_move(state, &mv),
        })
        .collect();
    scored.sort_by(|a, b| b.value.total_cmp(&a.value));
    scored
}

fn score_move(state: &GameState, mv: &Move) -> f64 {
    let mut after = state.board;
    let mut value = 0.0;

    if let (Some(cell), Some(staged)) = (mv.placement, state.staged) {
        if state.board.completes_line(cell, staged) {
            return WIN_SCORE;
        }
        value = safe_piece_count(&state.board, cell, staged, &state.available) as f64;
        if after.place(cell, staged).is_err() {
            return f64::NEG_INFINITY;
        }
    }

    match mv.give {
        Some(piece) if after.is_dangerous(piece) => value - DANGER_PENALTY,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::{rngs::StdRng, SeedableRng};

    fn piece(bits: u8) -> Piece {
        Piece::from_bits(bits).unwrap()
    }

    fn cell(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    /// Row 0 holds three tall pieces, row 1 three short ones: every piece
    /// completes one of the two rows.
    fn trap_board() -> (Board, Vec<Piece>) {
        let mut board = Board::new();
        for (col, bits) in [0b0001, 0b0011, 0b0101].into_iter().enumerate() {
            board.place(cell(0, col), piece(bits)).unwrap();
        }
        for (col, bits) in [0b0000, 0b0010, 0b0100].into_iter().enumerate() {
            board.place(cell(1, col), piece(bits)).unwrap();
        }
        let available = Piece::all().filter(|p| !board.contains(*p)).collect();
        (board, available)
    }

    #[test]
    fn test_give_falls_back_when_everything_is_dangerous() {
        let (board, available) = trap_board();
        assert!(available.iter().all(|&p| board.is_dangerous(p)));

        let expert = Difficulty::Expert.config();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let give = choose_give(&board, &available, &expert, &mut rng)
                .unwrap()
                .unwrap();
            assert!(available.contains(&give));
        }
    }

    #[test]
    fn test_give_prefers_safe_pieces() {
        let mut board = Board::new();
        for (col, bits) in [0b0001, 0b0011, 0b0101].into_iter().enumerate() {
            board.place(cell(0, col), piece(bits)).unwrap();
        }
        let available: Vec<Piece> = Piece::all().filter(|p| !board.contains(*p)).collect();
        let expert = Difficulty::Expert.config();
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..20 {
            let give = choose_give(&board, &available, &expert, &mut rng)
                .unwrap()
                .unwrap();
            assert!(!board.is_dangerous(give), "{} is dangerous", give);
        }
    }

    #[test]
    fn test_give_with_empty_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = Difficulty::Easy.config();
        assert_eq!(choose_give(&Board::new(), &[], &config, &mut rng), Ok(None));
    }

    #[test]
    fn test_expert_always_takes_the_win() {
        let (board, available) = trap_board();
        let expert = Difficulty::Expert.config();
        let mut rng = StdRng::seed_from_u64(12);
        // A short piece can only win in row 1
        let placement = choose_placement(&board, piece(0b1000), &available, &expert, &mut rng);
        assert_eq!(placement, Ok(Some(cell(1, 3))));
    }

    #[test]
    fn test_certain_miss_skips_the_win() {
        let mut board = Board::new();
        for (col, bits) in [0b0001, 0b0011, 0b0101].into_iter().enumerate() {
            board.place(cell(0, col), piece(bits)).unwrap();
        }
        let available: Vec<Piece> = Piece::all()
            .filter(|p| !board.contains(*p) && *p != piece(0b0111))
            .collect();
        let blind = DifficultyConfig {
            p_random: 0.0,
            p_miss_win: 1.0,
            min_safe: 0,
        };
        let mut rng = StdRng::seed_from_u64(13);
        let mut seen_other = false;
        for _ in 0..30 {
            let placement =
                choose_placement(&board, piece(0b0111), &available, &blind, &mut rng)
                    .unwrap()
                    .unwrap();
            seen_other |= placement != cell(0, 3);
        }
        assert!(seen_other);
    }

    #[test]
    fn test_out_of_range_probabilities_are_rejected() {
        let (board, available) = trap_board();
        let broken = DifficultyConfig {
            p_random: 0.0,
            p_miss_win: 1.5,
            min_safe: 0,
        };
        let mut rng = StdRng::seed_from_u64(14);

        let placement = choose_placement(&board, piece(0b1000), &available, &broken, &mut rng);
        assert!(matches!(placement, Err(QuartoError::InvalidConfiguration(_))));

        let broken = broken.with_p_miss_win(0.0).with_p_random(-0.5);
        let give = choose_give(&board, &available, &broken, &mut rng);
        assert!(matches!(give, Err(QuartoError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_expert_meets_threshold_early() {
        let mut state = GameState::new();
        state.play(&Move::give_only(piece(0))).unwrap();
        state.play(&Move::place_and_give(cell(0, 0), piece(15))).unwrap();
        state.play(&Move::place_and_give(cell(2, 1), piece(6))).unwrap();
        assert_eq!(state.board.piece_count(), 2);

        let expert = Difficulty::Expert.config();
        let staged = state.staged.unwrap();
        let best = state
            .board
            .empty_cells()
            .into_iter()
            .map(|c| safe_piece_count(&state.board, c, staged, &state.available))
            .max()
            .unwrap();
        assert!(best >= expert.min_safe);

        let mut rng = StdRng::seed_from_u64(14);
        let mv = decide(&state, &expert, &mut rng).unwrap();
        let placement = mv.placement.unwrap();
        assert!(safe_piece_count(&state.board, placement, staged, &state.available) >= 8);
    }

    #[test]
    fn test_decisions_are_always_legal() {
        let mut rng = StdRng::seed_from_u64(15);
        for level in Difficulty::ALL {
            let config = level.config();
            for _ in 0..5 {
                let mut state = GameState::new();
                while !state.terminal {
                    let mv = decide(&state, &config, &mut rng).unwrap();
                    if let Some(cell) = mv.placement {
                        assert!(state.board.is_empty_at(cell));
                    }
                    if let Some(give) = mv.give {
                        assert!(state.available.contains(&give));
                    }
                    state.play(&mv).unwrap();
                    state.validate().unwrap();
                }
            }
        }
    }

    #[test]
    fn test_decide_rejects_finished_and_broken_states() {
        let mut rng = StdRng::seed_from_u64(16);
        let config = Difficulty::Normal.config();

        let mut broken = GameState::new();
        broken.available.clear();
        assert!(matches!(
            decide(&broken, &config, &mut rng),
            Err(QuartoError::InvalidState(_))
        ));

        let bad_config = config.with_p_random(1.5);
        assert!(matches!(
            decide(&GameState::new(), &bad_config, &mut rng),
            Err(QuartoError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_score_moves_ranks_wins_first() {
        let (board, _) = trap_board();
        let available: Vec<Piece> = Piece::all()
            .filter(|p| !board.contains(*p) && *p != piece(0b1000))
            .collect();
        let state =
            GameState::from_parts(board, available, Some(piece(0b1000)), crate::Player::Two)
                .unwrap();

        let scored = score_moves(&state);
        assert_eq!(scored.len(), state.legal_moves().len());
        assert_eq!(scored[0].value, WIN_SCORE);
        assert_eq!(scored[0].mv.placement, Some(cell(1, 3)));
        assert!(scored.windows(2).all(|w| w[0].value >= w[1].value));
    }
}
