use quarto_ai::{
    board, heuristic, Attribute, Coord, Difficulty, Effect, GameState, LiveGame, Move,
    MoveSortStrategy, Opponent, Outcome, Piece, Player, QuartoError, SearchConfig,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn cell(row: usize, col: usize) -> Coord {
    Coord::new(row, col).unwrap()
}

fn tall_pieces() -> Vec<Piece> {
    Piece::all().filter(|p| p.has(Attribute::Tall)).collect()
}

/// Checks the piece-accounting and terminal invariants of a position
fn assert_invariants(state: &GameState) {
    state.validate().unwrap();
    let on_board = state.board.piece_count();
    let staged = usize::from(state.staged.is_some());
    assert_eq!(state.available.len() + on_board + staged, 16);
    assert_eq!(
        state.terminal,
        state.board.has_winning_line() || state.board.is_full()
    );
}

#[test]
fn test_four_tall_pieces_in_row_zero() {
    let tall = tall_pieces();
    let mut state = GameState::new();

    // Opening give, then place each tall piece along row 0 while giving the next
    state.play(&Move::give_only(tall[0])).unwrap();
    for col in 0..3 {
        state
            .play(&Move::place_and_give(cell(0, col), tall[col + 1]))
            .unwrap();
        assert!(!board::has_winning_line(&state.board));
        assert_invariants(&state);
    }

    let mover = state.current;
    let next = Piece::all().find(|p| state.available.contains(p)).unwrap();
    state.play(&Move::place_and_give(cell(0, 3), next)).unwrap();

    assert!(board::has_winning_line(&state.board));
    assert_eq!(
        board::winning_line(&state.board),
        Some([cell(0, 0), cell(0, 1), cell(0, 2), cell(0, 3)])
    );
    assert_eq!(state.outcome, Some(Outcome::Winner(mover)));
    assert_invariants(&state);
}

#[test]
fn test_random_legal_moves_preserve_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    for _ in 0..50 {
        let mut state = GameState::new();
        let mut turns = 0;
        while !state.terminal {
            let before = state.current;
            let mv = *state.legal_moves().choose(&mut rng).unwrap();
            state.play(&mv).unwrap();
            assert_invariants(&state);
            if !state.terminal {
                assert_eq!(state.current, before.opponent(), "turn must alternate");
            }
            turns += 1;
        }
        assert!(turns <= 17);
        assert!(state.legal_moves().is_empty());
    }
}

#[test]
fn test_heuristic_against_search() {
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    let search = Opponent::Mcts(
        SearchConfig::default()
            .with_max_iterations(150)
            .with_move_sort_strategy(MoveSortStrategy::Defensive),
    );
    let heuristic = Opponent::Heuristic(Difficulty::Hard.config());

    let mut game = LiveGame::new();
    while game.outcome().unwrap().is_none() {
        let opponent = match game.turn() {
            Player::One => &search,
            Player::Two => &heuristic,
        };
        let effects = game.play_turn(opponent, &mut rng).unwrap();
        assert!(!effects.is_empty() && effects.len() <= 2);
        assert_invariants(&game.snapshot().unwrap());
    }
    assert!(game.snapshot().unwrap().terminal);
}

#[test]
fn test_live_game_reports_effects_in_order() {
    let mut game = LiveGame::new();
    let first = Piece::from_bits(3).unwrap();
    let second = Piece::from_bits(12).unwrap();

    let effects = game.apply(&Move::give_only(first)).unwrap();
    assert_eq!(
        effects,
        vec![Effect::Give {
            piece: first,
            to: Player::Two
        }]
    );
    assert_eq!(game.selected(), Some(first));
    assert_eq!(game.turn(), Player::Two);

    let effects = game
        .apply(&Move::place_and_give(cell(2, 2), second))
        .unwrap();
    assert_eq!(
        effects,
        vec![
            Effect::Place {
                coord: cell(2, 2),
                piece: first
            },
            Effect::Give {
                piece: second,
                to: Player::One
            },
        ]
    );
    assert_eq!(game.board().get(cell(2, 2)), Some(first));
    assert_eq!(game.pool().len(), 14);
}

#[test]
fn test_live_game_rejects_illegal_moves_without_changes() {
    let mut game = LiveGame::new();
    let piece = Piece::from_bits(7).unwrap();
    game.apply(&Move::give_only(piece)).unwrap();
    let before = game.clone();

    let result = game.apply(&Move::place_and_give(cell(0, 0), piece));
    assert!(matches!(result, Err(QuartoError::IllegalMove(_))));
    assert_eq!(game, before);
}

#[test]
fn test_live_game_winning_placement_has_no_give() {
    let tall = tall_pieces();
    let mut game = LiveGame::new();
    game.apply(&Move::give_only(tall[0])).unwrap();
    for col in 0..3 {
        game.apply(&Move::place_and_give(cell(0, col), tall[col + 1]))
            .unwrap();
    }

    let winner = game.turn();
    let spare = *game.pool().first().unwrap();
    let effects = game.apply(&Move::place_and_give(cell(0, 3), spare)).unwrap();
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::Place { .. }));
    assert_eq!(game.outcome(), Ok(Some(Outcome::Winner(winner))));
    assert_eq!(game.winning_line().map(|line| line[3]), Some(cell(0, 3)));
}

#[test]
fn test_heuristic_levels_play_complete_games() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    for level in Difficulty::ALL {
        let config = level.config();
        let mut state = GameState::new();
        while !state.terminal {
            let mv = heuristic::decide(&state, &config, &mut rng).unwrap();
            state.play(&mv).unwrap();
        }
        assert_invariants(&state);
        assert_eq!(
            heuristic::decide(&state, &config, &mut rng),
            Err(QuartoError::GameOver)
        );
    }
}
