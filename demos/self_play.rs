//! Self-play demo for the Quarto engines
//!
//! The tree search plays player one against the heuristic player on the
//! chosen difficulty. Pass a difficulty (easy, normal, hard, expert) and an
//! optional seed on the command line.

use std::env;

use quarto_ai::{
    heuristic, Difficulty, Effect, LiveGame, MoveSortStrategy, Opponent, Outcome, Player,
    SearchConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn parse_difficulty(name: &str) -> Option<Difficulty> {
    match name.to_ascii_lowercase().as_str() {
        "easy" => Some(Difficulty::Easy),
        "normal" => Some(Difficulty::Normal),
        "hard" => Some(Difficulty::Hard),
        "expert" => Some(Difficulty::Expert),
        _ => None,
    }
}

fn main() {
    // Initialize logging
    env_logger::init();

    let mut args = env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|name| parse_difficulty(&name))
        .unwrap_or(Difficulty::Hard);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);

    println!("Quarto Self-Play");
    println!("================");
    println!("MCTS (player one) vs heuristic {:?} (player two), seed {}", difficulty, seed);
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let search = Opponent::Mcts(
        SearchConfig::default()
            .with_max_iterations(2_000)
            .with_move_sort_strategy(MoveSortStrategy::Defensive),
    );
    let heuristic_player = Opponent::Heuristic(difficulty.config());

    let mut game = LiveGame::new();
    let outcome = loop {
        match game.outcome() {
            Ok(Some(outcome)) => break outcome,
            Ok(None) => {}
            Err(e) => {
                println!("Game state is corrupted: {}", e);
                return;
            }
        }

        let (name, opponent) = match game.turn() {
            Player::One => ("MCTS", &search),
            Player::Two => ("Heuristic", &heuristic_player),
        };

        // Show what the heuristic scorer thinks of the position
        if let Ok(state) = game.snapshot() {
            let ranked = heuristic::score_moves(&state);
            for scored in ranked.iter().take(3) {
                println!("  candidate {} scores {:.1}", scored.mv, scored.value);
            }
        }

        let effects = match game.play_turn(opponent, &mut rng) {
            Ok(effects) => effects,
            Err(e) => {
                println!("{} failed to move: {}", name, e);
                return;
            }
        };

        for effect in effects {
            match effect {
                Effect::Place { coord, piece } => {
                    println!("{} places {} at {}", name, piece, coord)
                }
                Effect::Give { piece, to } => println!("{} gives {} to {:?}", name, piece, to),
            }
        }
        println!("{}", game.board());
    };

    match outcome {
        Outcome::Winner(player) => {
            println!("{:?} wins!", player);
            if let Some(line) = game.winning_line() {
                let cells: Vec<String> = line.iter().map(|c| c.to_string()).collect();
                println!("Winning line: {}", cells.join(" "));
            }
        }
        Outcome::Tie => println!("The board is full. It's a tie!"),
    }
}
