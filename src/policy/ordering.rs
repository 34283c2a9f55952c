//! Move orderings used to bias playouts
//!
//! An ordering sorts the legal moves of a state from most to least
//! promising. Playouts then sample among the first few, so an ordering
//! only shifts which moves get tried more often. Every ordering shuffles
//! first and sorts stably afterwards, so equally ranked moves stay in
//! random order.

use std::fmt::Debug;

use rand::{seq::SliceRandom, RngCore};

use crate::{
    board::{Coord, SIZE},
    config::MoveSortStrategy,
    game_state::{GameState, Move},
};

/// Trait for strategies that rank playout moves
pub trait MoveOrdering: Debug + Send + Sync {
    /// Reorders `moves` so better candidates come first
    fn order(&self, state: &GameState, moves: &mut [Move], rng: &mut dyn RngCore);
}

/// Uniform shuffle
#[derive(Debug, Clone, Default)]
pub struct RandomOrdering;

impl MoveOrdering for RandomOrdering {
    fn order(&self, _state: &GameState, moves: &mut [Move], rng: &mut dyn RngCore) {
        moves.shuffle(rng);
    }
}

/// Placements by ascending Manhattan distance from the board centre
#[derive(Debug, Clone, Default)]
pub struct CenterFirstOrdering;

impl MoveOrdering for CenterFirstOrdering {
    fn order(&self, _state: &GameState, moves: &mut [Move], rng: &mut dyn RngCore) {
        moves.shuffle(rng);
        moves.sort_by_key(|mv| mv.placement.map_or(0, Coord::centre_distance));
    }
}

/// Corners first, then edge cells, then the four centre cells
#[derive(Debug, Clone, Default)]
pub struct CornerFirstOrdering;

fn corner_rank(coord: Coord) -> u8 {
    if coord.is_corner() {
        0
    } else if coord.is_edge() {
        1
    } else {
        2
    }
}

impl MoveOrdering for CornerFirstOrdering {
    fn order(&self, _state: &GameState, moves: &mut [Move], rng: &mut dyn RngCore) {
        moves.shuffle(rng);
        moves.sort_by_key(|mv| mv.placement.map_or(0, corner_rank));
    }
}

/// Safe gives first, gives that hand over an immediate win last
///
/// Danger is judged on the board as it stands after the move's own
/// placement.
#[derive(Debug, Clone, Default)]
pub struct DefensiveOrdering;

const NO_PLACEMENT: usize = SIZE * SIZE;

impl DefensiveOrdering {
    /// Bitmask over piece indices of the available pieces that are
    /// dangerous once `placement` has been played
    fn danger_mask(state: &GameState, placement: Option<Coord>) -> u16 {
        let mut board = state.board;
        if let (Some(coord), Some(piece)) = (placement, state.staged) {
            if board.place(coord, piece).is_err() {
                return 0;
            }
        }
        state
            .available
            .iter()
            .filter(|&&piece| board.is_dangerous(piece))
            .fold(0, |mask, piece| mask | 1 << piece.index())
    }
}

impl MoveOrdering for DefensiveOrdering {
    fn order(&self, state: &GameState, moves: &mut [Move], rng: &mut dyn RngCore) {
        let mut masks: [Option<u16>; NO_PLACEMENT + 1] = [None; NO_PLACEMENT + 1];
        let mut is_dangerous = |mv: &Move| -> bool {
            let Some(give) = mv.give else {
                return false;
            };
            let slot = mv
                .placement
                .map_or(NO_PLACEMENT, |c| c.row * SIZE + c.col);
            let mask = *masks[slot].get_or_insert_with(|| Self::danger_mask(state, mv.placement));
            mask & (1 << give.index()) != 0
        };

        moves.shuffle(rng);
        let mut keyed: Vec<(bool, Move)> = moves.iter().map(|mv| (is_dangerous(mv), *mv)).collect();
        keyed.sort_by_key(|(dangerous, _)| *dangerous);
        for (slot, (_, mv)) in moves.iter_mut().zip(keyed) {
            *slot = mv;
        }
    }
}

impl MoveSortStrategy {
    /// Builds the ordering implementing this strategy
    pub fn ordering(self) -> Box<dyn MoveOrdering> {
        match self {
            MoveSortStrategy::Random => Box::new(RandomOrdering),
            MoveSortStrategy::CenterFirst => Box::new(CenterFirstOrdering),
            MoveSortStrategy::CornerFirst => Box::new(CornerFirstOrdering),
            MoveSortStrategy::Defensive => Box::new(DefensiveOrdering),
        }
    }
}
