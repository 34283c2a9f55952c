//! Utility functions for the search
//!
//! Small numeric helpers shared by the selection policy and the tree.

/// Calculates the exploitation term for UCT
///
/// This is simply the average result of a node.
pub fn exploitation_term(wins: f64, visits: u64) -> f64 {
    win_rate(wins, visits)
}

/// Calculates the exploration term for UCT
///
/// An unvisited child gets an infinite term so it is always tried first.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCT score `wins/visits + C * sqrt(ln(parent_visits) / visits)`
pub fn ucb1_value(wins: f64, visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploitation_term(wins, visits) + exploration_term(parent_visits, visits, exploration_constant)
}

/// Safely calculates the win rate from accumulated results and visits
///
/// Returns 0.0 if no visits have occurred.
pub fn win_rate(wins: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins / visits as f64
}
