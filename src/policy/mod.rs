//! Policies for different phases of the search
//!
//! - Selection policies: how to choose which child to descend into
//! - Simulation policies: how to play out a game from a node
//! - Move orderings: how playouts rank candidate moves before sampling

pub mod ordering;
pub mod selection;
pub mod simulation;

pub use ordering::MoveOrdering;
pub use selection::{SelectionPolicy, UCB1Policy};
pub use simulation::{Playout, PlayoutPolicy, SimulationPolicy};
