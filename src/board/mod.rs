//! Board representation.
//!
//! Contains the grid topology, the cell grid with its occupancy queries,
//! and the shape scoring applied when a marker is placed.

pub mod error;
pub mod grid;
pub mod mode;
pub mod shapes;

pub use error::GameError;
pub use grid::{Board, Move, MAX_CELLS, MAX_EXTENT};
pub use mode::{GameMode, ALL_MODES};
