//! Search and planning.
//!
//! Chooses moves with a depth-first alpha-beta search whose depth is
//! governed by a move budget rather than a fixed ply count.

pub mod alphabeta;

pub use alphabeta::{best_move, evaluate, Eval, SearchOutcome, DEFAULT_MOVE_BUDGET};
