//! squaregrab engine library.
//!
//! Exposes the board representation, game state, evaluation, search, and
//! protocol modules for use by integration tests and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod game;
pub mod logging;
pub mod protocol;
pub mod search;
pub mod selfplay;
