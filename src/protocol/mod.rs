//! Text protocol handling.
//!
//! Implements the line-oriented command protocol spoken by the engine
//! binary, the one-line position notation, and console rendering.

pub mod notation;
pub mod parser;
pub mod render;

pub use notation::{encode_position, parse_position, NotationError};
pub use parser::{parse_command, Command, GoParams, NewGameParams};
pub use render::{format_board, write_game};
