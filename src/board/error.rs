//! Errors raised by board and game operations.

use super::mode::GameMode;

/// Errors that can occur while building or playing a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("shape scoring is not implemented for the {0} grid")]
    UnsupportedMode(GameMode),

    #[error("player count must be between 1 and 255, got {0}")]
    InvalidPlayerCount(usize),

    #[error("board must have at least one cell, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("board {width}x{height} exceeds the supported size")]
    BoardTooLarge { width: usize, height: usize },

    #[error("score would overflow")]
    ScoreOverflow,

    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is already occupied by player {owner}")]
    Occupied { row: i32, col: i32, owner: u8 },
}
