//! Position notation.
//!
//! A one-line text encoding of a full game position, used by the
//! `position` command and by tests to set up boards.
//!
//! Format: `<mode>:<width>x<height>:<to_move>:<scores>/<row>/<row>/...`
//!
//! - `mode` is `sq`, `tri`, `rho` or `hex`.
//! - `scores` is a comma-separated list, one per player; its length is the
//!   player count (at most 9).
//! - Each row covers the full storage width: `.` is vacant, `1`-`9` is a
//!   player's marker. There are `grid_height` rows.
//!
//! Example: `sq:3x2:2:0,1/1.2/.1.`

use crate::board::{Board, GameError, GameMode};
use crate::game::Game;

/// Highest player count the one-digit cell encoding can express.
pub const MAX_NOTATION_PLAYERS: usize = 9;

/// Errors that can occur during position parsing or encoding.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected 4 header fields separated by ':', got {0}")]
    WrongHeaderFieldCount(usize),

    #[error("unknown mode: '{0}'")]
    UnknownMode(String),

    #[error("invalid dimensions: '{0}'")]
    InvalidDimensions(String),

    #[error("invalid player to move: '{0}'")]
    InvalidToMove(String),

    #[error("invalid score: '{0}'")]
    InvalidScore(String),

    #[error("notation supports at most 9 players, got {0}")]
    TooManyPlayers(usize),

    #[error("expected {expected} rows, got {got}")]
    WrongRowCount { expected: usize, got: usize },

    #[error("row {row} has {got} cells, expected {expected}")]
    WrongRowLength {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid cell character: '{0}'")]
    InvalidCell(char),

    #[error("marker of player {player} but only {players} players")]
    MarkerOutOfRange { player: u8, players: usize },

    #[error("marker at ({row}, {col}) is outside the playable area")]
    MarkerOffBoard { row: i32, col: i32 },

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Parses `<width>x<height>`.
fn parse_dimensions(s: &str) -> Result<(usize, usize), NotationError> {
    let invalid = || NotationError::InvalidDimensions(s.to_string());
    let (w, h) = s.split_once('x').ok_or_else(invalid)?;
    let width = w.parse().map_err(|_| invalid())?;
    let height = h.parse().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Parses the comma-separated score list.
fn parse_scores(s: &str) -> Result<Vec<i32>, NotationError> {
    let scores = s
        .split(',')
        .map(|t| {
            t.parse::<i32>()
                .map_err(|_| NotationError::InvalidScore(t.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if scores.len() > MAX_NOTATION_PLAYERS {
        return Err(NotationError::TooManyPlayers(scores.len()));
    }
    Ok(scores)
}

/// Parses a single cell character.
fn parse_cell(c: char, players: usize) -> Result<u8, NotationError> {
    match c {
        '.' => Ok(0),
        '1'..='9' => {
            let player = c as u8 - b'0';
            if player as usize > players {
                return Err(NotationError::MarkerOutOfRange { player, players });
            }
            Ok(player)
        }
        other => Err(NotationError::InvalidCell(other)),
    }
}

/// Parses a position string into a `Game`.
pub fn parse_position(s: &str) -> Result<Game, NotationError> {
    let s = s.trim();
    let mut sections = s.split('/');
    let header = sections.next().unwrap_or("");
    let rows: Vec<&str> = sections.collect();

    let fields: Vec<&str> = header.split(':').collect();
    if fields.len() != 4 {
        return Err(NotationError::WrongHeaderFieldCount(fields.len()));
    }

    let mode = GameMode::from_name(fields[0])
        .ok_or_else(|| NotationError::UnknownMode(fields[0].to_string()))?;
    let (width, height) = parse_dimensions(fields[1])?;
    let scores = parse_scores(fields[3])?;
    let players = scores.len();

    let to_move: u8 = fields[2]
        .parse()
        .ok()
        .filter(|&p: &u8| p >= 1 && p as usize <= players)
        .ok_or_else(|| NotationError::InvalidToMove(fields[2].to_string()))?;

    let mut board = Board::new(width, height, mode)?;
    if rows.len() != board.grid_height() {
        return Err(NotationError::WrongRowCount {
            expected: board.grid_height(),
            got: rows.len(),
        });
    }

    for (r, row) in rows.iter().enumerate() {
        let got = row.chars().count();
        if got != board.grid_width() {
            return Err(NotationError::WrongRowLength {
                row: r,
                expected: board.grid_width(),
                got,
            });
        }
        for (c, ch) in row.chars().enumerate() {
            let player = parse_cell(ch, players)?;
            if player != 0 {
                let (row, col) = (r as i32, c as i32);
                if !board.is_valid(row, col) {
                    return Err(NotationError::MarkerOffBoard { row, col });
                }
                board.put(row, col, player);
            }
        }
    }

    Ok(Game::from_parts(board, scores, to_move)?)
}

/// Encodes a game as a position string.
pub fn encode_position(game: &Game) -> Result<String, NotationError> {
    if game.player_count() > MAX_NOTATION_PLAYERS {
        return Err(NotationError::TooManyPlayers(game.player_count()));
    }
    let board = game.board();
    let scores: Vec<String> = game.scores().iter().map(|s| s.to_string()).collect();

    let mut out = format!(
        "{}:{}x{}:{}:{}",
        board.mode().short_name(),
        board.width(),
        board.height(),
        game.current_player(),
        scores.join(",")
    );

    for r in 0..board.grid_height() as i32 {
        out.push('/');
        for c in 0..board.grid_width() as i32 {
            out.push(match board.get(r, c) {
                0 => '.',
                p => (b'0' + p) as char,
            });
        }
    }

    Ok(out)
}
