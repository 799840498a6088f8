//! Command parser.
//!
//! Parses incoming protocol lines from raw text into structured `Command`
//! variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::GameMode;

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// Overrides the configured move budget for this search only.
    pub budget: Option<u64>,
}

/// Settings for `newgame`; unset fields fall back to the engine config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGameParams {
    pub players: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub mode: Option<GameMode>,
}

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Start a new game: `newgame [players] [width] [height] [mode]`.
    NewGame(NewGameParams),

    /// Set the position from notation.
    Position { notation: String },

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Play a human move for the player to move.
    Move { row: i32, col: i32 },

    /// Search and play the engine's move.
    Go(GoParams),

    /// Print the board, scores and player to move.
    Show,

    /// Print the current position in notation.
    Notation,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "show" => Some(Command::Show),
        "notation" => Some(Command::Notation),

        "newgame" => parse_newgame(&tokens),
        "position" => parse_position(&tokens),
        "setoption" => parse_setoption(&tokens),
        "move" => parse_move(&tokens),
        "go" => parse_go(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `newgame [players] [width] [height] [mode]`.
fn parse_newgame(tokens: &[&str]) -> Option<Command> {
    let mut params = NewGameParams::default();
    let mut numbers = Vec::new();

    for &tok in &tokens[1..] {
        if let Ok(n) = tok.parse::<usize>() {
            numbers.push(n);
        } else if let Some(mode) = GameMode::from_name(tok) {
            params.mode = Some(mode);
        } else {
            warn!(token = tok, "malformed newgame: expected numbers or a mode name");
            return None;
        }
    }

    if numbers.len() > 3 {
        warn!("malformed newgame: expected 'newgame [players] [width] [height] [mode]'");
        return None;
    }
    let mut it = numbers.into_iter();
    params.players = it.next();
    params.width = it.next();
    params.height = it.next();

    Some(Command::NewGame(params))
}

/// Parses `position <notation>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed position: expected 'position <notation>'");
        return None;
    }
    Some(Command::Position {
        notation: tokens[1].to_string(),
    })
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `move <row> <col>`.
fn parse_move(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed move: expected 'move <row> <col>'");
        return None;
    }
    match (tokens[1].parse::<i32>(), tokens[2].parse::<i32>()) {
        (Ok(row), Ok(col)) => Some(Command::Move { row, col }),
        _ => {
            warn!(row = tokens[1], col = tokens[2], "invalid move coordinates");
            None
        }
    }
}

/// Parses `go [budget <n>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "budget" => {
                i += 1;
                if i < tokens.len() {
                    match tokens[i].parse::<u64>() {
                        Ok(v) => params.budget = Some(v),
                        Err(_) => warn!(value = tokens[i], "invalid budget value"),
                    }
                }
            }
            other => warn!(parameter = other, "unknown go parameter"),
        }
        i += 1;
    }

    Some(Command::Go(params))
}
