//! Text rendering of a game for the console.

use std::io::{self, Write};

use crate::game::Game;

/// Formats the board as rows of space-separated occupant codes.
pub fn format_board(game: &Game) -> String {
    let board = game.board();
    let mut out = String::new();
    for r in 0..board.grid_height() as i32 {
        let row: Vec<String> = (0..board.grid_width() as i32)
            .map(|c| board.get(r, c).to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Writes the board, every player's score, and the player to move.
pub fn write_game<W: Write>(game: &Game, out: &mut W) -> io::Result<()> {
    write!(out, "{}", format_board(game))?;
    for player in 1..=game.player_count() as u8 {
        writeln!(out, "score {} {}", player, game.score(player))?;
    }
    writeln!(out, "tomove {}", game.current_player())
}
