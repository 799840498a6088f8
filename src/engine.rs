//! Engine state management.
//!
//! Holds the current game and the match configuration,
//! and runs the search for the `go` command.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::board::GameError;
use crate::config::MatchConfig;
use crate::game::Game;
use crate::protocol::notation::{encode_position, parse_position, NotationError};
use crate::protocol::parser::{GoParams, NewGameParams};
use crate::protocol::render::write_game;
use crate::search::best_move;

/// Option name controlling the search budget.
pub const MOVE_BUDGET_OPTION: &str = "MoveBudget";

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Game,
    pub config: MatchConfig,
}

impl Engine {
    /// Creates an engine with a fresh game built from `config`.
    pub fn new(config: MatchConfig) -> Result<Self, GameError> {
        let game = config.new_game()?;
        Ok(Engine { game, config })
    }

    /// Starts a new game. Unset parameters keep the current configuration.
    pub fn new_game(&mut self, params: &NewGameParams) -> Result<(), GameError> {
        let config = MatchConfig {
            players: params.players.unwrap_or(self.config.players),
            width: params.width.unwrap_or(self.config.width),
            height: params.height.unwrap_or(self.config.height),
            mode: params.mode.unwrap_or(self.config.mode),
            move_budget: self.config.move_budget,
        };
        self.game = config.new_game()?;
        self.config = config;
        info!(
            players = self.config.players,
            width = self.config.width,
            height = self.config.height,
            mode = %self.config.mode,
            "new game"
        );
        Ok(())
    }

    /// Replaces the current game with a position in notation.
    pub fn set_position(&mut self, notation: &str) -> Result<(), NotationError> {
        self.game = parse_position(notation)?;
        Ok(())
    }

    /// Sets an engine option. Only `MoveBudget` is recognized.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        if name != MOVE_BUDGET_OPTION {
            warn!(option = name, "unknown option");
            return;
        }
        match value.map(str::parse::<u64>) {
            Some(Ok(budget)) => self.config.move_budget = budget,
            _ => warn!(?value, "invalid MoveBudget value"),
        }
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `newgame`, reporting invalid settings as an `error` line.
    pub fn handle_newgame<W: Write>(&mut self, params: &NewGameParams, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.new_game(params) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles `position`, reporting parse failures as an `error` line.
    pub fn handle_position<W: Write>(&mut self, notation: &str, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.set_position(notation) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles a human move. Replies `played <row> <col> <gained>` or an
    /// `error` line if the cell cannot be played.
    pub fn handle_move<W: Write>(&mut self, row: i32, col: i32, out: &mut W) -> io::Result<()> {
        match self.game.try_play(row, col) {
            Ok(gained) => writeln!(out, "played {} {} {}", row, col, gained)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles the `go` command: searches for the player to move, plays the
    /// chosen move, and replies with `info` and `bestmove` lines.
    pub fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) -> io::Result<()> {
        let budget = params.budget.unwrap_or(self.config.move_budget);

        let outcome = match best_move(&self.game, budget) {
            Ok(o) => o,
            Err(e) => {
                writeln!(out, "error {}", e)?;
                return out.flush();
            }
        };

        let score = outcome
            .score
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        writeln!(out, "info nodes {} score {}", outcome.nodes, score)?;

        match outcome.best_move() {
            Some(mv) => {
                // The search already played this move on its copy.
                self.game = outcome.best.game;
                writeln!(out, "bestmove {}", mv)?;
            }
            None => writeln!(out, "bestmove none")?,
        }
        out.flush()
    }

    /// Handles the `show` command.
    pub fn handle_show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_game(&self.game, out)?;
        out.flush()
    }

    /// Handles the `notation` command.
    pub fn handle_notation<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match encode_position(&self.game) {
            Ok(text) => writeln!(out, "position {}", text)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameMode;

    fn engine() -> Engine {
        Engine::new(MatchConfig::default()).unwrap()
    }

    fn output_of<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn new_engine_has_default_game() {
        let engine = engine();
        assert_eq!(engine.game.player_count(), 2);
        assert_eq!(engine.game.board().grid_width(), 6);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = MatchConfig {
            width: 0,
            ..MatchConfig::default()
        };
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn new_game_overrides_and_keeps_rest() {
        let mut engine = engine();
        engine
            .new_game(&NewGameParams {
                players: Some(3),
                width: Some(4),
                ..NewGameParams::default()
            })
            .unwrap();
        assert_eq!(engine.game.player_count(), 3);
        assert_eq!(engine.game.board().width(), 4);
        assert_eq!(engine.game.board().height(), 6);
    }

    #[test]
    fn new_game_error_keeps_old_game() {
        let mut engine = engine();
        engine.game.play(0, 0).unwrap();
        let out = output_of(|w| {
            engine.handle_newgame(
                &NewGameParams {
                    players: Some(0),
                    ..NewGameParams::default()
                },
                w,
            )
        });
        assert!(out.starts_with("error "), "{}", out);
        assert_eq!(engine.game.board().get(0, 0), 1);
        assert_eq!(engine.config.players, 2);
    }

    #[test]
    fn set_option_updates_budget() {
        let mut engine = engine();
        engine.set_option("MoveBudget", Some("1234"));
        assert_eq!(engine.config.move_budget, 1234);
        engine.set_option("MoveBudget", Some("lots"));
        assert_eq!(engine.config.move_budget, 1234);
        engine.set_option("MoveBudget", None);
        assert_eq!(engine.config.move_budget, 1234);
    }

    #[test]
    fn unknown_option_changes_nothing() {
        let mut engine = engine();
        let before = engine.config.clone();
        engine.set_option("Threads", Some("8"));
        engine.set_option("movebudget", Some("5"));
        assert_eq!(engine.config, before);
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = engine();
        assert_eq!(output_of(|w| engine.handle_isready(w)).trim(), "readyok");
    }

    #[test]
    fn handle_move_plays_and_rejects() {
        let mut engine = engine();
        assert_eq!(output_of(|w| engine.handle_move(2, 3, w)), "played 2 3 0\n");
        assert_eq!(engine.game.board().get(2, 3), 1);
        let out = output_of(|w| engine.handle_move(2, 3, w));
        assert!(out.starts_with("error "), "{}", out);
        let out = output_of(|w| engine.handle_move(9, 9, w));
        assert!(out.starts_with("error "), "{}", out);
        assert_eq!(engine.game.current_player(), 2);
    }

    #[test]
    fn handle_go_plays_for_player_to_move() {
        let mut engine = engine();
        engine.set_position("sq:3x3:1:0,0/111/.../2.2").unwrap();
        let out = output_of(|w| engine.handle_go(&GoParams::default(), w));
        let best = out
            .lines()
            .find(|l| l.starts_with("bestmove "))
            .unwrap()
            .strip_prefix("bestmove ")
            .unwrap()
            .to_string();
        let mut parts = best.split(' ').map(|t| t.parse::<i32>().unwrap());
        let (r, c) = (parts.next().unwrap(), parts.next().unwrap());
        assert_eq!(engine.game.board().get(r, c), 1);
        assert_eq!(engine.game.current_player(), 2);
    }

    #[test]
    fn handle_go_finds_square() {
        let mut engine = engine();
        engine.set_position("sq:3x3:1:0,0/112/1.2/2..").unwrap();
        let out = output_of(|w| engine.handle_go(&GoParams::default(), w));
        assert!(out.contains("bestmove 1 1"), "{}", out);
        assert!(out.starts_with("info nodes "), "{}", out);
        assert_eq!(engine.game.score(1), 1);
    }

    #[test]
    fn handle_go_on_full_board() {
        let mut engine = engine();
        engine.set_position("sq:2x1:1:0,0/12").unwrap();
        let out = output_of(|w| engine.handle_go(&GoParams::default(), w));
        assert_eq!(out, "info nodes 1 score none\nbestmove none\n");
    }

    #[test]
    fn handle_go_reports_unsupported_mode() {
        let mut engine = engine();
        engine
            .new_game(&NewGameParams {
                mode: Some(GameMode::Triangle),
                width: Some(2),
                height: Some(2),
                ..NewGameParams::default()
            })
            .unwrap();
        let out = output_of(|w| engine.handle_go(&GoParams::default(), w));
        assert!(out.starts_with("error shape scoring is not implemented"), "{}", out);
    }

    #[test]
    fn handle_position_and_notation() {
        let mut engine = engine();
        let text = "sq:2x2:2:1,0/1./.2";
        assert_eq!(output_of(|w| engine.handle_position(text, w)), "");
        assert_eq!(
            output_of(|w| engine.handle_notation(w)),
            format!("position {}\n", text)
        );
        let out = output_of(|w| engine.handle_position("junk", w));
        assert!(out.starts_with("error "), "{}", out);
    }

    #[test]
    fn handle_show_renders_game() {
        let mut engine = engine();
        engine.set_position("sq:2x1:2:0,5/1.").unwrap();
        assert_eq!(
            output_of(|w| engine.handle_show(w)),
            "1 0\nscore 1 0\nscore 2 5\ntomove 2\n"
        );
    }
}
