//! squaregrab -- a square-claiming grid game engine.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! A console front end (or a person at a terminal) drives a match by
//! alternating `move` for human players and `go` for the engine.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::error;

use squaregrab::config::MatchConfig;
use squaregrab::engine::Engine;
use squaregrab::logging;
use squaregrab::protocol::parser::{parse_command, Command};

/// Runs the protocol loop until `quit` or end of input.
fn run<R: BufRead, W: Write>(engine: &mut Engine, input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::IsReady => engine.handle_isready(out)?,
            Command::NewGame(params) => engine.handle_newgame(&params, out)?,
            Command::Position { notation } => engine.handle_position(&notation, out)?,
            Command::SetOption { name, value } => engine.set_option(&name, value.as_deref()),
            Command::Move { row, col } => engine.handle_move(row, col, out)?,
            Command::Go(params) => engine.handle_go(&params, out)?,
            Command::Show => engine.handle_show(out)?,
            Command::Notation => engine.handle_notation(out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init("warn");

    let config = match std::env::args().nth(1) {
        Some(path) => match MatchConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                error!(%path, "{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => MatchConfig::default(),
    };

    let mut engine = match Engine::new(config) {
        Ok(e) => e,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if let Err(e) = run(&mut engine, stdin.lock(), &mut out) {
        error!("i/o error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
