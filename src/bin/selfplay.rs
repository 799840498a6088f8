//! Self-play match generation CLI.
//!
//! Lets the engine play every side of a match and outputs the records as
//! JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N         Number of matches to play (default: 10)
//!   --config FILE     Match settings as JSON (players, width, height, mode, move_budget);
//!                     individual flags override it wherever they appear
//!   --players N       Number of players (default: 2)
//!   --width N         Board width (default: 6)
//!   --height N        Board height (default: 6)
//!   --budget N        Search move budget (default: 100000)
//!   --random-plies N  Random opening plies per match (default: 2)
//!   --threads N       Number of parallel threads (default: 4)
//!   --seed N          Random seed, 0 for entropy (default: 0)
//!   --output FILE     Output file path (default: stdout)
//!   --quiet           Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use tracing::{error, info};

use squaregrab::logging;
use squaregrab::selfplay::{self, SelfPlayConfig};

/// Parses the value following a flag, or reports it and returns `None`.
fn value_of<T: FromStr>(args: &[String], i: usize, flag: &str) -> Option<T> {
    let parsed = args.get(i).and_then(|v| v.parse().ok());
    if parsed.is_none() {
        error!("invalid or missing value for {}", flag);
    }
    parsed
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;
    let quiet = args.iter().any(|a| a == "--quiet");

    logging::init(if quiet { "warn" } else { "info" });

    if let Some(pos) = args.iter().position(|a| a == "--config") {
        let Some(path) = args.get(pos + 1) else {
            error!("missing value for --config");
            print_usage();
            return ExitCode::FAILURE;
        };
        match config.match_config.overlay_file(path) {
            Ok(mc) => config.match_config = mc,
            Err(e) => {
                error!(%path, "{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let ok = match flag {
            "--games" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.num_games = v)
            }
            "--config" => {
                // Already applied above.
                i += 1;
                Some(())
            }
            "--players" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.match_config.players = v)
            }
            "--width" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.match_config.width = v)
            }
            "--height" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.match_config.height = v)
            }
            "--budget" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.match_config.move_budget = v)
            }
            "--random-plies" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.random_plies = v)
            }
            "--threads" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.threads = v)
            }
            "--seed" => {
                i += 1;
                value_of(&args, i, flag).map(|v| config.seed = v)
            }
            "--output" => {
                i += 1;
                args.get(i).map(|p| output_path = Some(p.clone()))
            }
            "--quiet" => Some(()),
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                error!("unknown argument: {}", other);
                None
            }
        };
        if ok.is_none() {
            print_usage();
            return ExitCode::FAILURE;
        }
        i += 1;
    }

    config.quiet = quiet;
    let mc = &config.match_config;
    info!(
        "Self-play: {} matches, {} players on {}x{} {}, budget {}, {} random plies, {} threads",
        config.num_games,
        mc.players,
        mc.width,
        mc.height,
        mc.mode,
        mc.move_budget,
        config.random_plies,
        config.threads
    );

    let start = Instant::now();
    let records = match selfplay::run_self_play(&config) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Completed {} matches in {:.1}s",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    if !quiet {
        selfplay::log_summary(&records);
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .and_then(|f| selfplay::write_jsonl(&records, &mut BufWriter::new(f))),
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&records, &mut BufWriter::new(stdout.lock()))
        }
    };
    if let Err(e) = written {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = output_path {
        info!("Wrote {} matches to {}", records.len(), path);
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N         Number of matches to play (default: 10)");
    eprintln!("  --config FILE     Match settings as JSON");
    eprintln!("  --players N       Number of players (default: 2)");
    eprintln!("  --width N         Board width (default: 6)");
    eprintln!("  --height N        Board height (default: 6)");
    eprintln!("  --budget N        Search move budget (default: 100000)");
    eprintln!("  --random-plies N  Random opening plies per match (default: 2)");
    eprintln!("  --threads N       Number of parallel threads (default: 4)");
    eprintln!("  --seed N          Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE     Output file path (default: stdout)");
    eprintln!("  --quiet           Suppress progress and summary output");
    eprintln!("  --help            Show this help");
}
