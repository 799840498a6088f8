//! Self-play match generation.
//!
//! Plays full matches where the engine moves for every player, optionally
//! opening with a few random plies so repeated matches differ. Records each
//! move and the final scores, and writes them as JSONL.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::board::{GameError, Move};
use crate::config::MatchConfig;
use crate::game::Game;
use crate::search::best_move;

/// Errors that can stop a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for self-play match generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of matches to play.
    pub num_games: usize,
    /// Board, players and search budget for every match.
    pub match_config: MatchConfig,
    /// Number of opening plies chosen uniformly at random.
    pub random_plies: usize,
    /// Number of parallel threads for concurrent matches.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-match progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            match_config: MatchConfig {
                move_budget: 100_000,
                ..MatchConfig::default()
            },
            random_plies: 2,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// One move of a recorded match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: u8,
    pub row: i32,
    pub col: i32,
    /// Score earned by this move.
    pub gained: i32,
    /// True if the move was a random opening ply.
    pub random: bool,
}

/// A complete self-play match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub match_id: usize,
    pub players: usize,
    pub width: usize,
    pub height: usize,
    pub moves: Vec<MoveRecord>,
    /// Final score per player, index 0 = player 1.
    pub scores: Vec<i32>,
    /// Players sharing the top score.
    pub winners: Vec<u8>,
}

fn make_rng(seed: u64, offset: u64) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(offset))
    } else {
        SmallRng::from_entropy()
    }
}

fn random_vacant(game: &Game, rng: &mut SmallRng) -> Option<Move> {
    let cells: Vec<Move> = game.board().vacant_cells().collect();
    if cells.is_empty() {
        return None;
    }
    Some(cells[rng.gen_range(0..cells.len())])
}

/// Plays a single match to a full board.
pub fn play_match(
    config: &SelfPlayConfig,
    match_id: usize,
    rng: &mut SmallRng,
) -> Result<MatchRecord, GameError> {
    let mc = &config.match_config;
    let mut game = mc.new_game()?;
    let mut moves = Vec::new();

    while !game.is_over() {
        let mut random = moves.len() < config.random_plies;
        let chosen = if random {
            random_vacant(&game, rng)
        } else {
            match best_move(&game, mc.move_budget)?.best_move() {
                Some(mv) => Some(mv),
                // Budget too small to search: fall back to a random cell.
                None => {
                    random = true;
                    random_vacant(&game, rng)
                }
            }
        };
        let Some(mv) = chosen else { break };

        let player = game.current_player();
        let gained = game.apply(mv)?;
        moves.push(MoveRecord {
            player,
            row: mv.row,
            col: mv.col,
            gained,
            random,
        });
    }

    Ok(MatchRecord {
        match_id,
        players: game.player_count(),
        width: mc.width,
        height: mc.height,
        moves,
        scores: game.scores().to_vec(),
        winners: game.leaders(),
    })
}

fn winners_label(record: &MatchRecord) -> String {
    let names: Vec<String> = record.winners.iter().map(|p| p.to_string()).collect();
    if names.len() == 1 {
        format!("player {} wins", names[0])
    } else {
        format!("tie between players {}", names.join(", "))
    }
}

/// Runs self-play generation, producing all match records.
///
/// When `config.threads > 1`, matches are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<MatchRecord>, SelfPlayError> {
    let mut records = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |record| records.push(record))?;
    records.sort_by_key(|r| r.match_id);
    Ok(records)
}

/// Runs self-play generation, calling `on_match` with each completed record.
///
/// Records may arrive out of order when running in parallel.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_match: F) -> Result<(), SelfPlayError>
where
    F: FnMut(MatchRecord) + Send,
{
    // Fail before spawning anything if the settings cannot be played.
    let mode = config.match_config.mode;
    if !mode.is_implemented() {
        return Err(GameError::UnsupportedMode(mode).into());
    }
    config.match_config.new_game()?;

    if config.threads > 1 {
        run_self_play_parallel(config, on_match)
    } else {
        run_self_play_sequential(config, on_match)
    }
}

/// Sequential self-play: plays matches one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_match: F) -> Result<(), SelfPlayError>
where
    F: FnMut(MatchRecord),
{
    let mut rng = make_rng(config.seed, 0);

    for i in 0..config.num_games {
        let start = Instant::now();
        let record = play_match(config, i, &mut rng)?;
        if !config.quiet {
            info!(
                "Match {}/{}: {} ({:.1}s)",
                i + 1,
                config.num_games,
                winners_label(&record),
                start.elapsed().as_secs_f64()
            );
        }
        on_match(record);
    }
    Ok(())
}

/// Parallel self-play: plays matches concurrently using rayon.
/// Completed records travel over a channel to the callback on this thread.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_match: F) -> Result<(), SelfPlayError>
where
    F: FnMut(MatchRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<MatchRecord, GameError>>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let mut first_error = None;
    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let mut rng = make_rng(config.seed, i as u64);
                        let start = Instant::now();
                        let result = play_match(config, i, &mut rng);
                        if let (Ok(record), false) = (&result, config.quiet) {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            info!(
                                "Match {}/{}: {} ({:.1}s)",
                                n,
                                config.num_games,
                                winners_label(record),
                                start.elapsed().as_secs_f64()
                            );
                        }
                        let _ = tx.send(result);
                    });
            });
        });

        for result in rx {
            match result {
                Ok(record) => on_match(record),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
    });

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Writes match records as JSONL (one JSON object per match, one per line).
pub fn write_jsonl<W: Write>(records: &[MatchRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Logs aggregate results over a set of matches.
pub fn log_summary(records: &[MatchRecord]) {
    let total = records.len();
    if total == 0 {
        return;
    }
    let players = records[0].players;
    let mut wins = vec![0usize; players];
    let mut ties = 0usize;
    let mut total_points = 0i64;

    for record in records {
        if record.winners.len() == 1 {
            wins[record.winners[0] as usize - 1] += 1;
        } else {
            ties += 1;
        }
        total_points += record.scores.iter().map(|&s| s as i64).sum::<i64>();
    }

    info!("=== Self-Play Summary ===");
    info!("Matches: {}", total);
    info!("Ties: {}", ties);
    info!(
        "Average points per match: {:.1}",
        total_points as f64 / total as f64
    );
    for (i, w) in wins.iter().enumerate() {
        info!(
            "  player {}: {} wins ({:.1}%)",
            i + 1,
            w,
            *w as f64 / total as f64 * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameMode;

    fn small_config() -> SelfPlayConfig {
        SelfPlayConfig {
            num_games: 3,
            match_config: MatchConfig {
                players: 2,
                width: 3,
                height: 3,
                mode: GameMode::Square,
                move_budget: 2_000,
            },
            random_plies: 2,
            threads: 1,
            seed: 42,
            quiet: true,
        }
    }

    #[test]
    fn play_single_match_fills_board() {
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let record = play_match(&config, 0, &mut rng).unwrap();
        assert_eq!(record.moves.len(), 9);
        assert_eq!(record.scores.len(), 2);
        assert!(!record.winners.is_empty());
        assert!(record.moves[0].random && record.moves[1].random);
        assert!(!record.moves[2].random);
    }

    #[test]
    fn moves_alternate_and_scores_add_up() {
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(9);
        let record = play_match(&config, 0, &mut rng).unwrap();
        for (k, mv) in record.moves.iter().enumerate() {
            assert_eq!(mv.player as usize, k % 2 + 1);
        }
        for p in 1..=2u8 {
            let gained: i32 = record
                .moves
                .iter()
                .filter(|m| m.player == p)
                .map(|m| m.gained)
                .sum();
            assert_eq!(gained, record.scores[p as usize - 1]);
        }
    }

    #[test]
    fn tiny_budget_falls_back_to_random() {
        let mut config = small_config();
        config.match_config.move_budget = 1;
        config.random_plies = 0;
        let mut rng = SmallRng::seed_from_u64(3);
        let record = play_match(&config, 0, &mut rng).unwrap();
        assert_eq!(record.moves.len(), 9);
        assert!(record.moves.iter().all(|m| m.random));
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let records = run_self_play(&small_config()).unwrap();
        assert_eq!(records.len(), 3);
        let ids: Vec<usize> = records.iter().map(|r| r.match_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn parallel_run_produces_correct_count() {
        let mut config = small_config();
        config.num_games = 4;
        config.threads = 2;
        let records = run_self_play(&config).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.moves.len() == 9));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = run_self_play(&small_config()).unwrap();
        let b = run_self_play(&small_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unsupported_mode_fails_upfront() {
        let mut config = small_config();
        config.match_config.mode = GameMode::Hexagon;
        let err = run_self_play(&config).unwrap_err();
        assert!(matches!(
            err,
            SelfPlayError::Game(GameError::UnsupportedMode(GameMode::Hexagon))
        ));
    }

    #[test]
    fn jsonl_output_is_valid() {
        let records = run_self_play(&small_config()).unwrap();
        let mut buf = Vec::new();
        write_jsonl(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["players"], 2);
            assert_eq!(value["moves"].as_array().unwrap().len(), 9);
            assert!(value["winners"].is_array());
        }
    }

    #[test]
    fn config_file_keeps_selfplay_budget() {
        let defaults = SelfPlayConfig::default().match_config;
        let mc = defaults.overlay_json_str(r#"{"players": 3}"#).unwrap();
        assert_eq!(mc.players, 3);
        assert_eq!(mc.move_budget, 100_000);
    }

    #[test]
    fn winners_label_formats() {
        let mut record = run_self_play(&small_config()).unwrap().remove(0);
        record.winners = vec![2];
        assert_eq!(winners_label(&record), "player 2 wins");
        record.winners = vec![1, 2];
        assert_eq!(winners_label(&record), "tie between players 1, 2");
    }
}
