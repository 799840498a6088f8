//! Budgeted alpha-beta search.
//!
//! Explores every vacant cell depth-first on cloned games. Instead of a
//! fixed depth, each level divides the move budget by its branching factor,
//! so wide boards are searched shallower and total work stays bounded by
//! the initial budget.
//!
//! Every node scores its candidates by the mover's net score in the future
//! the child returns, so each player is assumed to play for themselves.
//! Alpha tracks the searching player's guaranteed value and beta the
//! opponents' bound on it; for more than two players this is a heuristic.

use tracing::{debug, trace};

use crate::board::{GameError, Move};
use crate::game::Game;

/// Budget used when the caller does not configure one.
pub const DEFAULT_MOVE_BUDGET: u64 = 20_000_000;

/// A game position together with the move that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eval {
    pub game: Game,
    /// `None` for the position the search started from.
    pub mv: Option<Move>,
}

impl Eval {
    /// Wraps the position to search from.
    pub fn root(game: Game) -> Self {
        Eval { game, mv: None }
    }
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The chosen child of the root, or the root itself when no search ran.
    pub best: Eval,
    /// Net score of the root mover for the chosen line.
    pub score: Option<i64>,
    pub nodes: u64,
}

impl SearchOutcome {
    /// The move to play, if the search produced one.
    pub fn best_move(&self) -> Option<Move> {
        self.best.mv
    }
}

struct Searcher {
    orig_player: u8,
    nodes: u64,
}

/// Searches for the best move of the player to move in `root`.
///
/// `orig_player` is the player the search plays for, normally
/// `root.game.current_player()`. When the budget is at most 1 or the board
/// is full the root is returned unchanged.
pub fn evaluate(root: Eval, orig_player: u8, budget: u64) -> Result<SearchOutcome, GameError> {
    let mut searcher = Searcher {
        orig_player,
        nodes: 0,
    };
    let found = searcher.search(&root, 0, i64::MIN, i64::MAX, budget)?;
    let nodes = searcher.nodes;

    let outcome = match found {
        Some((best, score)) => SearchOutcome {
            best,
            score: Some(score),
            nodes,
        },
        None => SearchOutcome {
            best: root,
            score: None,
            nodes,
        },
    };

    match outcome.best_move() {
        Some(mv) => debug!(%mv, score = ?outcome.score, nodes, "search finished"),
        None => debug!(nodes, "search returned the root position"),
    }
    Ok(outcome)
}

/// Convenience wrapper: searches `game` for its current player.
pub fn best_move(game: &Game, budget: u64) -> Result<SearchOutcome, GameError> {
    evaluate(Eval::root(game.clone()), game.current_player(), budget)
}

impl Searcher {
    /// Returns the best child of `node` with its score for the mover at
    /// `node`, or `None` when `node` is a leaf.
    fn search(
        &mut self,
        node: &Eval,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        budget: u64,
    ) -> Result<Option<(Eval, i64)>, GameError> {
        self.nodes += 1;
        if budget <= 1 {
            return Ok(None);
        }

        let game = &node.game;
        let total = game.board().vacant_count() as u64;
        if total == 0 {
            return Ok(None);
        }

        let mover = game.current_player();
        let is_me = mover == self.orig_player;
        let child_budget = budget / total;
        let mut best: Option<(Eval, i64)> = None;

        for mv in game.board().vacant_cells() {
            let mut child = Eval {
                game: game.clone(),
                mv: Some(mv),
            };
            child.game.apply(mv)?;

            let reply = self.search(&child, depth + 1, alpha, beta, child_budget)?;
            let score = match &reply {
                Some((future, _)) => future.game.net_score(mover),
                None => child.game.net_score(mover),
            };

            if depth == 0 {
                trace!(%mv, score, "root candidate");
            }

            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((child, score));
            }

            if is_me {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score.saturating_neg());
            }
            if beta <= alpha {
                break;
            }
        }

        Ok(best)
    }
}
