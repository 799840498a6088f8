//! Position evaluation.
//!
//! Scores a position from one player's perspective as a zero-sum relative
//! advantage, so the same numeric scale works for any player count.

use crate::game::Game;

impl Game {
    /// Net score of `player`: own score times player count, minus the sum
    /// of all scores.
    ///
    /// Positive when the player is above the mean, negative below it. The
    /// net scores of all players always sum to zero.
    ///
    /// Computed in `i64` so extreme scores cannot overflow.
    pub fn net_score(&self, player: u8) -> i64 {
        let total: i64 = self.scores().iter().map(|&s| i64::from(s)).sum();
        i64::from(self.score(player)) * self.player_count() as i64 - total
    }
}

/// Net score for every player, index 0 = player 1.
pub fn net_scores(game: &Game) -> Vec<i64> {
    (1..=game.player_count() as u8)
        .map(|p| game.net_score(p))
        .collect()
}
