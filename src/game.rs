//! Game state: board, scores, and turn order.
//!
//! A `Game` owns its board and score vector outright, so `clone()` yields an
//! independent hypothetical position for the search to mutate.

use crate::board::{Board, GameError, GameMode, Move};

/// A match in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    player_count: u8,
    scores: Vec<i32>,
    board: Board,
    current_player: u8,
}

impl Game {
    /// Creates a new game with an empty board. Player 1 moves first.
    pub fn new(
        player_count: usize,
        width: usize,
        height: usize,
        mode: GameMode,
    ) -> Result<Self, GameError> {
        if player_count == 0 || player_count > u8::MAX as usize {
            return Err(GameError::InvalidPlayerCount(player_count));
        }
        Ok(Game {
            player_count: player_count as u8,
            scores: vec![0; player_count],
            board: Board::new(width, height, mode)?,
            current_player: 1,
        })
    }

    /// Rebuilds a game from its parts. Used by position notation.
    pub(crate) fn from_parts(
        board: Board,
        scores: Vec<i32>,
        current_player: u8,
    ) -> Result<Self, GameError> {
        let count = scores.len();
        if count == 0 || count > u8::MAX as usize {
            return Err(GameError::InvalidPlayerCount(count));
        }
        debug_assert!(current_player >= 1 && current_player as usize <= count);
        Ok(Game {
            player_count: count as u8,
            scores,
            board,
            current_player,
        })
    }

    pub fn player_count(&self) -> usize {
        self.player_count as usize
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player to move next, in `1..=player_count`.
    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    /// Accumulated score of `player` (1-based).
    pub fn score(&self, player: u8) -> i32 {
        self.scores[player as usize - 1]
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    /// Plays the current player's marker at `(row, col)` and returns the
    /// score it earned.
    ///
    /// The cell must be vacant; this is not checked. Use [`Game::try_play`]
    /// for untrusted input.
    pub fn play(&mut self, row: i32, col: i32) -> Result<i32, GameError> {
        let gained = self.board.new_shapes_from(self.current_player, row, col)?;
        if self.score(self.current_player).checked_add(gained).is_none() {
            return Err(GameError::ScoreOverflow);
        }
        self.play_scored(row, col, gained);
        Ok(gained)
    }

    /// Places the marker, credits `score`, and passes the turn.
    pub fn play_scored(&mut self, row: i32, col: i32, score: i32) {
        debug_assert!(
            self.board.is_vacant(row, col),
            "play on non-vacant cell ({}, {})",
            row,
            col
        );
        self.board.put(row, col, self.current_player);
        let slot = &mut self.scores[self.current_player as usize - 1];
        *slot = slot.saturating_add(score);
        self.current_player = (self.current_player % self.player_count) + 1;
    }

    /// Validates the cell, then plays it.
    pub fn try_play(&mut self, row: i32, col: i32) -> Result<i32, GameError> {
        if !self.board.is_valid(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        let owner = self.board.get(row, col);
        if owner != 0 {
            return Err(GameError::Occupied { row, col, owner });
        }
        self.play(row, col)
    }

    /// Applies a move. Same contract as [`Game::play`].
    pub fn apply(&mut self, mv: Move) -> Result<i32, GameError> {
        self.play(mv.row, mv.col)
    }

    /// True once no vacant cell remains.
    pub fn is_over(&self) -> bool {
        self.board.is_full()
    }

    /// Players holding the highest score, ascending.
    pub fn leaders(&self) -> Vec<u8> {
        let best = self.scores.iter().copied().max().unwrap_or(0);
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == best)
            .map(|(i, _)| i as u8 + 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_with_player_one() {
        let game = Game::new(3, 4, 4, GameMode::Square).unwrap();
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.player_count(), 3);
        assert_eq!(game.scores(), &[0, 0, 0]);
    }

    #[test]
    fn invalid_player_counts_rejected() {
        assert_eq!(
            Game::new(0, 3, 3, GameMode::Square),
            Err(GameError::InvalidPlayerCount(0))
        );
        assert_eq!(
            Game::new(256, 3, 3, GameMode::Square),
            Err(GameError::InvalidPlayerCount(256))
        );
    }

    #[test]
    fn play_places_marker_and_rotates_turn() {
        let mut game = Game::new(3, 3, 3, GameMode::Square).unwrap();
        for (k, (r, c)) in [(0, 0), (0, 1), (0, 2), (1, 0)].into_iter().enumerate() {
            let mover = game.current_player();
            game.play(r, c).unwrap();
            assert_eq!(game.board().get(r, c), mover);
            assert_eq!(game.current_player(), (mover % 3) + 1, "after move {}", k);
        }
        assert_eq!(game.current_player(), 2);
    }

    #[test]
    fn two_by_two_first_three_moves_score_nothing() {
        let mut game = Game::new(2, 2, 2, GameMode::Square).unwrap();
        for (r, c) in [(0, 0), (0, 1), (1, 0)] {
            assert_eq!(game.play(r, c), Ok(0));
        }
        assert_eq!(game.scores(), &[0, 0]);
    }

    #[test]
    fn completing_square_credits_mover() {
        let mut game = Game::new(1, 3, 3, GameMode::Square).unwrap();
        game.play(0, 0).unwrap();
        game.play(0, 1).unwrap();
        game.play(1, 0).unwrap();
        assert_eq!(game.play(1, 1), Ok(1));
        assert_eq!(game.score(1), 1);
    }

    #[test]
    fn play_scored_uses_given_score() {
        let mut game = Game::new(2, 3, 3, GameMode::Square).unwrap();
        game.play_scored(2, 2, 7);
        assert_eq!(game.score(1), 7);
        assert_eq!(game.score(2), 0);
        assert_eq!(game.current_player(), 2);
    }

    #[test]
    fn try_play_rejects_bad_cells() {
        let mut game = Game::new(2, 3, 3, GameMode::Square).unwrap();
        assert_eq!(game.try_play(3, 0), Err(GameError::OutOfBounds { row: 3, col: 0 }));
        assert_eq!(game.try_play(-1, 0), Err(GameError::OutOfBounds { row: -1, col: 0 }));
        game.try_play(1, 1).unwrap();
        assert_eq!(
            game.try_play(1, 1),
            Err(GameError::Occupied { row: 1, col: 1, owner: 1 })
        );
        assert_eq!(game.current_player(), 2);
    }

    #[test]
    fn play_on_unsupported_mode_leaves_state_untouched() {
        let mut game = Game::new(2, 3, 3, GameMode::Hexagon).unwrap();
        let before = game.clone();
        assert_eq!(
            game.play(1, 1),
            Err(GameError::UnsupportedMode(GameMode::Hexagon))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn clone_is_independent() {
        let original = Game::new(2, 3, 3, GameMode::Square).unwrap();
        let mut copy = original.clone();
        copy.play_scored(0, 0, 5);
        assert_eq!(original.board().get(0, 0), 0);
        assert_eq!(original.score(1), 0);
        assert_eq!(original.current_player(), 1);
        assert_eq!(copy.score(1), 5);
    }

    #[test]
    fn oversized_board_rejected_before_play() {
        assert_eq!(
            Game::new(1, 50_000, 1, GameMode::Square),
            Err(GameError::BoardTooLarge { width: 50_000, height: 1 })
        );
        assert_eq!(
            Game::new(2, usize::MAX, 1, GameMode::Triangle),
            Err(GameError::BoardTooLarge { width: usize::MAX, height: 1 })
        );
        let mut game = Game::new(1, 32_767, 1, GameMode::Square).unwrap();
        assert_eq!(game.play(0, 0), Ok(0));
    }

    #[test]
    fn score_overflow_is_an_error() {
        let mut game = Game::new(1, 3, 3, GameMode::Square).unwrap();
        game.play_scored(2, 2, i32::MAX);
        for (r, c) in [(0, 0), (0, 1), (1, 0)] {
            assert_eq!(game.play(r, c), Ok(0));
        }
        let before = game.clone();
        assert_eq!(game.play(1, 1), Err(GameError::ScoreOverflow));
        assert_eq!(game, before);
    }

    #[test]
    fn game_over_when_board_full() {
        let mut game = Game::new(2, 2, 1, GameMode::Square).unwrap();
        assert!(!game.is_over());
        game.play(0, 0).unwrap();
        game.play(0, 1).unwrap();
        assert!(game.is_over());
    }

    #[test]
    fn leaders_reports_ties() {
        let mut game = Game::new(3, 3, 3, GameMode::Square).unwrap();
        assert_eq!(game.leaders(), vec![1, 2, 3]);
        game.play_scored(0, 0, 2);
        game.play_scored(0, 1, 2);
        game.play_scored(0, 2, 1);
        assert_eq!(game.leaders(), vec![1, 2]);
    }
}
