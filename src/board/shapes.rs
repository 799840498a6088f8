//! Shape scoring for a newly placed marker.
//!
//! On the square grid a marker scores every square it completes as one of
//! the four corners, axis-aligned or rotated. A square with side vector
//! `(i, j)` is worth its area `i² + j²`.

use super::error::GameError;
use super::grid::Board;
use super::mode::GameMode;

impl Board {
    /// Returns the score `player` earns by placing a marker at `(row, col)`.
    ///
    /// The marker itself need not be on the board yet; only the other three
    /// corners of each candidate square are probed.
    pub fn new_shapes_from(&self, player: u8, row: i32, col: i32) -> Result<i32, GameError> {
        match self.mode() {
            GameMode::Square => i32::try_from(self.square_shapes_from(player, row, col))
                .map_err(|_| GameError::ScoreOverflow),
            mode => Err(GameError::UnsupportedMode(mode)),
        }
    }

    fn square_shapes_from(&self, player: u8, row: i32, col: i32) -> i64 {
        let owned = |r: i32, c: i32| self.get(r, c) == player;

        let gh = self.grid_height() as i32;
        let gw = self.grid_width() as i32;
        let rlimit = row.max(gh - row);
        let climit = col.max(gw - col);
        // (i, 0) and (0, i) describe the same square; only the longer axis
        // keeps its zero offset.
        let start_i = if rlimit > climit { 1 } else { 0 };
        let start_j = if rlimit <= climit { 1 } else { 0 };

        let mut score = 0i64;
        for i in start_i..=rlimit {
            for j in start_j..=climit {
                // Side vector (i, j) rotated by 0, 90, 180 and 270 degrees.
                let s0 = owned(row + i, col + j);
                let s1 = owned(row - j, col + i);
                let s2 = owned(row - i, col - j);
                let s3 = owned(row + j, col - i);
                let area = i64::from(i).pow(2) + i64::from(j).pow(2);

                if s0 && s1 && owned(row + i - j, col + j + i) {
                    score += area;
                }
                if s1 && s2 && owned(row - j - i, col + i - j) {
                    score += area;
                }
                if s2 && s3 && owned(row - i + j, col - j - i) {
                    score += area;
                }
                if s3 && s0 && owned(row + j + i, col - i + j) {
                    score += area;
                }
            }
        }
        score
    }
}
