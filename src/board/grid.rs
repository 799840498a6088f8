//! Cell grid and occupancy.
//!
//! Holds the markers placed on a board. Cells are stored row-major in a
//! single `Vec<u8>`; 0 is vacant and `p` is a marker of player `p`.

use std::fmt;

use super::error::GameError;
use super::mode::GameMode;

/// A cell coordinate chosen as a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: i32,
    pub col: i32,
}

impl Move {
    pub const fn new(row: i32, col: i32) -> Self {
        Move { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Largest logical width or height. Keeps coordinates, `i32` casts and
/// square areas `i² + j²` in range.
pub const MAX_EXTENT: usize = 32_767;

/// Largest number of stored cells on one board.
pub const MAX_CELLS: usize = 1 << 24;

/// A rectangular cell grid for one topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    mode: GameMode,
    width: usize,
    height: usize,
    grid_width: usize,
    grid_height: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Creates an empty board with the given logical dimensions.
    pub fn new(width: usize, height: usize, mode: GameMode) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::EmptyBoard { width, height });
        }
        if width > MAX_EXTENT || height > MAX_EXTENT {
            return Err(GameError::BoardTooLarge { width, height });
        }
        let grid_width = mode.actual(width);
        let grid_height = mode.actual(height);
        match grid_width.checked_mul(grid_height) {
            Some(n) if n <= MAX_CELLS => {}
            _ => return Err(GameError::BoardTooLarge { width, height }),
        }
        Ok(Board {
            mode,
            width,
            height,
            grid_width,
            grid_height,
            cells: vec![0; grid_width * grid_height],
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Logical width as requested at construction.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height as requested at construction.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Storage width after the topology transform.
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Storage height after the topology transform.
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Row-major index for an in-range coordinate.
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (r, c) = (row as usize, col as usize);
        if r >= self.grid_height || c >= self.grid_width {
            return None;
        }
        Some(r * self.grid_width + c)
    }

    /// Returns true if `(row, col)` is a playable cell of this topology.
    ///
    /// Non-square topologies mask the storage rectangle down to a diamond.
    pub fn is_valid(&self, row: i32, col: i32) -> bool {
        if self.index(row, col).is_none() {
            return false;
        }
        if self.mode == GameMode::Square {
            return true;
        }
        let height = self.height as i32;
        if row <= height {
            col < self.grid_width as i32 - (height - row - 1)
        } else {
            col >= row - height - 1
        }
    }

    /// Returns true if the cell is playable and holds no marker.
    pub fn is_vacant(&self, row: i32, col: i32) -> bool {
        self.is_valid(row, col) && self.get(row, col) == 0
    }

    /// Returns the occupant of a cell, or 0 when the coordinate is off the grid.
    pub fn get(&self, row: i32, col: i32) -> u8 {
        match self.index(row, col) {
            Some(idx) => self.cells[idx],
            None => 0,
        }
    }

    /// Writes a marker. The coordinate must be on the grid.
    pub fn put(&mut self, row: i32, col: i32, player: u8) {
        let idx = self
            .index(row, col)
            .unwrap_or_else(|| panic!("put outside the grid at ({}, {})", row, col));
        self.cells[idx] = player;
    }

    /// Iterates over playable vacant cells in row-major order.
    pub fn vacant_cells(&self) -> impl Iterator<Item = Move> + '_ {
        let (h, w) = (self.grid_height as i32, self.grid_width as i32);
        (0..h)
            .flat_map(move |row| (0..w).map(move |col| Move::new(row, col)))
            .filter(|m| self.is_vacant(m.row, m.col))
    }

    /// Number of playable vacant cells.
    pub fn vacant_count(&self) -> usize {
        self.vacant_cells().count()
    }

    pub fn is_full(&self) -> bool {
        self.vacant_cells().next().is_none()
    }

    /// Raw row-major cell storage.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
