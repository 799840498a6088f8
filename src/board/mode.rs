//! Grid topologies.
//!
//! Only the square grid has scoring rules. The other topologies are
//! accepted as configuration so a board can be laid out, but scoring on
//! them reports `GameError::UnsupportedMode`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The cell topology of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Square,
    Triangle,
    Rhombus,
    Hexagon,
}

/// All modes in declaration order.
pub const ALL_MODES: [GameMode; 4] = [
    GameMode::Square,
    GameMode::Triangle,
    GameMode::Rhombus,
    GameMode::Hexagon,
];

impl GameMode {
    /// Returns true if shape scoring is defined for this mode.
    pub const fn is_implemented(self) -> bool {
        matches!(self, GameMode::Square)
    }

    /// Storage extent for a logical extent `n`.
    ///
    /// Square grids store cells one-to-one. The other topologies use an
    /// offset diamond layout that needs `2n - 1` cells per axis.
    pub const fn actual(self, n: usize) -> usize {
        match self {
            GameMode::Square => n,
            _ => n.saturating_mul(2).saturating_sub(1),
        }
    }

    /// Returns the short name used in position notation and the protocol.
    pub const fn short_name(self) -> &'static str {
        match self {
            GameMode::Square => "sq",
            GameMode::Triangle => "tri",
            GameMode::Rhombus => "rho",
            GameMode::Hexagon => "hex",
        }
    }

    /// Parses a mode from its short or full lowercase name.
    pub fn from_name(s: &str) -> Option<GameMode> {
        match s {
            "sq" | "square" => Some(GameMode::Square),
            "tri" | "triangle" => Some(GameMode::Triangle),
            "rho" | "rhombus" => Some(GameMode::Rhombus),
            "hex" | "hexagon" => Some(GameMode::Hexagon),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Square => "square",
            GameMode::Triangle => "triangle",
            GameMode::Rhombus => "rhombus",
            GameMode::Hexagon => "hexagon",
        };
        f.write_str(name)
    }
}
