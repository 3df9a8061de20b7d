//! Game configurations: the board dimensions and the number of mines.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Everything that can be wrong with a requested configuration.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The field must have at least one row and one column.
    #[error("the field must have at least one row and one column, got {rows}x{columns}")]
    EmptyField { rows: u8, columns: u8 },
    /// The mines wouldn't fit around the largest possible safety zone of the first opened cell.
    ///
    /// `max` is the largest number of mines a field with the same dimensions accepts.
    #[error("too many mines: requested {requested}, but at most {max} fit")]
    TooManyMines { requested: u16, max: u16 },
}

/// An immutable, validated `(rows, columns, mines)` triple.
///
/// The only ways to get one are [`GameConfig::new`] and [`Difficulty::config`], so a session never sees a
/// configuration its mines can't be placed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    rows: u8,
    columns: u8,
    mines: u16,
}

impl GameConfig {
    pub fn new(rows: u8, columns: u8, mines: u16) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyField { rows, columns });
        }

        let max = Self::max_mines(rows, columns);
        if mines > max {
            return Err(ConfigError::TooManyMines {
                requested: mines,
                max,
            });
        }

        Ok(GameConfig {
            rows,
            columns,
            mines,
        })
    }

    /// The largest number of mines that still leaves room for the safety zone wherever the first cell gets opened.
    ///
    /// The safety zone is the 3x3 block around that cell, clipped by the field's borders, so the worst case is the
    /// full block (or the whole field for the fields narrower than three cells).
    pub fn max_mines(rows: u8, columns: u8) -> u16 {
        let cells = rows as u16 * columns as u16;
        let largest_zone = rows.min(3) as u16 * columns.min(3) as u16;

        cells.saturating_sub(largest_zone)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn mines(&self) -> u16 {
        self.mines
    }

    pub fn cells(&self) -> u16 {
        self.rows as u16 * self.columns as u16
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::Beginner.config()
    }
}

/// The canonical presets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Difficulty {
    /// 9x9, 10 mines.
    Beginner,
    /// 16x16, 40 mines.
    Intermediate,
    /// 16 rows by 30 columns, 99 mines.
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Expert,
    ];

    pub fn config(self) -> GameConfig {
        let (rows, columns, mines) = match self {
            Difficulty::Beginner => (9, 9, 10),
            Difficulty::Intermediate => (16, 16, 40),
            Difficulty::Expert => (16, 30, 99),
        };

        GameConfig {
            rows,
            columns,
            mines,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Expert => "expert",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty `{0}`, expected one of: beginner, intermediate, expert")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();

        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.name() == name)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}
