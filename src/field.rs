pub mod cell;
mod placement;
mod reveal;

use crate::config::GameConfig;
use cell::Cell;
use std::fmt::{Debug, Formatter};
use thiserror::Error;

pub use reveal::RevealReport;

/// Everything that can go wrong when working with fields.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The position's row and/or column index is beyond the field's bounds.
    #[error("cell {0:?} is outside the field")]
    InvalidCellPosition((u8, u8)),
    /// Mines get placed once per field, so that an ongoing game never gets its mines re-distributed.
    #[error("the field has already been populated with mines")]
    MinesAlreadyExist,
    /// There are fewer cells outside the safety zone than there are mines to place.
    #[error("{mines} mines don't fit into the {free} cells outside the safety zone")]
    NoRoomForMines { mines: u16, free: u16 },
}

/// The field (board) representation.
///
/// A grid of cells addressed by `(row, column)`, together with the number of mines the field is meant to hold. The
/// dimensions never change; a new game gets a new field.
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    /// The top level represents rows, the nested vector of each row represents cells.
    grid: Vec<Vec<Cell>>,
    mines_amount: u16,
    /// Whether the mines have been placed already.
    populated: bool,
}

impl Field {
    /// Creates an empty field for the configuration: no mines, nothing open or flagged.
    ///
    /// The mines are placed later by [`Field::populate_with_mines`], as soon as the first cell to open is known.
    pub fn new(config: &GameConfig) -> Self {
        Self::empty(config.rows(), config.columns(), config.mines())
    }

    fn empty(rows_amount: u8, columns_amount: u8, mines_amount: u16) -> Self {
        let grid = (0..rows_amount)
            .map(|row_index| {
                (0..columns_amount)
                    .map(|column_index| Cell::new((row_index, column_index)))
                    .collect()
            })
            .collect();

        Field {
            grid,
            mines_amount,
            populated: false,
        }
    }

    /// Returns the field's height (the number of rows), width (the number of columns) and the total number of cells.
    pub fn get_size(&self) -> (u8, u8, u16) {
        let rows_amount = self.grid.len() as u8;
        let columns_amount = self.grid.first().map(|row| row.len()).unwrap_or(0) as u8;
        let cells_amount = rows_amount as u16 * columns_amount as u16;

        (rows_amount, columns_amount, cells_amount)
    }

    pub fn get_mines_amount(&self) -> u16 {
        self.mines_amount
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn contains(&self, position: (u8, u8)) -> bool {
        self.get_cell(position).is_some()
    }

    /// Returns a read-only cell reference by its position or [`None`] if there's no cell at the given position.
    pub fn get_cell(&self, (row_index, column_index): (u8, u8)) -> Option<&Cell> {
        self.grid
            .get(row_index as usize)
            .and_then(|r| r.get(column_index as usize))
    }

    fn get_cell_mut(&mut self, (row_index, column_index): (u8, u8)) -> Option<&mut Cell> {
        self.grid
            .get_mut(row_index as usize)
            .and_then(|r| r.get_mut(column_index as usize))
    }

    /// Iterates over the rows of the field.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.grid.iter().map(Vec::as_slice)
    }

    /// Iterates over all the cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.grid.iter().flatten()
    }

    /// Returns the in-bounds positions around the given one, diagonals included. Up to 8 of them.
    pub fn get_adjacent_cells_positions(&self, (row_index, column_index): (u8, u8)) -> Vec<(u8, u8)> {
        let (rows_amount, columns_amount, _) = self.get_size();
        // `i16` to step below zero without overflowing.
        let (row_index, column_index) = (row_index as i16, column_index as i16);

        (-1i16..=1)
            .flat_map(|row_delta| (-1i16..=1).map(move |column_delta| (row_delta, column_delta)))
            .filter(|&delta| delta != (0, 0))
            .map(|(row_delta, column_delta)| (row_index + row_delta, column_index + column_delta))
            .filter(|&(row, column)| {
                (0..rows_amount as i16).contains(&row) && (0..columns_amount as i16).contains(&column)
            })
            .map(|(row, column)| (row as u8, column as u8))
            .collect()
    }

    /// Toggles the flag of a closed cell and returns whether it's flagged now.
    ///
    /// Returns `None` (and changes nothing) for open cells and positions outside the field.
    pub fn toggle_cell_flag(&mut self, position: (u8, u8)) -> Option<bool> {
        let cell = self.get_cell_mut(position)?;

        if cell.is_open() {
            None
        } else {
            Some(cell.toggle_flag())
        }
    }

    /// The total number of the currently flagged cells.
    pub fn get_flagged_cells_amount(&self) -> u16 {
        self.cells().filter(|cell| cell.is_flagged()).count() as u16
    }
}

/// Shows the whole layout regardless of what's open: `*` for mines, `F` for flags, `.` for zeros and digits for the
/// rest.
impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.grid.iter() {
            for cell in row {
                let symbol = match (cell.is_flagged(), cell.get_mines_around_amount()) {
                    (true, _) => 'F',
                    (false, None) => '*',
                    (false, Some(0)) => '.',
                    (false, Some(n)) => char::from(b'0' + n),
                };
                write!(f, "{}", symbol)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
