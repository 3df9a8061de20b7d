/// The cell variant.
///
/// A cell can either be empty or contain a mine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellVariant {
    /// Represents an empty cell. The parameter is the amount of mines around the cell.
    Empty(u8),
    /// Represents a mined cell.
    Mine,
}

/// The cell's state.
///
/// A cell is either closed (and then flagged or not) or open. Keeping the flag inside the closed state makes an open
/// flagged cell unrepresentable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    /// The boolean value indicates whether the cell's flagged.
    Closed(bool),
    Open,
}

/// A single cell of the field, addressed by its `(row, column)` position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    position: (u8, u8),
    variant: CellVariant,
    state: CellState,
}

impl Cell {
    /// Creates a closed, un-flagged, empty cell with zero mines around it.
    pub fn new(position: (u8, u8)) -> Self {
        Cell {
            position,
            variant: CellVariant::Empty(0),
            state: CellState::Closed(false),
        }
    }

    pub fn position(&self) -> (u8, u8) {
        self.position
    }

    pub fn is_mined(&self) -> bool {
        self.variant == CellVariant::Mine
    }

    /// Puts a mine into the cell. The number of mines around it no longer applies.
    pub(super) fn mine(&mut self) {
        self.variant = CellVariant::Mine;
    }

    /// Returns the amount of mines around the cell or `None` if the cell itself is mined.
    pub fn get_mines_around_amount(&self) -> Option<u8> {
        if let CellVariant::Empty(adjacent_mines_amount) = self.variant {
            Some(adjacent_mines_amount)
        } else {
            None
        }
    }

    /// Increments the amount of mines around the cell. No effect on a mined cell.
    pub(super) fn increment_mines_around_amount(&mut self) {
        if let CellVariant::Empty(adjacent_mines_amount) = self.variant {
            self.variant = CellVariant::Empty(adjacent_mines_amount + 1);
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }

    /// Opens the cell. A flag on it, if any, is gone.
    pub(super) fn open(&mut self) {
        self.state = CellState::Open;
    }

    pub fn is_flagged(&self) -> bool {
        self.state == CellState::Closed(true)
    }

    /// Toggles the flag and returns whether the cell is flagged now.
    ///
    /// An open cell can't be flagged, so this is a no-op returning `false` for it.
    pub(super) fn toggle_flag(&mut self) -> bool {
        if let CellState::Closed(is_flagged) = self.state {
            self.state = CellState::Closed(!is_flagged);
        }

        self.is_flagged()
    }
}
