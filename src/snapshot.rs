//! What a frontend gets to see of a game.

use crate::field::cell::Cell;
use crate::MinesweeperStatus;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A cell as the player sees it. A mine only shows once it's open.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellView {
    Hidden,
    Flagged,
    /// An open cell without a mine, with the amount of mines around it.
    Revealed(u8),
    /// An open mine.
    Mine,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        match (cell.is_open(), cell.get_mines_around_amount()) {
            (false, _) if cell.is_flagged() => CellView::Flagged,
            (false, _) => CellView::Hidden,
            (true, Some(mines_around)) => CellView::Revealed(mines_around),
            (true, None) => CellView::Mine,
        }
    }
}

/// The observable state of a game after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: u8,
    pub columns: u8,
    pub mines: u16,
    /// Row by row.
    pub cells: Vec<Vec<CellView>>,
    pub status: MinesweeperStatus,
    pub elapsed_seconds: u64,
    pub flags_used: u16,
    /// `mines - flags_used`, never below zero.
    pub mines_remaining: u16,
}

impl Snapshot {
    pub fn cell(&self, (row_index, column_index): (u8, u8)) -> Option<CellView> {
        self.cells
            .get(row_index as usize)
            .and_then(|row| row.get(column_index as usize))
            .copied()
    }
}

/// A plain-text grid: `#` closed, `F` flagged, `.` zero, digits, `*` mines. Headed by the status line.
impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:?}  time: {}s  mines left: {}",
            self.status, self.elapsed_seconds, self.mines_remaining
        )?;

        write!(f, "   ")?;
        for column_index in 0..self.columns {
            write!(f, "{:>3}", column_index)?;
        }
        writeln!(f)?;

        for (row_index, row) in self.cells.iter().enumerate() {
            write!(f, "{:>3}", row_index)?;

            for cell in row {
                let symbol = match cell {
                    CellView::Hidden => '#',
                    CellView::Flagged => 'F',
                    CellView::Revealed(0) => '.',
                    CellView::Revealed(n) => char::from(b'0' + n),
                    CellView::Mine => '*',
                };
                write!(f, "{:>3}", symbol)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::CellView;
    use crate::field::Field;

    #[test]
    fn closed_mines_are_not_leaked() {
        let mut field = Field::from_mine_positions(2, 2, &[(0, 0)]).unwrap();
        field.toggle_cell_flag((1, 1));

        let views: Vec<CellView> = field.cells().map(CellView::from).collect();
        assert_eq!(
            views,
            [
                CellView::Hidden,
                CellView::Hidden,
                CellView::Hidden,
                CellView::Flagged
            ]
        );

        field.open_cell((0, 1));
        field.open_cell((0, 0));
        let views: Vec<CellView> = field.cells().map(CellView::from).collect();
        assert_eq!(views[0], CellView::Mine);
        assert_eq!(views[1], CellView::Revealed(1));
    }

    #[test]
    fn cell_views_serialize_in_snake_case() {
        assert_eq!(serde_json::to_string(&CellView::Hidden).unwrap(), "\"hidden\"");
        assert_eq!(
            serde_json::to_string(&CellView::Revealed(3)).unwrap(),
            "{\"revealed\":3}"
        );
    }
}
