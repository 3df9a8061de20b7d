//! Mine placement.

use super::{Field, FieldError};
use rand::Rng;

/// Whether `position` lies in the 3x3 block centered on `anchor`.
fn is_in_safety_zone(anchor: (u8, u8), position: (u8, u8)) -> bool {
    anchor.0.abs_diff(position.0) <= 1 && anchor.1.abs_diff(position.1) <= 1
}

impl Field {
    /// Returns a copy of the field with the pre-configured number of mines scattered uniformly at random over the
    /// cells outside the safety zone of `anchor` (the cell about to be opened first).
    ///
    /// Cells are sampled one at a time and rejected while they're either mined already or within the zone, so the
    /// number of free cells is checked upfront. Flags placed before the mines survive.
    ///
    /// Fails with [`FieldError::InvalidCellPosition`] for an anchor beyond the field's bounds, with
    /// [`FieldError::MinesAlreadyExist`] if the field has been populated before and with
    /// [`FieldError::NoRoomForMines`] if the mines don't fit outside the zone.
    pub fn populate_with_mines<R: Rng + ?Sized>(
        &self,
        anchor: (u8, u8),
        rng: &mut R,
    ) -> Result<Field, FieldError> {
        if !self.contains(anchor) {
            return Err(FieldError::InvalidCellPosition(anchor));
        }

        if self.populated {
            return Err(FieldError::MinesAlreadyExist);
        }

        let (rows_amount, columns_amount, cells_amount) = self.get_size();
        let safety_zone_size = self.get_adjacent_cells_positions(anchor).len() as u16 + 1;
        let free = cells_amount - safety_zone_size;
        if self.mines_amount > free {
            return Err(FieldError::NoRoomForMines {
                mines: self.mines_amount,
                free,
            });
        }

        let mut field = self.clone();
        let mut mines_placed = 0;
        let mut rejected = 0u64;

        while mines_placed < self.mines_amount {
            let position = (
                rng.gen_range(0..rows_amount),
                rng.gen_range(0..columns_amount),
            );

            match field.get_cell_mut(position) {
                Some(cell) if !cell.is_mined() && !is_in_safety_zone(anchor, position) => {
                    cell.mine();
                    mines_placed += 1;
                }
                _ => rejected += 1,
            }
        }

        field.populated = true;
        field.update_mines_around_values();

        tracing::debug!(
            mines = mines_placed,
            rejected,
            ?anchor,
            "populated the field with mines"
        );

        Ok(field)
    }

    /// Builds a populated field with mines exactly at the given positions.
    ///
    /// Nothing is open or flagged. Fails with [`FieldError::InvalidCellPosition`] for the first position beyond the
    /// field's bounds.
    pub fn from_mine_positions(
        rows_amount: u8,
        columns_amount: u8,
        mine_positions: &[(u8, u8)],
    ) -> Result<Field, FieldError> {
        let mut field = Field::empty(rows_amount, columns_amount, 0);

        for &position in mine_positions {
            let cell = field
                .get_cell_mut(position)
                .ok_or(FieldError::InvalidCellPosition(position))?;
            cell.mine();
        }

        field.mines_amount = field.cells().filter(|cell| cell.is_mined()).count() as u16;
        field.populated = true;
        field.update_mines_around_values();

        Ok(field)
    }

    /// Increments the numerical values of the cells adjacent to the mined ones.
    ///
    /// Expects all the counts to be zero, which holds for a field that has never been populated.
    fn update_mines_around_values(&mut self) {
        let adjacent_cells_positions = self
            .cells()
            .filter(|cell| cell.is_mined())
            .flat_map(|cell| self.get_adjacent_cells_positions(cell.position()))
            .collect::<Vec<(u8, u8)>>();

        for position in adjacent_cells_positions {
            if let Some(cell) = self.get_cell_mut(position) {
                cell.increment_mines_around_amount();
            }
        }
    }
}
