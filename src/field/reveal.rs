//! Opening cells.

use super::Field;
use std::ops::BitOrAssign;

/// What opening one or more cells did to the field.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RevealReport {
    /// How many cells got opened, mines included.
    pub opened: u16,
    /// A mine has been opened, and so have all the others.
    pub hit_mine: bool,
    /// No closed cell without a mine is left.
    pub all_safe_revealed: bool,
}

impl BitOrAssign for RevealReport {
    fn bitor_assign(&mut self, rhs: Self) {
        self.opened += rhs.opened;
        self.hit_mine |= rhs.hit_mine;
        self.all_safe_revealed = rhs.all_safe_revealed;
    }
}

impl Field {
    /// Opens a closed, un-flagged cell.
    ///
    /// Opening a mine opens every other mine too, flagged ones included. Opening a cell with no mines around it
    /// chain-opens its neighbors, and theirs, for as long as the opened cells have no mines around them. Flagged
    /// cells stop the chain and stay closed.
    ///
    /// Open and flagged targets as well as positions outside the field are left alone.
    pub fn open_cell(&mut self, position: (u8, u8)) -> RevealReport {
        let mut report = self.open_single_cell(position);
        report.all_safe_revealed = self.check_all_non_mines_open();

        report
    }

    /// Opens all the closed, un-flagged cells surrounding the target one.
    ///
    /// The classic middle-click, also known as chording. Only has an effect when the target cell is open and
    /// its number matches the number of flags placed around it. Each of the neighbors is opened the way
    /// [`Field::open_cell`] does it.
    pub fn open_surrounding_cells(&mut self, position: (u8, u8)) -> RevealReport {
        let adjacent_cells_positions = self.get_adjacent_cells_positions(position);
        let flagged_adjacent_cells_amount = adjacent_cells_positions
            .iter()
            .filter(|&&adjacent| self.get_cell(adjacent).is_some_and(|cell| cell.is_flagged()))
            .count();

        let mut report = RevealReport::default();

        let ready = matches!(
            self.get_cell(position),
            Some(cell) if cell.is_open()
                && cell.get_mines_around_amount() == Some(flagged_adjacent_cells_amount as u8)
        );

        if ready {
            for adjacent in adjacent_cells_positions {
                report |= self.open_single_cell(adjacent);
            }
        }

        report.all_safe_revealed = self.check_all_non_mines_open();
        report
    }

    /// Opens all the mined cells and returns how many of them were closed.
    pub fn open_all_mines(&mut self) -> u16 {
        let mut opened = 0;

        for cell in self.grid.iter_mut().flatten() {
            if cell.is_mined() && !cell.is_open() {
                cell.open();
                opened += 1;
            }
        }

        opened
    }

    /// Checks that all the cells without mines are open.
    pub fn check_all_non_mines_open(&self) -> bool {
        self.cells()
            .filter(|cell| !cell.is_mined())
            .all(|cell| cell.is_open())
    }

    /// Checks that there exists at least one mined cell which is open.
    pub fn check_open_mines_exist(&self) -> bool {
        self.cells().any(|cell| cell.is_open() && cell.is_mined())
    }

    fn open_single_cell(&mut self, position: (u8, u8)) -> RevealReport {
        let mut report = RevealReport::default();

        match self.get_cell(position) {
            Some(cell) if cell.is_open() || cell.is_flagged() => {}
            Some(cell) if cell.is_mined() => {
                report.hit_mine = true;
                report.opened = self.open_all_mines();
            }
            Some(_) => report.opened = self.flood_open(position),
            None => {}
        }

        report
    }

    /// Opens the cell and, through the zero-count cells, the whole region around it.
    ///
    /// The `open` state doubles as the visited marker, so every cell is pushed at most 8 times and opened once.
    fn flood_open(&mut self, origin: (u8, u8)) -> u16 {
        let mut opened = 0;
        let mut pending = vec![origin];

        while let Some(position) = pending.pop() {
            let Some(cell) = self.get_cell_mut(position) else {
                continue;
            };

            if cell.is_open() || cell.is_flagged() || cell.is_mined() {
                continue;
            }

            cell.open();
            opened += 1;

            if cell.get_mines_around_amount() == Some(0) {
                pending.extend(
                    self.get_adjacent_cells_positions(position)
                        .into_iter()
                        .filter(|&adjacent| {
                            self.get_cell(adjacent)
                                .is_some_and(|cell| !cell.is_open() && !cell.is_flagged())
                        }),
                );
            }
        }

        opened
    }
}

#[cfg(test)]
mod test {
    use super::RevealReport;
    use crate::config::GameConfig;
    use crate::field::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    // "mine", "mine", "none"
    // "none", "none", "mine"
    // "none", "none", "none"
    // "none", "none", "none" <- only when enlarged
    fn create_stub_mined_field(enlarged: bool) -> Field {
        let rows = if enlarged { 4 } else { 3 };
        Field::from_mine_positions(rows, 3, &[(0, 0), (0, 1), (1, 2)]).unwrap()
    }

    fn open_positions(field: &Field) -> BTreeSet<(u8, u8)> {
        field
            .cells()
            .filter(|cell| cell.is_open())
            .map(|cell| cell.position())
            .collect()
    }

    /// The zero-count region reachable from `origin` through un-flagged cells, plus its numbered rim.
    fn expected_region(field: &Field, origin: (u8, u8)) -> BTreeSet<(u8, u8)> {
        let mut region = BTreeSet::new();
        let mut frontier = vec![origin];

        while let Some(position) = frontier.pop() {
            let cell = field.get_cell(position).unwrap();
            if cell.is_flagged() || cell.is_mined() || !region.insert(position) {
                continue;
            }
            if cell.get_mines_around_amount() == Some(0) {
                frontier.extend(field.get_adjacent_cells_positions(position));
            }
        }

        region
    }

    #[test]
    fn open_cell_opens_only_a_numbered_target() {
        let mut field = create_stub_mined_field(false);
        let report = field.open_cell((0, 2));

        assert_eq!(
            report,
            RevealReport {
                opened: 1,
                hit_mine: false,
                all_safe_revealed: false
            }
        );
        assert_eq!(open_positions(&field), BTreeSet::from([(0, 2)]));
    }

    #[test]
    fn open_cell_chain_opens_empty_cells() {
        let mut field = create_stub_mined_field(true);
        let report = field.open_cell((3, 0));

        // The zeros are (2, 0) and the last row; (0, 2) lies behind the numbered rim.
        let expected = BTreeSet::from([(1, 0), (1, 1), (2, 0), (2, 1), (2, 2), (3, 0), (3, 1), (3, 2)]);
        assert_eq!(open_positions(&field), expected);
        assert_eq!(report.opened, 8);
        assert!(!report.hit_mine);
        assert!(!report.all_safe_revealed);
    }

    #[test]
    fn flags_stop_the_chain() {
        let mut field = Field::from_mine_positions(5, 5, &[(0, 4)]).unwrap();
        // A wall of flags across the third row.
        for column in 0..5 {
            field.toggle_cell_flag((2, column));
        }

        field.open_cell((4, 0));

        let opened = open_positions(&field);
        assert_eq!(opened.len(), 10);
        assert!(opened.iter().all(|&(row, _)| row >= 3));
        assert_eq!(field.get_flagged_cells_amount(), 5);
    }

    #[test]
    fn opening_a_flagged_cell_has_no_effect() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((2, 0));

        let report = field.open_cell((2, 0));

        assert_eq!(report.opened, 0);
        assert!(open_positions(&field).is_empty());
        assert!(field.get_cell((2, 0)).unwrap().is_flagged());
    }

    #[test]
    fn opening_an_open_cell_or_a_missing_one_has_no_effect() {
        let mut field = create_stub_mined_field(false);
        field.open_cell((2, 2));

        assert_eq!(field.open_cell((2, 2)).opened, 0);
        assert_eq!(field.open_cell((9, 9)).opened, 0);
        assert_eq!(open_positions(&field), BTreeSet::from([(2, 2)]));
    }

    #[test]
    fn opening_a_mine_opens_every_mine() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((0, 0));

        let report = field.open_cell((0, 1));

        assert!(report.hit_mine);
        assert_eq!(report.opened, 3);
        assert_eq!(open_positions(&field), BTreeSet::from([(0, 0), (0, 1), (1, 2)]));
        assert!(field.check_open_mines_exist());
        assert_eq!(field.get_flagged_cells_amount(), 0);
    }

    #[test]
    fn flood_fill_matches_the_expected_region_on_random_fields() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let config = GameConfig::new(16, 16, 30).unwrap();
            let mut field = Field::new(&config);
            field.toggle_cell_flag((15, 15));
            field.toggle_cell_flag((8, 3));
            let mut field = field.populate_with_mines((7, 7), &mut rng).unwrap();

            let expected = expected_region(&field, (7, 7));
            let report = field.open_cell((7, 7));

            assert_eq!(open_positions(&field), expected, "seed {}", seed);
            assert_eq!(report.opened as usize, expected.len());
            assert!(field.get_cell((15, 15)).unwrap().is_flagged());
            assert!(field.get_cell((8, 3)).unwrap().is_flagged());
        }
    }

    #[test]
    fn open_surrounding_cells_opens_correct_cells() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((0, 0));
        field.toggle_cell_flag((0, 1));
        field.toggle_cell_flag((1, 2));
        field.open_cell((1, 1));

        let report = field.open_surrounding_cells((1, 1));

        // The above is the winning strategy. All the non-flagged cells should be opened by now.
        assert!(report.all_safe_revealed);
        assert!(!report.hit_mine);
        assert!(field
            .cells()
            .filter(|cell| !cell.is_flagged())
            .all(|cell| cell.is_open()));
    }

    #[test]
    fn open_surrounding_cells_for_a_closed_cell_has_no_effect() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((0, 0));
        field.toggle_cell_flag((0, 1));
        field.toggle_cell_flag((1, 2));

        let report = field.open_surrounding_cells((1, 1));

        assert_eq!(report.opened, 0);
        assert!(open_positions(&field).is_empty());
    }

    #[test]
    fn open_surrounding_cells_has_no_effect_on_incorrect_mines_around_amount() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((0, 0));
        field.toggle_cell_flag((0, 1));
        field.toggle_cell_flag((1, 2));
        field.open_cell((1, 1));

        // So far so good, but add an excessive flag somewhere around.
        field.toggle_cell_flag((2, 0));

        let report = field.open_surrounding_cells((1, 1));

        assert_eq!(report.opened, 0);
        assert_eq!(open_positions(&field), BTreeSet::from([(1, 1)]));
    }

    #[test]
    fn open_surrounding_cells_with_a_misplaced_flag_hits_a_mine() {
        let mut field = create_stub_mined_field(false);
        field.toggle_cell_flag((0, 0));
        field.toggle_cell_flag((0, 1));
        field.toggle_cell_flag((2, 2)); // wrong, the mine is at (1, 2)
        field.open_cell((1, 1));

        let report = field.open_surrounding_cells((1, 1));

        assert!(report.hit_mine);
        assert!(field.get_cell((1, 2)).unwrap().is_open());
        assert!(field.get_cell((0, 0)).unwrap().is_open());
    }

    #[test]
    fn the_win_condition_is_checked_correctly() {
        let mut field = create_stub_mined_field(false);
        assert!(!field.check_all_non_mines_open());

        for position in [(0, 2), (1, 0), (1, 1), (2, 0)] {
            assert!(!field.open_cell(position).all_safe_revealed);
        }

        assert!(field.open_cell((2, 2)).all_safe_revealed);
        assert!(field.check_all_non_mines_open());
        assert!(!field.check_open_mines_exist());
    }
}
