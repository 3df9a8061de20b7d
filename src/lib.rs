//! The rules engine of a Minesweeper game.
//!
//! A [`Minesweeper`] session owns the [`Field`] and the game status. Mines are placed on the first opened cell,
//! keeping its 3x3 neighborhood clear; opening a zero-count cell chain-opens its region; opening a mine ends the game
//! and opens every mine. Frontends drive the session with discrete requests and read a [`Snapshot`] back.

pub mod config;
pub mod field;
mod snapshot;
mod timer;

pub use config::{ConfigError, Difficulty, GameConfig, ParseDifficultyError};
pub use field::{cell::Cell, Field, FieldError, RevealReport};
pub use snapshot::{CellView, Snapshot};
pub use timer::{TickTimer, TICK_INTERVAL};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Everything that can possibly go wrong during the game.
///
/// Requests that make no sense in the current state (opening an open cell, flagging after the game has ended, a
/// position outside the field) are not errors, they're ignored.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MinesweeperError {
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// The status of a game.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinesweeperStatus {
    /// The field has been created, but the mines haven't been placed yet.
    #[default]
    Idle,
    /// An ongoing game. The clock is running.
    Playing,
    Won,
    Lost,
}

impl MinesweeperStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, MinesweeperStatus::Won | MinesweeperStatus::Lost)
    }
}

/// Describes all the possible actions a player can take on the field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MinesweeperAction {
    /// A request to open a cell by its position.
    OpenCell((u8, u8)),
    /// A request to open the cells adjacent to the one with the provided position.
    OpenSurroundingCells((u8, u8)),
    /// Opens the surrounding cells of an open cell, the cell itself otherwise.
    ///
    /// This is intended to be used with frontends which have a limited number of inputs, so that both actions could use
    /// the same trigger.
    OpenCellOrSurroundingCells((u8, u8)),
    /// A request to toggle the flag of a cell by its position.
    FlagCell((u8, u8)),
}

/// A Minesweeper game session.
///
/// Generic over the random source used to place the mines, so that games can be replayed from a seed.
#[derive(Debug)]
pub struct Minesweeper<R = StdRng> {
    config: GameConfig,
    field: Field,
    status: MinesweeperStatus,
    elapsed_seconds: u64,
    /// Always equals the number of flagged cells in the field.
    flags_used: u16,
    /// Present exactly while the status is `Playing`.
    timer: Option<TickTimer>,
    tick_interval: Duration,
    rng: R,
}

impl Minesweeper<StdRng> {
    /// Creates a game with the mines placed from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a game whose mine placement is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Minesweeper<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Minesweeper {
            config,
            field: Field::new(&config),
            status: MinesweeperStatus::Idle,
            elapsed_seconds: 0,
            flags_used: 0,
            timer: None,
            tick_interval: TICK_INTERVAL,
            rng,
        }
    }

    /// Sets the wall-clock duration of one tick used by [`Minesweeper::advance_to`].
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Replaces the configuration and starts over with an empty field of the new size.
    pub fn select_difficulty(&mut self, config: GameConfig) {
        info!(
            rows = config.rows(),
            columns = config.columns(),
            mines = config.mines(),
            "difficulty changed"
        );

        self.config = config;
        self.reset();
    }

    /// Starts over: a fresh empty field, no flags, the clock at zero.
    pub fn reset(&mut self) {
        self.field = Field::new(&self.config);
        self.status = MinesweeperStatus::Idle;
        self.elapsed_seconds = 0;
        self.flags_used = 0;
        self.timer = None;

        info!("game reset");
    }

    /// Performs the requested action and returns the resulting status.
    pub fn take_action(
        &mut self,
        action: MinesweeperAction,
    ) -> Result<MinesweeperStatus, MinesweeperError> {
        match action {
            MinesweeperAction::OpenCell(position) => self.request_reveal(position),
            MinesweeperAction::OpenSurroundingCells(position) => Ok(self.request_chord(position)),
            MinesweeperAction::OpenCellOrSurroundingCells(position) => {
                let is_open = self
                    .field
                    .get_cell(position)
                    .is_some_and(|cell| cell.is_open());

                if is_open {
                    Ok(self.request_chord(position))
                } else {
                    self.request_reveal(position)
                }
            }
            MinesweeperAction::FlagCell(position) => Ok(self.request_flag(position)),
        }
    }

    /// Opens a cell. The first one opened in a game places the mines around it and starts the clock.
    ///
    /// Ignored for open or flagged cells, positions outside the field and finished games. A validated configuration
    /// always leaves room for the mines, so the placement errors are only passed through.
    pub fn request_reveal(
        &mut self,
        position: (u8, u8),
    ) -> Result<MinesweeperStatus, MinesweeperError> {
        if self.status.is_finished() {
            debug!(?position, status = ?self.status, "ignored reveal, the game has ended");
            return Ok(self.status);
        }

        match self.field.get_cell(position) {
            None => {
                debug!(?position, "ignored reveal outside the field");
                return Ok(self.status);
            }
            Some(cell) if cell.is_open() || cell.is_flagged() => {
                debug!(?position, "ignored reveal of an open or flagged cell");
                return Ok(self.status);
            }
            Some(_) => {}
        }

        if self.status == MinesweeperStatus::Idle {
            self.field = self.field.populate_with_mines(position, &mut self.rng)?;
            self.start();
        }

        let report = self.field.open_cell(position);
        self.update_status(report);

        Ok(self.status)
    }

    /// Opens the cells around an open one whose number of flags around matches its number.
    ///
    /// Only applies to ongoing games; ignored otherwise.
    pub fn request_chord(&mut self, position: (u8, u8)) -> MinesweeperStatus {
        if self.status != MinesweeperStatus::Playing {
            debug!(?position, status = ?self.status, "ignored chord outside of an ongoing game");
            return self.status;
        }

        let report = self.field.open_surrounding_cells(position);
        self.update_status(report);

        self.status
    }

    /// Toggles the flag of a closed cell. Flags can be placed before the first cell is opened.
    ///
    /// Ignored for open cells, positions outside the field and finished games.
    pub fn request_flag(&mut self, position: (u8, u8)) -> MinesweeperStatus {
        if self.status.is_finished() {
            debug!(?position, status = ?self.status, "ignored flag, the game has ended");
            return self.status;
        }

        match self.field.toggle_cell_flag(position) {
            Some(true) => self.flags_used += 1,
            Some(false) => self.flags_used -= 1,
            None => debug!(?position, "ignored flag of an open cell or outside the field"),
        }

        self.status
    }

    /// A single tick of the game clock. Only counts while the game is being played.
    pub fn tick(&mut self) {
        if self.timer.is_some() {
            self.elapsed_seconds += 1;
        }
    }

    /// Counts the ticks that have become due by `now`. Only counts while the game is being played.
    pub fn advance_to(&mut self, now: Instant) {
        if let Some(timer) = self.timer.as_mut() {
            self.elapsed_seconds += timer.poll(now);
        }
    }

    fn start(&mut self) {
        self.status = MinesweeperStatus::Playing;
        self.timer = Some(TickTimer::start(self.tick_interval));

        info!(
            rows = self.config.rows(),
            columns = self.config.columns(),
            mines = self.config.mines(),
            "game started"
        );
    }

    /// Moves to the terminal status if the last operation hit a mine or opened the last safe cell.
    fn update_status(&mut self, report: RevealReport) {
        let status = if report.hit_mine {
            // Opening the mines drops the flags that were on them.
            self.flags_used = self.field.get_flagged_cells_amount();
            MinesweeperStatus::Lost
        } else if report.all_safe_revealed {
            MinesweeperStatus::Won
        } else {
            return;
        };

        self.status = status;
        self.timer = None;

        info!(?status, elapsed_seconds = self.elapsed_seconds, "game over");
    }

    pub fn status(&self) -> MinesweeperStatus {
        self.status
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The total amount of ticks the game has been in the `Playing` status.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn flags_used(&self) -> u16 {
        self.flags_used
    }

    pub fn mines_remaining(&self) -> u16 {
        self.config.mines().saturating_sub(self.flags_used)
    }

    pub fn is_clock_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.config.rows(),
            columns: self.config.columns(),
            mines: self.config.mines(),
            cells: self
                .field
                .rows()
                .map(|row| row.iter().map(CellView::from).collect())
                .collect(),
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            flags_used: self.flags_used,
            mines_remaining: self.mines_remaining(),
        }
    }
}
