//! One participant's grid: ship placement, attack resolution and defeat
//! detection.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::common::{AttackResult, BoardError};
use crate::config::BOARD_SIZE;
use crate::ship::{Coordinate, Orientation, Ship, ShipClass};

/// Random placement gives up after this many rejected candidates.
const PLACEMENT_ATTEMPTS: usize = 100;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    /// Holds an unattacked ship segment.
    Occupied,
    /// Ship segment that has been struck.
    Hit,
    /// Open water that has been fired upon.
    Missed,
}

impl Cell {
    /// Hit and Missed are terminal.
    pub fn is_attacked(self) -> bool {
        matches!(self, Cell::Hit | Cell::Missed)
    }
}

/// A participant's grid together with the ships placed on it.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    ships: Vec<Ship>,
    placed: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board (no ships placed, nothing attacked).
    pub fn new() -> Self {
        Board {
            grid: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
            placed: 0,
        }
    }

    pub fn grid(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.grid
    }

    /// State of the cell at `at`, or `None` outside the grid.
    pub fn cell(&self, at: Coordinate) -> Option<Cell> {
        if at.in_bounds() {
            Some(self.grid[at.row][at.col])
        } else {
            None
        }
    }

    /// Ships in placement order. Sunk ships stay in this list.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Number of successful placements.
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    /// Place a ship of `class` starting at `start`.
    ///
    /// Every target cell is validated before any cell changes, so a rejected
    /// placement leaves the board untouched.
    pub fn place_ship(
        &mut self,
        class: ShipClass,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let cells = self.footprint(class, start, orientation)?;
        for c in cells.iter() {
            self.grid[c.row][c.col] = Cell::Occupied;
        }
        self.ships.push(Ship::new(class, orientation, start, cells));
        self.placed += 1;
        Ok(())
    }

    /// Resolve an attack on `target`, marking the cell and shrinking the
    /// owning ship on a hit.
    pub fn attack(&mut self, target: Coordinate) -> Result<AttackResult, BoardError> {
        let cell = self.cell(target).ok_or(BoardError::OutOfBounds)?;
        match cell {
            Cell::Hit | Cell::Missed => Err(BoardError::AlreadyAttacked),
            Cell::Empty => {
                self.grid[target.row][target.col] = Cell::Missed;
                Ok(AttackResult::Miss)
            }
            Cell::Occupied => {
                self.grid[target.row][target.col] = Cell::Hit;
                let owner = self
                    .ships
                    .iter_mut()
                    .find_map(|ship| if ship.register_hit(target) { Some(ship) } else { None });
                debug_assert!(owner.is_some(), "occupied cell {} has no ship", target);
                match owner {
                    Some(ship) if ship.is_sunk() => Ok(AttackResult::Sunk(ship.name())),
                    _ => Ok(AttackResult::Hit),
                }
            }
        }
    }

    /// Returns `true` when every placed ship has no cells left afloat.
    pub fn all_ships_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Returns a random free `(start, orientation)` for a ship of `class`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        class: ShipClass,
    ) -> Result<(Coordinate, Orientation), BoardError> {
        let len = class.length();
        if len == 0 {
            return Err(BoardError::InvalidLength);
        }
        if len > BOARD_SIZE {
            return Err(BoardError::NoRoom);
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_r, max_c) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - 1, BOARD_SIZE - len),
                Orientation::Vertical => (BOARD_SIZE - len, BOARD_SIZE - 1),
            };
            let start = Coordinate::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
            if self.footprint(class, start, orientation).is_ok() {
                return Ok((start, orientation));
            }
        }
        Err(BoardError::NoRoom)
    }

    /// The cells a ship would occupy, provided all of them are in bounds and
    /// empty.
    fn footprint(
        &self,
        class: ShipClass,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<Vec<Coordinate>, BoardError> {
        if class.length() == 0 {
            return Err(BoardError::InvalidLength);
        }
        let mut cells = Vec::with_capacity(class.length());
        for i in 0..class.length() {
            let target = start
                .step(orientation, i)
                .filter(Coordinate::in_bounds)
                .ok_or(BoardError::OutOfBounds)?;
            if self.grid[target.row][target.col] != Cell::Empty {
                return Err(BoardError::Overlap);
            }
            cells.push(target);
        }
        Ok(cells)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ placed: {}, ships: {:?} }}", self.placed, self.ships)?;
        for row in self.grid.iter() {
            for cell in row.iter() {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied => 'S',
                    Cell::Hit => 'X',
                    Cell::Missed => 'o',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
