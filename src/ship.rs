//! Ship classes, placed ships and grid coordinates.

use alloc::vec::Vec;
use core::fmt;

use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Successive cells step along the column.
    Horizontal,
    /// Successive cells step along the row.
    Vertical,
}

impl Orientation {
    /// Interpret a wire orientation. Only `"vertical"` selects
    /// [`Orientation::Vertical`]; anything else, including no value at all,
    /// is horizontal.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("vertical") => Orientation::Vertical,
            _ => Orientation::Horizontal,
        }
    }
}

/// A (row, column) position on the grid, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert signed wire coordinates. A negative component maps to
    /// `usize::MAX`, which is never in bounds, so the board rejects it like
    /// any other off-grid target.
    pub fn from_signed(row: i64, col: i64) -> Self {
        let row = usize::try_from(row).unwrap_or(usize::MAX);
        let col = usize::try_from(col).unwrap_or(usize::MAX);
        Self { row, col }
    }

    /// Whether the coordinate lies inside the `BOARD_SIZE` grid.
    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The coordinate `offset` cells further along `orientation`, or `None`
    /// on arithmetic overflow.
    pub fn step(&self, orientation: Orientation, offset: usize) -> Option<Self> {
        match orientation {
            Orientation::Horizontal => Some(Self::new(self.row, self.col.checked_add(offset)?)),
            Orientation::Vertical => Some(Self::new(self.row.checked_add(offset)?, self.col)),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship on a board, tracking the cells that have not been hit yet.
///
/// The remaining list only ever shrinks. Once it is empty the ship is sunk.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    class: ShipClass,
    orientation: Orientation,
    origin: Coordinate,
    remaining: Vec<Coordinate>,
}

impl Ship {
    pub(crate) fn new(
        class: ShipClass,
        orientation: Orientation,
        origin: Coordinate,
        cells: Vec<Coordinate>,
    ) -> Self {
        Ship {
            class,
            orientation,
            origin,
            remaining: cells,
        }
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn name(&self) -> &'static str {
        self.class.name
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cells of this ship that are still afloat.
    pub fn remaining(&self) -> &[Coordinate] {
        &self.remaining
    }

    pub fn is_sunk(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Remove `target` from the remaining cells. Returns `true` if it was
    /// part of this ship.
    pub(crate) fn register_hit(&mut self, target: Coordinate) -> bool {
        match self.remaining.iter().position(|c| *c == target) {
            Some(idx) => {
                self.remaining.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: {}, orientation: {:?}, remaining: {}/{} }}",
            self.class.name,
            self.origin,
            self.orientation,
            self.remaining.len(),
            self.class.length,
        )
    }
}
