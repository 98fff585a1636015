/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index};

use crate::{Position, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// A boolean mask over every cell of the board, marking the destinations a
/// piece may legally move to.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MoveMask {
    cells: [[bool; SIZE]; SIZE],
}

impl MoveMask {
    /// A mask with no destinations set.
    pub const EMPTY: Self = Self {
        cells: [[false; SIZE]; SIZE],
    };

    /// Creates a new, empty [`MoveMask`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns `true` if `position` is marked as a legal destination.
    ///
    /// Out-of-bounds positions are never legal destinations.
    #[inline(always)]
    pub const fn get(&self, position: Position) -> bool {
        position.in_bounds() && self.cells[position.row() as usize][position.col() as usize]
    }

    /// Marks `position` as a legal destination.
    #[inline(always)]
    pub fn set(&mut self, position: Position) {
        self.cells[position.row() as usize][position.col() as usize] = true;
    }

    /// Returns `true` if at least one destination is marked.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::{MoveMask, Position};
    /// let mut mask = MoveMask::new();
    /// assert!(!mask.any());
    /// mask.set(Position::new(3, 3));
    /// assert!(mask.any());
    /// ```
    pub fn any(&self) -> bool {
        self.cells.iter().flatten().any(|&cell| cell)
    }

    /// Number of marked destinations.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Iterates over every marked [`Position`], row by row.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let cells = &self.cells;
        (0..SIZE).flat_map(move |row| {
            (0..SIZE)
                .filter(move |&col| cells[row][col])
                .map(move |col| Position::new(row as u8, col as u8))
        })
    }
}

impl Index<Position> for MoveMask {
    type Output = bool;
    #[inline(always)]
    fn index(&self, position: Position) -> &Self::Output {
        &self.cells[position.row() as usize][position.col() as usize]
    }
}

impl fmt::Display for MoveMask {
    /// Renders the mask as an 8x8 grid of `X` (marked) and `.` (unmarked).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &cell in row {
                write!(f, "{} ", if cell { 'X' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for MoveMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
