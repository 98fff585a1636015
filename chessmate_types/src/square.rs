/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use crate::ChessError;

/// Number of ranks and files on the board.
pub const BOARD_SIZE: u8 = 8;

/// A cell of the board in internal matrix coordinates.
///
/// Row 0 is the top of the board (rank 8), column 0 is the left edge (file a).
/// Construction is unchecked; use [`Position::in_bounds`] before indexing into
/// a board with coordinates that did not come from a [`ChessPosition`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a new [`Position`] from matrix coordinates.
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row index (0 at the top of the board).
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Column index (0 at the left edge of the board).
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Returns `true` if both coordinates lie within the 8x8 board.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::Position;
    /// assert!(Position::new(0, 7).in_bounds());
    /// assert!(!Position::new(8, 0).in_bounds());
    /// ```
    #[inline(always)]
    pub const fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Returns the [`Position`] displaced by `(rows, cols)`, or `None` if the
    /// result would leave the board.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::Position;
    /// let b1 = Position::new(7, 1);
    /// assert_eq!(b1.offset(-2, 1), Some(Position::new(5, 2)));
    /// assert_eq!(b1.offset(1, 0), None);
    /// ```
    pub fn offset(self, rows: i8, cols: i8) -> Option<Self> {
        let row = self.row as i8 + rows;
        let col = self.col as i8 + cols;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A square in algebraic chess notation: a file letter `a..=h` and a rank
/// number `1..=8`.
///
/// Converts to and from [`Position`] with `row = 8 - rank`, `col = file - 'a'`,
/// so rank 8 occupies row 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ChessPosition {
    file: char,
    rank: u8,
}

impl ChessPosition {
    /// Creates a new [`ChessPosition`], validating both coordinates.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::ChessPosition;
    /// assert!(ChessPosition::new('e', 2).is_ok());
    /// assert!(ChessPosition::new('i', 2).is_err());
    /// assert!(ChessPosition::new('e', 9).is_err());
    /// ```
    pub fn new(file: char, rank: u8) -> Result<Self, ChessError> {
        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return Err(ChessError::InvalidPosition(format!("{file}{rank}")));
        }
        Ok(Self { file, rank })
    }

    /// File letter, `a..=h`.
    #[inline(always)]
    pub const fn file(&self) -> char {
        self.file
    }

    /// Rank number, `1..=8`.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.rank
    }

    /// Converts to internal matrix coordinates.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::{ChessPosition, Position};
    /// let a8 = ChessPosition::new('a', 8).unwrap();
    /// assert_eq!(a8.to_position(), Position::new(0, 0));
    ///
    /// let h1 = ChessPosition::new('h', 1).unwrap();
    /// assert_eq!(h1.to_position(), Position::new(7, 7));
    /// ```
    #[inline(always)]
    pub const fn to_position(self) -> Position {
        Position::new(BOARD_SIZE - self.rank, self.file as u8 - b'a')
    }

    /// Converts internal matrix coordinates back to algebraic notation.
    ///
    /// Fails with [`ChessError::OutOfBounds`] if `position` does not lie on
    /// the board.
    pub fn from_position(position: Position) -> Result<Self, ChessError> {
        if !position.in_bounds() {
            return Err(ChessError::OutOfBounds(position));
        }
        Ok(Self {
            file: (b'a' + position.col()) as char,
            rank: BOARD_SIZE - position.row(),
        })
    }

    /// Parses a square from its UCI representation, like `"e2"`.
    pub fn from_uci(uci: &str) -> Result<Self, ChessError> {
        let mut chars = uci.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ChessError::InvalidPosition(uci.to_string()));
        };
        let rank = rank
            .to_digit(10)
            .ok_or_else(|| ChessError::InvalidPosition(uci.to_string()))?;
        Self::new(file, rank as u8)
    }
}

impl FromStr for ChessPosition {
    type Err = ChessError;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}
