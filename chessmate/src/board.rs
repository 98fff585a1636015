/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index, str::FromStr};

use anyhow::{bail, Result};

use super::{ChessError, Color, Piece, Position, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// FEN piece placements for the standard chess starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of whose turn it is or which pieces have been captured.
/// If you need those, see [`Match`](crate::Match).
///
/// Internally an 8x8 mailbox of [`Option<Piece>`], row 0 at the top (rank 8).
/// Pieces are stored by value, so a cell's occupant and its coordinates can
/// never disagree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [[Option<Piece>; SIZE]; SIZE],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use chessmate::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [[None; SIZE]; SIZE],
        }
    }

    /// Constructs a [`Board`] from the placements field of a FEN string.
    ///
    /// Anything after the first space (side to move, clocks, ...) is ignored.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        // If this FEN string contains more than just the initial placements, extract the placements
        let placements = if fen.contains(' ') {
            fen.split(' ').next().unwrap()
        } else {
            fen
        };

        // Check if the placements string is the correct length
        if placements.matches('/').count() != 7 {
            bail!("Missing placements for all 8 ranks.");
        }

        // The first rank in a FEN string is rank 8, which is row 0 of the grid
        for (row, placements) in placements.split('/').enumerate() {
            let mut col = 0;

            for piece_char in placements.chars() {
                // If the next char is a piece, place it at the running file
                if let Ok(piece) = Piece::from_uci(piece_char) {
                    board.place(piece, Position::new(row as u8, col))?;
                    col += 1;
                } else {
                    // If the next char was not a piece, it must be a count of empty cells
                    let Some(empty) = piece_char.to_digit(10) else {
                        bail!("Found non-piece, non-numeric char {piece_char:?} when parsing FEN.");
                    };
                    col += empty as u8;
                }
            }
        }

        Ok(board)
    }

    /// Generates the FEN placements field for this board.
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(SIZE * SIZE);

        for (row, cells) in self.mailbox.iter().enumerate() {
            let mut empty = 0;
            for cell in cells {
                if let Some(piece) = cell {
                    if empty > 0 {
                        placements.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placements.push(piece.char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                placements.push_str(&empty.to_string());
            }
            if row + 1 < SIZE {
                placements.push('/');
            }
        }

        placements
    }

    /// Returns `true` if there is a piece at the given [`Position`], else `false`.
    ///
    /// Out-of-bounds positions hold no pieces.
    ///
    /// # Example
    /// ```
    /// # use chessmate::{Board, Position};
    /// let board = Board::default();
    /// assert_eq!(board.has(Position::new(7, 1)), true);  // b1 knight
    /// assert_eq!(board.has(Position::new(4, 4)), false); // e4
    /// ```
    #[inline(always)]
    pub const fn has(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }

    /// Places the provided [`Piece`] at the supplied [`Position`], replacing
    /// any occupant.
    ///
    /// Fails with [`ChessError::OutOfBounds`] if `position` does not lie on
    /// the board.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, position: Position) -> Result<(), ChessError> {
        if !position.in_bounds() {
            return Err(ChessError::OutOfBounds(position));
        }
        self.mailbox[position.row() as usize][position.col() as usize] = Some(piece);
        Ok(())
    }

    /// Takes the [`Piece`] from a given [`Position`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use chessmate::{Board, PieceKind, Position};
    /// let mut board = Board::default();
    /// let taken = board.take(Position::new(7, 1)).unwrap();
    /// assert_eq!(taken.kind(), PieceKind::Knight);
    /// assert!(board.take(Position::new(7, 1)).is_none());
    /// ```
    #[inline(always)]
    pub fn take(&mut self, position: Position) -> Option<Piece> {
        if !position.in_bounds() {
            return None;
        }
        self.mailbox[position.row() as usize][position.col() as usize].take()
    }

    /// Fetches the [`Piece`] at the provided [`Position`], if there is one.
    ///
    /// Returns `None` for out-of-bounds positions; use
    /// [`Board::piece_checked`] if you need that case surfaced as an error.
    #[inline(always)]
    pub const fn piece_at(&self, position: Position) -> Option<Piece> {
        if !position.in_bounds() {
            return None;
        }
        self.mailbox[position.row() as usize][position.col() as usize]
    }

    /// Like [`Board::piece_at`], but fails with [`ChessError::OutOfBounds`]
    /// rather than conflating "off the board" with "empty".
    #[inline(always)]
    pub const fn piece_checked(&self, position: Position) -> Result<Option<Piece>, ChessError> {
        if !position.in_bounds() {
            return Err(ChessError::OutOfBounds(position));
        }
        Ok(self.mailbox[position.row() as usize][position.col() as usize])
    }

    /// Fetches the [`Color`] of the piece at the provided [`Position`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, position: Position) -> Option<Color> {
        self.piece_at(position).map(|piece| piece.color())
    }

    /// Iterates over all `(Position, Piece)` pairs of occupied cells, row by row.
    ///
    /// # Example
    /// ```
    /// # use chessmate::Board;
    /// let board = Board::default();
    /// assert_eq!(board.iter().count(), 32);
    /// ```
    #[inline(always)]
    pub const fn iter(&self) -> BoardIter<'_> {
        BoardIter {
            board: self,
            next: 0,
        }
    }
}

impl Default for Board {
    /// The standard chess starting position.
    #[inline(always)]
    fn default() -> Self {
        // Safe unwrap because the FEN for startpos is always valid
        Self::from_fen(FEN_STARTPOS).unwrap()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Index<Position> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, position: Position) -> &Self::Output {
        &self.mailbox[position.row() as usize][position.col() as usize]
    }
}

impl fmt::Display for Board {
    /// Display this board's FEN placements.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Board {
    /// Renders the grid with rank and file legends.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.mailbox.iter().enumerate() {
            write!(f, "{}|", BOARD_SIZE - row as u8)?;
            for cell in cells {
                let piece_char = cell.map(|piece| piece.char()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in 0..SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n  ")?;
        for file in 'a'..='h' {
            write!(f, " {file}")?;
        }
        Ok(())
    }
}

/// An [`Iterator`] over the occupied cells of a [`Board`].
pub struct BoardIter<'a> {
    board: &'a Board,
    next: usize,
}

impl Iterator for BoardIter<'_> {
    type Item = (Position, Piece);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < SIZE * SIZE {
            let position = Position::new((self.next / SIZE) as u8, (self.next % SIZE) as u8);
            self.next += 1;
            if let Some(piece) = self.board.piece_at(position) {
                return Some((position, piece));
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a Board {
    type IntoIter = BoardIter<'a>;
    type Item = (Position, Piece);

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
