/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

/// The color of a player and their pieces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Number of colors.
    pub const COUNT: usize = 2;

    /// Returns the opposite color.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The row direction this color's pawns advance in.
    ///
    /// White pawns move toward decreasing row indices (up the rendered board),
    /// Black pawns toward increasing row indices.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Human-readable name of this color.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    /// The FEN side-to-move char: `w` or `b`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "w"),
            Self::Black => write!(f, "b"),
        }
    }
}

/// The kind of a chess piece, independent of color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// The uppercase UCI char for this kind.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }

    /// Parses a kind from a UCI char of either case.
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind.to_ascii_uppercase() {
            'K' => Ok(Self::King),
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            'P' => Ok(Self::Pawn),
            _ => bail!("invalid char for piece kind: {kind:?}"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A chess piece: a color, a kind, and a counter of the moves it has made.
///
/// The move counter increments every time the piece is moved and decrements
/// when a speculative move is undone. Pieces are plain values; where a piece
/// sits is the board's knowledge, not the piece's.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    move_count: u16,
}

impl Piece {
    /// Creates a new [`Piece`] that has not moved yet.
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            move_count: 0,
        }
    }

    /// The [`Color`] of this piece.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The [`PieceKind`] of this piece.
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// How many times this piece has been moved.
    #[inline(always)]
    pub const fn move_count(&self) -> u16 {
        self.move_count
    }

    /// Returns `true` if this piece has ever been moved.
    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    /// Returns `true` if this piece is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns `true` if this piece is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Records one executed move.
    #[inline(always)]
    pub fn record_move(&mut self) {
        self.move_count += 1;
    }

    /// Reverses [`Piece::record_move`] when a move is rolled back.
    #[inline(always)]
    pub fn unrecord_move(&mut self) {
        self.move_count -= 1;
    }

    /// Parses a piece from a UCI char: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use chessmate_types::{Color, Piece, PieceKind};
    /// let piece = Piece::from_uci('n').unwrap();
    /// assert_eq!(piece.color(), Color::Black);
    /// assert_eq!(piece.kind(), PieceKind::Knight);
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, PieceKind::from_uci(piece)?))
    }

    /// The UCI char for this piece: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.color {
            Color::White => self.kind.char(),
            Color::Black => self.kind.char().to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_chars_round_trip() {
        for ch in ['K', 'Q', 'R', 'B', 'N', 'P', 'k', 'q', 'r', 'b', 'n', 'p'] {
            let piece = Piece::from_uci(ch).unwrap();
            assert_eq!(piece.char(), ch);
        }
        assert!(Piece::from_uci('x').is_err());
    }

    #[test]
    fn test_move_counter() {
        let mut piece = Piece::new(Color::White, PieceKind::Pawn);
        assert!(!piece.has_moved());

        piece.record_move();
        assert!(piece.has_moved());
        assert_eq!(piece.move_count(), 1);

        piece.unrecord_move();
        assert!(!piece.has_moved());
        assert_eq!(piece, Piece::new(Color::White, PieceKind::Pawn));
    }

    #[test]
    fn test_pawn_directions() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
    }
}
