/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{ChessPosition, Color, Position};

/// Every way a chess operation can fail.
///
/// All variants are recoverable: a failed operation never leaves the match in
/// a corrupted state, so the caller may report the error and retry with
/// different input. [`ChessError::MissingKing`] is the one exception in
/// spirit; it indicates a bug or a hand-built position without a king, never a
/// user mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A coordinate outside `a1..=h8` was supplied or parsed.
    #[error("invalid chess position {0:?}: expected a file in a-h and a rank in 1-8")]
    InvalidPosition(String),

    /// A matrix coordinate outside the 8x8 grid reached a board operation.
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    /// The source square of a move or query is empty.
    #[error("there is no piece on {0}")]
    NoPieceAtSource(ChessPosition),

    /// The piece on the source square belongs to the opponent.
    #[error("the piece on {square} belongs to {}", .color.name())]
    NotYourPiece {
        square: ChessPosition,
        color: Color,
    },

    /// The chosen piece has no legal destination at all.
    #[error("there are no possible moves for the piece on {0}")]
    NoLegalMoves(ChessPosition),

    /// The target square is not among the source piece's legal destinations.
    #[error("the piece on {from} cannot move to {to}")]
    MoveNotAllowed {
        from: ChessPosition,
        to: ChessPosition,
    },

    /// The move would leave the mover's own king in check. The move has been
    /// fully rolled back.
    #[error("you cannot put your own king in check")]
    SelfCheckViolation,

    /// A move was attempted after the game already ended in checkmate. The
    /// winner is carried so callers can report the result.
    #[error("the game is over: {} won by checkmate", .0.name())]
    GameOver(Color),

    /// No king of the given color is on the board. Kings are never capturable,
    /// so this indicates corrupt match state.
    #[error("there is no {} king on the board", .0.name())]
    MissingKing(Color),
}
