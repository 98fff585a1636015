/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

/// Typed failures for every rule violation a caller can recover from.
mod error;
/// A boolean legality mask over every cell of the board.
mod mask;
/// Enums for piece kinds, colors, and a struct for a chess piece.
mod piece;
/// Squares on a chessboard, in both row/column and file/rank form.
mod square;

pub use error::*;
pub use mask::*;
pub use piece::*;
pub use square::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::mask::*;
    pub use crate::piece::*;
    pub use crate::square::*;
}
