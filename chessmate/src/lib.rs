/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use chessmate_types::*;

/// A chessboard: an 8x8 grid holding at most one piece per cell.
mod board;
/// High-level abstraction of a chess match, including move validation, turn state, and check/checkmate detection.
mod game;
/// All code related to computing the legal destinations of pieces on a board.
mod movegen;

pub use board::*;
pub use game::*;
pub use movegen::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::game::*;
    pub use crate::movegen::*;
    pub use chessmate_types::*;
}
