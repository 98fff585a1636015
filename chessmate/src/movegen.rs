/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, MoveMask, Piece, PieceKind, Position};

/// The 8 cells adjacent to a King.
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 8 L-shaped Knight offsets.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Orthogonal step directions, for Rooks.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal step directions, for Bishops.
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Computes the [`MoveMask`] of legal destinations for `piece` standing on
/// `from`, given the occupancy of `board`.
///
/// This is piece geometry only: the mask knows nothing about check. A
/// destination that would expose the mover's own King is still marked here and
/// rejected later by the match controller's self-check guard.
pub fn mobility_for(piece: Piece, from: Position, board: &Board) -> MoveMask {
    let color = piece.color();
    match piece.kind() {
        PieceKind::King => king_moves(board, from, color),
        PieceKind::Queen => queen_moves(board, from, color),
        PieceKind::Rook => rook_moves(board, from, color),
        PieceKind::Bishop => bishop_moves(board, from, color),
        PieceKind::Knight => knight_moves(board, from, color),
        PieceKind::Pawn => pawn_moves(board, from, color, piece.has_moved()),
    }
}

/// Legal destinations for a King on `from`: the adjacent cells that are empty
/// or hold an enemy piece.
#[inline(always)]
pub fn king_moves(board: &Board, from: Position, color: Color) -> MoveMask {
    leaper_moves(board, from, color, &KING_OFFSETS)
}

/// Legal destinations for a Knight on `from`: the L-shaped cells that are
/// empty or hold an enemy piece.
#[inline(always)]
pub fn knight_moves(board: &Board, from: Position, color: Color) -> MoveMask {
    leaper_moves(board, from, color, &KNIGHT_OFFSETS)
}

/// Legal destinations for a Rook on `from`.
#[inline(always)]
pub fn rook_moves(board: &Board, from: Position, color: Color) -> MoveMask {
    slider_moves(board, from, color, &ROOK_DIRECTIONS)
}

/// Legal destinations for a Bishop on `from`.
#[inline(always)]
pub fn bishop_moves(board: &Board, from: Position, color: Color) -> MoveMask {
    slider_moves(board, from, color, &BISHOP_DIRECTIONS)
}

/// Legal destinations for a Queen on `from`: the union of Rook and Bishop
/// movement.
pub fn queen_moves(board: &Board, from: Position, color: Color) -> MoveMask {
    let mut mask = rook_moves(board, from, color);
    for to in bishop_moves(board, from, color).iter() {
        mask.set(to);
    }
    mask
}

/// Legal destinations for a Pawn on `from`.
///
/// One step forward onto an empty cell; two steps forward if the pawn has
/// never moved and both cells on the path are empty; one step diagonally
/// forward only to capture an enemy piece. White advances toward decreasing
/// rows, Black toward increasing rows.
pub fn pawn_moves(board: &Board, from: Position, color: Color, has_moved: bool) -> MoveMask {
    let mut mask = MoveMask::new();
    let forward = color.forward();

    // Single push, and the double push behind it
    if let Some(to) = from.offset(forward, 0) {
        if !board.has(to) {
            mask.set(to);

            if !has_moved {
                if let Some(two) = from.offset(2 * forward, 0) {
                    if !board.has(two) {
                        mask.set(two);
                    }
                }
            }
        }
    }

    // Diagonal captures
    for side in [-1, 1] {
        if let Some(to) = from.offset(forward, side) {
            if board.color_at(to) == Some(color.opponent()) {
                mask.set(to);
            }
        }
    }

    mask
}

/// Shared movement for pieces that jump directly to a fixed set of offsets
/// (King and Knight): each target is legal if it is on the board and not
/// occupied by a friendly piece.
fn leaper_moves(board: &Board, from: Position, color: Color, offsets: &[(i8, i8)]) -> MoveMask {
    let mut mask = MoveMask::new();

    for &(rows, cols) in offsets {
        if let Some(to) = from.offset(rows, cols) {
            if board.color_at(to) != Some(color) {
                mask.set(to);
            }
        }
    }

    mask
}

/// Shared movement for sliding pieces (Rook, Bishop, Queen): step along each
/// direction until the board edge, stopping before a friendly piece and on an
/// enemy piece (which is included as a capture).
fn slider_moves(board: &Board, from: Position, color: Color, directions: &[(i8, i8)]) -> MoveMask {
    let mut mask = MoveMask::new();

    for &(rows, cols) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(rows, cols) {
            match board.color_at(to) {
                None => mask.set(to),
                Some(occupant) => {
                    if occupant != color {
                        mask.set(to);
                    }
                    break;
                }
            }
            cursor = to;
        }
    }

    mask
}
