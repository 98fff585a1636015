/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};
use arrayvec::ArrayVec;

use super::{
    mobility_for, Board, ChessError, ChessPosition, Color, MoveMask, Piece, Position, BOARD_SIZE,
};

/// One piece per cell is the most any position can hold, including positions
/// built from arbitrary FEN placements.
pub const MAX_PIECES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_PIECES`] pieces.
pub type CapturedList = ArrayVec<Piece, MAX_PIECES>;

/// The minimal record needed to exactly reverse one executed move.
///
/// Captured pieces are parked here, not in the match's captured list, so a
/// speculative move can be undone without touching anything but the board.
struct MoveDelta {
    from: Position,
    to: Position,
    captured: Option<Piece>,
}

/// A match of chess between two players.
///
/// Owns the [`Board`], the turn state, and the captured pieces, and is the
/// only way to mutate them: every move goes through [`Match::perform_move`],
/// which validates it, guards against self-check by speculatively applying and
/// rolling it back, and updates the check/checkmate flags.
///
/// Every failure leaves the match exactly as it was, so the caller may report
/// the error and retry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Match {
    /// Piece placements.
    board: Board,

    /// Starts at 1 and increments after each completed move.
    turn: u32,

    /// The [`Color`] of the player who moves next.
    side_to_move: Color,

    /// Whether `side_to_move` is in check. After a mating move the turn never
    /// changes hands, so the flag then describes the mated opponent.
    check: bool,

    /// Whether the game has ended in checkmate. Once set, it never clears.
    checkmate: bool,

    /// Every piece captured so far, in capture order. Retained for game history.
    captured: CapturedList,
}

impl Match {
    /// Creates a new [`Match`] with the standard starting position, White to
    /// move, on turn 1.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            turn: 1,
            side_to_move: Color::White,
            check: false,
            checkmate: false,
            captured: CapturedList::new(),
        }
    }

    /// Creates a [`Match`] from FEN piece placements and a side to move, on
    /// turn 1 with no captures.
    ///
    /// Both kings must be present. The check and checkmate flags are computed
    /// from the given position.
    pub fn from_fen(placements: &str, side_to_move: Color) -> Result<Self> {
        let board = Board::from_fen(placements)?;
        for color in [Color::White, Color::Black] {
            if Self::king_position(&board, color).is_err() {
                bail!("cannot start a match without a {} king", color.name());
            }
        }

        let check = Self::in_check_on(&board, side_to_move)?;
        let mut game = Self {
            board,
            turn: 1,
            side_to_move,
            check,
            checkmate: false,
            captured: CapturedList::new(),
        };
        if game.check {
            game.checkmate = Self::checkmate_on(&mut game.board, side_to_move)?;
        }

        Ok(game)
    }

    /// The legal destinations of the piece on `source`.
    ///
    /// Fails with [`ChessError::NoPieceAtSource`] if the square is empty and
    /// [`ChessError::NoLegalMoves`] if the piece cannot move at all. This is a
    /// read-only query and deliberately does *not* require the piece to belong
    /// to the side to move; only [`Match::perform_move`] enforces ownership.
    pub fn possible_moves(&self, source: ChessPosition) -> Result<MoveMask, ChessError> {
        let from = source.to_position();
        let piece = self
            .board
            .piece_at(from)
            .ok_or(ChessError::NoPieceAtSource(source))?;

        let mask = mobility_for(piece, from, &self.board);
        if !mask.any() {
            return Err(ChessError::NoLegalMoves(source));
        }

        Ok(mask)
    }

    /// Moves the piece on `source` to `target`, returning the captured piece,
    /// if any.
    ///
    /// Validation happens before any mutation: the source must hold a piece of
    /// the side to move with at least one legal destination, and `target` must
    /// be among those destinations. The move is then applied speculatively; if
    /// it leaves the mover's own king in check it is rolled back exactly and
    /// [`ChessError::SelfCheckViolation`] is returned, with the turn
    /// unchanged.
    ///
    /// A completed move recomputes the opponent's check state. If the opponent
    /// is checkmated, the checkmate flag is set and the turn does not advance
    /// (the game is over); otherwise the turn counter increments and the
    /// opponent is to move.
    ///
    /// Once the game has ended, every further move fails with
    /// [`ChessError::GameOver`].
    pub fn perform_move(
        &mut self,
        source: ChessPosition,
        target: ChessPosition,
    ) -> Result<Option<Piece>, ChessError> {
        if self.checkmate {
            return Err(ChessError::GameOver(self.side_to_move));
        }

        let from = source.to_position();
        let to = target.to_position();

        let piece = self
            .board
            .piece_at(from)
            .ok_or(ChessError::NoPieceAtSource(source))?;
        if piece.color() != self.side_to_move {
            return Err(ChessError::NotYourPiece {
                square: source,
                color: piece.color(),
            });
        }

        let mask = mobility_for(piece, from, &self.board);
        if !mask.any() {
            return Err(ChessError::NoLegalMoves(source));
        }
        if !mask.get(to) {
            return Err(ChessError::MoveNotAllowed {
                from: source,
                to: target,
            });
        }

        // Apply the move, then make sure it didn't expose our own king
        let delta = Self::apply(&mut self.board, from, to);
        match Self::in_check_on(&self.board, self.side_to_move) {
            Ok(false) => {}
            Ok(true) => {
                Self::revert(&mut self.board, delta);
                return Err(ChessError::SelfCheckViolation);
            }
            Err(err) => {
                Self::revert(&mut self.board, delta);
                return Err(err);
            }
        }

        // Compute the opponent's new check state before committing anything,
        // so a failure here (a hand-built position where the opponent's king
        // was itself capturable) rolls back to the exact pre-move match.
        let opponent = self.side_to_move.opponent();
        let check = match Self::in_check_on(&self.board, opponent) {
            Ok(check) => check,
            Err(err) => {
                Self::revert(&mut self.board, delta);
                return Err(err);
            }
        };
        let checkmate = check && Self::checkmate_on(&mut self.board, opponent)?;

        // The move stands; commit the capture to the match history
        if let Some(captured) = delta.captured {
            self.captured.push(captured);
        }
        self.check = check;

        if checkmate {
            self.checkmate = true;
        } else {
            self.turn += 1;
            self.side_to_move = opponent;
        }

        Ok(delta.captured)
    }

    /// Returns `true` if `color`'s king is attacked by any enemy piece.
    #[inline(always)]
    pub fn in_check(&self, color: Color) -> Result<bool, ChessError> {
        Self::in_check_on(&self.board, color)
    }

    /// Returns `true` if `color` is in check and no legal move of any of its
    /// pieces escapes it.
    pub fn checkmated(&self, color: Color) -> Result<bool, ChessError> {
        let mut scratch = self.board;
        Self::checkmate_on(&mut scratch, color)
    }

    /// Fetch this match's [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// A snapshot of the full piece grid, row 0 at the top (rank 8). Intended
    /// for display callers.
    pub fn pieces(&self) -> [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
        let mut grid = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for (position, piece) in self.board.iter() {
            grid[position.row() as usize][position.col() as usize] = Some(piece);
        }
        grid
    }

    /// Every piece captured so far, in capture order.
    #[inline(always)]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// The current turn number, starting at 1.
    #[inline(always)]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The [`Color`] of the player who moves next.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns `true` if a king is currently in check.
    ///
    /// While the game is in progress this refers to [`Match::side_to_move`].
    /// A mating move never flips the player, so once
    /// [`Match::is_in_checkmate`] returns `true` the flag describes the
    /// mated opponent of the (winning) side to move.
    #[inline(always)]
    pub const fn is_in_check(&self) -> bool {
        self.check
    }

    /// Returns `true` if the game has ended in checkmate.
    #[inline(always)]
    pub const fn is_in_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Executes `from -> to` on the board, returning the exact delta needed to
    /// reverse it. The mover's move counter is incremented; any occupant of
    /// `to` is captured into the delta.
    fn apply(board: &mut Board, from: Position, to: Position) -> MoveDelta {
        let Some(mut mover) = board.take(from) else {
            panic!("attempted to move from the empty square {from}");
        };
        mover.record_move();

        let captured = board.take(to);
        // Safe unwrap because `to` came from a move mask, which only marks
        // cells on the board
        board.place(mover, to).unwrap();

        MoveDelta { from, to, captured }
    }

    /// Exactly reverses a delta produced by [`Match::apply`]: the mover
    /// returns to its source with its move counter decremented, and any
    /// captured piece is restored to its cell.
    fn revert(board: &mut Board, delta: MoveDelta) {
        let Some(mut mover) = board.take(delta.to) else {
            panic!("attempted to roll back a move with no piece on {}", delta.to);
        };
        mover.unrecord_move();

        // Safe unwraps: both cells held pieces moments ago
        board.place(mover, delta.from).unwrap();
        if let Some(captured) = delta.captured {
            board.place(captured, delta.to).unwrap();
        }
    }

    /// Locates `color`'s king on `board`.
    ///
    /// A missing king means the match state is corrupt, since the self-check
    /// guard never lets a king be captured.
    fn king_position(board: &Board, color: Color) -> Result<Position, ChessError> {
        board
            .iter()
            .find(|(_, piece)| piece.is_king() && piece.color() == color)
            .map(|(position, _)| position)
            .ok_or(ChessError::MissingKing(color))
    }

    /// Returns `true` if any enemy piece's move mask marks `color`'s king.
    fn in_check_on(board: &Board, color: Color) -> Result<bool, ChessError> {
        let king = Self::king_position(board, color)?;

        Ok(board
            .iter()
            .filter(|(_, piece)| piece.color() == color.opponent())
            .any(|(from, piece)| mobility_for(piece, from, board).get(king)))
    }

    /// Returns `true` if `color` is in check and every legal destination of
    /// every one of its pieces, when tried, still leaves its king in check.
    ///
    /// Each trial move is applied and unconditionally undone, so `board` is
    /// unchanged when this returns.
    fn checkmate_on(board: &mut Board, color: Color) -> Result<bool, ChessError> {
        if !Self::in_check_on(board, color)? {
            return Ok(false);
        }

        let movers: ArrayVec<(Position, Piece), MAX_PIECES> = board
            .iter()
            .filter(|(_, piece)| piece.color() == color)
            .collect();

        for (from, piece) in movers {
            let mask = mobility_for(piece, from, board);
            for to in mask.iter() {
                let delta = Self::apply(board, from, to);
                let still_in_check = Self::in_check_on(board, color);
                Self::revert(board, delta);

                if !still_in_check? {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

impl Default for Match {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Match {
    /// The rendered board followed by a one-line status.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.board)?;
        writeln!(f)?;

        if self.checkmate {
            write!(
                f,
                "CHECKMATE: {} wins on turn {}",
                self.side_to_move.name(),
                self.turn
            )
        } else {
            write!(f, "Turn {}: {} to move", self.turn, self.side_to_move.name())?;
            if self.check {
                write!(f, " (check)")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, FEN_STARTPOS};

    fn square(uci: &str) -> ChessPosition {
        uci.parse().unwrap()
    }

    fn play(game: &mut Match, moves: &[(&str, &str)]) {
        for &(from, to) in moves {
            game.perform_move(square(from), square(to)).unwrap();
        }
    }

    #[test]
    fn test_new_match_is_the_standard_setup() {
        let game = Match::new();
        assert_eq!(game.board().to_fen(), FEN_STARTPOS);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(!game.is_in_check());
        assert!(!game.is_in_checkmate());
        assert!(game.captured().is_empty());
    }

    #[test]
    fn test_opening_double_push() {
        let mut game = Match::new();
        let captured = game.perform_move(square("a2"), square("a4")).unwrap();

        assert_eq!(captured, None);
        assert_eq!(game.turn(), 2);
        assert_eq!(game.side_to_move(), Color::Black);

        let pawn = game.board().piece_at(square("a4").to_position()).unwrap();
        assert_eq!(pawn.kind(), PieceKind::Pawn);
        assert_eq!(pawn.move_count(), 1);
        assert!(!game.board().has(square("a2").to_position()));
    }

    #[test]
    fn test_cannot_move_the_opponents_piece() {
        let mut game = Match::new();
        let before = game.clone();

        let err = game.perform_move(square("a7"), square("a6")).unwrap_err();
        assert_eq!(
            err,
            ChessError::NotYourPiece {
                square: square("a7"),
                color: Color::Black,
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_empty_source_square() {
        let mut game = Match::new();
        let err = game.perform_move(square("e4"), square("e5")).unwrap_err();
        assert_eq!(err, ChessError::NoPieceAtSource(square("e4")));
    }

    #[test]
    fn test_boxed_in_piece_has_no_legal_moves() {
        // The a1 rook is blocked by its own pawn and knight at game start
        let mut game = Match::new();
        let err = game.perform_move(square("a1"), square("a3")).unwrap_err();
        assert_eq!(err, ChessError::NoLegalMoves(square("a1")));

        let err = game.possible_moves(square("a1")).unwrap_err();
        assert_eq!(err, ChessError::NoLegalMoves(square("a1")));
    }

    #[test]
    fn test_unreachable_target() {
        let mut game = Match::new();
        let before = game.clone();

        let err = game.perform_move(square("e2"), square("e5")).unwrap_err();
        assert_eq!(
            err,
            ChessError::MoveNotAllowed {
                from: square("e2"),
                to: square("e5"),
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_possible_moves_ignores_ownership() {
        // White to move, but the opponent's pawn can still be queried
        let game = Match::new();
        let mask = game.possible_moves(square("a7")).unwrap();

        assert_eq!(mask.count(), 2);
        assert!(mask.get(square("a6").to_position()));
        assert!(mask.get(square("a5").to_position()));
    }

    #[test]
    fn test_possible_moves_of_a_knight_at_the_edge() {
        let game = Match::new();
        let mask = game.possible_moves(square("b1")).unwrap();

        assert_eq!(mask.count(), 2);
        assert!(mask.get(square("a3").to_position()));
        assert!(mask.get(square("c3").to_position()));
    }

    #[test]
    fn test_capture_moves_piece_to_the_captured_list() {
        let mut game = Match::new();
        play(&mut game, &[("e2", "e4"), ("d7", "d5")]);

        let captured = game.perform_move(square("e4"), square("d5")).unwrap();
        let pawn = captured.unwrap();
        assert_eq!(pawn.color(), Color::Black);
        assert_eq!(pawn.kind(), PieceKind::Pawn);

        assert_eq!(game.captured(), &[pawn]);
        assert_eq!(game.board().iter().count(), 31);
        assert_eq!(
            game.board().color_at(square("d5").to_position()),
            Some(Color::White)
        );
    }

    #[test]
    fn test_turn_alternation() {
        let mut game = Match::new();
        play(
            &mut game,
            &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")],
        );

        assert_eq!(game.turn(), 5);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(
            game.board().to_fen(),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"
        );
        assert_eq!(game.pieces().iter().flatten().flatten().count(), 32);
    }

    #[test]
    fn test_moving_a_pinned_piece_is_rolled_back() {
        // White rook on e4 is the only piece between its king and the black
        // rook on e8; moving it off the file must fail and change nothing.
        let mut game = Match::from_fen("4r2k/8/8/8/4R3/8/8/4K3", Color::White).unwrap();
        let before = game.clone();

        let err = game.perform_move(square("e4"), square("a4")).unwrap_err();
        assert_eq!(err, ChessError::SelfCheckViolation);
        assert_eq!(game, before);

        // Moving along the pin file is still fine
        game.perform_move(square("e4"), square("e6")).unwrap();
        assert_eq!(game.turn(), 2);
    }

    #[test]
    fn test_self_check_rollback_restores_captures() {
        // The knight on e4 shields its king from the e8 rook; capturing the
        // c5 pawn would expose the king, so the pawn must survive the rollback.
        let mut game = Match::from_fen("4r2k/8/8/2p5/4N3/8/8/4K3", Color::White).unwrap();
        let before = game.clone();

        let err = game.perform_move(square("e4"), square("c5")).unwrap_err();
        assert_eq!(err, ChessError::SelfCheckViolation);
        assert_eq!(game, before);
        assert!(game.captured().is_empty());
        assert_eq!(
            game.board().color_at(square("c5").to_position()),
            Some(Color::Black)
        );
    }

    #[test]
    fn test_pinned_piece_advertises_moves_but_none_succeed() {
        // A pinned knight still reports destinations; every attempt fails at
        // the self-check guard.
        let mut game = Match::from_fen("4r2k/8/8/8/4N3/8/8/4K3", Color::White).unwrap();
        let mask = game.possible_moves(square("e4")).unwrap();
        assert!(mask.any());

        for to in mask.iter() {
            let target = ChessPosition::from_position(to).unwrap();
            let err = game.perform_move(square("e4"), target).unwrap_err();
            assert_eq!(err, ChessError::SelfCheckViolation);
        }
        assert_eq!(game.turn(), 1);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn test_check_is_flagged_for_the_opponent() {
        let mut game = Match::from_fen("r3k3/8/8/8/8/8/8/4K3", Color::Black).unwrap();
        game.perform_move(square("a8"), square("a1")).unwrap();

        assert!(game.is_in_check());
        assert!(!game.is_in_checkmate());
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.turn(), 2);
        assert!(game.in_check(Color::White).unwrap());
        assert!(!game.in_check(Color::Black).unwrap());
    }

    #[test]
    fn test_ladder_mate_ends_the_game() {
        // Rb7 seals the seventh rank; Ra1-a8 delivers mate to the h8 king.
        let mut game = Match::from_fen("7k/1R6/8/8/8/8/8/R3K3", Color::White).unwrap();
        game.perform_move(square("a1"), square("a8")).unwrap();

        assert!(game.is_in_check());
        assert!(game.is_in_checkmate());
        // A mating move does not advance the turn or flip the player
        assert_eq!(game.turn(), 1);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.checkmated(Color::Black).unwrap());

        // The game is over; the losing side has no valid reply that matters,
        // and the flags stay put
        assert!(game.is_in_checkmate());
    }

    #[test]
    fn test_no_move_is_accepted_after_checkmate() {
        let mut game = Match::from_fen("7k/1R6/8/8/8/8/8/R3K3", Color::White).unwrap();
        game.perform_move(square("a1"), square("a8")).unwrap();
        assert!(game.is_in_checkmate());
        let over = game.clone();

        // Not even the winner capturing the mated king
        let err = game.perform_move(square("a8"), square("h8")).unwrap_err();
        assert_eq!(err, ChessError::GameOver(Color::White));
        assert_eq!(game, over);

        // The mated side gets no reply either
        let err = game.perform_move(square("h8"), square("h7")).unwrap_err();
        assert_eq!(err, ChessError::GameOver(Color::White));
        assert_eq!(game, over);
    }

    #[test]
    fn test_capturing_a_hanging_king_is_rolled_back() {
        // A hand-built position can leave the opponent's king capturable
        // mid-game. The capture must fail and change nothing, rather than
        // remove the king and corrupt the match.
        let mut game = Match::from_fen("4k3/4R3/8/8/8/8/8/4K3", Color::White).unwrap();
        let before = game.clone();

        let err = game.perform_move(square("e7"), square("e8")).unwrap_err();
        assert_eq!(err, ChessError::MissingKing(Color::Black));
        assert_eq!(game, before);
        assert!(game.captured().is_empty());
        assert!(game.board().has(square("e8").to_position()));
    }

    #[test]
    fn test_crowded_positions_are_searchable() {
        // Far more than a conventional army's worth of pawns on one side;
        // the checkmate search triggered by the constructor has to trial
        // every one of them.
        let game =
            Match::from_fen("r3K2k/PPPPPPPP/PPPPPPPP/P7/8/8/8/8", Color::White).unwrap();
        assert!(game.is_in_check());
        // The b7 pawn interposes on b8, so this is check, not mate
        assert!(!game.is_in_checkmate());
    }

    #[test]
    fn test_check_with_an_escape_is_not_checkmate() {
        // The h8 king is checked by the a8 rook but g7 and h7 are free
        let game = Match::from_fen("R6k/8/8/8/8/8/8/4K3", Color::Black).unwrap();
        assert!(game.in_check(Color::Black).unwrap());
        assert!(!game.checkmated(Color::Black).unwrap());
        assert!(game.is_in_check());
        assert!(!game.is_in_checkmate());
    }

    #[test]
    fn test_blocking_refutes_checkmate() {
        // Every king move is covered by the two rooks, but Re2-a2 interposes
        // on the a-file, so this is check, not checkmate.
        let game = Match::from_fen("rr5k/8/8/8/8/8/4R3/K7", Color::White).unwrap();
        assert!(game.in_check(Color::White).unwrap());
        assert!(!game.checkmated(Color::White).unwrap());

        // Without the blocker it is checkmate
        let game = Match::from_fen("rr5k/8/8/8/8/8/8/K7", Color::White).unwrap();
        assert!(game.checkmated(Color::White).unwrap());
        assert!(game.is_in_checkmate());
    }

    #[test]
    fn test_from_fen_requires_both_kings() {
        assert!(Match::from_fen("8/8/8/8/8/8/8/R3K3", Color::White).is_err());
        assert!(Match::from_fen("8/8/8/8/8/8/8/8", Color::White).is_err());
    }

    #[test]
    fn test_missing_king_is_an_invariant_error() {
        let board = Board::from_fen("8/8/8/8/8/8/8/R7").unwrap();
        assert_eq!(
            Match::in_check_on(&board, Color::White),
            Err(ChessError::MissingKing(Color::White))
        );
    }

    #[test]
    fn test_match_stays_usable_after_failures() {
        let mut game = Match::new();

        assert!(game.perform_move(square("e4"), square("e5")).is_err());
        assert!(game.perform_move(square("a7"), square("a6")).is_err());
        assert!(game.perform_move(square("e2"), square("e5")).is_err());

        // A valid move still goes through
        game.perform_move(square("e2"), square("e4")).unwrap();
        assert_eq!(game.turn(), 2);
    }
}
