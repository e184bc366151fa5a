//! Check detection.
//!
//! A king is in check when some opposing piece could legally capture it.
//! Each opposing piece is asked through the move validator, so check
//! detection follows exactly the same movement rules as play.

use crate::rules::validator;
use crate::rules::CastlingRights;
use chess_core::{Board, CastleSide, Color, Move, Piece, Square};

/// Returns the square of the given color's king, if it is on the board.
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.find(Piece::King, color)
}

/// Returns true if any piece of `color` could capture on `target`.
pub fn is_attacked_by(
    board: &Board,
    target: Square,
    color: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    board.pieces_of(color).any(|(from, piece)| {
        let capture = Move::capture(piece, color, from, target);
        validator::is_legal_shape(capture, board, color, last_move, castling)
    })
}

/// Returns true if the king of `king_color` is attacked.
///
/// A side without a king is never in check.
pub fn is_in_check(
    board: &Board,
    king_color: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    king_square(board, king_color).is_some_and(|king| {
        is_attacked_by(board, king, king_color.opposite(), last_move, castling)
    })
}

/// Returns true if castling on `side` starts from, passes through or lands
/// on an attacked square.
///
/// The king is placed on each square in turn on a scratch copy of the board
/// with its home square cleared, so attacks along the back row are seen.
pub fn castling_path_attacked(
    board: &Board,
    color: Color,
    side: CastleSide,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    if is_in_check(board, color, last_move, castling) {
        return true;
    }

    let back_row = color.back_row(board.height());
    let home = Square::new(CastleSide::KING_FILE, back_row);
    let target = side.king_target_file(board.width());
    let step: i8 = if target > CastleSide::KING_FILE { 1 } else { -1 };

    let mut scratch = board.clone();
    scratch.remove(home);
    let mut square = home;
    while square.x() != target {
        let Some(next) = square.offset(step, 0) else {
            return true;
        };
        square = next;
        let displaced = scratch.set(square, Some((Piece::King, color)));
        let attacked = is_attacked_by(&scratch, square, color.opposite(), last_move, castling);
        scratch.set(square, displaced);
        if attacked {
            return true;
        }
    }
    false
}
