//! Move shape validation.
//!
//! [`validate`] answers one question: may this piece make this move on this
//! board, ignoring whether the mover's king ends up attacked? Sliding moves
//! longer than one square are checked by validating the same move one
//! square shorter, so a clear path falls out of the empty-destination rule
//! applied at every step.

use super::CastlingRights;
use chess_core::{Board, CastleSide, Color, Move, MoveKind, Piece, Square};

/// Checks the shape of a move and classifies it.
///
/// Returns `None` for any illegal shape:
/// - the squares are off the board or identical
/// - the mover is not the side to move or the piece is not on `from`
/// - a capture onto an empty or friendly square, or a quiet move onto an
///   occupied one (castling and en passant excepted)
/// - a movement pattern the piece cannot make, or a blocked path
pub fn validate(
    mov: Move,
    board: &Board,
    mover: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> Option<MoveKind> {
    if !board.contains(mov.from) || !board.contains(mov.to) || mov.from == mov.to {
        return None;
    }
    if mov.color != mover || board.piece_at(mov.from) != Some((mov.piece, mov.color)) {
        return None;
    }
    if let Some(promotion) = mov.promotion {
        let far_row = mov.color.promotion_row(board.height());
        if mov.piece != Piece::Pawn || mov.to.y() != far_row || !promotion.is_promotion_target() {
            return None;
        }
    }

    if mov.piece == Piece::Pawn && is_en_passant(mov, board, last_move) {
        return Some(MoveKind::EnPassant);
    }
    if mov.piece == Piece::King {
        if let Some(side) = castle_side(mov, board) {
            return castling_allowed(mov.color, side, board, castling)
                .then_some(MoveKind::Castle(side));
        }
    }

    let target = board.piece_at(mov.to);
    let claim_holds = match target {
        Some((_, color)) => mov.capture && color != mov.color,
        None => !mov.capture,
    };
    if !claim_holds {
        return None;
    }

    match mov.piece {
        Piece::Pawn => pawn_shape(mov, board),
        Piece::Knight => {
            let (dx, dy) = mov.from.distance(mov.to);
            ((dx, dy) == (1, 2) || (dx, dy) == (2, 1)).then_some(MoveKind::Normal)
        }
        Piece::Bishop | Piece::Rook | Piece::Queen => {
            slider_shape(mov, board, mover, last_move, castling)
        }
        Piece::King => {
            let (dx, dy) = mov.from.distance(mov.to);
            (dx <= 1 && dy <= 1).then_some(MoveKind::Normal)
        }
    }
}

/// Returns true if the move has a legal shape. See [`validate`].
#[inline]
pub fn is_legal_shape(
    mov: Move,
    board: &Board,
    mover: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    validate(mov, board, mover, last_move, castling).is_some()
}

/// Returns the square a pawn passed over on the last move, if that move was
/// a double push.
pub fn en_passant_target(last_move: Option<Move>) -> Option<Square> {
    let last = last_move?;
    if !last.is_double_push() {
        return None;
    }
    let passed_row = (last.from.y() + last.to.y()) / 2;
    Some(Square::new(last.to.x(), passed_row))
}

/// Returns the square of the pawn an en-passant move removes.
#[inline]
pub fn en_passant_victim(mov: Move) -> Square {
    Square::new(mov.to.x(), mov.from.y())
}

fn is_en_passant(mov: Move, board: &Board, last_move: Option<Move>) -> bool {
    let (Some(last), Some(passed)) = (last_move, en_passant_target(last_move)) else {
        return false;
    };
    last.color != mov.color
        && last.to.y() == mov.from.y()
        && last.to.x().abs_diff(mov.from.x()) == 1
        && mov.to == passed
        && board.is_empty(passed)
        && board.piece_at(last.to) == Some((Piece::Pawn, last.color))
}

fn pawn_shape(mov: Move, board: &Board) -> Option<MoveKind> {
    let direction = mov.color.pawn_direction();
    let forward = mov.from.y().checked_add_signed(direction) == Some(mov.to.y());
    let (dx, dy) = mov.from.distance(mov.to);

    if mov.capture {
        return (forward && dx == 1).then_some(MoveKind::Normal);
    }
    if dx != 0 {
        return None;
    }
    if forward {
        return Some(MoveKind::Normal);
    }

    let start_row = mov.color.pawn_row(board.height());
    if dy != 2 || mov.from.y() != start_row {
        return None;
    }
    let passed = mov.from.offset(0, direction)?;
    let toward = mov.from.y().checked_add_signed(2 * direction) == Some(mov.to.y());
    (toward && board.is_empty(passed)).then_some(MoveKind::DoublePush)
}

fn slider_shape(
    mov: Move,
    board: &Board,
    mover: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> Option<MoveKind> {
    let (dx, dy) = mov.from.distance(mov.to);
    let straight = dx == 0 || dy == 0;
    let diagonal = dx == dy;
    let on_line = match mov.piece {
        Piece::Rook => straight,
        Piece::Bishop => diagonal,
        _ => straight || diagonal,
    };
    if !on_line {
        return None;
    }
    if dx <= 1 && dy <= 1 {
        return Some(MoveKind::Normal);
    }

    // The square just short of the destination must itself be a legal quiet
    // move; recursing walks the whole path back to the origin.
    let (sx, sy) = mov.to.step_toward(mov.from);
    let shorter = Move::new(mov.piece, mov.color, mov.from, mov.to.offset(sx, sy)?);
    validate(shorter, board, mover, last_move, castling).map(|_| MoveKind::Normal)
}

/// Recognises the two castling encodings of a king move: onto its own
/// rook's corner with a capture claim, or onto the castled king square
/// without one.
fn castle_side(mov: Move, board: &Board) -> Option<CastleSide> {
    let width = board.width();
    if width < CastleSide::MIN_WIDTH {
        return None;
    }
    let back_row = mov.color.back_row(board.height());
    if mov.from != Square::new(CastleSide::KING_FILE, back_row) || mov.to.y() != back_row {
        return None;
    }
    CastleSide::ALL.into_iter().find(|side| {
        let onto_rook = mov.to.x() == side.rook_file(width) && mov.capture;
        let onto_target = mov.to.x() == side.king_target_file(width) && !mov.capture;
        onto_rook || onto_target
    })
}

fn castling_allowed(
    color: Color,
    side: CastleSide,
    board: &Board,
    castling: &CastlingRights,
) -> bool {
    if !castling.is_available(color, side) {
        return false;
    }
    let back_row = color.back_row(board.height());
    let rook_file = side.rook_file(board.width());
    if board.piece_at(Square::new(rook_file, back_row)) != Some((Piece::Rook, color)) {
        return false;
    }
    let (low, high) = if rook_file < CastleSide::KING_FILE {
        (rook_file, CastleSide::KING_FILE)
    } else {
        (CastleSide::KING_FILE, rook_file)
    };
    (low + 1..high).all(|x| board.is_empty(Square::new(x, back_row)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_layout;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s, 8).unwrap()
    }

    fn board(layout: &str) -> Board {
        parse_layout(layout, 8, 8).unwrap()
    }

    fn check(board: &Board, mov: Move) -> Option<MoveKind> {
        validate(mov, board, mov.color, None, &CastlingRights::ALL)
    }

    fn quiet(piece: Piece, color: Color, from: &str, to: &str) -> Move {
        Move::new(piece, color, sq(from), sq(to))
    }

    fn takes(piece: Piece, color: Color, from: &str, to: &str) -> Move {
        Move::capture(piece, color, sq(from), sq(to))
    }

    #[test]
    fn wrong_side_or_missing_piece() {
        let b = Board::standard();
        let e2e4 = quiet(Piece::Pawn, Color::White, "e2", "e4");
        assert_eq!(validate(e2e4, &b, Color::Black, None, &CastlingRights::ALL), None);
        assert_eq!(check(&b, quiet(Piece::Knight, Color::White, "e2", "e4")), None);
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e3", "e4")), None);
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e2", "e2")), None);
    }

    #[test]
    fn pawn_pushes() {
        let b = Board::standard();
        assert_eq!(
            check(&b, quiet(Piece::Pawn, Color::White, "e2", "e3")),
            Some(MoveKind::Normal)
        );
        assert_eq!(
            check(&b, quiet(Piece::Pawn, Color::White, "e2", "e4")),
            Some(MoveKind::DoublePush)
        );
        assert_eq!(
            check(&b, quiet(Piece::Pawn, Color::Black, "d7", "d5")),
            Some(MoveKind::DoublePush)
        );
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e2", "e5")), None);
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e2", "d3")), None);
    }

    #[test]
    fn pawn_never_moves_backward() {
        let b = board("4k3/8/8/8/4P3/8/8/4K3");
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e4", "e3")), None);
        assert_eq!(
            check(&b, quiet(Piece::Pawn, Color::White, "e4", "e5")),
            Some(MoveKind::Normal)
        );
    }

    #[test]
    fn double_push_only_from_start_and_unblocked() {
        let b = board("4k3/8/8/8/8/4P3/8/4K3");
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e3", "e5")), None);

        let blocked = board("4k3/8/8/8/8/4n3/4P3/4K3");
        assert_eq!(check(&blocked, quiet(Piece::Pawn, Color::White, "e2", "e4")), None);
        assert_eq!(check(&blocked, quiet(Piece::Pawn, Color::White, "e2", "e3")), None);
    }

    #[test]
    fn pawn_captures_diagonally_only() {
        let b = board("4k3/8/8/3p1p2/4P3/8/8/4K3");
        assert_eq!(
            check(&b, takes(Piece::Pawn, Color::White, "e4", "d5")),
            Some(MoveKind::Normal)
        );
        assert_eq!(
            check(&b, takes(Piece::Pawn, Color::White, "e4", "f5")),
            Some(MoveKind::Normal)
        );
        // a diagonal step needs the capture claim
        assert_eq!(check(&b, quiet(Piece::Pawn, Color::White, "e4", "d5")), None);

        let head_on = board("4k3/8/8/4p3/4P3/8/8/4K3");
        assert_eq!(check(&head_on, takes(Piece::Pawn, Color::White, "e4", "e5")), None);
        assert_eq!(check(&head_on, quiet(Piece::Pawn, Color::White, "e4", "e5")), None);
    }

    #[test]
    fn en_passant_after_double_push() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3");
        let last = quiet(Piece::Pawn, Color::Black, "d7", "d5");
        let ep = quiet(Piece::Pawn, Color::White, "e5", "d6");
        assert_eq!(
            validate(ep, &b, Color::White, Some(last), &CastlingRights::ALL),
            Some(MoveKind::EnPassant)
        );
        assert_eq!(en_passant_target(Some(last)), Some(sq("d6")));
        assert_eq!(en_passant_victim(ep), sq("d5"));
    }

    #[test]
    fn en_passant_needs_the_double_push_just_played() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3");
        let ep = quiet(Piece::Pawn, Color::White, "e5", "d6");
        let single = quiet(Piece::Pawn, Color::Black, "d6", "d5");
        assert_eq!(validate(ep, &b, Color::White, Some(single), &CastlingRights::ALL), None);
        assert_eq!(validate(ep, &b, Color::White, None, &CastlingRights::ALL), None);

        // wrong file: the pushed pawn is not adjacent
        let b = board("4k3/8/8/2p1P3/8/8/8/4K3");
        let last = quiet(Piece::Pawn, Color::Black, "c7", "c5");
        let ep = quiet(Piece::Pawn, Color::White, "e5", "d6");
        assert_eq!(validate(ep, &b, Color::White, Some(last), &CastlingRights::ALL), None);
    }

    #[test]
    fn promotion_rules() {
        let b = board("4k3/P7/8/8/8/8/8/4K3");
        let push = quiet(Piece::Pawn, Color::White, "a7", "a8");
        assert_eq!(check(&b, push), Some(MoveKind::Normal));
        assert_eq!(
            check(&b, push.with_promotion(Some(Piece::Queen))),
            Some(MoveKind::Normal)
        );
        assert_eq!(check(&b, push.with_promotion(Some(Piece::King))), None);
        assert_eq!(check(&b, push.with_promotion(Some(Piece::Pawn))), None);

        let b = board("4k3/8/P7/8/8/8/8/4K3");
        let early = quiet(Piece::Pawn, Color::White, "a6", "a7");
        assert_eq!(check(&b, early.with_promotion(Some(Piece::Queen))), None);

        let rook = board("4k3/R7/8/8/8/8/8/4K3");
        let mov = quiet(Piece::Rook, Color::White, "a7", "a8");
        assert_eq!(check(&rook, mov.with_promotion(Some(Piece::Queen))), None);
    }

    #[test]
    fn knight_jumps() {
        let b = Board::standard();
        assert_eq!(
            check(&b, quiet(Piece::Knight, Color::White, "g1", "f3")),
            Some(MoveKind::Normal)
        );
        assert_eq!(
            check(&b, quiet(Piece::Knight, Color::White, "b1", "c3")),
            Some(MoveKind::Normal)
        );
        assert_eq!(check(&b, quiet(Piece::Knight, Color::White, "g1", "g3")), None);
        assert_eq!(check(&b, quiet(Piece::Knight, Color::White, "g1", "e2")), None);
    }

    #[test]
    fn rook_path_must_be_clear() {
        let b = board("4k3/8/8/8/8/8/8/R2PK3");
        assert_eq!(
            check(&b, quiet(Piece::Rook, Color::White, "a1", "a8")),
            Some(MoveKind::Normal)
        );
        assert_eq!(
            check(&b, quiet(Piece::Rook, Color::White, "a1", "c1")),
            Some(MoveKind::Normal)
        );
        assert_eq!(check(&b, quiet(Piece::Rook, Color::White, "a1", "e1")), None);
        assert_eq!(check(&b, quiet(Piece::Rook, Color::White, "a1", "b2")), None);
    }

    #[test]
    fn bishop_and_queen_lines() {
        let b = board("4k3/8/8/8/8/2p5/8/Q1B1K3");
        assert_eq!(
            check(&b, quiet(Piece::Bishop, Color::White, "c1", "h6")),
            Some(MoveKind::Normal)
        );
        assert_eq!(check(&b, quiet(Piece::Bishop, Color::White, "c1", "c5")), None);
        assert_eq!(
            check(&b, quiet(Piece::Queen, Color::White, "a1", "a8")),
            Some(MoveKind::Normal)
        );
        assert_eq!(
            check(&b, takes(Piece::Queen, Color::White, "a1", "c3")),
            Some(MoveKind::Normal)
        );
        // blocked by the pawn it would otherwise capture
        assert_eq!(check(&b, quiet(Piece::Queen, Color::White, "a1", "d4")), None);
        assert_eq!(check(&b, quiet(Piece::Queen, Color::White, "a1", "b3")), None);
    }

    #[test]
    fn cannot_capture_own_piece() {
        let b = Board::standard();
        assert_eq!(check(&b, takes(Piece::Rook, Color::White, "a1", "a2")), None);
        assert_eq!(check(&b, takes(Piece::Knight, Color::White, "g1", "e2")), None);
    }

    #[test]
    fn king_steps() {
        let b = board("4k3/8/8/8/8/8/8/4K3");
        assert_eq!(
            check(&b, quiet(Piece::King, Color::White, "e1", "f2")),
            Some(MoveKind::Normal)
        );
        assert_eq!(check(&b, quiet(Piece::King, Color::White, "e1", "e3")), None);
    }

    #[test]
    fn castling_both_encodings() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        assert_eq!(
            check(&b, takes(Piece::King, Color::White, "e1", "h1")),
            Some(MoveKind::Castle(CastleSide::KingSide))
        );
        assert_eq!(
            check(&b, quiet(Piece::King, Color::White, "e1", "g1")),
            Some(MoveKind::Castle(CastleSide::KingSide))
        );
        assert_eq!(
            check(&b, takes(Piece::King, Color::White, "e1", "a1")),
            Some(MoveKind::Castle(CastleSide::QueenSide))
        );
        assert_eq!(
            check(&b, quiet(Piece::King, Color::Black, "e8", "c8")),
            Some(MoveKind::Castle(CastleSide::QueenSide))
        );
    }

    #[test]
    fn castling_needs_right_rook_and_empty_path() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K1NR");
        assert_eq!(check(&b, takes(Piece::King, Color::White, "e1", "h1")), None);

        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        let mut rights = CastlingRights::ALL;
        rights.revoke(Color::White, CastleSide::KingSide, 1);
        let castle = takes(Piece::King, Color::White, "e1", "h1");
        assert_eq!(validate(castle, &b, Color::White, None, &rights), None);
        let long = takes(Piece::King, Color::White, "e1", "a1");
        assert!(is_legal_shape(long, &b, Color::White, None, &rights));

        let no_rook = board("r3k2r/8/8/8/8/8/8/R3K3");
        assert_eq!(check(&no_rook, quiet(Piece::King, Color::White, "e1", "g1")), None);
    }

    #[test]
    fn castling_ignores_attacks() {
        // f1 is covered by the rook on f8; the shape is still fine
        let b = board("4kr2/8/8/8/8/8/8/4K2R");
        assert_eq!(
            check(&b, takes(Piece::King, Color::White, "e1", "h1")),
            Some(MoveKind::Castle(CastleSide::KingSide))
        );
    }

    #[test]
    fn no_castling_on_narrow_boards() {
        let b = parse_layout("r3k2/7/7/7/7/7/R3K1R", 7, 7).unwrap();
        let mov = Move::capture(Piece::King, Color::White, Square::new(4, 6), Square::new(6, 6));
        assert_eq!(check(&b, mov), None);
    }

    #[test]
    fn off_board_squares_rejected() {
        let b = Board::standard();
        let mov = Move::new(Piece::Rook, Color::White, Square::new(0, 7), Square::new(0, 9));
        assert_eq!(check(&b, mov), None);
    }
}
