//! Legal move enumeration.
//!
//! Candidates are produced by asking the move validator about every
//! destination square, then filtered on scratch boards so the authoritative
//! board is never touched.

use crate::check;
use crate::rules::validator;
use crate::rules::CastlingRights;
use chess_core::{Board, Color, Move, MoveKind, Piece, Square};

/// Fully legal destinations, grouped by origin square.
///
/// Origins appear in board order (top row first) and only when they have at
/// least one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    entries: Vec<(Square, Vec<Square>)>,
}

impl LegalMoves {
    /// Returns the destinations reachable from `from`.
    pub fn destinations(&self, from: Square) -> &[Square] {
        self.entries
            .iter()
            .find(|(origin, _)| *origin == from)
            .map(|(_, targets)| targets.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `from` to `to` is among the legal moves.
    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.destinations(from).contains(&to)
    }

    /// Returns true if no piece can move.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of origins with at least one move.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total number of (origin, destination) pairs.
    pub fn move_count(&self) -> usize {
        self.entries.iter().map(|(_, targets)| targets.len()).sum()
    }

    /// Iterates over origins and their destinations.
    pub fn iter(&self) -> impl Iterator<Item = (Square, &[Square])> + '_ {
        self.entries
            .iter()
            .map(|(origin, targets)| (*origin, targets.as_slice()))
    }
}

/// Enumerates every fully legal move for `color`.
pub fn legal_moves(
    board: &Board,
    color: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> LegalMoves {
    let mut entries = Vec::new();
    for (from, _) in board.pieces_of(color) {
        let targets: Vec<Square> = board
            .squares()
            .filter(|&to| find_legal_move(board, from, to, color, last_move, castling).is_some())
            .collect();
        if !targets.is_empty() {
            entries.push((from, targets));
        }
    }
    LegalMoves { entries }
}

/// Returns true if `color` has at least one legal move.
pub fn has_legal_move(
    board: &Board,
    color: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    board.pieces_of(color).any(|(from, _)| {
        board
            .squares()
            .any(|to| find_legal_move(board, from, to, color, last_move, castling).is_some())
    })
}

/// Finds a fully legal move of `color` from `from` to `to`.
///
/// Both the quiet and the capturing reading of the move are tried, and a
/// pawn reaching the far row is tried with a queen promotion.
pub fn find_legal_move(
    board: &Board,
    from: Square,
    to: Square,
    color: Color,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> Option<(Move, MoveKind)> {
    let (piece, owner) = board.piece_at(from)?;
    if owner != color {
        return None;
    }
    let promotion = (piece == Piece::Pawn
        && board.contains(to)
        && to.y() == color.promotion_row(board.height()))
    .then_some(Piece::Queen);

    [false, true].into_iter().find_map(|capture| {
        let mov = Move::new(piece, color, from, to)
            .with_capture(capture)
            .with_promotion(promotion);
        let kind = validator::validate(mov, board, color, last_move, castling)?;
        is_safe(board, mov, kind, last_move, castling).then_some((mov, kind))
    })
}

/// Returns true if a shape-legal move keeps the mover's king safe.
///
/// Castling also requires the king's origin, transit and destination
/// squares to be unattacked.
pub fn is_safe(
    board: &Board,
    mov: Move,
    kind: MoveKind,
    last_move: Option<Move>,
    castling: &CastlingRights,
) -> bool {
    if let MoveKind::Castle(side) = kind {
        if check::castling_path_attacked(board, mov.color, side, last_move, castling) {
            return false;
        }
    }
    let mut scratch = board.clone();
    apply_move(&mut scratch, mov, kind);
    !check::is_in_check(&scratch, mov.color, Some(mov), castling)
}

/// Applies a validated move to a board.
pub fn apply_move(board: &mut Board, mov: Move, kind: MoveKind) {
    board.remove(mov.from);
    match kind {
        MoveKind::Castle(side) => {
            let width = board.width();
            let row = mov.from.y();
            board.remove(Square::new(side.rook_file(width), row));
            board.set(
                Square::new(side.king_target_file(width), row),
                Some((Piece::King, mov.color)),
            );
            board.set(
                Square::new(side.rook_target_file(width), row),
                Some((Piece::Rook, mov.color)),
            );
        }
        MoveKind::EnPassant => {
            board.remove(validator::en_passant_victim(mov));
            board.set(mov.to, Some((mov.landing_piece(), mov.color)));
        }
        MoveKind::Normal | MoveKind::DoublePush => {
            board.set(mov.to, Some((mov.landing_piece(), mov.color)));
        }
    }
}
