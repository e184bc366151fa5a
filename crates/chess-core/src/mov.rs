//! Move representation.

use crate::{Color, Piece, Square};
use std::fmt;

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the rook on the last file (O-O).
    KingSide,
    /// Toward the rook on the first file (O-O-O).
    QueenSide,
}

impl CastleSide {
    /// Both sides, king side first.
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// File the king starts on.
    pub const KING_FILE: u8 = 4;

    /// Narrowest board on which castling exists.
    pub const MIN_WIDTH: u8 = 8;

    /// File of the rook taking part in this castle.
    #[inline]
    pub const fn rook_file(self, width: u8) -> u8 {
        match self {
            CastleSide::KingSide => width - 1,
            CastleSide::QueenSide => 0,
        }
    }

    /// File the king lands on.
    #[inline]
    pub const fn king_target_file(self, width: u8) -> u8 {
        match self {
            CastleSide::KingSide => width - 2,
            CastleSide::QueenSide => 2,
        }
    }

    /// File the rook lands on.
    #[inline]
    pub const fn rook_target_file(self, width: u8) -> u8 {
        match self {
            CastleSide::KingSide => width - 3,
            CastleSide::QueenSide => 3,
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastleSide::KingSide => write!(f, "O-O"),
            CastleSide::QueenSide => write!(f, "O-O-O"),
        }
    }
}

/// How a validated move changes the board beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Ordinary move or capture.
    Normal,
    /// Pawn advance of two squares from its starting row.
    DoublePush,
    /// Pawn capture of a pawn that just passed the destination square.
    EnPassant,
    /// King and rook castle together.
    Castle(CastleSide),
}

/// A move token: the piece, its squares, and the mover's declared intent.
///
/// `capture` is what the mover claims, not what the board holds; the
/// validator rejects tokens whose claim does not match the destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub capture: bool,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Creates a non-capturing move.
    #[inline]
    pub const fn new(piece: Piece, color: Color, from: Square, to: Square) -> Self {
        Move {
            piece,
            color,
            from,
            to,
            capture: false,
            promotion: None,
        }
    }

    /// Creates a capturing move.
    #[inline]
    pub const fn capture(piece: Piece, color: Color, from: Square, to: Square) -> Self {
        Move::new(piece, color, from, to).with_capture(true)
    }

    /// Returns this move with the capture claim replaced.
    #[inline]
    pub const fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Returns this move with the promotion choice replaced.
    #[inline]
    pub const fn with_promotion(mut self, promotion: Option<Piece>) -> Self {
        self.promotion = promotion;
        self
    }

    /// Returns true if this is a pawn advancing two rows on one file.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.piece, Piece::Pawn)
            && self.from.x() == self.to.x()
            && self.from.y().abs_diff(self.to.y()) == 2
    }

    /// Move text with ranks counted for a board of `height` rows, e.g.
    /// `Pb2b3` on a 5x5 board.
    pub fn notation(self, height: u8) -> String {
        let mut text = String::new();
        text.push(self.piece.to_char(self.color));
        text.push_str(&self.from.to_algebraic(height));
        if self.capture {
            text.push('x');
        }
        text.push_str(&self.to.to_algebraic(height));
        if let Some(promotion) = self.promotion {
            text.push('=');
            text.push(promotion.to_char(self.color));
        }
        text
    }

    /// Returns the piece that stands on `to` once the move is made.
    #[inline]
    pub const fn landing_piece(self) -> Piece {
        match self.promotion {
            Some(piece) => piece,
            None => self.piece,
        }
    }
}

/// Log form, with ranks counted for the standard 8-row board. Use
/// [`Move::notation`] for other heights.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.piece.to_char(self.color), self.from)?;
        if self.capture {
            write!(f, "x")?;
        }
        write!(f, "{}", self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.to_char(self.color))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}
