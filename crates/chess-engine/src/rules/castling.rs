//! Castling rights with revocation depth.

use chess_core::{CastleSide, Color};
use std::fmt;

/// State of one castling right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingRight {
    /// Neither the king nor this rook has moved.
    Available,
    /// Lost when the history reached the given depth.
    RevokedAt(usize),
}

/// The four castling rights of a game.
///
/// Each right remembers the history depth at which it was revoked, so undo
/// can hand it back once the history shrinks below that depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights([CastlingRight; 4]);

impl CastlingRights {
    /// All four rights available.
    pub const ALL: CastlingRights = CastlingRights([CastlingRight::Available; 4]);

    #[inline]
    const fn slot(color: Color, side: CastleSide) -> usize {
        let side = match side {
            CastleSide::KingSide => 0,
            CastleSide::QueenSide => 1,
        };
        color.index() * 2 + side
    }

    /// Returns the state of one right.
    #[inline]
    pub const fn get(&self, color: Color, side: CastleSide) -> CastlingRight {
        self.0[Self::slot(color, side)]
    }

    /// Returns true if the given side may still castle that way.
    #[inline]
    pub const fn is_available(&self, color: Color, side: CastleSide) -> bool {
        matches!(self.get(color, side), CastlingRight::Available)
    }

    /// Revokes one right at the given depth. An earlier revocation is kept.
    pub fn revoke(&mut self, color: Color, side: CastleSide, depth: usize) {
        let slot = &mut self.0[Self::slot(color, side)];
        if *slot == CastlingRight::Available {
            *slot = CastlingRight::RevokedAt(depth);
        }
    }

    /// Revokes both rights of a color.
    pub fn revoke_color(&mut self, color: Color, depth: usize) {
        for side in CastleSide::ALL {
            self.revoke(color, side, depth);
        }
    }

    /// Restores every right revoked after the given history depth.
    pub fn restore_after(&mut self, depth: usize) {
        for slot in &mut self.0 {
            if matches!(*slot, CastlingRight::RevokedAt(at) if at > depth) {
                *slot = CastlingRight::Available;
            }
        }
    }

    /// Availability as four bits (white king side first), ignoring depths.
    pub fn availability(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, right)| **right == CastlingRight::Available)
            .fold(0, |bits, (i, _)| bits | (1 << i))
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// FEN-style summary, e.g. `KQkq` or `-`.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if self.is_available(color, side) {
                    let c = match side {
                        CastleSide::KingSide => 'k',
                        CastleSide::QueenSide => 'q',
                    };
                    let c = match color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    };
                    write!(f, "{}", c)?;
                    any = true;
                }
            }
        }
        if !any {
            write!(f, "-")?;
        }
        Ok(())
    }
}
