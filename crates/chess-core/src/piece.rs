//! Chess piece representation.

use crate::Color;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Returns the layout character for this piece with the given color.
    pub const fn to_char(self, color: Color) -> char {
        let c = self.letter();
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Returns the lowercase letter of this piece type.
    pub const fn letter(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Parses a layout character into a piece and color.
    pub const fn from_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Self::from_letter(c) {
            Some(piece) => Some((piece, color)),
            None => None,
        }
    }

    /// Parses a piece letter, ignoring case.
    pub const fn from_letter(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns true if a pawn may promote to this piece.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        )
    }

    /// Material weight used for the insufficient-material rule.
    ///
    /// A single pawn or rook reaches the mating threshold of 5; a lone minor
    /// piece does not.
    #[inline]
    pub const fn material_value(self) -> u32 {
        match self {
            Piece::Pawn => 5,
            Piece::Knight => 2,
            Piece::Bishop => 3,
            Piece::Rook => 5,
            Piece::Queen => 9,
            Piece::King => 0,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_to_char() {
        assert_eq!(Piece::Pawn.to_char(Color::White), 'P');
        assert_eq!(Piece::Pawn.to_char(Color::Black), 'p');
        assert_eq!(Piece::King.to_char(Color::White), 'K');
        assert_eq!(Piece::Knight.to_char(Color::Black), 'n');
    }

    #[test]
    fn piece_from_char() {
        assert_eq!(Piece::from_char('P'), Some((Piece::Pawn, Color::White)));
        assert_eq!(Piece::from_char('p'), Some((Piece::Pawn, Color::Black)));
        assert_eq!(Piece::from_char('K'), Some((Piece::King, Color::White)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::from_char('8'), None);
    }

    #[test]
    fn promotion_targets() {
        assert!(!Piece::Pawn.is_promotion_target());
        assert!(!Piece::King.is_promotion_target());
        assert!(Piece::Knight.is_promotion_target());
        assert!(Piece::Queen.is_promotion_target());
    }

    #[test]
    fn material_values() {
        assert_eq!(Piece::Knight.material_value(), 2);
        assert_eq!(Piece::Bishop.material_value(), 3);
        assert_eq!(Piece::Pawn.material_value(), Piece::Rook.material_value());
        assert_eq!(Piece::King.material_value(), 0);
    }
}
