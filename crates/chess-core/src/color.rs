//! Player color representation.

/// Represents the two players in chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the row step a pawn of this color takes when advancing.
    ///
    /// Rows are counted from the top of the layout text, where Black sets
    /// up, so White pawns move toward row 0.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the row holding this color's pieces at the start.
    #[inline]
    pub const fn back_row(self, height: u8) -> u8 {
        match self {
            Color::White => height - 1,
            Color::Black => 0,
        }
    }

    /// Returns the row this color's pawns start on.
    #[inline]
    pub const fn pawn_row(self, height: u8) -> u8 {
        match self {
            Color::White => height.saturating_sub(2),
            Color::Black => 1,
        }
    }

    /// Returns the row on which this color's pawns promote.
    #[inline]
    pub const fn promotion_row(self, height: u8) -> u8 {
        self.opposite().back_row(height)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}
