//! Board square representation.

use std::fmt;

/// Side length of the standard board.
pub const STANDARD_SIZE: u8 = 8;

/// A square on the board, addressed by column and row.
///
/// `x` is the file counted from the left (0 = a). `y` is the row counted
/// from the top of the layout text, so row 0 is Black's back rank and
/// `height - 1` is White's.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    y: u8,
    x: u8,
}

impl Square {
    /// Creates a square from column and row.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Square { y, x }
    }

    /// Returns the column (0 = a-file).
    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row counted from the top of the layout.
    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the square shifted by the given offset, if it stays non-negative.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Square::new(x, y))
    }

    /// Returns the column and row distance to another square.
    #[inline]
    pub const fn distance(self, other: Square) -> (u8, u8) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Returns the unit step (-1, 0 or 1 per axis) from this square toward another.
    #[inline]
    pub const fn step_toward(self, other: Square) -> (i8, i8) {
        let dx = if other.x > self.x {
            1
        } else if other.x < self.x {
            -1
        } else {
            0
        };
        let dy = if other.y > self.y {
            1
        } else if other.y < self.y {
            -1
        } else {
            0
        };
        (dx, dy)
    }

    /// Parses a square from algebraic notation (e.g., "e4") on a board with
    /// the given number of rows.
    pub fn from_algebraic(s: &str, height: u8) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: u8 = chars.as_str().parse().ok()?;
        if rank == 0 || rank > height {
            return None;
        }
        Some(Square::new(file as u8 - b'a', height - rank))
    }

    /// Returns the algebraic notation for this square on a board with the
    /// given number of rows.
    pub fn to_algebraic(self, height: u8) -> String {
        let rank = u16::from(height) - u16::from(self.y);
        format!("{}{}", self.file_char(), rank)
    }

    /// Returns the file letter of this square.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.x) as char
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.x, self.y)
    }
}

/// Formats the square in algebraic notation for a standard 8-row board.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.y < STANDARD_SIZE {
            write!(f, "{}", self.to_algebraic(STANDARD_SIZE))
        } else {
            write!(f, "{}@{}", self.file_char(), self.y)
        }
    }
}
