//! Mailbox board: one optional piece per cell.

use crate::{Color, LayoutError, Piece, Square};
use std::fmt;

/// A square grid of cells, each empty or holding a colored piece.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Option<(Piece, Color)>>,
}

impl Board {
    /// Widest supported board (one file letter per column).
    pub const MAX_SIZE: u8 = 26;

    /// Creates an empty board.
    ///
    /// Boards must be square and between 1 and [`Board::MAX_SIZE`] wide.
    pub fn empty(width: u8, height: u8) -> Result<Self, LayoutError> {
        if width != height {
            return Err(LayoutError::NotSquare { width, height });
        }
        if width == 0 || width > Self::MAX_SIZE {
            return Err(LayoutError::UnsupportedSize(width));
        }
        Ok(Board {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Creates the standard 8x8 starting board.
    pub fn standard() -> Self {
        crate::parse_layout(crate::STARTING_LAYOUT, 8, 8).expect("starting layout is valid")
    }

    /// Number of files.
    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Returns true if the square lies on this board.
    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        sq.x() < self.width && sq.y() < self.height
    }

    #[inline]
    fn index(&self, sq: Square) -> usize {
        sq.y() as usize * self.width as usize + sq.x() as usize
    }

    /// Returns the piece and color on a square, if any. Off-board squares are empty.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        if self.contains(sq) {
            self.cells[self.index(sq)]
        } else {
            None
        }
    }

    /// Returns true if the square is on the board and holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.contains(sq) && self.cells[self.index(sq)].is_none()
    }

    /// Puts a piece on (or clears) a square, returning what was there.
    ///
    /// # Panics
    ///
    /// Panics if the square is off the board.
    pub fn set(&mut self, sq: Square, cell: Option<(Piece, Color)>) -> Option<(Piece, Color)> {
        assert!(self.contains(sq), "{:?} is off a {}x{} board", sq, self.width, self.height);
        let index = self.index(sq);
        std::mem::replace(&mut self.cells[index], cell)
    }

    /// Clears a square, returning what was there.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        self.set(sq, None)
    }

    /// Iterates over every square, row by row from the top.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Square::new(x, y)))
    }

    /// Iterates over occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        self.squares()
            .filter_map(move |sq| self.piece_at(sq).map(|(piece, color)| (sq, piece, color)))
    }

    /// Iterates over the squares holding pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces()
            .filter(move |&(_, _, c)| c == color)
            .map(|(sq, piece, _)| (sq, piece))
    }

    /// Finds the first square holding the given piece.
    pub fn find(&self, piece: Piece, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|&(_, p)| p == piece)
            .map(|(sq, _)| sq)
    }

    /// Sums the material weight of one color's pieces.
    pub fn material(&self, color: Color) -> u32 {
        self.pieces_of(color)
            .map(|(_, piece)| piece.material_value())
            .sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", crate::format_layout(self))
    }
}

/// Draws the board as text, top row first, `.` for empty cells.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            write!(f, "{:>2} ", self.height - y)?;
            for x in 0..self.width {
                let c = match self.piece_at(Square::new(x, y)) {
                    Some((piece, color)) => piece.to_char(color),
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..self.width {
            write!(f, " {}", Square::new(x, 0).file_char())?;
        }
        writeln!(f)
    }
}
