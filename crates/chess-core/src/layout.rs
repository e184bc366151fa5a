//! Layout notation: the piece-placement field of FEN, generalised to square
//! boards of any supported size.

use crate::{Board, Piece};
use thiserror::Error;

/// The standard starting layout.
pub const STARTING_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Errors that can occur when parsing layout text or sizing a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("board must be square, got {width}x{height}")]
    NotSquare { width: u8, height: u8 },

    #[error("unsupported board size {0} (expected 1 to {max})", max = Board::MAX_SIZE)]
    UnsupportedSize(u8),

    #[error("invalid character '{ch}' in row {row}")]
    InvalidCharacter { ch: char, row: usize },

    #[error("row {row} has {found} squares, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("layout has {found} rows, expected {expected}")]
    RowCountMismatch { found: usize, expected: usize },
}

/// Parses layout text into a new board of the given dimensions.
///
/// Rows are listed top to bottom (Black's side first) and separated by `/`.
/// Piece letters fill one cell each; a digit `n` (1 to 9, at most `width`)
/// fills `n` empty cells. Every row must describe exactly `width` cells and
/// there must be exactly `height` rows.
pub fn parse_layout(text: &str, width: u8, height: u8) -> Result<Board, LayoutError> {
    let mut board = Board::empty(width, height)?;
    let rows: Vec<&str> = text.split('/').collect();
    if rows.len() != height as usize {
        return Err(LayoutError::RowCountMismatch {
            found: rows.len(),
            expected: height as usize,
        });
    }

    let max_run = width.min(9) as u32;
    for (y, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(width as usize);
        for ch in row.chars() {
            if let Some(run) = ch.to_digit(10) {
                if run == 0 || run > max_run {
                    return Err(LayoutError::InvalidCharacter { ch, row: y });
                }
                cells.extend(std::iter::repeat(None).take(run as usize));
            } else if let Some(piece) = Piece::from_char(ch) {
                cells.push(Some(piece));
            } else {
                return Err(LayoutError::InvalidCharacter { ch, row: y });
            }
        }
        if cells.len() != width as usize {
            return Err(LayoutError::RowWidthMismatch {
                row: y,
                found: cells.len(),
                expected: width as usize,
            });
        }
        for (x, cell) in cells.into_iter().enumerate() {
            board.set(crate::Square::new(x as u8, y as u8), cell);
        }
    }

    Ok(board)
}

/// Formats a board as layout text.
///
/// Runs of empty cells collapse into digits; runs longer than nine are
/// written as several digits so the text always parses back.
pub fn format_layout(board: &Board) -> String {
    let mut text = String::with_capacity(board.width() as usize * board.height() as usize);

    for y in 0..board.height() {
        if y > 0 {
            text.push('/');
        }
        let mut empty = 0u32;
        for x in 0..board.width() {
            match board.piece_at(crate::Square::new(x, y)) {
                Some((piece, color)) => {
                    flush_empty(&mut text, &mut empty);
                    text.push(piece.to_char(color));
                }
                None => empty += 1,
            }
        }
        flush_empty(&mut text, &mut empty);
    }

    text
}

fn flush_empty(text: &mut String, empty: &mut u32) {
    while *empty > 0 {
        let run = (*empty).min(9);
        if let Some(digit) = char::from_digit(run, 10) {
            text.push(digit);
        }
        *empty -= run;
    }
}
