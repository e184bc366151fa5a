//! Game history and repetition tracking.

use chess_core::{Board, Color, Move, Square};
use std::collections::HashMap;

/// One committed move and the board it was played on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The board before the move.
    pub board: Board,
    /// The move as committed, promotion included.
    pub mov: Move,
}

/// Identity of a position for repetition purposes.
///
/// Two positions repeat when the pieces, the side to move, the castling
/// availability and the en-passant square all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub board: Board,
    pub side: Color,
    pub castling: u8,
    pub en_passant: Option<Square>,
}

/// Stack of committed moves plus a count of every position reached.
#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    entries: Vec<HistoryEntry>,
    repetitions: HashMap<PositionKey, u32>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a committed move.
    pub fn push(&mut self, board: Board, mov: Move) {
        self.entries.push(HistoryEntry { board, mov });
    }

    /// Pops the most recent move.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Returns the most recently committed move.
    pub fn last_move(&self) -> Option<Move> {
        self.entries.last().map(|entry| entry.mov)
    }

    /// Number of committed moves.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Committed moves, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().map(|entry| entry.mov)
    }

    /// Records one more occurrence of a position and returns its count.
    pub fn record(&mut self, key: PositionKey) -> u32 {
        let count = self.repetitions.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Removes one occurrence of a position.
    pub fn forget(&mut self, key: &PositionKey) {
        if let Some(count) = self.repetitions.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(key);
            }
        }
    }

    /// How often a position has been reached.
    pub fn occurrences(&self, key: &PositionKey) -> u32 {
        self.repetitions.get(key).copied().unwrap_or(0)
    }

    /// Drops all moves and repetition counts.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.repetitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn key(side: Color) -> PositionKey {
        PositionKey {
            board: Board::standard(),
            side,
            castling: 0b1111,
            en_passant: None,
        }
    }

    #[test]
    fn push_and_pop() {
        let mut history = GameHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last_move(), None);

        let mov = Move::new(
            Piece::Pawn,
            Color::White,
            Square::new(4, 6),
            Square::new(4, 4),
        );
        history.push(Board::standard(), mov);
        assert_eq!(history.depth(), 1);
        assert_eq!(history.last_move(), Some(mov));
        assert_eq!(history.moves().collect::<Vec<_>>(), vec![mov]);

        let entry = history.pop().unwrap();
        assert_eq!(entry.mov, mov);
        assert_eq!(entry.board, Board::standard());
        assert!(history.pop().is_none());
    }

    #[test]
    fn repetition_counts() {
        let mut history = GameHistory::new();
        assert_eq!(history.record(key(Color::White)), 1);
        assert_eq!(history.record(key(Color::Black)), 1);
        assert_eq!(history.record(key(Color::White)), 2);
        assert_eq!(history.occurrences(&key(Color::White)), 2);

        history.forget(&key(Color::White));
        assert_eq!(history.occurrences(&key(Color::White)), 1);
        history.forget(&key(Color::Black));
        assert_eq!(history.occurrences(&key(Color::Black)), 0);
        history.forget(&key(Color::Black));
        assert_eq!(history.occurrences(&key(Color::Black)), 0);
    }

    #[test]
    fn keys_differ_by_castling_and_en_passant() {
        let mut history = GameHistory::new();
        history.record(key(Color::White));
        let mut other = key(Color::White);
        other.castling = 0b0011;
        assert_eq!(history.occurrences(&other), 0);
        other.castling = 0b1111;
        other.en_passant = Some(Square::new(4, 5));
        assert_eq!(history.occurrences(&other), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut history = GameHistory::new();
        history.record(key(Color::White));
        history.push(
            Board::standard(),
            Move::new(
                Piece::Knight,
                Color::White,
                Square::new(6, 7),
                Square::new(5, 5),
            ),
        );
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.occurrences(&key(Color::White)), 0);
    }
}
