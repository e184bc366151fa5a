//! Game rules: move validation, castling rights and game status.
//!
//! The [`validator`] decides whether a single move has a legal shape for
//! its piece. It knows nothing about check; the check detector and the
//! game state machine sit above it.

mod castling;
pub mod validator;

pub use castling::{CastlingRight, CastlingRights};

use chess_core::Color;
use std::fmt;

/// Combined non-king material below which neither side can mate.
pub const INSUFFICIENT_MATERIAL: u32 = 5;

/// Completed moves after which the game is drawn.
///
/// Every move counts; captures and pawn moves do not reset the counter.
pub const FIFTY_MOVE_LIMIT: u32 = 50;

/// Occurrences of one position that draw the game.
pub const REPETITION_LIMIT: u32 = 3;

/// Where a game stands.
///
/// Colors carried by the winning variants name the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// No game has been started yet.
    Idle,
    /// Waiting for the side to move.
    InProgress,
    /// A pawn move to the last row is waiting for its promotion piece.
    AwaitingPromotionChoice,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
    DrawByStalemate,
    Checkmate(Color),
    WinByTimeout(Color),
    WinByResignation(Color),
    DrawByTimeout,
}

impl GameStatus {
    /// Returns true if the game is over.
    pub const fn is_terminal(self) -> bool {
        !matches!(
            self,
            GameStatus::Idle | GameStatus::InProgress | GameStatus::AwaitingPromotionChoice
        )
    }

    /// Returns true while moves are being played.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            GameStatus::InProgress | GameStatus::AwaitingPromotionChoice
        )
    }

    /// Returns the winner, if the game ended with one.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate(color)
            | GameStatus::WinByTimeout(color)
            | GameStatus::WinByResignation(color) => Some(color),
            _ => None,
        }
    }

    /// End-of-game message for display, if the game is over.
    pub fn end_message(self) -> Option<String> {
        let message = match self {
            GameStatus::Idle | GameStatus::InProgress | GameStatus::AwaitingPromotionChoice => {
                return None
            }
            GameStatus::DrawByRepetition => "Draw by repetition!".to_string(),
            GameStatus::DrawByFiftyMove => "Draw by 50-move rule!".to_string(),
            GameStatus::DrawByInsufficientMaterial => "Draw by insufficient material!".to_string(),
            GameStatus::DrawByStalemate => "Draw by stalemate!".to_string(),
            GameStatus::Checkmate(winner) => format!("{} wins by checkmate!", winner),
            GameStatus::WinByTimeout(winner) => format!("{} wins by timeout!", winner),
            GameStatus::WinByResignation(winner) => format!("{} wins by resignation!", winner),
            GameStatus::DrawByTimeout => "Draw by timeout with insufficient material!".to_string(),
        };
        Some(message)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Idle => write!(f, "idle"),
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::AwaitingPromotionChoice => write!(f, "awaiting promotion choice"),
            GameStatus::DrawByRepetition => write!(f, "draw by repetition"),
            GameStatus::DrawByFiftyMove => write!(f, "draw by 50-move rule"),
            GameStatus::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::DrawByStalemate => write!(f, "draw by stalemate"),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            GameStatus::WinByTimeout(winner) => write!(f, "timeout, {} wins", winner),
            GameStatus::WinByResignation(winner) => write!(f, "resignation, {} wins", winner),
            GameStatus::DrawByTimeout => write!(f, "draw by timeout"),
        }
    }
}

/// Game endings declared by the host rather than detected on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The given color resigned.
    Resignation(Color),
    /// The given color ran out of time.
    Timeout(Color),
}
