//! Chess rules engine on a square mailbox board.
//!
//! This crate provides:
//! - [`rules::validator`] - per-piece move shape validation
//! - [`check`] - check detection built on the validator
//! - [`movegen`] - enumeration of fully legal moves
//! - [`Game`] - the state machine that sequences moves, undo, promotion and
//!   game endings
//! - [`Clocks`] - remaining time per side, shared with a timer task
//!
//! # Architecture
//!
//! Layers only look downward: the validator knows piece movement, the check
//! detector asks the validator whether any enemy piece could capture the
//! king, the enumerator filters validator output through the check
//! detector, and [`Game`] combines all three with history and draw rules.
//! Nothing below [`Game`] mutates shared state; candidate moves are tried on
//! scratch copies of the board.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameStatus, MoveOutcome};
//! use chess_core::Square;
//! use std::time::Duration;
//!
//! let sq = |s| Square::from_algebraic(s, 8).unwrap();
//!
//! let mut game = Game::new();
//! game.start_new_game(Duration::from_secs(300));
//! let outcome = game.attempt_move(sq("e2"), sq("e4"), None).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Played { status: GameStatus::InProgress, .. }));
//! println!("Position after 1.e4: {}", game.layout());
//! ```

pub mod check;
mod clock;
mod game;
mod history;
pub mod movegen;
pub mod rules;

pub use clock::Clocks;
pub use game::{Game, GameError, MoveOutcome, DEFAULT_MAX_TIME};
pub use history::{GameHistory, HistoryEntry, PositionKey};
pub use movegen::{apply_move, find_legal_move, legal_moves, LegalMoves};
pub use rules::{CastlingRight, CastlingRights, EndReason, GameStatus};
