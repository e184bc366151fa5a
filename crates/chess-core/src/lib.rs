//! Core types for chess.
//!
//! This crate provides the fundamental types used across the chess engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`], [`MoveKind`] and [`CastleSide`] for move tokens
//! - [`Board`], a square mailbox board of configurable size
//! - Layout notation parsing and formatting

mod board;
mod color;
mod layout;
mod mov;
mod piece;
mod square;

pub use board::Board;
pub use color::Color;
pub use layout::{format_layout, parse_layout, LayoutError, STARTING_LAYOUT};
pub use mov::{CastleSide, Move, MoveKind};
pub use piece::Piece;
pub use square::{Square, STANDARD_SIZE};
