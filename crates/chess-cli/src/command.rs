//! Text command parsing.

use chess_core::{Piece, Square};
use thiserror::Error;

/// Errors produced while parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("'{command}' expects {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid piece '{0}'")]
    InvalidPiece(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Commands read from the host's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new game, optionally with seconds per side.
    New(Option<u64>),
    /// Replace the start layout.
    Layout(String),
    /// Pick up a piece.
    Select(Square),
    /// Move between two squares.
    Move {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
    /// Move the selected piece.
    To { to: Square, promotion: Option<Piece> },
    /// Choose the piece for a pending promotion.
    Promote(Piece),
    /// Abandon a pending promotion.
    Cancel,
    Undo,
    /// List legal moves, for one square or all.
    Moves(Option<Square>),
    /// Resign for the side to move.
    Resign,
    Show,
    Status,
    /// List the moves played so far.
    History,
    Help,
    Quit,
    /// Unknown command (echoed back to the user).
    Unknown(String),
}

impl Command {
    /// Parses one input line. Squares are read against a board of
    /// `height` rows.
    pub fn parse(input: &str, height: u8) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let cmd = parts.next().unwrap_or("");

        match cmd.to_ascii_lowercase().as_str() {
            "new" => {
                let secs = parts.next().map(parse_number).transpose()?;
                Ok(Command::New(secs))
            }
            "layout" => {
                let text = parts.next().ok_or(CommandError::MissingArgument {
                    command: "layout",
                    argument: "layout text",
                })?;
                Ok(Command::Layout(text.to_string()))
            }
            "select" => {
                let square = required_square(parts.next(), "select", height)?;
                Ok(Command::Select(square))
            }
            "move" => {
                let first = parts.next();
                // "move e2e4" is accepted as well as "move e2 e4"
                let (from, to) = match (first, parts.next()) {
                    (Some(joined), None) if joined.len() >= 4 => split_joined(joined, height)?,
                    (first, second) => (
                        required_square(first, "move", height)?,
                        required_square(second, "move", height)?,
                    ),
                };
                let promotion = parts.next().map(parse_piece).transpose()?;
                Ok(Command::Move {
                    from,
                    to,
                    promotion,
                })
            }
            "to" => {
                let to = required_square(parts.next(), "to", height)?;
                let promotion = parts.next().map(parse_piece).transpose()?;
                Ok(Command::To { to, promotion })
            }
            "promote" => {
                let piece = parts.next().ok_or(CommandError::MissingArgument {
                    command: "promote",
                    argument: "a piece letter",
                })?;
                Ok(Command::Promote(parse_piece(piece)?))
            }
            "cancel" => Ok(Command::Cancel),
            "undo" => Ok(Command::Undo),
            "moves" => {
                let square = parts
                    .next()
                    .map(|s| parse_square(s, height))
                    .transpose()?;
                Ok(Command::Moves(square))
            }
            "resign" => Ok(Command::Resign),
            "show" => Ok(Command::Show),
            "status" => Ok(Command::Status),
            "history" => Ok(Command::History),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Ok(Command::Unknown(String::new())),
            _ => Ok(Command::Unknown(input.to_string())),
        }
    }
}

/// One-line summary of every command.
pub const HELP: &str = "\
new [secs]            start a new game
layout <text>         set the start layout (game becomes idle)
select <sq>           pick up a piece
move <from> <to> [p]  move a piece, optionally promoting to p
to <sq> [p]           move the selected piece
promote <p>           choose the piece for a pending promotion
cancel                abandon a pending promotion
undo                  take back the last move
moves [sq]            list legal moves
resign                resign for the side to move
show                  print the board
status                print the game status
history               list the moves played so far
quit                  leave";

fn parse_square(text: &str, height: u8) -> Result<Square, CommandError> {
    Square::from_algebraic(text, height).ok_or_else(|| CommandError::InvalidSquare(text.to_string()))
}

fn required_square(
    text: Option<&str>,
    command: &'static str,
    height: u8,
) -> Result<Square, CommandError> {
    let text = text.ok_or(CommandError::MissingArgument {
        command,
        argument: "a square",
    })?;
    parse_square(text, height)
}

/// Splits `e2e4` or `a10a9` at the second letter.
fn split_joined(joined: &str, height: u8) -> Result<(Square, Square), CommandError> {
    let split = joined
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .ok_or_else(|| CommandError::InvalidSquare(joined.to_string()))?;
    let (from, to) = joined.split_at(split);
    Ok((parse_square(from, height)?, parse_square(to, height)?))
}

fn parse_piece(text: &str) -> Result<Piece, CommandError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Piece::from_letter(c),
        _ => match text.to_ascii_lowercase().as_str() {
            "knight" => Some(Piece::Knight),
            "bishop" => Some(Piece::Bishop),
            "rook" => Some(Piece::Rook),
            "queen" => Some(Piece::Queen),
            _ => None,
        },
    }
    .ok_or_else(|| CommandError::InvalidPiece(text.to_string()))
}

fn parse_number(text: &str) -> Result<u64, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}
