//! Rendering game state as text or JSON.
//!
//! With `--json` every command answers with one [`Snapshot`] per line:
//!
//! ```json
//! {
//!   "ok": true,
//!   "message": "Played Pe2e4",
//!   "layout": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
//!   "side_to_move": "black",
//!   "status": "in progress",
//!   "move_count": 1,
//!   "draw_counter": 1,
//!   "castling": "KQkq",
//!   "en_passant": "e3",
//!   "check": false,
//!   "promotion_pending": false,
//!   "last_move": "Pe2e4",
//!   "clocks": { "white_ms": 600000, "black_ms": 600000 }
//! }
//! ```

use chess_core::{Color, Square};
use chess_engine::Game;
use serde::Serialize;

/// Remaining time per side.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ClockJson {
    pub white_ms: u64,
    pub black_ms: u64,
}

/// Legal destinations of one piece.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MovesJson {
    pub from: String,
    pub to: Vec<String>,
}

/// Everything a front end needs to draw the game after a command.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_layout: Option<String>,
    pub side_to_move: &'static str,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<&'static str>,
    pub move_count: usize,
    pub draw_counter: u32,
    pub castling: String,
    pub en_passant: Option<String>,
    pub check: bool,
    pub promotion_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    pub last_move: Option<String>,
    pub clocks: ClockJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_moves: Option<Vec<MovesJson>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<String>>,
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn square_name(game: &Game, square: Square) -> String {
    square.to_algebraic(game.board().height())
}

impl Snapshot {
    /// Captures the state of `game` after a command.
    pub fn capture(game: &Game, ok: bool, message: Option<String>) -> Self {
        let display = game.display_layout();
        let layout = game.layout();
        let height = game.board().height();
        Snapshot {
            ok,
            message,
            display_layout: (display != layout).then_some(display),
            layout,
            side_to_move: color_name(game.side_to_move()),
            status: game.status().to_string(),
            end_message: game.end_message(),
            winner: game.status().winner().map(color_name),
            move_count: game.move_count(),
            draw_counter: game.draw_counter(),
            castling: game.castling_rights().to_string(),
            en_passant: game.en_passant_square().map(|sq| square_name(game, sq)),
            check: game.is_check(),
            promotion_pending: game.is_promotion_pending(),
            selected: game.selected().map(|sq| square_name(game, sq)),
            last_move: game.last_move().map(|mov| mov.notation(height)),
            clocks: ClockJson {
                white_ms: game.clocks().remaining_ms(Color::White),
                black_ms: game.clocks().remaining_ms(Color::Black),
            },
            legal_moves: None,
            history: None,
        }
    }

    /// Adds the legal moves, for one origin or for every piece.
    pub fn with_moves(mut self, game: &Game, from: Option<Square>) -> Self {
        let moves = match from {
            Some(from) => vec![MovesJson {
                from: square_name(game, from),
                to: game
                    .legal_destinations(from)
                    .into_iter()
                    .map(|to| square_name(game, to))
                    .collect(),
            }],
            None => game
                .legal_moves()
                .iter()
                .map(|(from, targets)| MovesJson {
                    from: square_name(game, from),
                    to: targets.iter().map(|&to| square_name(game, to)).collect(),
                })
                .collect(),
        };
        self.legal_moves = Some(moves);
        self
    }

    /// Adds the moves played so far, oldest first.
    pub fn with_history(mut self, game: &Game) -> Self {
        self.history = Some(move_list(game));
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Board diagram followed by a status line.
pub fn render_board(game: &Game) -> String {
    let mut text = game.display_board().to_string();
    text.push_str(&status_line(game));
    text
}

/// One-line summary of the game state.
pub fn status_line(game: &Game) -> String {
    if let Some(message) = game.end_message() {
        return message;
    }
    let clocks = game.clocks();
    let mut line = format!(
        "{} to move ({}) | move {} | castling {} | white {}s black {}s",
        game.side_to_move(),
        game.status(),
        game.move_count() + 1,
        game.castling_rights(),
        clocks.remaining(Color::White).as_secs(),
        clocks.remaining(Color::Black).as_secs(),
    );
    if game.is_check() {
        line.push_str(" | check");
    }
    line
}

fn move_list(game: &Game) -> Vec<String> {
    let height = game.board().height();
    game.history()
        .moves()
        .map(|mov| mov.notation(height))
        .collect()
}

/// Moves played so far, numbered in pairs: `1. Pe2e4 pe7e5`.
pub fn render_history(game: &Game) -> String {
    let moves = move_list(game);
    if moves.is_empty() {
        return "no moves yet".to_string();
    }
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Legal moves as `e2: e3 e4` lines.
pub fn render_moves(game: &Game, from: Option<Square>) -> String {
    let render = |from: Square, targets: &[Square]| {
        let targets: Vec<String> = targets.iter().map(|&to| square_name(game, to)).collect();
        format!("{}: {}", square_name(game, from), targets.join(" "))
    };
    match from {
        Some(from) => render(from, &game.legal_destinations(from)),
        None => {
            let moves = game.legal_moves();
            if moves.is_empty() {
                return "no legal moves".to_string();
            }
            moves
                .iter()
                .map(|(from, targets)| render(from, targets))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
