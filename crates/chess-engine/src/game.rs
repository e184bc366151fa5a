//! Game state machine.
//!
//! [`Game`] owns the board and everything needed to sequence moves:
//! castling rights, the last move, the move history with its repetition
//! table, the draw counter and the game status. Each command either
//! commits completely or leaves the committed state untouched.
//!
//! ```text
//! Idle ──start──▶ InProgress ◀──────────────┐
//!                  │   │                    │ complete / cancel
//!                  │   └──pawn to last row──▶ AwaitingPromotionChoice
//!                  ▼
//!               ended (draw, mate, timeout, resignation)
//! ```

use crate::check;
use crate::clock::Clocks;
use crate::history::{GameHistory, PositionKey};
use crate::movegen::{self, LegalMoves};
use crate::rules::validator;
use crate::rules::{
    CastlingRights, EndReason, GameStatus, FIFTY_MOVE_LIMIT, INSUFFICIENT_MATERIAL,
    REPETITION_LIMIT,
};
use chess_core::{
    format_layout, parse_layout, Board, CastleSide, Color, LayoutError, Move, MoveKind, Piece,
    Square,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Time per side when none is given.
pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(600);

/// Reasons a command was refused. A refused command changes nothing that
/// has been committed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no game in progress ({0})")]
    NotInProgress(GameStatus),

    #[error("game is over ({0})")]
    GameOver(GameStatus),

    #[error("square {0:?} is off the board")]
    OutOfBounds(Square),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("no piece selected")]
    NoSelection,

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("move {0} leaves the king in check")]
    LeavesKingInCheck(Move),

    #[error("cannot castle out of, through or into check: {0}")]
    CastlingThroughCheck(Move),

    #[error("a promotion choice is pending")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("cannot promote to {0}")]
    InvalidPromotion(Piece),

    #[error("promotion to {0} given for a move that does not promote")]
    UnexpectedPromotion(Piece),

    #[error("nothing to undo")]
    NothingToUndo,
}

/// What a successful move command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Origin and destination were the same square; it is now selected.
    Selected(Square),
    /// A pawn reached the last row; the move waits for a promotion piece.
    PromotionPending(Move),
    /// The move was committed.
    Played {
        mov: Move,
        kind: MoveKind,
        status: GameStatus,
    },
}

/// A chess game.
///
/// Cloning a game shares its [`Clocks`].
#[derive(Debug, Clone)]
pub struct Game {
    start: Board,
    board: Board,
    display: Board,
    side_to_move: Color,
    castling: CastlingRights,
    last_move: Option<Move>,
    history: GameHistory,
    draw_counter: u32,
    status: GameStatus,
    selected: Option<Square>,
    pending_promotion: Option<Move>,
    clocks: Arc<Clocks>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates an idle game on the standard board.
    pub fn new() -> Self {
        Self::with_board(Board::standard())
    }

    /// Creates an idle game on a square board of `size` described by layout
    /// text.
    pub fn from_layout(text: &str, size: u8) -> Result<Self, LayoutError> {
        Ok(Self::with_board(parse_layout(text, size, size)?))
    }

    /// Creates an idle game whose start layout is `board`.
    pub fn with_board(board: Board) -> Self {
        let mut game = Game {
            start: board.clone(),
            board: board.clone(),
            display: board,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            last_move: None,
            history: GameHistory::new(),
            draw_counter: 0,
            status: GameStatus::Idle,
            selected: None,
            pending_promotion: None,
            clocks: Arc::new(Clocks::new(DEFAULT_MAX_TIME)),
        };
        game.reset_position();
        game.status = GameStatus::Idle;
        game
    }

    // ---- commands -------------------------------------------------------

    /// Starts a new game from the start layout with `max_time` per side.
    ///
    /// A game still in progress is abandoned.
    pub fn start_new_game(&mut self, max_time: Duration) -> GameStatus {
        if self.status.is_active() && !self.history.is_empty() {
            tracing::info!(
                "Abandoning game in progress after {} moves",
                self.history.depth()
            );
        }
        self.reset_position();
        self.clocks.reset(max_time);
        self.status = self.classify();
        tracing::info!(
            "New game started: {} ({}s per side)",
            format_layout(&self.board),
            max_time.as_secs()
        );
        if let Some(message) = self.status.end_message() {
            tracing::info!("Game over at start: {}", message);
        }
        self.status
    }

    /// Replaces the start layout and resets to an idle game on it.
    ///
    /// The board keeps its current size. On error nothing changes.
    pub fn load_layout(&mut self, text: &str) -> Result<(), LayoutError> {
        let board = match parse_layout(text, self.start.width(), self.start.height()) {
            Ok(board) => board,
            Err(e) => {
                tracing::warn!("Rejected layout {:?}: {}", text, e);
                return Err(e);
            }
        };
        self.start = board;
        self.reset_position();
        self.status = GameStatus::Idle;
        tracing::info!("Loaded layout {}", text);
        Ok(())
    }

    /// Picks up the piece on `square`, blanking it in the display board.
    ///
    /// An empty or off-board square clears the selection instead.
    pub fn select_origin(&mut self, square: Square) -> Result<(), GameError> {
        self.ensure_can_move()?;
        self.clear_selection();
        if !self.board.contains(square) {
            return Err(GameError::OutOfBounds(square));
        }
        if self.board.is_empty(square) {
            return Err(GameError::EmptySquare(square));
        }
        self.selected = Some(square);
        self.display.remove(square);
        Ok(())
    }

    /// Drops the current selection and restores the display board.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.display = self.board.clone();
    }

    /// Moves the piece on `from` to `to`.
    ///
    /// The capture flag follows the occupancy of `to`. A pawn reaching the
    /// last row without `promotion` is held until [`Game::complete_promotion`]
    /// or [`Game::cancel_promotion`].
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_can_move()?;
        let result = self.try_move(from, to, promotion);
        if result.is_err() {
            self.clear_selection();
        }
        result
    }

    /// Moves the selected piece to `to`.
    pub fn move_selected(
        &mut self,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_can_move()?;
        let from = self.selected.ok_or(GameError::NoSelection)?;
        self.attempt_move(from, to, promotion)
    }

    /// Completes a pending promotion with the chosen piece.
    pub fn complete_promotion(&mut self, piece: Piece) -> Result<MoveOutcome, GameError> {
        if self.status != GameStatus::AwaitingPromotionChoice {
            return Err(self.no_promotion_error());
        }
        if !piece.is_promotion_target() {
            return Err(GameError::InvalidPromotion(piece));
        }
        let pending = self
            .pending_promotion
            .take()
            .ok_or(GameError::NoPromotionPending)?;
        self.status = GameStatus::InProgress;
        let result = self.play(pending.with_promotion(Some(piece)));
        if result.is_err() {
            self.clear_selection();
        }
        result
    }

    /// Abandons a pending promotion; the pawn stays where it was.
    pub fn cancel_promotion(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::AwaitingPromotionChoice {
            return Err(self.no_promotion_error());
        }
        self.pending_promotion = None;
        self.status = GameStatus::InProgress;
        self.clear_selection();
        Ok(())
    }

    /// Takes back the last committed move and returns it.
    ///
    /// Undoing the only move played starts the game afresh.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        match self.status {
            GameStatus::InProgress => {}
            GameStatus::AwaitingPromotionChoice => return Err(GameError::PromotionPending),
            status if status.is_terminal() => return Err(GameError::GameOver(status)),
            status => return Err(GameError::NotInProgress(status)),
        }
        if self.history.is_empty() {
            return Err(GameError::NothingToUndo);
        }

        let current = self.position_key();
        self.history.forget(&current);
        let entry = self.history.pop().ok_or(GameError::NothingToUndo)?;

        self.board = entry.board;
        self.last_move = self.history.last_move();
        self.castling.restore_after(self.history.depth());
        self.side_to_move = self.side_to_move.opposite();
        self.draw_counter = self.draw_counter.saturating_sub(1);
        self.pending_promotion = None;
        self.clear_selection();

        if self.history.is_empty() {
            self.reset_position();
            self.clocks.reset(self.clocks.max_time());
        }
        tracing::debug!("Undid {}", entry.mov);
        Ok(entry.mov)
    }

    /// Ends the game for a reason decided outside the board.
    pub fn end_game(&mut self, reason: EndReason) -> Result<GameStatus, GameError> {
        if !self.status.is_active() {
            return Err(self.inactive_error());
        }
        let status = match reason {
            EndReason::Resignation(color) => GameStatus::WinByResignation(color.opposite()),
            EndReason::Timeout(color) => {
                let opponent = color.opposite();
                if self.board.material(opponent) >= INSUFFICIENT_MATERIAL {
                    GameStatus::WinByTimeout(opponent)
                } else {
                    GameStatus::DrawByTimeout
                }
            }
        };
        self.pending_promotion = None;
        self.clear_selection();
        self.status = status;
        if let Some(message) = status.end_message() {
            tracing::info!("{}", message);
        }
        Ok(status)
    }

    // ---- queries --------------------------------------------------------

    /// The committed board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The committed board with the selected piece lifted off.
    #[inline]
    pub fn display_board(&self) -> &Board {
        &self.display
    }

    /// The layout a new game starts from.
    #[inline]
    pub fn start_board(&self) -> &Board {
        &self.start
    }

    pub fn layout(&self) -> String {
        format_layout(&self.board)
    }

    pub fn display_layout(&self) -> String {
        format_layout(&self.display)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Legal moves for the side to move. Empty unless a move can be made.
    pub fn legal_moves(&self) -> LegalMoves {
        if self.status != GameStatus::InProgress {
            return LegalMoves::default();
        }
        movegen::legal_moves(
            &self.board,
            self.side_to_move,
            self.last_move,
            &self.castling,
        )
    }

    /// Legal destinations of the piece on `from`.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if self.status != GameStatus::InProgress || !self.board.contains(from) {
            return Vec::new();
        }
        self.board
            .squares()
            .filter(|&to| {
                movegen::find_legal_move(
                    &self.board,
                    from,
                    to,
                    self.side_to_move,
                    self.last_move,
                    &self.castling,
                )
                .is_some()
            })
            .collect()
    }

    #[inline]
    pub fn is_promotion_pending(&self) -> bool {
        self.status == GameStatus::AwaitingPromotionChoice
    }

    /// The move waiting for a promotion piece.
    #[inline]
    pub fn pending_promotion(&self) -> Option<Move> {
        self.pending_promotion
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn end_message(&self) -> Option<String> {
        self.status.end_message()
    }

    /// Number of committed moves.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.depth()
    }

    /// Completed moves counted towards the 50-move draw.
    #[inline]
    pub fn draw_counter(&self) -> u32 {
        self.draw_counter
    }

    #[inline]
    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// The square a pawn may be captured on en passant this move.
    pub fn en_passant_square(&self) -> Option<Square> {
        validator::en_passant_target(self.last_move)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        check::is_in_check(
            &self.board,
            self.side_to_move,
            self.last_move,
            &self.castling,
        )
    }

    #[inline]
    pub fn clocks(&self) -> &Arc<Clocks> {
        &self.clocks
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    #[inline]
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Material weight of one side's pieces.
    pub fn material(&self, color: Color) -> u32 {
        self.board.material(color)
    }

    // ---- internals ------------------------------------------------------

    fn ensure_can_move(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::AwaitingPromotionChoice => Err(GameError::PromotionPending),
            _ => Err(self.inactive_error()),
        }
    }

    fn inactive_error(&self) -> GameError {
        if self.status.is_terminal() {
            GameError::GameOver(self.status)
        } else {
            GameError::NotInProgress(self.status)
        }
    }

    fn no_promotion_error(&self) -> GameError {
        if self.status.is_terminal() {
            GameError::GameOver(self.status)
        } else {
            GameError::NoPromotionPending
        }
    }

    fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<MoveOutcome, GameError> {
        for square in [from, to] {
            if !self.board.contains(square) {
                return Err(GameError::OutOfBounds(square));
            }
        }
        let (piece, color) = self
            .board
            .piece_at(from)
            .ok_or(GameError::EmptySquare(from))?;
        if from == to {
            self.select_origin(from)?;
            return Ok(MoveOutcome::Selected(from));
        }

        let capture = !self.board.is_empty(to);
        let mov = Move::new(piece, color, from, to).with_capture(capture);
        let promotes = piece == Piece::Pawn && to.y() == color.promotion_row(self.board.height());

        match promotion {
            Some(choice) if !promotes => Err(GameError::UnexpectedPromotion(choice)),
            Some(choice) if !choice.is_promotion_target() => {
                Err(GameError::InvalidPromotion(choice))
            }
            Some(choice) => self.play(mov.with_promotion(Some(choice))),
            None if promotes => {
                // Whether the king ends up safe does not depend on the
                // promotion piece, so a queen stands in for the choice.
                self.check_move(mov.with_promotion(Some(Piece::Queen)))?;
                self.pending_promotion = Some(mov);
                self.status = GameStatus::AwaitingPromotionChoice;
                self.selected = None;
                tracing::debug!("Promotion pending for {}", mov);
                Ok(MoveOutcome::PromotionPending(mov))
            }
            None => self.play(mov),
        }
    }

    /// Validates and commits a move, then classifies the new position.
    fn play(&mut self, mov: Move) -> Result<MoveOutcome, GameError> {
        let (kind, after) = self.check_move(mov)?;
        self.commit(mov, kind, after);

        self.status = self.classify();
        if let Some(message) = self.status.end_message() {
            tracing::info!("{} after {} moves", message, self.history.depth());
        }
        Ok(MoveOutcome::Played {
            mov,
            kind,
            status: self.status,
        })
    }

    /// Runs every legality check and returns the board the move produces.
    fn check_move(&self, mov: Move) -> Result<(MoveKind, Board), GameError> {
        let kind = validator::validate(
            mov,
            &self.board,
            self.side_to_move,
            self.last_move,
            &self.castling,
        )
        .ok_or(GameError::IllegalMove(mov))?;

        if let MoveKind::Castle(side) = kind {
            if check::castling_path_attacked(
                &self.board,
                mov.color,
                side,
                self.last_move,
                &self.castling,
            ) {
                return Err(GameError::CastlingThroughCheck(mov));
            }
        }

        let mut after = self.board.clone();
        movegen::apply_move(&mut after, mov, kind);
        if check::is_in_check(&after, mov.color, Some(mov), &self.castling) {
            return Err(GameError::LeavesKingInCheck(mov));
        }
        Ok((kind, after))
    }

    fn commit(&mut self, mov: Move, kind: MoveKind, after: Board) {
        let before = std::mem::replace(&mut self.board, after);
        self.history.push(before, mov);
        self.update_castling_rights(mov, self.history.depth());
        self.last_move = Some(mov);
        self.draw_counter += 1;
        self.side_to_move = self.side_to_move.opposite();
        let key = self.position_key();
        self.history.record(key);
        self.pending_promotion = None;
        self.clear_selection();
        tracing::debug!("Played {} ({:?})", mov, kind);
    }

    fn update_castling_rights(&mut self, mov: Move, depth: usize) {
        let width = self.board.width();
        let height = self.board.height();
        if width < CastleSide::MIN_WIDTH {
            return;
        }
        if mov.piece == Piece::King {
            self.castling.revoke_color(mov.color, depth);
        }
        for side in CastleSide::ALL {
            let own_corner = Square::new(side.rook_file(width), mov.color.back_row(height));
            if mov.piece == Piece::Rook && mov.from == own_corner {
                self.castling.revoke(mov.color, side, depth);
            }
            let opponent = mov.color.opposite();
            let their_corner = Square::new(side.rook_file(width), opponent.back_row(height));
            if mov.capture && mov.to == their_corner {
                self.castling.revoke(opponent, side, depth);
            }
        }
    }

    fn classify(&self) -> GameStatus {
        let material = self.board.material(Color::White) + self.board.material(Color::Black);
        if material < INSUFFICIENT_MATERIAL {
            return GameStatus::DrawByInsufficientMaterial;
        }
        if self.history.occurrences(&self.position_key()) >= REPETITION_LIMIT {
            return GameStatus::DrawByRepetition;
        }
        if !movegen::has_legal_move(
            &self.board,
            self.side_to_move,
            self.last_move,
            &self.castling,
        ) {
            return if self.is_check() {
                GameStatus::Checkmate(self.side_to_move.opposite())
            } else {
                GameStatus::DrawByStalemate
            };
        }
        if self.draw_counter >= FIFTY_MOVE_LIMIT {
            return GameStatus::DrawByFiftyMove;
        }
        GameStatus::InProgress
    }

    fn position_key(&self) -> PositionKey {
        PositionKey {
            board: self.board.clone(),
            side: self.side_to_move,
            castling: self.castling.availability(),
            en_passant: self.en_passant_square(),
        }
    }

    /// Puts the start layout back on the board with fresh game state.
    fn reset_position(&mut self) {
        self.board = self.start.clone();
        self.display = self.start.clone();
        self.side_to_move = Color::White;
        self.castling = CastlingRights::ALL;
        self.last_move = None;
        self.history.clear();
        self.draw_counter = 0;
        self.selected = None;
        self.pending_promotion = None;
        self.status = GameStatus::InProgress;
        let key = self.position_key();
        self.history.record(key);
    }
}
