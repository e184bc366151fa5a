//! Command execution against one game.

use crate::command::{Command, HELP};
use crate::config::CliConfig;
use crate::output::{self, Snapshot};
use chess_core::{Color, Square};
use chess_engine::{EndReason, Game, GameError, MoveOutcome};
use std::time::Duration;

/// Answer to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            quit: false,
        }
    }
}

/// One game plus the settings used to restart it.
pub struct Session {
    game: Game,
    config: CliConfig,
    json: bool,
}

impl Session {
    pub fn new(game: Game, config: CliConfig, json: bool) -> Self {
        Session { game, config, json }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The side whose clock should be running.
    pub fn active_side(&self) -> Option<Color> {
        self.game
            .status()
            .is_active()
            .then(|| self.game.side_to_move())
    }

    /// Height used to read square names.
    pub fn board_height(&self) -> u8 {
        self.game.board().height()
    }

    /// Runs one command.
    pub fn execute(&mut self, command: Command) -> Reply {
        let mut view = View::Board;
        let height = self.board_height();
        let explain = |error: GameError| describe(error, height);
        let result: Result<Option<String>, String> = match command {
            Command::Quit => {
                return Reply {
                    text: String::new(),
                    quit: true,
                }
            }
            Command::Help => return Reply::say(HELP),
            Command::Unknown(input) if input.is_empty() => return Reply::say(""),
            Command::Unknown(input) => Err(format!("unknown command '{}' (try 'help')", input)),
            Command::New(secs) => {
                let max_time = secs
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.config.max_time());
                let status = self.game.start_new_game(max_time);
                Ok(Some(format!("New game: {}", status)))
            }
            Command::Layout(text) => self
                .game
                .load_layout(&text)
                .map(|()| Some("Layout loaded; 'new' starts a game".to_string()))
                .map_err(|e| e.to_string()),
            Command::Select(square) => self
                .game
                .select_origin(square)
                .map(|()| None)
                .map_err(explain),
            Command::Move {
                from,
                to,
                promotion,
            } => self
                .game
                .attempt_move(from, to, promotion)
                .map(|outcome| Some(self.describe_outcome(outcome)))
                .map_err(explain),
            Command::To { to, promotion } => self
                .game
                .move_selected(to, promotion)
                .map(|outcome| Some(self.describe_outcome(outcome)))
                .map_err(explain),
            Command::Promote(piece) => self
                .game
                .complete_promotion(piece)
                .map(|outcome| Some(self.describe_outcome(outcome)))
                .map_err(explain),
            Command::Cancel => self
                .game
                .cancel_promotion()
                .map(|()| Some("Promotion cancelled".to_string()))
                .map_err(explain),
            Command::Undo => self
                .game
                .undo()
                .map(|mov| Some(format!("Took back {}", mov.notation(height))))
                .map_err(explain),
            Command::Resign => {
                let side = self.game.side_to_move();
                self.game
                    .end_game(EndReason::Resignation(side))
                    .map(|_| None)
                    .map_err(explain)
            }
            Command::Moves(from) => {
                view = View::Moves(from);
                Ok(None)
            }
            Command::Status => {
                view = View::Status;
                Ok(None)
            }
            Command::History => {
                view = View::History;
                Ok(None)
            }
            Command::Show => Ok(None),
        };

        if self.json {
            let (ok, message) = match result {
                Ok(message) => (true, message),
                Err(error) => (false, Some(error)),
            };
            let mut snapshot = Snapshot::capture(&self.game, ok, message);
            match view {
                View::Moves(from) => snapshot = snapshot.with_moves(&self.game, from),
                View::History => snapshot = snapshot.with_history(&self.game),
                View::Board | View::Status => {}
            }
            return Reply::say(
                snapshot
                    .to_json()
                    .unwrap_or_else(|e| format!("{{\"ok\":false,\"message\":\"{}\"}}", e)),
            );
        }

        let mut lines = Vec::new();
        match result {
            Ok(Some(message)) => lines.push(message),
            Ok(None) => {}
            Err(error) => lines.push(format!("error: {}", error)),
        }
        lines.push(match view {
            View::Board => output::render_board(&self.game),
            View::Status => output::status_line(&self.game),
            View::Moves(from) => output::render_moves(&self.game, from),
            View::History => output::render_history(&self.game),
        });
        Reply::say(lines.join("\n"))
    }

    fn describe_outcome(&self, outcome: MoveOutcome) -> String {
        let height = self.board_height();
        match outcome {
            MoveOutcome::Selected(square) => {
                format!("Selected {}", square.to_algebraic(height))
            }
            MoveOutcome::PromotionPending(mov) => {
                format!(
                    "{} needs a promotion piece: promote q|r|b|n",
                    mov.notation(height)
                )
            }
            MoveOutcome::Played { mov, status, .. } => {
                let mov = mov.notation(height);
                match status.end_message() {
                    Some(end) => format!("Played {}. {}", mov, end),
                    None => format!("Played {}", mov),
                }
            }
        }
    }

    /// Ends the game because `color` ran out of time.
    ///
    /// A report is stale unless `color` is to move with an empty clock; it
    /// may have been queued before a `new` or `undo` reset the clocks.
    pub fn timeout(&mut self, color: Color) -> Reply {
        if color != self.game.side_to_move() || !self.game.clocks().is_flagged(color) {
            tracing::debug!("Ignoring stale timeout for {}", color);
            return Reply::say("");
        }
        let result = self
            .game
            .end_game(EndReason::Timeout(color))
            .map(|status| status.end_message().unwrap_or_else(|| status.to_string()));
        match result {
            Ok(message) if self.json => Reply::say(
                Snapshot::capture(&self.game, true, Some(message))
                    .to_json()
                    .unwrap_or_default(),
            ),
            Ok(message) => Reply::say(message),
            Err(e) => {
                tracing::debug!("Ignoring timeout for {}: {}", color, e);
                Reply::say("")
            }
        }
    }
}

/// What to print after a command in text mode.
#[derive(Debug, Clone, Copy)]
enum View {
    Board,
    Status,
    Moves(Option<Square>),
    History,
}

/// Error text with squares named for a board of `height` rows.
fn describe(error: GameError, height: u8) -> String {
    match error {
        GameError::EmptySquare(square) => format!("no piece on {}", square.to_algebraic(height)),
        GameError::IllegalMove(mov) => format!("illegal move: {}", mov.notation(height)),
        GameError::LeavesKingInCheck(mov) => {
            format!("move {} leaves the king in check", mov.notation(height))
        }
        GameError::CastlingThroughCheck(mov) => format!(
            "cannot castle out of, through or into check: {}",
            mov.notation(height)
        ),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn session(json: bool) -> Session {
        let config = CliConfig::default();
        let game = config.build_game().unwrap();
        Session::new(game, config, json)
    }

    fn sized_session(size: u8, layout: &str, json: bool) -> Session {
        let config = CliConfig {
            game: GameConfig {
                board_size: size,
                start_layout: layout.to_string(),
                ..GameConfig::default()
            },
            ..CliConfig::default()
        };
        let game = config.build_game().unwrap();
        Session::new(game, config, json)
    }

    fn run(session: &mut Session, line: &str) -> Reply {
        let command = Command::parse(line, session.board_height()).unwrap();
        session.execute(command)
    }

    #[test]
    fn test_play_a_few_moves() {
        let mut s = session(false);
        assert_eq!(s.active_side(), None);
        let reply = run(&mut s, "new");
        assert!(reply.text.starts_with("New game: in progress"));
        assert_eq!(s.active_side(), Some(Color::White));

        let reply = run(&mut s, "move e2 e4");
        assert!(reply.text.starts_with("Played Pe2e4"));
        assert_eq!(s.active_side(), Some(Color::Black));

        let reply = run(&mut s, "move e2 e4");
        assert!(reply.text.starts_with("error: no piece on e2"));
    }

    #[test]
    fn test_select_then_move() {
        let mut s = session(false);
        run(&mut s, "new");
        let reply = run(&mut s, "select g1");
        assert!(reply.text.contains(" 1  R N B Q K B . R"));
        let reply = run(&mut s, "to f3");
        assert!(reply.text.starts_with("Played Ng1f3"));
    }

    #[test]
    fn test_status_and_moves_views() {
        let mut s = session(false);
        run(&mut s, "new 30");
        assert_eq!(
            run(&mut s, "status").text,
            "White to move (in progress) | move 1 | castling KQkq | white 30s black 30s"
        );
        assert_eq!(run(&mut s, "moves g1").text, "g1: f3 h3");
    }

    #[test]
    fn test_resign_and_quit() {
        let mut s = session(false);
        run(&mut s, "new");
        let reply = run(&mut s, "resign");
        assert!(reply.text.ends_with("Black wins by resignation!"));
        assert_eq!(s.active_side(), None);
        assert!(run(&mut s, "quit").quit);
    }

    #[test]
    fn test_timeout() {
        let mut s = session(false);
        run(&mut s, "new");
        s.game().clocks().set_remaining(Color::White, Duration::ZERO);
        assert_eq!(s.timeout(Color::White).text, "Black wins by timeout!");
        // a second report after the game ended is ignored
        assert_eq!(s.timeout(Color::White).text, "");
    }

    #[test]
    fn test_stale_timeout_ignored() {
        let mut s = session(false);
        run(&mut s, "new");
        s.game().clocks().set_remaining(Color::White, Duration::ZERO);
        // queued flag arrives after a restart refilled the clocks
        run(&mut s, "new");
        assert_eq!(s.timeout(Color::White).text, "");
        assert_eq!(s.active_side(), Some(Color::White));

        // a flag for the side not to move
        s.game().clocks().set_remaining(Color::Black, Duration::ZERO);
        assert_eq!(s.timeout(Color::Black).text, "");
        assert_eq!(s.active_side(), Some(Color::White));
    }

    #[test]
    fn test_history_view() {
        let mut s = session(false);
        run(&mut s, "new");
        run(&mut s, "move e2 e4");
        run(&mut s, "move e7 e5");
        assert_eq!(run(&mut s, "history").text, "1. Pe2e4 pe7e5");
        run(&mut s, "undo");
        assert_eq!(run(&mut s, "history").text, "1. Pe2e4");
    }

    #[test]
    fn test_small_board_names_squares() {
        let mut s = sized_session(5, "k4/5/5/1P3/K4", false);
        run(&mut s, "new");
        assert!(run(&mut s, "move b2 b3").text.starts_with("Played Pb2b3"));
        assert!(run(&mut s, "move a5 b5").text.starts_with("Played ka5b5"));
        assert!(run(&mut s, "move b3 b5")
            .text
            .starts_with("error: illegal move: Pb3xb5"));
        assert!(run(&mut s, "move c1 c2")
            .text
            .starts_with("error: no piece on c1"));
        assert_eq!(run(&mut s, "undo").text.lines().next(), Some("Took back ka5b5"));
        assert_eq!(run(&mut s, "history").text, "1. Pb2b3");
    }

    #[test]
    fn test_small_board_json_last_move() {
        let mut s = sized_session(5, "k4/5/5/1P3/K4", true);
        run(&mut s, "new");
        let reply = run(&mut s, "move b2 b3");
        let json: serde_json::Value = serde_json::from_str(&reply.text).unwrap();
        assert_eq!(json["message"], "Played Pb2b3");
        assert_eq!(json["last_move"], "Pb2b3");
    }

    #[test]
    fn test_large_board_castling_error() {
        let mut s = sized_session(10, "4k1r3/91/91/91/91/91/91/91/91/4K4R", false);
        run(&mut s, "new");
        let reply = run(&mut s, "move e1 i1");
        assert!(reply
            .text
            .starts_with("error: cannot castle out of, through or into check: Ke1i1"));
    }

    #[test]
    fn test_json_replies() {
        let mut s = session(true);
        let reply = run(&mut s, "move e2 e4");
        let json: serde_json::Value = serde_json::from_str(&reply.text).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["status"], "idle");

        run(&mut s, "new");
        let reply = run(&mut s, "moves b1");
        let json: serde_json::Value = serde_json::from_str(&reply.text).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["legal_moves"][0]["from"], "b1");
        assert_eq!(json["legal_moves"][0]["to"][1], "c3");
    }

    #[test]
    fn test_layout_command() {
        let mut s = session(false);
        let reply = run(&mut s, "layout 4k3/8/8/8/8/8/4P3/4K3");
        assert!(reply.text.starts_with("Layout loaded"));
        let reply = run(&mut s, "layout 4k3/8");
        assert!(reply.text.starts_with("error: layout has 2 rows"));
        run(&mut s, "new");
        assert_eq!(s.game().layout(), "4k3/8/8/8/8/8/4P3/4K3");
    }
}
