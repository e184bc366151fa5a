//! Property tests over random legal games.

use chess_core::{Color, Piece, Square};
use chess_engine::check::is_in_check;
use chess_engine::{CastlingRights, Game, GameStatus, MoveOutcome};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    layout: String,
    side: Color,
    castling: CastlingRights,
    draw_counter: u32,
}

fn snapshot(game: &Game) -> Snapshot {
    Snapshot {
        layout: game.layout(),
        side: game.side_to_move(),
        castling: *game.castling_rights(),
        draw_counter: game.draw_counter(),
    }
}

fn pick(game: &Game, choice: usize) -> Option<(Square, Square)> {
    let moves: Vec<(Square, Square)> = game
        .legal_moves()
        .iter()
        .flat_map(|(from, targets)| targets.iter().map(move |&to| (from, to)))
        .collect();
    if moves.is_empty() {
        None
    } else {
        Some(moves[choice % moves.len()])
    }
}

/// Plays up to `choices.len()` random moves, stopping before any move that
/// would end the game, and returns the snapshots taken before each move.
fn random_game(game: &mut Game, choices: &[usize]) -> Vec<Snapshot> {
    let mut before = Vec::new();
    for &choice in choices {
        let Some((from, to)) = pick(game, choice) else {
            break;
        };
        let fallback = game.clone();
        let snap = snapshot(game);
        let mover = game.side_to_move();

        let outcome = game.attempt_move(from, to, None).expect("listed move is legal");
        if let MoveOutcome::PromotionPending(_) = outcome {
            game.complete_promotion(Piece::Queen)
                .expect("pending promotion completes");
        }
        assert!(
            !is_in_check(game.board(), mover, game.last_move(), game.castling_rights()),
            "move {}{} left {} in check",
            from,
            to,
            mover
        );

        if game.status() != GameStatus::InProgress {
            *game = fallback;
            break;
        }
        before.push(snap);
    }
    before
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn undo_restores_every_position(choices in proptest::collection::vec(any::<usize>(), 1..30)) {
        let mut game = Game::new();
        game.start_new_game(Duration::from_secs(60));
        let start = snapshot(&game);

        let before = random_game(&mut game, &choices);
        for expected in before.iter().rev() {
            game.undo().expect("undo of a committed move");
            prop_assert_eq!(&snapshot(&game), expected);
        }
        prop_assert_eq!(snapshot(&game), start);
        prop_assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn listed_moves_are_accepted(choices in proptest::collection::vec(any::<usize>(), 1..20)) {
        let mut game = Game::new();
        game.start_new_game(Duration::from_secs(60));
        random_game(&mut game, &choices);

        let moves = game.legal_moves();
        prop_assert_eq!(moves.is_empty(), game.status() != GameStatus::InProgress);
        for (from, targets) in moves.iter() {
            prop_assert_eq!(game.legal_destinations(from), targets.to_vec());
        }
    }
}
