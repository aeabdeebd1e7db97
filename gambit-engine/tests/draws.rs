//! Draws
//!
//! Tests to ensure repetition, move counting, and material draws
//! are correctly evaluated over a game.

use gambit_engine::status::Termination;
use gambit_engine::*;

const KNIGHT_DANCE: [(&str, &str); 4] = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

fn dance(game: &mut Game, times: usize) {
    for _ in 0..times {
        for (from, to) in KNIGHT_DANCE {
            game.attempt_move(from, to, None).unwrap();
        }
    }
}

#[test]
fn threefold_repetition_is_claimable() {
    let mut game = Game::new();
    dance(&mut game, 2);

    let status = game.status();
    assert_eq!(game.repetitions(), 3);
    assert!(status.can_claim_draw);
    assert!(!status.is_game_over);
    assert!(!status.is_draw_other);
}

#[test]
fn fivefold_repetition_ends_game() {
    let mut game = Game::new();
    dance(&mut game, 3);
    assert!(!game.status().is_game_over);

    dance(&mut game, 1);
    let status = game.status();
    assert_eq!(game.repetitions(), 5);
    assert!(status.is_game_over);
    assert!(status.is_draw_other);
    assert_eq!(status.winner, None);
    assert_eq!(status.termination, Some(Termination::FivefoldRepetition));
    assert_eq!(status.result.as_deref(), Some("Draw by fivefold repetition!"));

    assert!(game.undo());
    assert!(!game.status().is_game_over);
}

#[test]
fn repetition_requires_same_castling_rights() {
    let mut game = Game::new();
    game.attempt_move("e2", "e4", None).unwrap();
    game.attempt_move("e7", "e5", None).unwrap();
    // Shuffling the kings loses castling rights, so the first visit never repeats.
    for (from, to) in [("e1", "e2"), ("e8", "e7"), ("e2", "e1"), ("e7", "e8")] {
        game.attempt_move(from, to, None).unwrap();
    }
    assert_eq!(game.repetitions(), 1);
    for (from, to) in [("e1", "e2"), ("e8", "e7"), ("e2", "e1"), ("e7", "e8")] {
        game.attempt_move(from, to, None).unwrap();
    }
    assert_eq!(game.repetitions(), 2);
}

#[test]
fn uncapturable_en_passant_does_not_break_repetition() {
    // After e4 the d4 pawn cannot take en passant, it is pinned by the rook.
    let mut game = Game::from_fen("3k3n/8/8/8/3p4/8/4P3/3RK3 w - - 0 1").unwrap();
    game.attempt_move("e2", "e4", None).unwrap();
    assert_eq!(game.snapshot().fen, "3k3n/8/8/8/3pP3/8/8/3RK3 b - - 0 1");

    for (from, to) in [("h8", "g6"), ("e1", "f1"), ("g6", "h8"), ("f1", "e1")] {
        game.attempt_move(from, to, None).unwrap();
    }
    assert_eq!(game.repetitions(), 2);
}

#[test]
fn fifty_move_rule_is_claimable() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 99 80").unwrap();
    assert!(!game.status().can_claim_draw);

    game.attempt_move("a2", "a3", None).unwrap();
    let status = game.status();
    assert_eq!(status.halfmove_clock, 100);
    assert!(status.can_claim_draw);
    assert!(!status.is_game_over);
}

#[test]
fn seventy_five_move_rule_ends_game() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 149 120").unwrap();
    assert!(!game.status().is_game_over);

    game.attempt_move("a2", "a3", None).unwrap();
    let status = game.status();
    assert!(status.is_game_over);
    assert!(status.is_draw_other);
    assert_eq!(status.termination, Some(Termination::SeventyFiveMoves));
    assert_eq!(status.result.as_deref(), Some("Draw by seventy-five-move rule!"));

    game.undo();
    assert_eq!(game.status().halfmove_clock, 149);
    assert!(!game.status().is_game_over);
}

#[test]
fn checkmate_beats_seventy_five_move_rule() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 149 100").unwrap();
    assert_eq!(game.attempt_move("a1", "a8", None).unwrap(), "Ra8#");

    let status = game.status();
    assert!(status.is_checkmate);
    assert!(!status.is_draw_other);
    assert_eq!(status.result.as_deref(), Some("White wins by checkmate!"));
}

#[test]
fn capture_into_insufficient_material() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/3r4/3NK3 w - - 0 1").unwrap();
    assert!(!game.status().is_game_over);

    assert_eq!(game.attempt_move("e1", "d2", None).unwrap(), "Kxd2");
    let status = game.status();
    assert!(status.is_game_over);
    assert!(status.is_draw_other);
    assert!(!status.is_stalemate);
    assert_eq!(status.result.as_deref(), Some("Draw by insufficient material!"));
}

#[test]
fn stalemate() {
    let mut game = Game::from_fen("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1").unwrap();
    game.attempt_move("f1", "f7", None).unwrap();

    let status = game.status();
    assert!(status.is_stalemate);
    assert!(status.is_game_over);
    assert!(!status.is_draw_other);
    assert_eq!(status.result.as_deref(), Some("Draw by stalemate!"));
}
