//! Draw and game-end detection, both on raw positions and through `GameState`.

use chess_core::{legal_moves_into, Color, DrawReason, GameState, GameStatus, MoveIntent, Position};

fn intent(token: &str) -> MoveIntent {
    token.parse().unwrap()
}

fn no_legal_moves(fen: &str) -> bool {
    let mut pos = Position::from_fen(fen).unwrap();
    let mut moves = Vec::new();
    legal_moves_into(&mut pos, &mut moves);
    moves.is_empty()
}

// =============================================================================
// Stalemate
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    let fen = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1";
    assert!(no_legal_moves(fen));
    assert!(!Position::from_fen(fen).unwrap().in_check(Color::Black));
    assert_eq!(
        GameState::from_fen(fen).unwrap().status(),
        GameStatus::Stalemate
    );
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let fen = "6k1/6P1/6K1/8/8/8/8/8 b - - 0 1";
    assert!(no_legal_moves(fen));
    assert_eq!(
        GameState::from_fen(fen).unwrap().status(),
        GameStatus::Stalemate
    );
}

#[test]
fn test_not_stalemate_when_pawn_can_move() {
    let fen = "k7/2K5/1Q6/8/8/8/p7/8 b - - 0 1";
    assert!(!no_legal_moves(fen));
    assert_eq!(
        GameState::from_fen(fen).unwrap().status(),
        GameStatus::InProgress
    );
}

// =============================================================================
// Fifty-move rule
// =============================================================================

#[test]
fn test_fifty_move_rule_triggers_at_hundred_halfmoves() {
    let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 60").unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    game.apply_move(intent("a1a2")).unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Draw {
            reason: DrawReason::FiftyMoveRule
        }
    );
}

#[test]
fn test_pawn_move_resets_halfmove_clock() {
    let mut game = GameState::from_fen("4k3/8/8/8/8/8/P7/R3K3 w - - 99 60").unwrap();
    game.apply_move(intent("a2a3")).unwrap();
    assert_eq!(game.current_position().halfmove_clock, 0);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_checkmate_takes_precedence_over_fifty_moves() {
    // Back-rank mate delivered on the hundredth half-move.
    let mut game = GameState::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 60").unwrap();
    game.apply_move(intent("a1a8")).unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::White
        }
    );
}

// =============================================================================
// Insufficient material
// =============================================================================

#[test]
fn test_insufficient_material_cases() {
    let drawn = [
        "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1N2K3 w - - 0 1",
        "5bk1/8/8/8/8/8/8/2B1K3 w - - 0 1",
    ];
    for fen in drawn {
        assert!(
            Position::from_fen(fen).unwrap().is_insufficient_material(),
            "{fen} should be insufficient"
        );
    }

    let playable = [
        "4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/2BBK3 w - - 0 1",
        "2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "4k3/8/8/8/8/8/P7/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
    ];
    for fen in playable {
        assert!(
            !Position::from_fen(fen).unwrap().is_insufficient_material(),
            "{fen} should be sufficient"
        );
    }
}

#[test]
fn test_capture_into_bare_kings_ends_game() {
    let mut game = GameState::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
    game.apply_move(intent("e1d2")).unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Draw {
            reason: DrawReason::InsufficientMaterial
        }
    );
    assert!(game.legal_moves().is_empty());
}

// =============================================================================
// Repetition hashing
// =============================================================================

#[test]
fn test_position_hash_ignores_move_counters() {
    let a = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
        .unwrap();
    let b = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5")
        .unwrap();
    assert_eq!(a.position_hash(), b.position_hash());
}

#[test]
fn test_position_hash_distinguishes_side_and_castling() {
    let base = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap()
        .position_hash();
    let black = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
        .unwrap()
        .position_hash();
    let fewer_rights = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1")
        .unwrap()
        .position_hash();
    assert_ne!(base, black);
    assert_ne!(base, fewer_rights);
}

#[test]
fn test_lost_castling_rights_break_repetition() {
    // Kings walk out and back. The board after ply 2 comes back at plies 6
    // and 10, but only the later two lack castling rights.
    let mut game = GameState::new();
    for token in ["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8", "e1e2", "e8e7", "e2e1", "e7e8"] {
        game.apply_move(intent(token)).unwrap();
    }
    assert_eq!(game.status(), GameStatus::InProgress);

    // Kings on e2/e7 without rights: plies 4, 8 and 12.
    for token in ["e1e2", "e8e7"] {
        game.apply_move(intent(token)).unwrap();
    }
    assert_eq!(
        game.status(),
        GameStatus::Draw {
            reason: DrawReason::ThreefoldRepetition
        }
    );
}

#[test]
fn test_repetition_not_declared_on_second_occurrence() {
    let mut game = GameState::new();
    for token in ["b1c3", "b8c6", "c3b1", "c6b8"] {
        game.apply_move(intent(token)).unwrap();
    }
    assert_eq!(game.status(), GameStatus::InProgress);
}
