use super::*;
use crate::fen::START_FEN;

fn intent(token: &str) -> MoveIntent {
    token.parse().unwrap()
}

#[test]
fn test_new_game_starts_from_standard_position() {
    let game = GameState::new();
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.history().is_empty());
    assert_eq!(game.legal_moves().len(), 20);
}

#[test]
fn test_e2e4_then_e7e5() {
    let mut game = GameState::new();

    let white = game.apply_move(intent("e2e4")).unwrap();
    assert_eq!(
        game.fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
    assert_eq!(white.san, "e4");
    assert_eq!(white.color, Color::White);

    let black = game.apply_move(intent("e7e5")).unwrap();
    assert_eq!(
        game.fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
    assert_eq!(black.ply, 2);
    assert_eq!(game.history().len(), 2);
}

#[test]
fn test_illegal_move_leaves_state_untouched() {
    let mut game = GameState::new();
    game.apply_move(intent("g1f3")).unwrap();
    let fen = game.fen();
    let history = game.history().to_vec();

    let err = game.apply_move(intent("e7e4")).unwrap_err();
    assert_eq!(err, MoveError::Illegal("e7e4".to_string()));
    assert_eq!(game.fen(), fen);
    assert_eq!(game.history(), &history[..]);
}

#[test]
fn test_e2e5_from_start_is_rejected() {
    let mut game = GameState::new();
    assert!(game.apply_move(intent("e2e5")).is_err());
    assert_eq!(game.fen(), START_FEN);
    assert!(game.history().is_empty());
}

#[test]
fn test_moving_opponent_piece_is_rejected() {
    let mut game = GameState::new();
    assert!(matches!(
        game.apply_move(intent("e7e5")),
        Err(MoveError::Illegal(_))
    ));
}

#[test]
fn test_promotion_defaults_to_queen() {
    let mut game = GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let record = game.apply_move(MoveIntent::from_coords("e7", "e8").unwrap()).unwrap();
    assert_eq!(record.mv.promo, Some(PieceKind::Queen));
    assert_eq!(record.uci, "e7e8q");
    assert!(game.fen().starts_with("4Q3/"));
}

#[test]
fn test_supplied_promotion_piece_is_used() {
    let mut game = GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let record = game.apply_move(intent("e7e8n")).unwrap();
    assert_eq!(record.mv.promo, Some(PieceKind::Knight));
    assert_eq!(record.san, "e8=N");
    assert!(game.fen().starts_with("4N3/"));
}

#[test]
fn test_promotion_to_king_is_rejected() {
    let mut game = GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    assert_eq!(
        game.apply_move(intent("e7e8k")),
        Err(MoveError::InvalidPromotion(PieceKind::King))
    );
}

#[test]
fn test_promotion_suffix_on_ordinary_move_is_ignored() {
    let mut game = GameState::new();
    let record = game.apply_move(intent("e2e4q")).unwrap();
    assert_eq!(record.mv.promo, None);
    assert_eq!(record.uci, "e2e4");
}

#[test]
fn test_checkmate_ends_the_game() {
    let mut game = GameState::new();
    for token in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.apply_move(intent(token)).unwrap();
    }
    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
    assert_eq!(game.history().last().unwrap().san, "Qh4#");
    assert_eq!(game.apply_move(intent("a2a3")), Err(MoveError::GameOver));
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_stalemate_is_terminal() {
    let mut game = GameState::from_fen("k7/2K5/8/1Q6/8/8/8/8 w - - 0 1").unwrap();
    game.apply_move(intent("b5b6")).unwrap();
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert!(game.is_game_over());
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut game = GameState::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    for token in shuffle.iter().chain(shuffle.iter()) {
        assert_eq!(game.status(), GameStatus::InProgress);
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
fn test_reset_after_game_over() {
    let mut game = GameState::new();
    for token in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.apply_move(intent(token)).unwrap();
    }
    game.reset();
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.history().is_empty());
}

#[test]
fn test_castling_record() {
    let mut game =
        GameState::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let record = game.apply_move(intent("e1g1")).unwrap();
    assert!(record.mv.is_castle);
    assert_eq!(record.san, "O-O");
    assert_eq!(
        game.fen(),
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 b kq - 1 1"
    );
}

#[test]
fn test_san_disambiguates_by_file() {
    let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/R4R1K w - - 0 1").unwrap();
    let record = game.apply_move(intent("a1d1")).unwrap();
    assert_eq!(record.san, "Rad1");
}

#[test]
fn test_status_serializes_with_kind_tag() {
    let json = serde_json::to_string(&GameStatus::Checkmate {
        winner: Color::White,
    })
    .unwrap();
    assert_eq!(json, r#"{"kind":"checkmate","winner":"white"}"#);
}

#[test]
fn test_move_counter_at_limit_does_not_overflow() {
    let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295").unwrap();
    game.apply_move(intent("e8d7")).unwrap();
    assert_eq!(game.current_position().fullmove_number, u32::MAX);
    assert_eq!(game.current_position().halfmove_clock, 1);
    assert_eq!(game.fen(), "8/3k4/8/8/8/8/8/R3K3 w - - 1 4294967295");
}
