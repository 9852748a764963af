use super::*;
use crate::command::EngineCommand;

fn best(mv: Option<&str>, ponder: Option<&str>) -> Option<EngineReply> {
    Some(EngineReply::BestMove {
        mv: mv.map(str::to_string),
        ponder: ponder.map(str::to_string),
    })
}

#[test]
fn test_bestmove_plain() {
    assert_eq!(parse_line("bestmove e7e5"), best(Some("e7e5"), None));
}

#[test]
fn test_bestmove_with_ponder_and_promotion() {
    assert_eq!(
        parse_line("bestmove a7a8q ponder h2h1n"),
        best(Some("a7a8q"), Some("h2h1n"))
    );
}

#[test]
fn test_bestmove_surrounding_whitespace() {
    assert_eq!(parse_line("  bestmove g1f3  \r"), best(Some("g1f3"), None));
}

#[test]
fn test_null_moves_mean_no_move() {
    assert_eq!(parse_line("bestmove (none)"), best(None, None));
    assert_eq!(parse_line("bestmove 0000"), best(None, None));
}

#[test]
fn test_readyok() {
    assert_eq!(parse_line("readyok"), Some(EngineReply::ReadyOk));
}

#[test]
fn test_other_output_is_ignored() {
    for line in [
        "",
        "id name Stockfish 16",
        "uciok",
        "info depth 10 score cp 31 pv e7e5 g1f3",
        "option name Hash type spin default 16 min 1 max 33554432",
        "bestmove",
        "info string bestmove e2e4",
    ] {
        assert_eq!(parse_line(line), None, "{line:?} should be ignored");
    }
}

#[test]
fn test_command_lines() {
    assert_eq!(EngineCommand::Uci.to_string(), "uci");
    assert_eq!(EngineCommand::IsReady.to_string(), "isready");
    assert_eq!(EngineCommand::UciNewGame.to_string(), "ucinewgame");
    assert_eq!(
        EngineCommand::Position {
            fen: "8/8/8/8/8/8/8/K6k w - - 0 1".to_string()
        }
        .to_string(),
        "position fen 8/8/8/8/8/8/8/K6k w - - 0 1"
    );
    assert_eq!(EngineCommand::Go { depth: 10 }.to_string(), "go depth 10");
    assert_eq!(EngineCommand::Stop.to_string(), "stop");
    assert_eq!(EngineCommand::Quit.to_string(), "quit");
}
