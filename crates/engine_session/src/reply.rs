//! Inbound engine output. Only `bestmove` and `readyok` matter; every other
//! line (`id`, `option`, `info`, ...) is ignored.

/// Tokens an engine sends instead of a move when it has none to play.
const NULL_MOVES: [&str; 2] = ["(none)", "0000"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    /// `bestmove <mv> [ponder <mv>]`; `mv` is `None` when the engine reported
    /// no legal move.
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    ReadyOk,
}

/// Classify one line of engine output. Returns `None` for lines the session
/// does not act on.
pub fn parse_line(line: &str) -> Option<EngineReply> {
    let mut tokens = line.split_whitespace();
    match tokens.next()? {
        "readyok" => Some(EngineReply::ReadyOk),
        "bestmove" => {
            let mv = tokens.next()?;
            let ponder = match (tokens.next(), tokens.next()) {
                (Some("ponder"), Some(p)) if !NULL_MOVES.contains(&p) => Some(p.to_string()),
                _ => None,
            };
            Some(EngineReply::BestMove {
                mv: (!NULL_MOVES.contains(&mv)).then(|| mv.to_string()),
                ponder,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod reply_tests;
