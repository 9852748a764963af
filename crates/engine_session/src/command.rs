//! Outbound UCI commands.

use std::fmt;

/// A single line sent to the engine. Commands get no acknowledgement apart
/// from `isready` (answered by `readyok`) and `go` (answered by `bestmove`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position { fen: String },
    Go { depth: u32 },
    Stop,
    Quit,
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Uci => write!(f, "uci"),
            EngineCommand::IsReady => write!(f, "isready"),
            EngineCommand::UciNewGame => write!(f, "ucinewgame"),
            EngineCommand::Position { fen } => write!(f, "position fen {fen}"),
            EngineCommand::Go { depth } => write!(f, "go depth {depth}"),
            EngineCommand::Stop => write!(f, "stop"),
            EngineCommand::Quit => write!(f, "quit"),
        }
    }
}
