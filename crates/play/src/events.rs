//! What the controller reports to the presentation layer.

use std::fmt;

use chess_core::GameStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mover {
    Human,
    Engine,
}

/// Serialized as one JSON object per event, tagged by `"event"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    NewGame {
        fen: String,
    },
    /// A move was applied, by either side.
    PositionChanged {
        fen: String,
        uci: String,
        san: String,
        by: Mover,
    },
    EngineThinking {
        search: u64,
        depth: u32,
    },
    GameOver {
        status: GameStatus,
    },
    EngineUnavailable {
        reason: String,
    },
    /// The engine proposed a move the game record refused.
    EngineDesync {
        token: String,
        fen: String,
        reason: String,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::NewGame { fen } => write!(f, "new game: {fen}"),
            GameEvent::PositionChanged { san, uci, by, .. } => {
                let who = match by {
                    Mover::Human => "you",
                    Mover::Engine => "engine",
                };
                write!(f, "{who}: {san} ({uci})")
            }
            GameEvent::EngineThinking { depth, .. } => {
                write!(f, "engine thinking (depth {depth})")
            }
            GameEvent::GameOver { status } => write!(f, "game over: {status}"),
            GameEvent::EngineUnavailable { reason } => write!(f, "engine unavailable: {reason}"),
            GameEvent::EngineDesync { token, reason, .. } => {
                write!(f, "engine played {token}, which was refused: {reason}; type `new` to restart")
            }
        }
    }
}

/// Answer to a typed command that changed nothing. Shares the `"event"` tag
/// with [`GameEvent`] so JSON output stays one object per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CommandFeedback {
    MoveRejected { token: String, reason: String },
    Unrecognized { input: String, reason: String },
}

impl fmt::Display for CommandFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFeedback::MoveRejected { token, reason } => write!(f, "rejected {token}: {reason}"),
            CommandFeedback::Unrecognized { reason, .. } => {
                write!(f, "{reason}; type `help` for commands")
            }
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
