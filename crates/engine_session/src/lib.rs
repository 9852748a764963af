//! One long-lived connection to a UCI engine.
//!
//! [`EngineSession`] writes commands to the engine's stdin and runs a reader
//! task over its stdout. Each search request gets its own [`SearchHandle`],
//! which resolves with the engine's `bestmove` reply. Replies are matched to
//! requests in the order the requests were issued.

pub mod command;
pub mod config;
pub mod error;
pub mod reply;
pub mod session;

pub use command::EngineCommand;
pub use config::EngineConfig;
pub use error::EngineError;
pub use reply::{parse_line, EngineReply};
pub use session::{BestMove, EngineSession, SearchHandle, SearchId, SessionState};
