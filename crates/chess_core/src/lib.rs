//! Chess rules and the authoritative game record used when a human plays an
//! external UCI engine.
//!
//! - [`GameState`] validates and applies moves and tracks game status
//! - [`Position`] is a mailbox board with FEN in/out and make/unmake
//! - [`MoveIntent`] is an unvalidated move, read from and written as a UCI token

pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod perft;
pub mod san;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use board::*;
pub use error::*;
pub use fen::START_FEN;
pub use game::*;
pub use movegen::*;
pub use perft::perft;
pub use san::to_san;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
