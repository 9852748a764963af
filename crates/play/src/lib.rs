//! Human vs. engine play: configuration, the controller that ties the game
//! record to the engine session, and the events it reports.

pub mod config;
pub mod controller;
pub mod events;

pub use config::{ConfigError, PlayConfig};
pub use controller::{EngineState, MoveRejection, PlayController, PlayOptions, PlayerInput};
pub use events::{CommandFeedback, GameEvent, Mover};
