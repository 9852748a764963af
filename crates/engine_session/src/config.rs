use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to launch the engine and how long to wait on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable name or path
    pub path: String,
    pub args: Vec<String>,
    /// Wait for `readyok` after the handshake
    pub handshake_timeout_ms: u64,
    /// Wait for the process to exit after `quit` before killing it
    pub quit_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            handshake_timeout_ms: 5_000,
            quit_timeout_ms: 1_000,
        }
    }
}

impl EngineConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn quit_timeout(&self) -> Duration {
        Duration::from_millis(self.quit_timeout_ms)
    }
}
