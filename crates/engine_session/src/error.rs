use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine `{path}`: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine has not been initialized")]
    NotInitialized,
    #[error("search depth must be at least 1")]
    InvalidDepth,
    #[error("a search is already in flight")]
    SearchInFlight,
    #[error("engine connection is closed")]
    Terminated,
    #[error("engine disconnected before replying")]
    Disconnected,
    #[error("search was cancelled")]
    Cancelled,
    #[error("engine did not answer isready within {0:?}")]
    HandshakeTimeout(std::time::Duration),
}

impl EngineError {
    /// Errors after which the engine can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::Spawn { .. }
                | EngineError::Io(_)
                | EngineError::Terminated
                | EngineError::Disconnected
                | EngineError::HandshakeTimeout(_)
        )
    }
}
