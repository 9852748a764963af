use std::path::{Path, PathBuf};

use chess_core::Color;
use engine_session::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("search_depth must be at least 1")]
    InvalidDepth,
}

/// Settings for a play session, loaded from TOML. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Fixed depth for every engine search
    pub search_depth: u32,
    pub human_color: Color,
    pub engine: EngineConfig,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            search_depth: 10,
            human_color: Color::White,
            engine: EngineConfig::default(),
        }
    }
}

impl PlayConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::InvalidDepth);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
