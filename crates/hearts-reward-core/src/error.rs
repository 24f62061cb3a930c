//! Error types for Hearts reward evaluation

use thiserror::Error;

/// Result type for Hearts reward operations
pub type Result<T> = std::result::Result<T, HeartsRewardError>;

/// Hearts reward error types
#[derive(Debug, Error)]
pub enum HeartsRewardError {
    /// Player index outside `[0, players)`
    #[error("Invalid player index {index} (players: {players})")]
    InvalidPlayer { index: usize, players: usize },

    /// Card could not be parsed or built
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// Snapshot violates its invariants
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Bad shaping or rules configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),
}

impl From<serde_json::Error> for HeartsRewardError {
    fn from(err: serde_json::Error) -> Self {
        HeartsRewardError::Serialization(err.to_string())
    }
}

/// JSON-RPC error codes for the reward server
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const INVALID_PLAYER: i32 = -32000;
    pub const INVALID_SNAPSHOT: i32 = -32001;
}
