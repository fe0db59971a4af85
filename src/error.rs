use thiserror::Error;

/// Main error type for the interval timer
#[derive(Error, Debug)]
pub enum TimerError {
    // Argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TimerError
pub type Result<T> = std::result::Result<T, TimerError>;
