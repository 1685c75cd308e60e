use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: u32 },

    #[error("Interval must be greater than 0 ms")]
    ZeroInterval,

    #[error(transparent)]
    Monocast(#[from] monocast::Error),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}
