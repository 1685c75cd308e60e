//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, array-shape, PNG and config errors, and provides
//! semantic variants for malformed frames, source start-up and transport failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decode(String),

    #[error("Frame source failed to start: {0}")]
    SourceInit(String),

    #[error("Frame channel closed: the consumer has shut down")]
    FrameChannelClosed,

    #[error("Display transport error: {0}")]
    Transport(String),

    #[error("Invalid configuration: {field}={value}")]
    InvalidConfig { field: &'static str, value: String },

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Error::MalformedFrame(msg.into())
    }

    pub fn resize<E: std::fmt::Display>(e: E) -> Self {
        Error::Resize(e.to_string())
    }

    pub fn decode<E: std::fmt::Display>(e: E) -> Self {
        Error::Decode(e.to_string())
    }
}
