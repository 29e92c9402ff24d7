use thiserror::Error;

/// Errors surfaced by canvas backends.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("can't open sound file `{0}` in the working directory or in the sound directories")]
    SoundNotFound(String),

    #[error("can't decode sound `{name}`: {reason}")]
    SoundDecode { name: String, reason: String },

    #[error("audio output unavailable: {0}")]
    Audio(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("render surface error: {0}")]
    Surface(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
