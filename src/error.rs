use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipSrtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Failed to decode audio for '{clip}': {message}")]
    Decode { clip: String, message: String },

    #[error("No clips to process")]
    NoClips,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl ClipSrtError {
    pub fn decode<C: Into<String>, M: std::fmt::Display>(clip: C, message: M) -> Self {
        ClipSrtError::Decode {
            clip: clip.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipSrtError>;
