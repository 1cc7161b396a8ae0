//! Error handling for Clip Splicer
//!
//! A single error enum covers document parsing, placement usage errors, and
//! host failures. Clip-insertion failures are deliberately NOT errors at this
//! level: the engine downgrades them to "unavailable" and keeps going.

use thiserror::Error;

/// Result type alias for Clip Splicer operations
pub type Result<T> = std::result::Result<T, SplicerError>;

/// Main error type for Clip Splicer operations
#[derive(Error, Debug)]
pub enum SplicerError {
    #[error("Specification file not found: {path}")]
    SpecNotFound { path: String },

    #[error("Repeat token with no previous item: _REPEAT_PREVIOUS_WORD requires a preceding component")]
    RepeatWithoutPrevious,

    #[error(
        "Repeat token with no previous item (disc {disc:?}, track {track_index}): \
         _REPEAT_PREVIOUS_WORD cannot start a track"
    )]
    RepeatStartsTrack { disc: String, track_index: usize },

    #[error("Host operation failed: {reason}")]
    Host { reason: String },

    #[error("Invalid pause length for {kind:?}: {reason}")]
    InvalidPauseLength { kind: String, reason: String },

    #[error("Pause prompt failed: {reason}")]
    Prompt { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Specification parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SplicerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SplicerError::SpecNotFound { .. } => "SPEC_NOT_FOUND",
            SplicerError::RepeatWithoutPrevious => "REPEAT_WITHOUT_PREVIOUS",
            SplicerError::RepeatStartsTrack { .. } => "REPEAT_WITHOUT_PREVIOUS",
            SplicerError::Host { .. } => "HOST_ERROR",
            SplicerError::InvalidPauseLength { .. } => "INVALID_PAUSE_LENGTH",
            SplicerError::Prompt { .. } => "PROMPT_ERROR",
            SplicerError::Io(_) => "IO_ERROR",
            SplicerError::Parse(_) => "PARSE_ERROR",
        }
    }
}
