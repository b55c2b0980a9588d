use thiserror::Error;

/// Problems found while loading a breathing pattern.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("pattern '{pattern}': {field} must be finite and non-negative (got {value})")]
    InvalidDuration {
        pattern: String,
        field: &'static str,
        value: f64,
    },

    #[error("pattern '{0}' has no inhale or exhale time")]
    Empty(String),

    #[error("unknown breathing mode: {0}")]
    UnknownMode(String),
}

/// Audio cue failures. These never leave the cue dispatcher.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("audio output stream failed: {0}")]
    Stream(String),

    #[error("could not load cue clip {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("cue clip is too short to rewind ({frames} frames)")]
    TooShort { frames: usize },

    #[error("audio mode not initialized")]
    NotInitialized,
}
