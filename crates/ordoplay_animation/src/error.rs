// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while loading and saving animation data.

use std::path::PathBuf;

/// Error raised by animation persistence
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// Malformed JSON, or a document that does not match the schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed settings file
    #[error("Settings error: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),

    /// Settings could not be written as RON
    #[error("Settings error: {0}")]
    SettingsWrite(#[from] ron::Error),

    /// Two animated variables share a name
    #[error("Duplicate animated var name: {0}")]
    DuplicateName(String),

    /// Two keyframes of one track share a time
    #[error("Duplicate keyframe at time {0}")]
    DuplicateKeyframe(f32),

    /// A required field is missing or empty
    #[error("Missing or invalid field: {0}")]
    MissingField(&'static str),

    /// End time lies before start time
    #[error("Invalid time span: end {end} is before start {start}")]
    InvalidTimeSpan {
        /// Start of the span
        start: f32,
        /// End of the span
        end: f32,
    },

    /// Spline tension outside of [0, 1]
    #[error("Invalid spline tension: {0}")]
    InvalidTension(f32),

    /// File could not be read or written
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl AnimationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for animation persistence
pub type Result<T> = std::result::Result<T, AnimationError>;
