//! Error types for sign generation.

use shared::ObjectId;
use thiserror::Error;

use crate::scene::InteractionMode;

/// Result type alias for generator operations.
pub type NeonResult<T> = Result<T, NeonError>;

/// Errors that abort a sign generation.
#[derive(Debug, Error)]
pub enum NeonError {
    /// Input text exceeds the accepted length.
    #[error("text is {len} characters long, at most {max} are accepted")]
    TextTooLong { len: usize, max: usize },

    /// A color channel is outside [0, 1].
    #[error("color channel {channel} = {value} is outside [0, 1]")]
    InvalidColor { channel: usize, value: f32 },

    /// The active font has no glyph for this character.
    #[error("no glyph for character {0:?}")]
    MissingGlyph(char),

    /// Font file could not be read or parsed.
    #[error("font load failed: {0}")]
    FontLoad(String),

    /// Polygon fill failed.
    #[error("tessellation failed: {0}")]
    Tessellation(String),

    /// No object with this ID in the scene.
    #[error("object '{0}' not found")]
    ObjectNotFound(ObjectId),

    /// The object exists but holds the wrong kind of data.
    #[error("object '{id}' is not a {expected}")]
    WrongObjectKind { id: ObjectId, expected: &'static str },

    /// Operation issued in the wrong interaction mode.
    #[error("operation requires {expected:?} mode, scene is in {actual:?} mode")]
    ModeViolation {
        expected: InteractionMode,
        actual: InteractionMode,
    },

    /// Mesh topology not handled by an operation.
    #[error("unsupported topology: {0}")]
    UnsupportedTopology(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NeonError {
    pub fn font_load(details: impl Into<String>) -> Self {
        Self::FontLoad(details.into())
    }

    pub fn tessellation(details: impl Into<String>) -> Self {
        Self::Tessellation(details.into())
    }

    pub fn unsupported(details: impl Into<String>) -> Self {
        Self::UnsupportedTopology(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NeonError::TextTooLong { len: 2000, max: 1024 };
        assert!(err.to_string().contains("2000"));

        let err = NeonError::MissingGlyph('\u{2603}');
        assert!(err.to_string().contains("no glyph"));

        let err = NeonError::ModeViolation {
            expected: InteractionMode::Object,
            actual: InteractionMode::Edit,
        };
        assert!(err.to_string().contains("Object"));
        assert!(err.to_string().contains("Edit"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.ttf");
        let err: NeonError = io.into();
        assert!(matches!(err, NeonError::Io(_)));
    }
}
