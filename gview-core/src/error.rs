//! Error types for the coordinate and layout engine.
//!
//! Rejections that are part of normal interaction (a zoom past the
//! resolution ceiling, a pan that would cross a chromosome edge) are NOT
//! errors; they are expressed as typed outcomes in `view`. The variants
//! here cover genuinely invalid input or configuration.

use thiserror::Error;

/// Main error type for coordinate and layout operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    #[error("Unknown chromosome: {name}")]
    UnknownChromosome { name: String },

    #[error("Empty view: {message}")]
    EmptyView { message: String },

    #[error("Invalid viewport: {message}")]
    InvalidViewport { message: String },

    #[error("Unknown track kind: {kind}")]
    UnknownTrackKind { kind: String },
}

impl LayoutError {
    pub fn invalid_coordinate<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    pub fn unknown_chromosome<S: Into<String>>(name: S) -> Self {
        Self::UnknownChromosome { name: name.into() }
    }

    pub fn empty_view<S: Into<String>>(message: S) -> Self {
        Self::EmptyView {
            message: message.into(),
        }
    }

    pub fn invalid_viewport<S: Into<String>>(message: S) -> Self {
        Self::InvalidViewport {
            message: message.into(),
        }
    }

    pub fn unknown_track_kind<S: Into<String>>(kind: S) -> Self {
        Self::UnknownTrackKind { kind: kind.into() }
    }
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::invalid_coordinate("stop before start");
        assert_eq!(err.to_string(), "Invalid coordinate: stop before start");

        let err = LayoutError::unknown_chromosome("chr99");
        assert_eq!(err.to_string(), "Unknown chromosome: chr99");
    }
}
