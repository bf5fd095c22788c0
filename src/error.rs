//! Error types for plant growth analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for plant_growth operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while analyzing an image or persisting growth data.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The image path does not exist or is not a readable file
    #[error("Image not found: {}", .path.display())]
    ImageNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Segmentation produced no external contour
    #[error("No plant region found")]
    NoRegionFound,

    /// The image could not be decoded or is not a valid raster
    #[error("Malformed input: {message}")]
    MalformedInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading or writing a document failed
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized or parsed
    #[error("Invalid JSON document {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fieldless discriminant of [`AnalysisError`], for matching on failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ImageNotFound,
    NoRegionFound,
    MalformedInput,
    Persistence,
}

impl AnalysisError {
    pub fn image_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ImageNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a malformed input error with context
    pub fn malformed<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::MalformedInput {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::ImageNotFound { .. } => ErrorKind::ImageNotFound,
            AnalysisError::NoRegionFound => ErrorKind::NoRegionFound,
            AnalysisError::MalformedInput { .. } => ErrorKind::MalformedInput,
            AnalysisError::Io { .. } | AnalysisError::Json { .. } => ErrorKind::Persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_variant() {
        assert_eq!(
            AnalysisError::image_not_found("a.jpg").kind(),
            ErrorKind::ImageNotFound
        );
        assert_eq!(AnalysisError::NoRegionFound.kind(), ErrorKind::NoRegionFound);
        let io = std::io::Error::other("disk full");
        assert_eq!(
            AnalysisError::malformed("bad header", io).kind(),
            ErrorKind::MalformedInput
        );
        let io = std::io::Error::other("denied");
        assert_eq!(
            AnalysisError::io("growth_data.json", io).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn messages_name_the_path() {
        let err = AnalysisError::image_not_found("plants/day1.jpg");
        assert_eq!(err.to_string(), "Image not found: plants/day1.jpg");
        assert_eq!(AnalysisError::NoRegionFound.to_string(), "No plant region found");
    }
}
