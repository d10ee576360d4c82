//! Error types for configuration generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for generation operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors produced while synthesizing, encoding or persisting artifacts
#[derive(Debug, Error)]
pub enum ExportError {
    /// The host name could not be resolved from the environment
    #[error("host identity unavailable: {0}")]
    HostIdentityUnavailable(String),

    /// A service port is not a valid network port
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// Artifact bytes do not fit the expected document shape
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    /// The artifact does not exist
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other I/O failure while reading or writing an artifact
    #[error("persistence error at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model could not be rendered
    #[error("encode error: {0}")]
    Encode(String),
}

impl ExportError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the caller may fall back to defaults instead of aborting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedArtifact(_) | Self::NotFound(_))
    }
}
