//! Error types for container engine access.

use nodeboot_error::CommonError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while talking to the container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Common errors (config, timeout).
    #[error(transparent)]
    Common(#[from] CommonError),

    /// The client could not be built for the endpoint.
    ///
    /// Raised before any connection is attempted, so this is always a
    /// problem with the shape of the endpoint.
    #[error("cannot create docker client for {endpoint}: {reason}")]
    ClientConstruction {
        /// Endpoint that was attempted.
        endpoint: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Connecting to or exchanging a request with the engine failed.
    #[error("docker request {path} failed: {reason}")]
    Request {
        /// Request path.
        path: String,
        /// Transport error.
        reason: String,
    },

    /// The engine answered with a non-success status.
    #[error("docker returned {status} for {path}: {message}")]
    Status {
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        message: String,
    },

    /// The engine answered with a body that could not be decoded.
    #[error("invalid docker response for {path}: {reason}")]
    InvalidResponse {
        /// Request path.
        path: String,
        /// Decode error.
        reason: String,
    },

    /// A version string is not a dotted list of integers.
    #[error("unable to parse version {input:?}: {reason}")]
    InvalidVersion {
        /// Rejected input.
        input: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn construction(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::ClientConstruction {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn request(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::Request {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns the endpoint for client construction errors.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::ClientConstruction { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}
