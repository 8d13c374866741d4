//! Error types for the core layer.

use crate::flags::FlagError;
use nodeboot_error::CommonError;
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Common errors (config, timeout).
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Configuration could not be loaded or extracted.
    #[error("failed to load node config: {0}")]
    Load(#[from] Box<figment::Error>),

    /// Flag pipeline error.
    #[error(transparent)]
    Flags(#[from] FlagPipelineError),
}

impl CoreError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Common(CommonError::config(msg))
    }
}

impl From<figment::Error> for CoreError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Errors from the kubelet flag pipeline.
///
/// Each variant names the stage that failed. Nothing has been written to the
/// output when any of these is returned.
#[derive(Debug, Error)]
pub enum FlagPipelineError {
    /// The flag computer rejected the configuration.
    #[error("cannot create kubelet args: {0}")]
    Compute(#[source] FlagError),

    /// The computed arguments failed validation.
    #[error("invalid kubelet args: {0}")]
    Validate(#[source] FlagError),

    /// The flag line could not be written.
    #[error("cannot write kubelet args: {0}")]
    Write(#[from] std::io::Error),
}
