//! Common error types shared across `nodeboot` crates.

use thiserror::Error;

/// Common errors that occur across multiple `nodeboot` crates.
///
/// Crate-specific errors wrap this type using the `#[from]` attribute.
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error.
    ///
    /// Malformed config files, missing required values, or values that
    /// fail to parse into their typed form.
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation timeout.
    #[error("timeout: {0}")]
    Timeout(String),
}

impl CommonError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CommonError::config("dns_ip is not an address");
        assert_eq!(
            err.to_string(),
            "configuration error: dns_ip is not an address"
        );
    }

    #[test]
    fn test_timeout_error() {
        let err = CommonError::timeout("GET /version after 30s");
        assert!(matches!(err, CommonError::Timeout(_)));
        assert_eq!(err.to_string(), "timeout: GET /version after 30s");
    }
}
