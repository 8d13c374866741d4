//! Common error types for `nodeboot`.
//!
//! This crate provides the error vocabulary shared by the bootstrap crates,
//! so configuration and engine failures read the same everywhere.
//!
//! # Usage
//!
//! ```rust
//! use nodeboot_error::CommonError;
//!
//! fn example() -> Result<(), CommonError> {
//!     Err(CommonError::config("node_ip is not an address"))
//! }
//! ```
//!
//! # Crate-Specific Errors
//!
//! Each crate defines its own error type that wraps `CommonError`:
//!
//! ```rust,ignore
//! use nodeboot_error::CommonError;
//! use thiserror::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum EngineError {
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//!
//!     #[error("engine request failed: {0}")]
//!     Request(String),
//! }
//! ```

mod common;

pub use common::CommonError;

/// Result type alias using `CommonError`.
pub type Result<T> = std::result::Result<T, CommonError>;
