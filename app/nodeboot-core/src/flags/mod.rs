//! Kubelet flag derivation.
//!
//! Two collaborators do the real work: a [`FlagComputer`] turns the node
//! config into an argument list and a [`FlagValidator`] checks that list.
//! [`FlagPipeline`] runs them in order and writes the result as one
//! space-separated line.

mod compute;
mod pipeline;
mod validate;

pub use compute::KubeletFlagComputer;
pub use pipeline::FlagPipeline;
pub use validate::{FlagKind, KubeletFlagValidator};

use crate::config::{KubeletArguments, NodeConfig};
use thiserror::Error;

/// Ordered launch arguments, each a complete `--name=value` flag.
pub type ArgumentList = Vec<String>;

/// Errors raised by flag collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// An override key is empty or carries its own dashes.
    #[error("invalid kubelet argument key {0:?}")]
    InvalidKey(String),

    /// A config value cannot be turned into a flag.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Config field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Argument is not of the form `--name=value`.
    #[error("malformed flag {0:?}, expected --name=value")]
    Malformed(String),

    /// Flag name is not known to the kubelet.
    #[error("unknown flag --{0}")]
    UnknownFlag(String),

    /// Flag value does not match the flag's type.
    #[error("invalid value {value:?} for flag --{flag}: {reason}")]
    InvalidValue {
        /// Flag name.
        flag: String,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Computes kubelet launch arguments from a node configuration.
///
/// Implementations must be deterministic for identical inputs.
pub trait FlagComputer {
    /// Returns the argument list for `config`, with `overrides` taking
    /// precedence over anything derived from the rest of the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides or the config cannot be expressed
    /// as flags.
    fn compute(
        &self,
        overrides: &KubeletArguments,
        config: &NodeConfig,
    ) -> Result<ArgumentList, FlagError>;
}

/// Checks an argument list without side effects.
pub trait FlagValidator {
    /// # Errors
    ///
    /// Returns the first structural problem found in `args`.
    fn validate(&self, args: &[String]) -> Result<(), FlagError>;
}
