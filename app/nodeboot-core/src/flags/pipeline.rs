//! Compute, validate and emit kubelet flags.

use super::{ArgumentList, FlagComputer, FlagValidator, KubeletFlagComputer, KubeletFlagValidator};
use crate::config::NodeConfig;
use crate::error::FlagPipelineError;
use std::io::Write;
use tracing::debug;

/// Runs a [`FlagComputer`] and a [`FlagValidator`] over a finalized config.
#[derive(Debug, Clone, Default)]
pub struct FlagPipeline<C = KubeletFlagComputer, V = KubeletFlagValidator> {
    computer: C,
    validator: V,
}

impl<C: FlagComputer, V: FlagValidator> FlagPipeline<C, V> {
    /// Creates a pipeline from its two collaborators.
    pub const fn new(computer: C, validator: V) -> Self {
        Self {
            computer,
            validator,
        }
    }

    /// Computes and validates the kubelet arguments for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FlagPipelineError::Compute`] or
    /// [`FlagPipelineError::Validate`] depending on the stage that failed.
    pub fn compute(&self, config: &NodeConfig) -> Result<ArgumentList, FlagPipelineError> {
        let args = self
            .computer
            .compute(&config.kubelet_arguments, config)
            .map_err(FlagPipelineError::Compute)?;
        self.validator
            .validate(&args)
            .map_err(FlagPipelineError::Validate)?;
        debug!(count = args.len(), "computed kubelet args");
        Ok(args)
    }

    /// Writes the kubelet arguments for `config` to `out` as one
    /// space-separated line.
    ///
    /// Nothing is written if computation or validation fails.
    ///
    /// # Errors
    ///
    /// Returns the failing stage's error, or [`FlagPipelineError::Write`]
    /// if the line cannot be written.
    pub fn emit<W: Write>(&self, config: &NodeConfig, out: &mut W) -> Result<(), FlagPipelineError> {
        let args = self.compute(config)?;
        writeln!(out, "{}", args.join(" "))?;
        out.flush()?;
        Ok(())
    }
}
