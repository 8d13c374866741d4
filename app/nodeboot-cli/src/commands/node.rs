//! Node configuration commands.
//!
//! - `nodeboot node flags` — print the kubelet flags on one line
//! - `nodeboot node show`  — print the finalized configuration as JSON

use anyhow::{Context, Result};
use clap::Subcommand;
use nodeboot_core::{FlagPipeline, InterfaceTable, NodeConfig, finalize_node_config};
use std::io::Write;
use std::path::Path;

/// Node configuration commands.
#[derive(Debug, Subcommand)]
pub enum NodeCommands {
    /// Print the kubelet flags for this node
    ///
    /// Writes one space-separated line to stdout and nothing else.
    Flags {
        /// Fail instead of omitting --cluster-dns when no DNS address can be determined
        #[arg(long)]
        require_dns: bool,
    },

    /// Print the finalized node configuration as JSON
    Show,
}

/// Executes a node subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the flags cannot be
/// computed, validated or written.
pub fn execute(cmd: NodeCommands, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    let resolution = finalize_node_config(&mut config, &InterfaceTable);

    match cmd {
        NodeCommands::Flags { require_dns } => {
            if require_dns {
                resolution.require()?;
            }
            write_flags(&config, &mut std::io::stdout().lock())
        }
        NodeCommands::Show => {
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize node config")?;
            println!("{json}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<NodeConfig> {
    match path {
        Some(path) => NodeConfig::load_from(path)
            .with_context(|| format!("Failed to load node config from {}", path.display())),
        None => NodeConfig::load().context("Failed to load node config"),
    }
}

fn write_flags(config: &NodeConfig, out: &mut impl Write) -> Result<()> {
    let pipeline: FlagPipeline = FlagPipeline::default();
    pipeline
        .emit(config, out)
        .context("Failed to produce kubelet flags")
}
