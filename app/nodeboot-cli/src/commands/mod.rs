//! CLI command implementations.
//!
//! - Node configuration and kubelet flag output
//! - Container engine endpoint and version checks

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod docker;
pub mod node;

/// nodeboot - node agent bootstrap helper
#[derive(Parser)]
#[command(name = "nodeboot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Node configuration file
    ///
    /// Defaults to /etc/nodeboot/node-config.toml.
    #[arg(long, global = true, env = "NODEBOOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Container engine endpoint, overriding DOCKER_HOST
    #[arg(long, global = true)]
    pub docker_host: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Node configuration and kubelet flags
    #[command(subcommand)]
    Node(node::NodeCommands),

    /// Container engine access
    #[command(subcommand)]
    Docker(docker::DockerCommands),

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_flags() {
        let cli = Cli::try_parse_from([
            "nodeboot",
            "node",
            "flags",
            "--require-dns",
            "--config",
            "/tmp/node.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/node.toml")));
        assert!(matches!(
            cli.command,
            Commands::Node(node::NodeCommands::Flags { require_dns: true })
        ));
    }

    #[test]
    fn test_parse_docker_check_default_minimum() {
        let cli = Cli::try_parse_from(["nodeboot", "docker", "check"]).unwrap();
        match cli.command {
            Commands::Docker(docker::DockerCommands::Check { min_api_version }) => {
                assert_eq!(min_api_version, docker::DEFAULT_MIN_API_VERSION);
            }
            _ => panic!("expected docker check"),
        }
    }

    #[test]
    fn test_parse_docker_host() {
        let cli = Cli::try_parse_from([
            "nodeboot",
            "--docker-host",
            "tcp://10.0.0.5:2375",
            "docker",
            "endpoint",
        ])
        .unwrap();
        assert_eq!(cli.docker_host.as_deref(), Some("tcp://10.0.0.5:2375"));
    }
}
