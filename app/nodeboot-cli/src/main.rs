//! nodeboot - prepare a node agent's launch arguments and check its engine.

use anyhow::Result;
use clap::Parser;
use nodeboot_docker::EngineSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "nodeboot=debug,nodeboot_cli=debug"
    } else {
        "nodeboot=info"
    };

    // Logs go to stderr; stdout carries the flag line.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // The only place the engine environment is read.
    let engine = match cli.docker_host {
        Some(host) => EngineSettings::with_host(Some(host)),
        None => EngineSettings::from_env(),
    };

    match cli.command {
        Commands::Node(cmd) => commands::node::execute(cmd, cli.config.as_deref()),
        Commands::Docker(cmd) => commands::docker::execute(cmd, engine).await,
        Commands::Version => {
            println!("nodeboot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
