//! Container engine commands.
//!
//! - `nodeboot docker endpoint` — print the endpoint in use
//! - `nodeboot docker ping`     — check the engine answers
//! - `nodeboot docker check`    — gate on the engine's API version

use anyhow::{Context, Result};
use clap::Subcommand;
use nodeboot_docker::{DockerClient, DockerHelper, EngineSettings, check_api_version};
use tracing::{error, warn};

/// Minimum engine API version checked when none is given.
pub const DEFAULT_MIN_API_VERSION: &str = "1.24";

/// Container engine commands.
#[derive(Debug, Subcommand)]
pub enum DockerCommands {
    /// Print the container engine endpoint
    Endpoint,

    /// Check that the container engine answers
    Ping,

    /// Check the engine API version against a minimum
    Check {
        /// Minimum API version required
        #[arg(long, default_value = DEFAULT_MIN_API_VERSION)]
        min_api_version: String,
    },
}

/// Executes a docker subcommand.
///
/// # Errors
///
/// Returns an error if the engine cannot be reached or its API version is
/// not known to be at least the minimum.
pub async fn execute(cmd: DockerCommands, settings: EngineSettings) -> Result<()> {
    let helper = DockerHelper::new(settings);

    match cmd {
        DockerCommands::Endpoint => {
            println!("{}", helper.endpoint());
            Ok(())
        }
        DockerCommands::Ping => {
            let (client, endpoint) = client_or_exit(&helper);
            client
                .ping()
                .await
                .with_context(|| format!("Docker at {endpoint} did not answer"))?;
            println!("{endpoint}: OK");
            Ok(())
        }
        DockerCommands::Check { min_api_version } => {
            let (client, endpoint) = client_or_exit(&helper);
            let check = check_api_version(&client, &min_api_version).await;
            println!("{endpoint}: {check}");
            if !check.is_compatible() {
                warn!(endpoint = %endpoint, "{check}");
                anyhow::bail!("Docker at {endpoint} does not meet API version {min_api_version}");
            }
            Ok(())
        }
    }
}

/// Returns an engine client, or logs and exits.
///
/// Nothing this command does can proceed without a client.
fn client_or_exit(helper: &DockerHelper) -> (DockerClient, String) {
    match helper.client() {
        Ok(pair) => pair,
        Err(e) => {
            let endpoint = e.endpoint().unwrap_or_else(|| helper.endpoint());
            error!(endpoint = %endpoint, "Couldn't connect to Docker at {endpoint}: {e}");
            std::process::exit(1);
        }
    }
}
