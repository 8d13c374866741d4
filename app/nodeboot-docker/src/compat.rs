//! API version gating.

use crate::client::EngineClient;
use crate::version::ApiVersion;
use std::fmt;
use tracing::warn;

/// Outcome of comparing the engine's API version with a minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// The engine's API version is at least the minimum.
    Compatible {
        /// Version reported by the engine.
        server: ApiVersion,
        /// Required minimum.
        minimum: ApiVersion,
    },
    /// The engine's API version is older than the minimum.
    Incompatible {
        /// Version reported by the engine.
        server: ApiVersion,
        /// Required minimum.
        minimum: ApiVersion,
    },
    /// The versions could not be compared.
    Undetermined(String),
}

impl VersionCheck {
    /// Returns true only for [`VersionCheck::Compatible`].
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible { .. })
    }
}

impl fmt::Display for VersionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible { server, minimum } => {
                write!(f, "compatible: API {server} >= {minimum}")
            }
            Self::Incompatible { server, minimum } => {
                write!(f, "incompatible: API {server} < {minimum}")
            }
            Self::Undetermined(reason) => write!(f, "undetermined: {reason}"),
        }
    }
}

/// Compares the engine's reported API version with `minimum`.
///
/// Never fails: query and parse errors become
/// [`VersionCheck::Undetermined`] with the reason.
pub async fn check_api_version<C>(client: &C, minimum: &str) -> VersionCheck
where
    C: EngineClient + ?Sized,
{
    let info = match client.version().await {
        Ok(info) => info,
        Err(e) => {
            return VersionCheck::Undetermined(format!("failed to get docker server version: {e}"));
        }
    };

    let Some(reported) = info.api_version() else {
        return VersionCheck::Undetermined(
            "docker server version does not report an ApiVersion".to_string(),
        );
    };

    let server = match ApiVersion::parse(reported) {
        Ok(v) => v,
        Err(e) => {
            return VersionCheck::Undetermined(format!(
                "failed to parse docker server version {reported:?}: {e}"
            ));
        }
    };

    let minimum = match ApiVersion::parse(minimum) {
        Ok(v) => v,
        Err(e) => {
            return VersionCheck::Undetermined(format!(
                "failed to parse minimum required docker server version {minimum:?}: {e}"
            ));
        }
    };

    if server < minimum {
        VersionCheck::Incompatible { server, minimum }
    } else {
        VersionCheck::Compatible { server, minimum }
    }
}

/// Returns true if the engine's API version is at least `minimum`.
///
/// Incompatible and undetermined versions both yield `false` with a
/// warning logged.
pub async fn is_api_version_compatible<C>(client: &C, minimum: &str) -> bool
where
    C: EngineClient + ?Sized,
{
    match check_api_version(client, minimum).await {
        VersionCheck::Compatible { .. } => true,
        VersionCheck::Incompatible { server, minimum } => {
            warn!(%server, %minimum, "docker server API version is older than required");
            false
        }
        VersionCheck::Undetermined(reason) => {
            warn!("{reason}");
            false
        }
    }
}
