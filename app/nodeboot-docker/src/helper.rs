//! Engine client acquisition.

use crate::client::{DEFAULT_REQUEST_TIMEOUT, DockerClient};
use crate::endpoint::{DEFAULT_DOCKER_HOST, DOCKER_HOST_ENV};
use crate::error::Result;
use std::time::Duration;
use tracing::debug;

/// How to reach the container engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Endpoint override; [`DEFAULT_DOCKER_HOST`] when `None`.
    pub host: Option<String>,
    /// Bound on each engine request.
    pub timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            host: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EngineSettings {
    /// Reads the endpoint override from `DOCKER_HOST`.
    ///
    /// Call this once at start-up and pass the result down.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_host(std::env::var(DOCKER_HOST_ENV).ok())
    }

    /// Builds settings from an optional override; an empty value counts as
    /// unset.
    #[must_use]
    pub fn with_host(host: Option<String>) -> Self {
        Self {
            host: host.filter(|h| !h.is_empty()),
            ..Self::default()
        }
    }

    /// Returns the endpoint to connect to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_DOCKER_HOST)
    }
}

/// Hands out engine clients with consistent endpoint resolution.
#[derive(Debug, Clone, Default)]
pub struct DockerHelper {
    settings: EngineSettings,
}

impl DockerHelper {
    /// Creates a helper from explicit settings.
    #[must_use]
    pub const fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Returns the endpoint clients will be bound to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.settings.endpoint()
    }

    /// Returns a client and the endpoint it is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::ClientConstruction`], carrying the
    /// endpoint, if the client cannot be built.
    pub fn client(&self) -> Result<(DockerClient, String)> {
        let endpoint = self.endpoint().to_string();
        let client = DockerClient::new(&endpoint)?.with_timeout(self.settings.timeout);
        debug!(endpoint = %endpoint, "created docker client");
        Ok((client, endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn restore_env(original: Option<String>) {
        // SAFETY: Test code running under ENV_LOCK mutex, single-threaded access.
        unsafe {
            match original {
                Some(value) => std::env::set_var(DOCKER_HOST_ENV, value),
                None => std::env::remove_var(DOCKER_HOST_ENV),
            }
        }
    }

    #[test]
    fn test_from_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var(DOCKER_HOST_ENV).ok();
        // SAFETY: Test code running under ENV_LOCK mutex, single-threaded access.
        unsafe { std::env::set_var(DOCKER_HOST_ENV, "tcp://10.0.0.5:2375") };

        let settings = EngineSettings::from_env();
        assert_eq!(settings.endpoint(), "tcp://10.0.0.5:2375");
        let (_, endpoint) = DockerHelper::new(settings).client().unwrap();
        assert_eq!(endpoint, "tcp://10.0.0.5:2375");

        restore_env(original);
    }

    #[test]
    fn test_from_env_unset_uses_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var(DOCKER_HOST_ENV).ok();
        // SAFETY: Test code running under ENV_LOCK mutex, single-threaded access.
        unsafe { std::env::remove_var(DOCKER_HOST_ENV) };

        let settings = EngineSettings::from_env();
        assert_eq!(settings.host, None);
        assert_eq!(settings.endpoint(), DEFAULT_DOCKER_HOST);

        restore_env(original);
    }

    #[test]
    fn test_override_used_verbatim() {
        let helper = DockerHelper::new(EngineSettings::with_host(Some(
            "tcp://10.0.0.5:2375".to_string(),
        )));
        let (client, endpoint) = helper.client().unwrap();
        assert_eq!(endpoint, "tcp://10.0.0.5:2375");
        assert_eq!(
            client.endpoint(),
            &Endpoint::Tcp {
                host: "10.0.0.5".to_string(),
                port: 2375
            }
        );
    }

    #[test]
    fn test_unset_uses_default() {
        let (_, endpoint) = DockerHelper::new(EngineSettings::with_host(None))
            .client()
            .unwrap();
        assert_eq!(endpoint, DEFAULT_DOCKER_HOST);
    }

    #[test]
    fn test_empty_counts_as_unset() {
        let helper = DockerHelper::new(EngineSettings::with_host(Some(String::new())));
        assert_eq!(helper.endpoint(), DEFAULT_DOCKER_HOST);
    }

    #[test]
    fn test_construction_error_carries_endpoint() {
        let helper = DockerHelper::new(EngineSettings::with_host(Some("npipe:////./pipe/x".to_string())));
        let err = helper.client().unwrap_err();
        assert_eq!(err.endpoint(), Some("npipe:////./pipe/x"));
        assert!(err.to_string().contains("npipe:////./pipe/x"));
    }
}
