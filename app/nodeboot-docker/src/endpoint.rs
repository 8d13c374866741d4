//! Engine endpoint parsing.

use crate::error::{EngineError, Result};
use std::fmt;
use std::path::PathBuf;

/// Environment variable that overrides the engine endpoint.
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Endpoint used when no override is configured.
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// Port assumed for `tcp://` endpoints without one.
const DEFAULT_TCP_PORT: u16 = 2375;

/// A parsed engine endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Local Unix socket.
    Unix(PathBuf),
    /// Plain-text TCP.
    Tcp {
        /// Host name or address, without IPv6 brackets.
        host: String,
        /// TCP port.
        port: u16,
    },
}

impl Endpoint {
    /// Parses `unix:///path`, `tcp://host[:port]` or `http://host[:port]`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClientConstruction`] for anything else,
    /// including TLS, named-pipe and SSH endpoints.
    pub fn parse(raw: &str) -> Result<Self> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| {
                EngineError::construction(raw, "missing scheme, expected unix:// or tcp://")
            })?;

        match scheme {
            "unix" => {
                if rest.is_empty() {
                    return Err(EngineError::construction(raw, "empty socket path"));
                }
                if !rest.starts_with('/') {
                    return Err(EngineError::construction(raw, "socket path must be absolute"));
                }
                Ok(Self::Unix(PathBuf::from(rest)))
            }
            "tcp" | "http" => {
                let authority = rest.strip_suffix('/').unwrap_or(rest);
                if authority.is_empty() || authority.contains('/') {
                    return Err(EngineError::construction(raw, "expected host[:port]"));
                }
                let (host, port) = split_host_port(authority)
                    .map_err(|reason| EngineError::construction(raw, reason))?;
                Ok(Self::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            "https" | "npipe" | "ssh" | "fd" => Err(EngineError::construction(
                raw,
                format!("{scheme}:// endpoints are not supported"),
            )),
            _ => Err(EngineError::construction(
                raw,
                format!("unknown scheme {scheme:?}"),
            )),
        }
    }

    /// Value for the HTTP `Host` header.
    #[must_use]
    pub fn host_header(&self) -> String {
        match self {
            Self::Unix(_) => "localhost".to_string(),
            Self::Tcp { host, port } if host.contains(':') => format!("[{host}]:{port}"),
            Self::Tcp { host, port } => format!("{host}:{port}"),
        }
    }
}

/// Splits `host[:port]`, where an IPv6 host must be bracketed.
fn split_host_port(authority: &str) -> std::result::Result<(&str, u16), String> {
    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, rest) = bracketed
            .split_once(']')
            .ok_or_else(|| "unterminated IPv6 address".to_string())?;
        if rest.is_empty() {
            (host, None)
        } else {
            let port = rest
                .strip_prefix(':')
                .ok_or_else(|| format!("unexpected {rest:?} after IPv6 address"))?;
            (host, Some(port))
        }
    } else {
        match authority.split_once(':') {
            Some((_, port)) if port.contains(':') => {
                return Err("IPv6 addresses must be bracketed".to_string());
            }
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };

    if host.is_empty() {
        return Err("empty host".to_string());
    }
    if host.contains(|c: char| c.is_whitespace() || c == '@') {
        return Err(format!("invalid host {host:?}"));
    }
    let port = match port {
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| format!("invalid port {port:?}"))?,
        None => DEFAULT_TCP_PORT,
    };
    Ok((host, port))
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Tcp { .. } => write!(f, "tcp://{}", self.host_header()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unix() {
        assert_eq!(
            Endpoint::parse(DEFAULT_DOCKER_HOST).unwrap(),
            Endpoint::Unix(PathBuf::from("/var/run/docker.sock"))
        );
    }

    #[test]
    fn test_tcp() {
        assert_eq!(
            Endpoint::parse("tcp://10.0.0.5:2375").unwrap(),
            Endpoint::Tcp {
                host: "10.0.0.5".to_string(),
                port: 2375
            }
        );
        assert_eq!(
            Endpoint::parse("http://docker.internal/").unwrap(),
            Endpoint::Tcp {
                host: "docker.internal".to_string(),
                port: 2375
            }
        );
    }

    #[test]
    fn test_tcp_ipv6() {
        let endpoint = Endpoint::parse("tcp://[fd00::5]:2376").unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "fd00::5".to_string(),
                port: 2376
            }
        );
        assert_eq!(endpoint.host_header(), "[fd00::5]:2376");
        assert_eq!(endpoint.to_string(), "tcp://[fd00::5]:2376");
    }

    #[test]
    fn test_rejected() {
        for raw in [
            "",
            "/var/run/docker.sock",
            "unix://",
            "unix://relative.sock",
            "tcp://",
            "tcp://host:2375/path",
            "tcp://host:notaport",
            "https://10.0.0.5:2376",
            "npipe:////./pipe/docker_engine",
            "ssh://me@host",
            "gopher://host",
        ] {
            let err = Endpoint::parse(raw).unwrap_err();
            assert_eq!(err.endpoint(), Some(raw), "{raw}");
        }
    }
}
