//! Minimal HTTP client for the Docker Engine API.
//!
//! Each request opens its own HTTP/1.1 connection and asks the engine to
//! close it afterwards. The bootstrap path only issues a handful of
//! requests, so no connection pooling is done.

use crate::endpoint::Endpoint;
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http1;
use hyper::http::{HeaderValue, Method, Request, header};
use hyper_util::rt::TokioIo;
use nodeboot_error::CommonError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::net::{TcpStream, UnixStream};
use tracing::debug;

/// Default bound on a single engine request, connection included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Key-value metadata returned by `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct VersionInfo(Map<String, Value>);

impl VersionInfo {
    /// Returns a string field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the reported `ApiVersion` field.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.get("ApiVersion")
    }
}

impl From<Map<String, Value>> for VersionInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Operations the bootstrap path needs from a container engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Queries the engine's version metadata.
    async fn version(&self) -> Result<VersionInfo>;
}

/// Docker Engine API client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct DockerClient {
    endpoint: Endpoint,
    timeout: Duration,
}

impl DockerClient {
    /// Creates a client for `endpoint`.
    ///
    /// No connection is made here.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClientConstruction`] if the endpoint cannot be
    /// parsed or uses an unsupported scheme.
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::parse(endpoint)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint this client talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Checks that the engine answers `GET /_ping`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be reached or answers with a
    /// non-success status.
    pub async fn ping(&self) -> Result<()> {
        self.get("/_ping").await.map(drop)
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        tokio::time::timeout(self.timeout, self.get_unbounded(path))
            .await
            .map_err(|_| CommonError::timeout(format!("GET {path} after {:?}", self.timeout)))?
    }

    async fn get_unbounded(&self, path: &str) -> Result<Bytes> {
        let host = self.endpoint.host_header();
        match &self.endpoint {
            Endpoint::Unix(socket_path) => {
                let stream = UnixStream::connect(socket_path)
                    .await
                    .map_err(|e| EngineError::request(path, format!("connect {}: {e}", socket_path.display())))?;
                send_get(TokioIo::new(stream), path, &host).await
            }
            Endpoint::Tcp { host: addr, port } => {
                let stream = TcpStream::connect((addr.as_str(), *port))
                    .await
                    .map_err(|e| EngineError::request(path, format!("connect {host}: {e}")))?;
                send_get(TokioIo::new(stream), path, &host).await
            }
        }
    }
}

#[async_trait]
impl EngineClient for DockerClient {
    async fn version(&self) -> Result<VersionInfo> {
        let body = self.get("/version").await?;
        serde_json::from_slice(&body).map_err(|e| EngineError::InvalidResponse {
            path: "/version".to_string(),
            reason: e.to_string(),
        })
    }
}

async fn send_get<T>(io: T, path: &str, host: &str) -> Result<Bytes>
where
    T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (mut sender, conn) = http1::Builder::new()
        .handshake(io)
        .await
        .map_err(|e| EngineError::request(path, format!("handshake failed: {e}")))?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            let msg = e.to_string().to_lowercase();
            if !msg.contains("canceled") && !msg.contains("incomplete") {
                debug!("docker connection ended: {}", e);
            }
        }
    });

    let host = HeaderValue::from_str(host)
        .map_err(|e| EngineError::request(path, format!("invalid host header: {e}")))?;
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::HOST, host)
        .header(header::CONNECTION, HeaderValue::from_static("close"))
        .body(Empty::<Bytes>::new())
        .map_err(|e| EngineError::request(path, format!("failed to build request: {e}")))?;

    let response = sender
        .send_request(req)
        .await
        .map_err(|e| EngineError::request(path, e))?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| EngineError::request(path, format!("failed to read body: {e}")))?
        .to_bytes();

    if !status.is_success() {
        return Err(EngineError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).trim().to_string(),
        });
    }

    Ok(body)
}
