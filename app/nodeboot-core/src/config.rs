//! Node configuration.
//!
//! The node configuration is loaded from multiple sources with the following
//! priority:
//!
//! 1. Environment variables (`NODEBOOT_*`, nested keys split on `__`)
//! 2. Configuration file (`/etc/nodeboot/node-config.toml` or `--config`)
//! 3. Default values
//!
//! Environment values are parsed by type, so `NODEBOOT_NODE_NAME=1234`
//! arrives as a number. Text fields accept numbers and booleans and keep
//! their textual form. Quote a value (`NODEBOOT_IMAGE_CONFIG__VERSION='"3.10"'`)
//! to keep trailing zeros of a decimal.
//!
//! ## Example Configuration File
//!
//! ```toml
//! node_name = "worker-1"
//! node_ip = "10.0.0.12"
//! dns_domain = "cluster.local"
//! # "0.0.0.0" means: default to node_ip, then to a detected local address.
//! dns_ip = "0.0.0.0"
//! volume_directory = "/var/lib/kubelet"
//! master_kube_config = "/etc/nodeboot/node.kubeconfig"
//!
//! [serving_info]
//! bind_address = "0.0.0.0:10250"
//! cert_file = "/etc/nodeboot/server.crt"
//! key_file = "/etc/nodeboot/server.key"
//! client_ca = "/etc/nodeboot/ca.crt"
//!
//! [image_config]
//! format = "registry.example.com/origin-${component}:${version}"
//! version = "v3.11"
//!
//! [pod_manifest_config]
//! path = "/etc/nodeboot/manifests"
//! file_check_interval_seconds = 30
//!
//! [kubelet_arguments]
//! max-pods = ["110"]
//! node-labels = ["region=infra"]
//! ```

use crate::error::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sentinel meaning "no DNS address configured, derive one".
pub const UNSET_DNS_IP: &str = "0.0.0.0";

/// Engine-specific kubelet overrides: flag name (without leading dashes) to
/// the ordered list of values for that flag.
pub type KubeletArguments = BTreeMap<String, Vec<String>>;

/// Node configuration consumed by the bootstrap path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Name the node registers under.
    #[serde(deserialize_with = "text")]
    pub node_name: String,
    /// The node's own address.
    #[serde(deserialize_with = "text")]
    pub node_ip: String,
    /// Cluster DNS domain.
    #[serde(deserialize_with = "text")]
    pub dns_domain: String,
    /// Address the node agent advertises as DNS resolver.
    #[serde(deserialize_with = "text")]
    pub dns_ip: String,
    /// Kubelet root directory.
    #[serde(deserialize_with = "text")]
    pub volume_directory: String,
    /// Kubeconfig used to reach the control plane.
    #[serde(deserialize_with = "text")]
    pub master_kube_config: String,
    /// Kubelet serving endpoint and certificates.
    pub serving_info: ServingInfo,
    /// Infrastructure image settings.
    pub image_config: ImageConfig,
    /// Static pod manifests, if enabled.
    pub pod_manifest_config: Option<PodManifestConfig>,
    /// Raw kubelet flag overrides.
    pub kubelet_arguments: KubeletArguments,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_name: String::new(),
            node_ip: String::new(),
            dns_domain: "cluster.local".to_string(),
            dns_ip: UNSET_DNS_IP.to_string(),
            volume_directory: "/var/lib/kubelet".to_string(),
            master_kube_config: String::new(),
            serving_info: ServingInfo::default(),
            image_config: ImageConfig::default(),
            pod_manifest_config: None,
            kubelet_arguments: KubeletArguments::new(),
        }
    }
}

impl NodeConfig {
    /// Loads configuration from the system config file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be extracted.
    pub fn load() -> Result<Self> {
        Self::figment(Toml::file(system_config_path()))
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or a
    /// value has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(crate::CoreError::config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        Self::figment(Toml::file(path))
    }

    fn figment(file: figment::providers::Data<Toml>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(file)
            .merge(Env::prefixed("NODEBOOT_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Returns true while `dns_ip` still holds the unset sentinel.
    #[must_use]
    pub fn dns_ip_unset(&self) -> bool {
        self.dns_ip == UNSET_DNS_IP
    }
}

/// Kubelet serving endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingInfo {
    /// `host:port` the kubelet listens on.
    #[serde(deserialize_with = "text")]
    pub bind_address: String,
    /// Serving certificate.
    #[serde(deserialize_with = "text")]
    pub cert_file: String,
    /// Serving key.
    #[serde(deserialize_with = "text")]
    pub key_file: String,
    /// CA bundle for client certificate authentication.
    #[serde(deserialize_with = "text")]
    pub client_ca: String,
}

impl Default for ServingInfo {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:10250".to_string(),
            cert_file: String::new(),
            key_file: String::new(),
            client_ca: String::new(),
        }
    }
}

/// Infrastructure image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image name template; `${component}` and `${version}` are expanded.
    #[serde(deserialize_with = "text")]
    pub format: String,
    /// Value substituted for `${version}`.
    #[serde(deserialize_with = "text")]
    pub version: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            format: String::new(),
            version: "latest".to_string(),
        }
    }
}

impl ImageConfig {
    /// Expands the format template for `component`.
    ///
    /// Returns an empty string when no format is configured.
    #[must_use]
    pub fn expand(&self, component: &str) -> String {
        self.format
            .replace("${component}", component)
            .replace("${version}", &self.version)
    }
}

/// Static pod manifest settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodManifestConfig {
    /// Directory or file holding the manifests.
    pub path: PathBuf,
    /// Seconds between manifest checks.
    #[serde(default = "default_file_check_interval")]
    pub file_check_interval_seconds: u64,
}

const fn default_file_check_interval() -> u64 {
    20
}

/// Deserializes a text field, accepting scalars that an environment
/// variable may have been parsed into.
fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_char<E: de::Error>(self, v: char) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/nodeboot/node-config.toml")
}
