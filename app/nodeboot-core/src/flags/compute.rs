//! Default kubelet flag computation.

use super::{ArgumentList, FlagComputer, FlagError};
use crate::config::{KubeletArguments, NodeConfig};
use std::collections::BTreeMap;

/// Derives kubelet flags from the node config.
///
/// Overrides are copied first and always win. Derived values only fill
/// flags that are still unset, and empty derived values are skipped, so an
/// unset `dns_ip` simply produces no `--cluster-dns`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeletFlagComputer;

impl FlagComputer for KubeletFlagComputer {
    fn compute(
        &self,
        overrides: &KubeletArguments,
        config: &NodeConfig,
    ) -> Result<ArgumentList, FlagError> {
        let mut args: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, values) in overrides {
            if key.is_empty() || key.starts_with('-') || key.contains('=') {
                return Err(FlagError::InvalidKey(key.clone()));
            }
            args.insert(key.clone(), values.clone());
        }

        let serving = &config.serving_info;
        if let Some((host, port)) = split_bind_address(&serving.bind_address)? {
            set_if_unset(&mut args, "address", host);
            set_if_unset(&mut args, "port", port);
        }
        set_if_unset(&mut args, "kubeconfig", &config.master_kube_config);
        set_if_unset(&mut args, "root-dir", &config.volume_directory);
        set_if_unset(&mut args, "node-ip", &config.node_ip);
        set_if_unset(&mut args, "hostname-override", &config.node_name);
        set_if_unset(&mut args, "cluster-dns", &config.dns_ip);
        set_if_unset(&mut args, "cluster-domain", &config.dns_domain);
        set_if_unset(&mut args, "tls-cert-file", &serving.cert_file);
        set_if_unset(&mut args, "tls-private-key-file", &serving.key_file);
        set_if_unset(&mut args, "client-ca-file", &serving.client_ca);
        set_if_unset(
            &mut args,
            "pod-infra-container-image",
            config.image_config.expand("pod"),
        );
        if let Some(manifests) = &config.pod_manifest_config {
            set_if_unset(
                &mut args,
                "pod-manifest-path",
                manifests.path.display().to_string(),
            );
            set_if_unset(
                &mut args,
                "file-check-frequency",
                format!("{}s", manifests.file_check_interval_seconds),
            );
        }
        set_if_unset(&mut args, "read-only-port", "0");

        Ok(args
            .into_iter()
            .flat_map(|(key, values)| values.into_iter().map(move |v| format!("--{key}={v}")))
            .collect())
    }
}

fn set_if_unset(args: &mut BTreeMap<String, Vec<String>>, key: &str, value: impl Into<String>) {
    let value = value.into();
    if value.is_empty() {
        return;
    }
    args.entry(key.to_string()).or_insert_with(|| vec![value]);
}

/// Splits `host:port`, accepting bracketed IPv6 hosts.
fn split_bind_address(bind_address: &str) -> Result<Option<(String, String)>, FlagError> {
    if bind_address.is_empty() {
        return Ok(None);
    }
    let invalid = |reason: &str| FlagError::InvalidConfig {
        field: "serving_info.bind_address",
        reason: format!("{bind_address:?}: {reason}"),
    };

    let (host, port) = bind_address
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing port"))?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    port.parse::<u16>().map_err(|_| invalid("port is not a number"))?;

    Ok(Some((host.to_string(), port.to_string())))
}
