//! End-to-end tests of the bootstrap path: load, finalize, emit.

use nodeboot_core::{
    ArgumentList, DnsResolution, FlagComputer, FlagError, FlagPipeline, FlagPipelineError,
    KubeletArguments, KubeletFlagValidator, LocalAddrDetector, NodeConfig, finalize_node_config,
};
use std::fs;
use std::net::Ipv4Addr;
use tempfile::TempDir;

struct NoInterfaces;

impl LocalAddrDetector for NoInterfaces {
    fn detect_ipv4(&self) -> Option<Ipv4Addr> {
        None
    }
}

struct OneInterface;

impl LocalAddrDetector for OneInterface {
    fn detect_ipv4(&self) -> Option<Ipv4Addr> {
        Some(Ipv4Addr::new(172, 16, 3, 9))
    }
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("node-config.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn emit(config: &NodeConfig) -> Result<String, FlagPipelineError> {
    let pipeline: FlagPipeline = FlagPipeline::default();
    let mut out = Vec::new();
    pipeline.emit(config, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_full_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
node_name = "worker-1"
node_ip = "10.0.0.12"
master_kube_config = "/etc/nodeboot/node.kubeconfig"

[serving_info]
bind_address = "0.0.0.0:10250"
cert_file = "/etc/nodeboot/server.crt"
key_file = "/etc/nodeboot/server.key"

[pod_manifest_config]
path = "/etc/nodeboot/manifests"
file_check_interval_seconds = 10

[kubelet_arguments]
max-pods = ["110"]
node-labels = ["region=infra", "zone=a"]
"#,
    );

    let mut config = NodeConfig::load_from(&path).unwrap();
    assert_eq!(
        finalize_node_config(&mut config, &NoInterfaces),
        DnsResolution::NodeIp
    );

    let line = emit(&config).unwrap();
    assert_eq!(
        line,
        "--address=0.0.0.0 \
         --cluster-dns=10.0.0.12 \
         --cluster-domain=cluster.local \
         --file-check-frequency=10s \
         --hostname-override=worker-1 \
         --kubeconfig=/etc/nodeboot/node.kubeconfig \
         --max-pods=110 \
         --node-ip=10.0.0.12 \
         --node-labels=region=infra \
         --node-labels=zone=a \
         --pod-manifest-path=/etc/nodeboot/manifests \
         --port=10250 \
         --read-only-port=0 \
         --root-dir=/var/lib/kubelet \
         --tls-cert-file=/etc/nodeboot/server.crt \
         --tls-private-key-file=/etc/nodeboot/server.key\n"
    );
}

#[test]
fn test_detected_address_flows_into_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "node_name = \"worker-2\"\n");

    let mut config = NodeConfig::load_from(&path).unwrap();
    finalize_node_config(&mut config, &OneInterface);
    assert_eq!(config.dns_ip, "172.16.3.9");
    assert!(emit(&config).unwrap().contains("--cluster-dns=172.16.3.9"));
}

#[test]
fn test_undetermined_dns_still_emits() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "node_name = \"worker-3\"\n");

    let mut config = NodeConfig::load_from(&path).unwrap();
    let resolution = finalize_node_config(&mut config, &NoInterfaces);
    assert!(resolution.is_undetermined());
    assert_eq!(config.dns_ip, "");

    let line = emit(&config).unwrap();
    assert!(!line.contains("--cluster-dns"));
    assert!(line.contains("--hostname-override=worker-3"));
}

#[test]
fn test_explicit_dns_ip_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "node_ip = \"10.0.0.12\"\ndns_ip = \"10.96.0.10\"\n");

    let mut config = NodeConfig::load_from(&path).unwrap();
    assert_eq!(
        finalize_node_config(&mut config, &OneInterface),
        DnsResolution::Configured
    );
    assert!(emit(&config).unwrap().contains("--cluster-dns=10.96.0.10"));
}

#[test]
fn test_invalid_override_value_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[kubelet_arguments]\nmax-pods = [\"many\"]\n");

    let mut config = NodeConfig::load_from(&path).unwrap();
    finalize_node_config(&mut config, &NoInterfaces);

    let pipeline: FlagPipeline = FlagPipeline::default();
    let mut out = Vec::new();
    let err = pipeline.emit(&config, &mut out).unwrap_err();
    assert!(matches!(
        err,
        FlagPipelineError::Validate(FlagError::InvalidValue { .. })
    ));
    assert!(out.is_empty());
}

struct Echo;

impl FlagComputer for Echo {
    fn compute(
        &self,
        overrides: &KubeletArguments,
        _config: &NodeConfig,
    ) -> Result<ArgumentList, FlagError> {
        Ok(overrides
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| format!("--{k}={v}")))
            .collect())
    }
}

#[test]
fn test_custom_computer_with_default_validator() {
    let mut config = NodeConfig::default();
    config
        .kubelet_arguments
        .insert("v".to_string(), vec!["4".to_string()]);

    let pipeline = FlagPipeline::new(Echo, KubeletFlagValidator::new());
    let mut out = Vec::new();
    pipeline.emit(&config, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "--v=4\n");
}
