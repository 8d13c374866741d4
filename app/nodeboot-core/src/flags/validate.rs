//! Default kubelet flag validation.

use super::{FlagError, FlagValidator};
use std::collections::BTreeMap;

/// Value type of a kubelet flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Free-form string.
    String,
    /// `true`/`false` in any of the spellings Go's `strconv.ParseBool` accepts.
    Bool,
    /// 64-bit signed integer in Go literal syntax: decimal, `0x`, `0o`,
    /// `0b` or a leading-zero octal, with `_` separating digits.
    Int,
    /// Go duration such as `20s` or `1m30s`.
    Duration,
}

impl FlagKind {
    fn check(self, value: &str) -> Result<(), String> {
        match self {
            Self::String => Ok(()),
            Self::Bool => match value {
                "1" | "t" | "T" | "true" | "TRUE" | "True" | "0" | "f" | "F" | "false"
                | "FALSE" | "False" => Ok(()),
                _ => Err("expected a boolean".to_string()),
            },
            Self::Int => check_int(value),
            Self::Duration => check_duration(value),
        }
    }
}

const KUBELET_FLAGS: &[(&str, FlagKind)] = &[
    ("address", FlagKind::String),
    ("anonymous-auth", FlagKind::Bool),
    ("authentication-token-webhook", FlagKind::Bool),
    ("authentication-token-webhook-cache-ttl", FlagKind::Duration),
    ("authorization-mode", FlagKind::String),
    ("bootstrap-kubeconfig", FlagKind::String),
    ("cert-dir", FlagKind::String),
    ("cgroup-driver", FlagKind::String),
    ("cgroups-per-qos", FlagKind::Bool),
    ("client-ca-file", FlagKind::String),
    ("cluster-dns", FlagKind::String),
    ("cluster-domain", FlagKind::String),
    ("config", FlagKind::String),
    ("container-runtime-endpoint", FlagKind::String),
    ("cpu-manager-policy", FlagKind::String),
    ("enable-controller-attach-detach", FlagKind::Bool),
    ("enforce-node-allocatable", FlagKind::String),
    ("eviction-hard", FlagKind::String),
    ("eviction-soft", FlagKind::String),
    ("fail-swap-on", FlagKind::Bool),
    ("feature-gates", FlagKind::String),
    ("file-check-frequency", FlagKind::Duration),
    ("healthz-bind-address", FlagKind::String),
    ("healthz-port", FlagKind::Int),
    ("hostname-override", FlagKind::String),
    ("image-gc-high-threshold", FlagKind::Int),
    ("image-gc-low-threshold", FlagKind::Int),
    ("image-service-endpoint", FlagKind::String),
    ("kube-reserved", FlagKind::String),
    ("kubeconfig", FlagKind::String),
    ("make-iptables-util-chains", FlagKind::Bool),
    ("max-open-files", FlagKind::Int),
    ("max-pods", FlagKind::Int),
    ("node-ip", FlagKind::String),
    ("node-labels", FlagKind::String),
    ("node-status-update-frequency", FlagKind::Duration),
    ("pod-infra-container-image", FlagKind::String),
    ("pod-manifest-path", FlagKind::String),
    ("pod-max-pids", FlagKind::Int),
    ("pods-per-core", FlagKind::Int),
    ("port", FlagKind::Int),
    ("protect-kernel-defaults", FlagKind::Bool),
    ("read-only-port", FlagKind::Int),
    ("register-node", FlagKind::Bool),
    ("register-with-taints", FlagKind::String),
    ("resolv-conf", FlagKind::String),
    ("root-dir", FlagKind::String),
    ("rotate-certificates", FlagKind::Bool),
    ("runtime-request-timeout", FlagKind::Duration),
    ("serialize-image-pulls", FlagKind::Bool),
    ("streaming-connection-idle-timeout", FlagKind::Duration),
    ("system-reserved", FlagKind::String),
    ("tls-cert-file", FlagKind::String),
    ("tls-private-key-file", FlagKind::String),
    ("topology-manager-policy", FlagKind::String),
    ("v", FlagKind::Int),
    ("volume-plugin-dir", FlagKind::String),
];

/// Checks arguments against the kubelet flag set.
#[derive(Debug, Clone)]
pub struct KubeletFlagValidator {
    known: BTreeMap<String, FlagKind>,
}

impl Default for KubeletFlagValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl KubeletFlagValidator {
    /// Creates a validator that knows the standard kubelet flags.
    #[must_use]
    pub fn new() -> Self {
        let known = KUBELET_FLAGS
            .iter()
            .map(|(name, kind)| ((*name).to_string(), *kind))
            .collect();
        Self { known }
    }

    /// Registers an extra flag, replacing the kind of an existing one.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, kind: FlagKind) -> Self {
        self.known.insert(name.into(), kind);
        self
    }

    /// Returns the kind of a known flag.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<FlagKind> {
        self.known.get(name).copied()
    }
}

impl FlagValidator for KubeletFlagValidator {
    fn validate(&self, args: &[String]) -> Result<(), FlagError> {
        for arg in args {
            let (name, value) = arg
                .strip_prefix("--")
                .and_then(|body| body.split_once('='))
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| FlagError::Malformed(arg.clone()))?;

            let kind = self
                .kind(name)
                .ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?;

            kind.check(value).map_err(|reason| FlagError::InvalidValue {
                flag: name.to_string(),
                value: value.to_string(),
                reason,
            })?;
        }
        Ok(())
    }
}

/// Accepts what Go's `strconv.ParseInt(value, 0, 64)` accepts.
fn check_int(value: &str) -> Result<(), String> {
    let invalid = || format!("expected an integer, got {value:?}");

    let (sign, unsigned) = match value.strip_prefix(['+', '-']) {
        Some(rest) => (&value[..1], rest),
        None => ("", value),
    };
    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits, prefixed) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d, true)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d, true)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d, true)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..], true)
    } else {
        (10, lower.as_str(), false)
    };

    // `_` only between digits, or right after a base prefix.
    let mut groups = digits.split('_');
    let first = groups.next().unwrap_or_default();
    if (first.is_empty() && !prefixed) || groups.any(str::is_empty) {
        return Err(invalid());
    }
    let digits = digits.replace('_', "");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(invalid());
    }

    i64::from_str_radix(&format!("{sign}{digits}"), radix)
        .map(drop)
        .map_err(|e| format!("expected an integer: {e}"))
}

/// Accepts Go `time.ParseDuration` syntax.
fn check_duration(value: &str) -> Result<(), String> {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    if unsigned == "0" {
        return Ok(());
    }
    if unsigned.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut rest = unsigned;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(format!("invalid duration {value:?}"));
        }
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        match &rest[..unit_len] {
            "ns" | "us" | "µs" | "ms" | "s" | "m" | "h" => {}
            "" => return Err(format!("missing unit in duration {value:?}")),
            unit => return Err(format!("unknown unit {unit:?} in duration {value:?}")),
        }
        rest = &rest[unit_len..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_accepts_known_flags() {
        let validator = KubeletFlagValidator::new();
        let list = args(&[
            "--node-ip=10.0.0.12",
            "--max-pods=110",
            "--fail-swap-on=false",
            "--file-check-frequency=1m30s",
            "--node-labels=role=infra",
        ]);
        assert_eq!(validator.validate(&list), Ok(()));
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert_eq!(KubeletFlagValidator::new().validate(&[]), Ok(()));
    }

    #[test]
    fn test_malformed() {
        let validator = KubeletFlagValidator::new();
        for bad in ["node-ip=1.2.3.4", "--node-ip", "--=x", "-v=2"] {
            assert_eq!(
                validator.validate(&args(&[bad])),
                Err(FlagError::Malformed(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_unknown_flag() {
        let validator = KubeletFlagValidator::new();
        assert_eq!(
            validator.validate(&args(&["--max-pods=10", "--no-such-flag=1"])),
            Err(FlagError::UnknownFlag("no-such-flag".to_string()))
        );
    }

    #[test]
    fn test_typed_values() {
        let validator = KubeletFlagValidator::new();
        assert!(matches!(
            validator.validate(&args(&["--max-pods=lots"])),
            Err(FlagError::InvalidValue { ref flag, .. }) if flag == "max-pods"
        ));
        assert!(validator.validate(&args(&["--register-node=yes"])).is_err());
        assert!(validator.validate(&args(&["--file-check-frequency=20"])).is_err());
        assert!(validator.validate(&args(&["--file-check-frequency=20x"])).is_err());
    }

    #[test]
    fn test_integers() {
        for ok in [
            "0", "110", "-1", "+7", "0x1F", "0XfF", "0o17", "0b101", "0755", "1_000", "0x_ff",
            "-0x10", "9223372036854775807",
        ] {
            assert!(check_int(ok).is_ok(), "{ok}");
        }
        for bad in [
            "", "-", "+-5", "0x", "0x+5", "0o-1", "_1", "1_", "1__0", "09", "0b2", "1e3", "12abc", "0x_",
            "9223372036854775808",
        ] {
            assert!(check_int(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_with_flag() {
        let validator = KubeletFlagValidator::new().with_flag("experimental-mounter-path", FlagKind::String);
        assert_eq!(
            validator.validate(&args(&["--experimental-mounter-path=/usr/bin/mount"])),
            Ok(())
        );
    }

    #[test]
    fn test_durations() {
        for ok in ["0", "-0", "20s", "1m30s", "500ms", "1.5h", "2h45m10s", "+5s", "-1m", ".5s"] {
            assert!(check_duration(ok).is_ok(), "{ok}");
        }
        for bad in ["", "+", "s", "20", "1..5s", "3d", "+-5s", "5s-"] {
            assert!(check_duration(bad).is_err(), "{bad}");
        }
    }
}
