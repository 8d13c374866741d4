//! DNS address defaulting.
//!
//! When `dns_ip` holds the unset sentinel the node advertises its own
//! address as the cluster DNS resolver. If the node address is also empty,
//! the first usable IPv4 address from the interface table is used instead.
//! Failure to find one is not an error: the field is left empty and the
//! kubelet falls back to its own resolver defaults.

use crate::config::NodeConfig;
use crate::error::{CoreError, Result};
use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;
use std::net::{Ipv4Addr, SocketAddrV4};
use tracing::{debug, warn};

/// Source of a local IPv4 address used when nothing else is configured.
pub trait LocalAddrDetector {
    /// Returns a local, non-loopback IPv4 address, if one can be found.
    fn detect_ipv4(&self) -> Option<Ipv4Addr>;
}

/// Detects the local address from the system interface table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceTable;

impl LocalAddrDetector for InterfaceTable {
    fn detect_ipv4(&self) -> Option<Ipv4Addr> {
        let addrs = match getifaddrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(error = %e, "cannot enumerate network interfaces");
                return None;
            }
        };

        select_ipv4(addrs.filter_map(|ifa| {
            let sin = *ifa.address?.as_sockaddr_in()?;
            Some((ifa.flags, *SocketAddrV4::from(sin).ip()))
        }))
    }
}

/// Picks the first address on an interface that is up and not loopback.
fn select_ipv4(candidates: impl IntoIterator<Item = (InterfaceFlags, Ipv4Addr)>) -> Option<Ipv4Addr> {
    candidates
        .into_iter()
        .filter(|(flags, _)| {
            flags.contains(InterfaceFlags::IFF_UP) && !flags.contains(InterfaceFlags::IFF_LOOPBACK)
        })
        .map(|(_, ip)| ip)
        .find(|ip| !ip.is_loopback() && !ip.is_link_local() && !ip.is_unspecified())
}

/// Outcome of DNS address defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsResolution {
    /// `dns_ip` was already set and left untouched.
    Configured,
    /// `dns_ip` was copied from `node_ip`.
    NodeIp,
    /// `dns_ip` was set to an address found on a local interface.
    Detected(Ipv4Addr),
    /// No address could be determined; `dns_ip` is empty.
    Undetermined,
}

impl DnsResolution {
    /// Returns true if no DNS address could be determined.
    #[must_use]
    pub const fn is_undetermined(&self) -> bool {
        matches!(self, Self::Undetermined)
    }

    /// Turns an undetermined result into an error, for callers that would
    /// rather fail than start the kubelet without a cluster DNS address.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resolution is
    /// [`DnsResolution::Undetermined`].
    pub fn require(self) -> Result<Self> {
        if self.is_undetermined() {
            return Err(CoreError::config(
                "dns_ip is unset, node_ip is empty and no local IPv4 address was found",
            ));
        }
        Ok(self)
    }
}

/// Fills in the DNS address default.
///
/// Running this again on an already finalized config is a no-op.
pub fn finalize_node_config(
    config: &mut NodeConfig,
    detector: &dyn LocalAddrDetector,
) -> DnsResolution {
    if !config.dns_ip_unset() {
        return DnsResolution::Configured;
    }

    debug!(node_ip = %config.node_ip, "defaulting dns_ip to the node's IP");
    config.dns_ip.clone_from(&config.node_ip);
    if !config.dns_ip.is_empty() {
        return DnsResolution::NodeIp;
    }

    // TODO: prefer the address of the default-route interface over the first one listed.
    if let Some(ip) = detector.detect_ipv4() {
        debug!(dns_ip = %ip, "using detected local address for dns_ip");
        config.dns_ip = ip.to_string();
        return DnsResolution::Detected(ip);
    }

    warn!("dns_ip left empty: node_ip is unset and no local IPv4 address was found");
    DnsResolution::Undetermined
}
