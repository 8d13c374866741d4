//! # nodeboot-core
//!
//! Prepares a node agent's launch arguments before it starts managing
//! containers.
//!
//! The bootstrap path is linear and runs once:
//!
//! ```text
//! NodeConfig::load ──► dns::finalize_node_config ──► FlagPipeline::emit ──► stdout
//!   (figment)           (mutates dns_ip)              (compute + validate)
//! ```
//!
//! DNS defaulting must complete before the flag pipeline reads the
//! configuration; `finalize_node_config` takes `&mut NodeConfig` and the
//! pipeline takes `&NodeConfig`, so the borrow checker keeps that order.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dns;
pub mod error;
pub mod flags;

pub use config::{
    ImageConfig, KubeletArguments, NodeConfig, PodManifestConfig, ServingInfo, UNSET_DNS_IP,
};
pub use dns::{DnsResolution, InterfaceTable, LocalAddrDetector, finalize_node_config};
pub use error::{CoreError, FlagPipelineError, Result};
pub use flags::{
    ArgumentList, FlagComputer, FlagError, FlagKind, FlagPipeline, FlagValidator,
    KubeletFlagComputer, KubeletFlagValidator,
};
