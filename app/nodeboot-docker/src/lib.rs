//! # nodeboot-docker
//!
//! Container engine access for the node bootstrap path.
//!
//! ## Endpoint resolution
//!
//! The engine endpoint comes from [`EngineSettings`]. The environment is read
//! once, by the caller, through [`EngineSettings::from_env`]; nothing in this
//! crate looks at `DOCKER_HOST` on its own.
//!
//! ```text
//! DOCKER_HOST (set, non-empty) ──► used verbatim
//! otherwise                    ──► unix:///var/run/docker.sock
//! ```
//!
//! ## Version gating
//!
//! [`check_api_version`] queries `GET /version` and compares the reported
//! `ApiVersion` with a caller-supplied minimum. Any failure along the way
//! becomes [`VersionCheck::Undetermined`]; [`is_api_version_compatible`]
//! folds that into `false`.
//!
//! This crate never terminates the process. Callers that cannot continue
//! without an engine client decide that themselves.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod compat;
pub mod endpoint;
pub mod error;
pub mod helper;
pub mod version;

pub use client::{DockerClient, EngineClient, VersionInfo};
pub use compat::{VersionCheck, check_api_version, is_api_version_compatible};
pub use endpoint::{DEFAULT_DOCKER_HOST, DOCKER_HOST_ENV, Endpoint};
pub use error::{EngineError, Result};
pub use helper::{DockerHelper, EngineSettings};
pub use version::ApiVersion;
