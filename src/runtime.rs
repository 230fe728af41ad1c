//! Container runtime control API
//!
//! Provides:
//! - The `NetworkRuntime` seam the reconciler talks to
//! - A one-shot client accessor shared across the daemon
//! - Deadline-bounded call contexts
//! - The Docker Engine implementation

pub mod client;
pub mod context;
pub mod docker;

pub use client::{ClientAccessor, Connect};
pub use context::CallContext;
pub use docker::DockerConnector;

use crate::error::Result;
use crate::network::spec::IpamEntry;
use crate::network::{Driver, OptionSet};
use async_trait::async_trait;

/// What the runtime reports about an existing network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub id: Option<String>,
    pub name: String,
    pub driver: Driver,
    pub scope: Option<String>,
}

/// A network creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNetwork {
    pub name: String,
    pub driver: Driver,
    pub internal: bool,
    pub enable_ipv6: bool,
    pub ipam: Vec<IpamEntry>,
    pub options: OptionSet,
}

/// Network operations on the container runtime
///
/// `inspect_network` must return `Error::NetworkNotFound` when the runtime
/// has no network by that name; any other error is treated as fatal.
#[async_trait]
pub trait NetworkRuntime: Send + Sync {
    async fn inspect_network(&self, name: &str) -> Result<NetworkInfo>;

    async fn create_network(&self, request: &CreateNetwork) -> Result<()>;
}
