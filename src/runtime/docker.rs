//! Docker Engine implementation of the runtime seam
//!
//! Uses bollard against `DOCKER_HOST` or the local socket, with API version
//! negotiation on connect.

use crate::error::{Error, Result};
use crate::runtime::{Connect, CreateNetwork, NetworkInfo, NetworkRuntime};
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{Ipam, IpamConfig};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions};

const NOT_FOUND_STATUS_CODE: u16 = 404;

/// Map an inspect failure: 404 means the network is absent, anything else
/// stays a daemon error
fn classify_inspect_error(name: &str, err: BollardError) -> Error {
    match err {
        BollardError::DockerResponseServerError {
            status_code: NOT_FOUND_STATUS_CODE,
            ..
        } => Error::NetworkNotFound(name.to_string()),
        other => Error::Docker(other),
    }
}

/// Connects to the Docker daemon from environment defaults
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerConnector;

#[async_trait]
impl Connect for DockerConnector {
    type Client = DockerRuntime;

    async fn connect(&self) -> Result<DockerRuntime> {
        let docker = Docker::connect_with_defaults()?.negotiate_version().await?;
        tracing::debug!(api_version = ?docker.client_version(), "connected to docker");
        Ok(DockerRuntime { docker })
    }
}

/// Docker Engine API client
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

#[async_trait]
impl NetworkRuntime for DockerRuntime {
    async fn inspect_network(&self, name: &str) -> Result<NetworkInfo> {
        let result = self
            .docker
            .inspect_network(name, None::<InspectNetworkOptions<String>>)
            .await;

        let network = result.map_err(|err| classify_inspect_error(name, err))?;
        Ok(NetworkInfo {
            id: network.id,
            name: network.name.unwrap_or_else(|| name.to_string()),
            driver: network.driver.unwrap_or_default().into(),
            scope: network.scope,
        })
    }

    async fn create_network(&self, request: &CreateNetwork) -> Result<()> {
        let ipam = Ipam {
            config: Some(
                request
                    .ipam
                    .iter()
                    .map(|entry| IpamConfig {
                        subnet: Some(entry.subnet.to_string()),
                        gateway: Some(entry.gateway.to_string()),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        };

        let options = CreateNetworkOptions {
            name: request.name.clone(),
            driver: request.driver.to_string(),
            internal: request.internal,
            enable_ipv6: request.enable_ipv6,
            ipam,
            options: request.options.to_wire(),
            ..Default::default()
        };

        let response = self.docker.create_network(options).await?;
        tracing::debug!(network = %request.name, id = ?response.id, "network created");
        Ok(())
    }
}
