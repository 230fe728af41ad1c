//! Network reconciliation
//!
//! Runs once at startup: inspect the runtime for the configured network,
//! create it when missing, then record what the runtime reports in the
//! shared configuration. Every failure other than "not found" on inspect is
//! fatal; there is no retry.

use crate::error::{Error, Result};
use crate::manifest::Configuration;
use crate::network::{Driver, NetworkSpec, build_options};
use crate::runtime::{CallContext, ClientAccessor, Connect, CreateNetwork, NetworkRuntime};
use crate::store::ConfigStore;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// How reconciliation changes the configured bind interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceChange {
    /// Leave whatever was configured
    Keep,
    /// Unset it; multi-host networks have no single local address
    Clear,
    /// Bind to this address
    Set(IpAddr),
}

/// Facts about the network as the runtime reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedFacts {
    pub driver: Driver,
    pub interface: InterfaceChange,
    pub multi_host: bool,
}

impl ObservedFacts {
    /// Derive facts from the reported driver
    ///
    /// `local_gateway` is the declared IPv4 gateway of a network this pass
    /// just created with a locally scoped driver.
    pub fn derive(driver: Driver, local_gateway: Option<IpAddr>) -> Self {
        let (interface, multi_host) = if driver == Driver::Host {
            (InterfaceChange::Set(IpAddr::V4(Ipv4Addr::LOCALHOST)), false)
        } else if driver.is_multi_host() {
            (InterfaceChange::Clear, true)
        } else {
            (
                local_gateway.map_or(InterfaceChange::Keep, InterfaceChange::Set),
                false,
            )
        };

        Self {
            driver,
            interface,
            multi_host,
        }
    }

    /// Write the facts into the configuration
    pub fn apply(&self, config: &mut Configuration) {
        let nw = &mut config.docker.network;
        nw.driver = self.driver.clone();
        nw.ispn = self.multi_host;
        match self.interface {
            InterfaceChange::Keep => {}
            InterfaceChange::Clear => nw.interface = None,
            InterfaceChange::Set(addr) => nw.interface = Some(addr),
        }
    }
}

/// Brings the runtime network in line with the desired spec
pub struct NetworkReconciler<C: Connect> {
    client: Arc<ClientAccessor<C>>,
    config: Arc<ConfigStore>,
}

impl<C: Connect> NetworkReconciler<C> {
    pub fn new(client: Arc<ClientAccessor<C>>, config: Arc<ConfigStore>) -> Self {
        Self { client, config }
    }

    /// Ensure the network exists and record what the runtime reports
    pub async fn ensure_network(&self, ctx: &CallContext, spec: &NetworkSpec) -> Result<ObservedFacts> {
        let client = self.client.get_client().await?;

        let inspected = ctx
            .run("inspect_network", client.inspect_network(&spec.name))
            .await;

        let (driver, local_gateway) = match inspected {
            Ok(info) => {
                tracing::debug!(network = %spec.name, driver = %info.driver, "network already exists");
                (info.driver, None)
            }
            Err(e) if e.is_not_found() => {
                create_network(ctx, client.as_ref(), spec).await?;
                let gateway = spec
                    .driver
                    .is_locally_scoped()
                    .then_some(IpAddr::V4(spec.v4.gateway));
                (spec.driver.clone(), gateway)
            }
            Err(e) => {
                return Err(Error::Inspection {
                    network: spec.name.clone(),
                    source: Box::new(e),
                });
            }
        };

        let facts = ObservedFacts::derive(driver, local_gateway);
        self.config.update(|c| facts.apply(c));

        tracing::info!(
            network = %spec.name,
            driver = %facts.driver,
            multi_host = facts.multi_host,
            "network configuration applied"
        );
        Ok(facts)
    }
}

async fn create_network<R>(ctx: &CallContext, client: &R, spec: &NetworkSpec) -> Result<()>
where
    R: NetworkRuntime + ?Sized,
{
    tracing::info!(
        network = %spec.name,
        driver = %spec.driver,
        "creating missing network, this could take a few seconds"
    );

    let request = CreateNetwork {
        name: spec.name.clone(),
        driver: spec.driver.clone(),
        internal: spec.internal,
        enable_ipv6: true,
        ipam: spec.ipam().to_vec(),
        options: build_options(spec),
    };

    ctx.run("create_network", client.create_network(&request))
        .await
        .map_err(|e| {
            tracing::error!(
                network = %spec.name,
                driver = %spec.driver,
                error = %e,
                "failed to create network"
            );
            Error::Creation {
                network: spec.name.clone(),
                driver: spec.driver.to_string(),
                source: Box::new(e),
            }
        })
}
