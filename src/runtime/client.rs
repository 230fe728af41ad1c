//! One-shot runtime client accessor
//!
//! The first call to `get_client` connects; every later or concurrent call
//! gets the same outcome. A failed connection is cached as its error message
//! so all callers observe the same failure.

use crate::error::{Error, Result};
use crate::runtime::NetworkRuntime;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Builds a runtime client, including any version negotiation
#[async_trait]
pub trait Connect: Send + Sync {
    type Client: NetworkRuntime + 'static;

    async fn connect(&self) -> Result<Self::Client>;
}

/// Lazily constructed, process-lifetime runtime client
pub struct ClientAccessor<C: Connect> {
    connector: C,
    cell: OnceCell<std::result::Result<Arc<C::Client>, String>>,
}

impl<C: Connect> ClientAccessor<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            cell: OnceCell::new(),
        }
    }

    /// Get the shared client, connecting on first use
    pub async fn get_client(&self) -> Result<Arc<C::Client>> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                match self.connector.connect().await {
                    Ok(client) => Ok(Arc::new(client)),
                    Err(e) => {
                        tracing::error!(error = %e, "container runtime client construction failed");
                        Err(e.to_string())
                    }
                }
            })
            .await;

        match outcome {
            Ok(client) => Ok(Arc::clone(client)),
            Err(message) => Err(Error::ClientConstruction(message.clone())),
        }
    }
}
