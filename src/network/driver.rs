//! Network driver identifiers
//!
//! The runtime reports drivers as lowercase strings. Known drivers get a
//! variant; anything else is carried verbatim in `Other`.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A network driver as understood by the container runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Driver {
    /// Single-host Linux bridge
    #[default]
    Bridge,
    /// Multi-host VXLAN overlay
    Overlay,
    /// Attach directly to a parent physical interface
    Macvlan,
    /// Share the host network namespace
    Host,
    /// Weave Net mesh plugin
    Weavemesh,
    /// Any driver without special handling
    Other(String),
}

impl Driver {
    /// Runtime identifier for this driver
    pub fn as_str(&self) -> &str {
        match self {
            Driver::Bridge => "bridge",
            Driver::Overlay => "overlay",
            Driver::Macvlan => "macvlan",
            Driver::Host => "host",
            Driver::Weavemesh => "weavemesh",
            Driver::Other(name) => name,
        }
    }

    /// Network spans more than one physical host
    pub fn is_multi_host(&self) -> bool {
        matches!(self, Driver::Overlay | Driver::Weavemesh)
    }

    /// Network lives on this host only, with a gateway we assign ourselves
    pub fn is_locally_scoped(&self) -> bool {
        !matches!(
            self,
            Driver::Host | Driver::Overlay | Driver::Weavemesh | Driver::Macvlan
        )
    }

    /// Traffic between members is encrypted by the driver
    pub fn encrypted(&self) -> bool {
        matches!(self, Driver::Overlay)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bridge" => Driver::Bridge,
            "overlay" => Driver::Overlay,
            "macvlan" => Driver::Macvlan,
            "host" => Driver::Host,
            "weavemesh" => Driver::Weavemesh,
            other => Driver::Other(other.to_string()),
        })
    }
}

impl From<String> for Driver {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(driver) => driver,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Driver {
    fn from(s: &str) -> Self {
        Driver::from(s.to_string())
    }
}

impl From<Driver> for String {
    fn from(driver: Driver) -> Self {
        match driver {
            Driver::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}
