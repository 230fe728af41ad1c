//! Desired network specification
//!
//! An immutable view of what the daemon wants the runtime network to look
//! like, derived once from configuration at startup.

use crate::network::Driver;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Subnet and gateway pair for one address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetPair<N, A> {
    pub subnet: N,
    pub gateway: A,
}

/// IPv4 subnet and gateway
pub type V4Pair = SubnetPair<Ipv4Net, Ipv4Addr>;

/// IPv6 subnet and gateway
pub type V6Pair = SubnetPair<Ipv6Net, Ipv6Addr>;

/// One IPAM entry as submitted to the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpamEntry {
    pub subnet: IpNet,
    pub gateway: IpAddr,
}

impl From<V4Pair> for IpamEntry {
    fn from(pair: V4Pair) -> Self {
        Self {
            subnet: IpNet::V4(pair.subnet),
            gateway: IpAddr::V4(pair.gateway),
        }
    }
}

impl From<V6Pair> for IpamEntry {
    fn from(pair: V6Pair) -> Self {
        Self {
            subnet: IpNet::V6(pair.subnet),
            gateway: IpAddr::V6(pair.gateway),
        }
    }
}

/// The network the daemon needs on the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    /// Runtime network name
    pub name: String,
    /// Requested driver
    pub driver: Driver,
    /// Allow inter-container communication (bridge only)
    pub enable_icc: bool,
    /// Restrict the network to internal traffic
    pub internal: bool,
    /// Parent physical interface (macvlan only)
    pub parent_interface: Option<String>,
    /// IPv4 subnet and gateway
    pub v4: V4Pair,
    /// IPv6 subnet and gateway
    pub v6: V6Pair,
}

impl NetworkSpec {
    /// Whether the driver encrypts member traffic
    pub fn encrypted(&self) -> bool {
        self.driver.encrypted()
    }

    /// IPAM entries in submission order: IPv4 first, then IPv6
    pub fn ipam(&self) -> [IpamEntry; 2] {
        [self.v4.into(), self.v6.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipam_order_is_v4_then_v6() {
        let spec = NetworkSpec {
            name: "dockyard_nw".into(),
            driver: Driver::Bridge,
            enable_icc: true,
            internal: false,
            parent_interface: None,
            v4: V4Pair {
                subnet: "172.20.0.0/16".parse().unwrap(),
                gateway: "172.20.0.1".parse().unwrap(),
            },
            v6: V6Pair {
                subnet: "fdba:17c8:6c94::/64".parse().unwrap(),
                gateway: "fdba:17c8:6c94::1011".parse().unwrap(),
            },
        };

        let [v4, v6] = spec.ipam();
        assert_eq!(v4.subnet.to_string(), "172.20.0.0/16");
        assert_eq!(v4.gateway.to_string(), "172.20.0.1");
        assert_eq!(v6.subnet.to_string(), "fdba:17c8:6c94::/64");
        assert_eq!(v6.gateway.to_string(), "fdba:17c8:6c94::1011");
    }
}
