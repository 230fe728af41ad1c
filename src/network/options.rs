//! Driver option building
//!
//! Maps a desired network spec to the driver options submitted with the
//! create call. Pure: no I/O, same spec in, same options out.
//!
//! Each driver block is an independent merge, not an exhaustive match, so a
//! driver that qualified for several blocks would receive all of them.

use crate::network::{Driver, NetworkSpec};
use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;

/// Bridge device created for the daemon's network
pub const BRIDGE_DEVICE_NAME: &str = "dockyard0";

const BRIDGE_MTU: u32 = 1500;
const OVERLAY_MTU: u32 = 9216;

/// Option keys the builder knows how to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    Encryption,
    DefaultBridge,
    EnableIcc,
    EnableIpMasquerade,
    HostBindingIpv4,
    BridgeName,
    Mtu,
    Parent,
}

impl OptionKey {
    /// Key as the runtime expects it
    pub fn as_wire(&self) -> &'static str {
        match self {
            OptionKey::Encryption => "encryption",
            OptionKey::DefaultBridge => "com.docker.network.bridge.default_bridge",
            OptionKey::EnableIcc => "com.docker.network.bridge.enable_icc",
            OptionKey::EnableIpMasquerade => "com.docker.network.bridge.enable_ip_masquerade",
            OptionKey::HostBindingIpv4 => "com.docker.network.bridge.host_binding_ipv4",
            OptionKey::BridgeName => "com.docker.network.bridge.name",
            OptionKey::Mtu => "com.docker.network.driver.mtu",
            OptionKey::Parent => "parent",
        }
    }
}

/// A single typed driver option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkOption {
    Encryption(bool),
    DefaultBridge(bool),
    EnableIcc(bool),
    EnableIpMasquerade(bool),
    HostBindingIpv4(Ipv4Addr),
    BridgeName(String),
    Mtu(u32),
    Parent(String),
}

impl NetworkOption {
    pub fn key(&self) -> OptionKey {
        match self {
            NetworkOption::Encryption(_) => OptionKey::Encryption,
            NetworkOption::DefaultBridge(_) => OptionKey::DefaultBridge,
            NetworkOption::EnableIcc(_) => OptionKey::EnableIcc,
            NetworkOption::EnableIpMasquerade(_) => OptionKey::EnableIpMasquerade,
            NetworkOption::HostBindingIpv4(_) => OptionKey::HostBindingIpv4,
            NetworkOption::BridgeName(_) => OptionKey::BridgeName,
            NetworkOption::Mtu(_) => OptionKey::Mtu,
            NetworkOption::Parent(_) => OptionKey::Parent,
        }
    }

    /// Value rendered as the runtime expects it
    pub fn wire_value(&self) -> String {
        match self {
            NetworkOption::Encryption(b)
            | NetworkOption::DefaultBridge(b)
            | NetworkOption::EnableIcc(b)
            | NetworkOption::EnableIpMasquerade(b) => b.to_string(),
            NetworkOption::HostBindingIpv4(addr) => addr.to_string(),
            NetworkOption::BridgeName(name) | NetworkOption::Parent(name) => name.clone(),
            NetworkOption::Mtu(mtu) => mtu.to_string(),
        }
    }
}

/// Driver options keyed by option kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: BTreeMap<OptionKey, NetworkOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any earlier value for the same key
    pub fn set(&mut self, option: NetworkOption) {
        self.entries.insert(option.key(), option);
    }

    /// Merge another set into this one; `other` wins on conflicts
    pub fn merge(&mut self, other: OptionSet) {
        self.entries.extend(other.entries);
    }

    #[cfg(test)]
    pub fn get(&self, key: OptionKey) -> Option<&NetworkOption> {
        self.entries.get(&key)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render to the string map the runtime API takes
    pub fn to_wire(&self) -> HashMap<String, String> {
        self.entries
            .values()
            .map(|opt| (opt.key().as_wire().to_string(), opt.wire_value()))
            .collect()
    }
}

impl FromIterator<NetworkOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = NetworkOption>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        for option in iter {
            set.set(option);
        }
        set
    }
}

/// Build the driver options for a network spec
pub fn build_options(spec: &NetworkSpec) -> OptionSet {
    let mut options = OptionSet::new();

    if spec.driver == Driver::Bridge {
        options.merge(bridge_options(spec.enable_icc));
    }

    if spec.driver == Driver::Overlay {
        options.merge(overlay_options());
    }

    if spec.driver == Driver::Macvlan {
        if let Some(parent) = &spec.parent_interface {
            options.set(NetworkOption::Parent(parent.clone()));
        }
    }

    options
}

fn bridge_options(enable_icc: bool) -> OptionSet {
    [
        NetworkOption::Encryption(false),
        NetworkOption::DefaultBridge(false),
        NetworkOption::EnableIcc(enable_icc),
        NetworkOption::EnableIpMasquerade(true),
        NetworkOption::HostBindingIpv4(Ipv4Addr::UNSPECIFIED),
        NetworkOption::BridgeName(BRIDGE_DEVICE_NAME.to_string()),
        NetworkOption::Mtu(BRIDGE_MTU),
    ]
    .into_iter()
    .collect()
}

fn overlay_options() -> OptionSet {
    [NetworkOption::Encryption(true), NetworkOption::Mtu(OVERLAY_MTU)]
        .into_iter()
        .collect()
}
