//! Configuration file parsing for Dockyard
//!
//! Parses `dockyard.toml` configuration files using serde

use crate::error::{Error, Result};
use crate::network::spec::{V4Pair, V6Pair};
use crate::network::{Driver, NetworkSpec};
use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::time::Duration;

/// Load configuration from a file
pub fn load(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Configuration = toml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_or_default(path: &Path) -> Result<Configuration> {
    if path.exists() {
        load(path)
    } else {
        let config = Configuration::default();
        config.validate()?;
        Ok(config)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Container runtime settings
    #[serde(default)]
    pub docker: DockerConfig,
}

impl Configuration {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let nw = &self.docker.network;

        if nw.name.trim().is_empty() {
            return Err(Error::ConfigValidation(
                "docker.network.name must not be empty".into(),
            ));
        }

        let v4 = &nw.interfaces.v4;
        if !v4.subnet.contains(&v4.gateway) {
            return Err(Error::ConfigValidation(format!(
                "IPv4 gateway {} is not in subnet {}",
                v4.gateway, v4.subnet
            )));
        }

        let v6 = &nw.interfaces.v6;
        if !v6.subnet.contains(&v6.gateway) {
            return Err(Error::ConfigValidation(format!(
                "IPv6 gateway {} is not in subnet {}",
                v6.gateway, v6.subnet
            )));
        }

        let has_parent = nw
            .parent_interface
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if nw.driver == Driver::Macvlan && !has_parent {
            return Err(Error::ConfigValidation(
                "macvlan driver requires docker.network.parent_interface".into(),
            ));
        }

        if self.docker.startup_timeout == 0 {
            return Err(Error::ConfigValidation(
                "docker.startup_timeout must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Container runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Network the daemon places workloads on
    #[serde(default)]
    pub network: NetworkConfig,

    /// Deadline in seconds for runtime calls made during startup
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout: u64,
}

impl DockerConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout)
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            startup_timeout: default_startup_timeout(),
        }
    }
}

/// Runtime network configuration
///
/// `driver`, `interface` and `ispn` are rewritten after reconciliation to
/// reflect what the runtime actually reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name on the runtime
    #[serde(default = "default_network_name")]
    pub name: String,

    /// Network driver (bridge, overlay, macvlan, host, weavemesh, ...)
    #[serde(default)]
    pub driver: Driver,

    /// Address services bind to for reaching containers (unset for multi-host networks)
    #[serde(default = "default_interface", with = "optional_addr")]
    pub interface: Option<IpAddr>,

    /// Parent physical interface for macvlan (e.g., "eth0")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_interface: Option<String>,

    /// Restrict the network to internal traffic
    #[serde(default)]
    pub is_internal: bool,

    /// Allow inter-container communication on bridge networks
    #[serde(default = "default_true")]
    pub enable_icc: bool,

    /// Network spans multiple physical hosts
    #[serde(default)]
    pub ispn: bool,

    /// Dual-stack subnets
    #[serde(default)]
    pub interfaces: InterfacesConfig,
}

impl NetworkConfig {
    /// The desired network as an immutable spec
    pub fn desired(&self) -> NetworkSpec {
        NetworkSpec {
            name: self.name.clone(),
            driver: self.driver.clone(),
            enable_icc: self.enable_icc,
            internal: self.is_internal,
            parent_interface: self.parent_interface.clone(),
            v4: V4Pair {
                subnet: self.interfaces.v4.subnet,
                gateway: self.interfaces.v4.gateway,
            },
            v6: V6Pair {
                subnet: self.interfaces.v6.subnet,
                gateway: self.interfaces.v6.gateway,
            },
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            driver: Driver::Bridge,
            interface: default_interface(),
            parent_interface: None,
            is_internal: false,
            enable_icc: true,
            ispn: false,
            interfaces: InterfacesConfig::default(),
        }
    }
}

/// IPv4 and IPv6 subnet definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfacesConfig {
    #[serde(default)]
    pub v4: V4Config,

    #[serde(default)]
    pub v6: V6Config,
}

/// IPv4 subnet in CIDR notation with its gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V4Config {
    pub subnet: Ipv4Net,
    pub gateway: Ipv4Addr,
}

impl Default for V4Config {
    fn default() -> Self {
        Self {
            subnet: Ipv4Net::new_assert(Ipv4Addr::new(172, 18, 0, 0), 16),
            gateway: Ipv4Addr::new(172, 18, 0, 1),
        }
    }
}

/// IPv6 subnet in CIDR notation with its gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V6Config {
    pub subnet: Ipv6Net,
    pub gateway: Ipv6Addr,
}

impl Default for V6Config {
    fn default() -> Self {
        Self {
            subnet: Ipv6Net::new_assert(Ipv6Addr::new(0xfdba, 0x17c8, 0x6c94, 0, 0, 0, 0, 0), 64),
            gateway: Ipv6Addr::new(0xfdba, 0x17c8, 0x6c94, 0, 0, 0, 0, 0x1011),
        }
    }
}

fn default_network_name() -> String {
    "dockyard_nw".to_string()
}

fn default_interface() -> Option<IpAddr> {
    Some(IpAddr::V4(Ipv4Addr::new(172, 18, 0, 1)))
}

fn default_startup_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

/// An optional address stored as a string, empty meaning unset
mod optional_addr {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::net::IpAddr;

    pub fn serialize<S: Serializer>(addr: &Option<IpAddr>, s: S) -> Result<S::Ok, S::Error> {
        match addr {
            Some(addr) => s.collect_str(addr),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<IpAddr>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.trim().parse().map(Some).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Configuration = toml::from_str("").unwrap();
        config.validate().unwrap();

        let nw = &config.docker.network;
        assert_eq!(nw.name, "dockyard_nw");
        assert_eq!(nw.driver, Driver::Bridge);
        assert_eq!(nw.interface, Some("172.18.0.1".parse().unwrap()));
        assert!(nw.enable_icc);
        assert!(!nw.is_internal);
        assert!(!nw.ispn);
        assert_eq!(nw.interfaces.v4.subnet.to_string(), "172.18.0.0/16");
        assert_eq!(nw.interfaces.v6.gateway.to_string(), "fdba:17c8:6c94::1011");
        assert_eq!(config.docker.startup_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[docker]
startup_timeout = 15

[docker.network]
name = "workloads"
driver = "macvlan"
parent_interface = "eth0"
is_internal = true
enable_icc = false

[docker.network.interfaces.v4]
subnet = "172.20.0.0/16"
gateway = "172.20.0.1"

[docker.network.interfaces.v6]
subnet = "fd00:20::/64"
gateway = "fd00:20::1"
"#;

        let config: Configuration = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        let spec = config.docker.network.desired();
        assert_eq!(spec.name, "workloads");
        assert_eq!(spec.driver, Driver::Macvlan);
        assert_eq!(spec.parent_interface.as_deref(), Some("eth0"));
        assert!(spec.internal);
        assert!(!spec.enable_icc);
        assert_eq!(spec.v4.gateway, Ipv4Addr::new(172, 20, 0, 1));
        assert_eq!(spec.v6.subnet.to_string(), "fd00:20::/64");
        assert_eq!(config.docker.startup_timeout, 15);
    }

    #[test]
    fn test_empty_interface_is_unset() {
        let toml = r#"
[docker.network]
driver = "overlay"
interface = ""
"#;
        let config: Configuration = toml::from_str(toml).unwrap();
        assert_eq!(config.docker.network.interface, None);
    }

    #[test]
    fn test_unknown_driver_is_kept() {
        let toml = r#"
[docker.network]
driver = "ipvlan"
"#;
        let config: Configuration = toml::from_str(toml).unwrap();
        assert_eq!(config.docker.network.driver, Driver::Other("ipvlan".into()));
    }

    #[test]
    fn test_invalid_subnet_rejected_at_parse() {
        let toml = r#"
[docker.network.interfaces.v4]
subnet = "not-a-subnet"
gateway = "172.20.0.1"
"#;
        assert!(toml::from_str::<Configuration>(toml).is_err());
    }

    #[test]
    fn test_gateway_outside_subnet_rejected() {
        let toml = r#"
[docker.network.interfaces.v4]
subnet = "172.20.0.0/16"
gateway = "10.0.0.1"
"#;
        let config: Configuration = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::ConfigValidation(_)));
    }

    #[test]
    fn test_macvlan_requires_parent() {
        let toml = r#"
[docker.network]
driver = "macvlan"
"#;
        let config: Configuration = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation(_))
        ));
    }

    #[test]
    fn test_macvlan_rejects_blank_parent() {
        let toml = r#"
[docker.network]
driver = "macvlan"
parent_interface = "  "
"#;
        let config: Configuration = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut config = Configuration::default();
        config.docker.network.name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = Configuration::default();
        config.docker.network.driver = Driver::Overlay;
        config.docker.network.interface = None;
        config.docker.network.ispn = true;

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("driver = \"overlay\""));
        assert!(text.contains("interface = \"\""));

        let parsed: Configuration = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("dockyard.toml")).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dockyard.toml");
        fs::write(&path, "[docker.network\nname = ").unwrap();
        assert!(matches!(load(&path), Err(Error::ConfigParse(_))));
    }
}
