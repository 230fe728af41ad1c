//! Unified error types for Dockyard

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Dockyard operations
#[derive(Error, Debug)]
pub enum Error {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // Runtime errors
    #[error("Could not create container runtime client: {0}")]
    ClientConstruction(String),

    #[error("Docker API error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("Network '{0}' not found")]
    NetworkNotFound(String),

    #[error("Failed to inspect network '{network}': {source}")]
    Inspection { network: String, source: Box<Error> },

    #[error("Failed to create network '{network}' (driver {driver}): {source}")]
    Creation {
        network: String,
        driver: String,
        source: Box<Error>,
    },

    #[error("Runtime call '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    // Logging errors
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
}

impl Error {
    /// Whether this error is the runtime's "network not found" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NetworkNotFound(_))
    }
}

/// Result type alias for Dockyard operations
pub type Result<T> = std::result::Result<T, Error>;

/// A Docker daemon error response, for test runtimes
#[cfg(test)]
pub fn daemon_error(status_code: u16, message: &str) -> Error {
    Error::Docker(bollard::errors::Error::DockerResponseServerError {
        status_code,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable() {
        assert!(Error::NetworkNotFound("dockyard_nw".into()).is_not_found());
        assert!(!daemon_error(500, "connection refused").is_not_found());
    }

    #[test]
    fn test_creation_message_names_network_and_driver() {
        let err = Error::Creation {
            network: "dockyard_nw".into(),
            driver: "bridge".into(),
            source: Box::new(daemon_error(403, "pool overlaps")),
        };
        let msg = err.to_string();
        assert!(msg.contains("dockyard_nw"));
        assert!(msg.contains("bridge"));
        assert!(msg.contains("pool overlaps"));
    }
}
