//! Command-line interface for Dockyard
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Dockyard - container host network provisioning
#[derive(Parser)]
#[command(name = "dockyard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "dockyard.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the startup sequence: reconcile the runtime network and persist the result
    Up {
        /// Do not write observed network facts back to the config file
        #[arg(long)]
        no_persist: bool,
    },

    /// Validate configuration
    Check,

    /// Network management
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Network subcommands
#[derive(Subcommand)]
pub enum NetworkAction {
    /// Show the driver options that would be submitted on create
    Options {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Query the runtime for the configured network
    Inspect,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "dockyard", &mut std::io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_up() {
        let cli = Cli::try_parse_from(["dockyard", "-c", "/etc/dockyard.toml", "up"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/dockyard.toml"));
        assert!(matches!(cli.command, Commands::Up { no_persist: false }));
    }

    #[test]
    fn test_parse_network_options_json() {
        let cli = Cli::try_parse_from(["dockyard", "network", "options", "--json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("dockyard.toml"));
        assert!(matches!(
            cli.command,
            Commands::Network {
                action: NetworkAction::Options { json: true }
            }
        ));
    }
}
