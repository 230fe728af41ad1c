//! Dockyard - container host network provisioning
//!
//! Brings the container runtime's network in line with configuration at
//! daemon startup and records what the runtime reports for the rest of
//! the daemon.

mod cli;
mod error;
mod manifest;
mod network;
mod runtime;
mod store;
mod telemetry;

use cli::{Cli, Commands, NetworkAction};
use error::Result;
use network::{NetworkReconciler, build_options};
use runtime::{CallContext, ClientAccessor, DockerConnector, NetworkRuntime};
use store::ConfigStore;

use std::path::Path;
use std::sync::Arc;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        // Commands that don't require config
        Commands::Completion { shell } => {
            cli::Cli::generate_completion(shell);
            return Ok(());
        }

        Commands::Check => {
            let config = manifest::load_or_default(&cli.config)?;
            let spec = config.docker.network.desired();

            println!("Configuration is valid.");
            println!("  Network: {}", spec.name);
            println!("  Driver: {}", spec.driver);
            println!("  IPv4: {} (gateway {})", spec.v4.subnet, spec.v4.gateway);
            println!("  IPv6: {} (gateway {})", spec.v6.subnet, spec.v6.gateway);
            println!("  Internal: {}", spec.internal);
            println!("  Encrypted: {}", spec.encrypted());
            if let Some(parent) = &spec.parent_interface {
                println!("  Parent interface: {}", parent);
            }
        }

        Commands::Network { action } => match action {
            NetworkAction::Options { json } => {
                let config = manifest::load_or_default(&cli.config)?;
                let spec = config.docker.network.desired();
                let wire = build_options(&spec).to_wire();

                if json {
                    let json = serde_json::to_string_pretty(&wire)
                        .map_err(std::io::Error::from)?;
                    println!("{}", json);
                } else if wire.is_empty() {
                    println!("Driver '{}' takes no options.", spec.driver);
                } else {
                    let mut entries: Vec<_> = wire.into_iter().collect();
                    entries.sort();
                    for (key, value) in entries {
                        println!("{}={}", key, value);
                    }
                }
            }
            NetworkAction::Inspect => {
                telemetry::init(cli.verbose)?;
                let config = manifest::load_or_default(&cli.config)?;
                let name = config.docker.network.name.clone();
                let ctx = CallContext::with_timeout(config.docker.startup_timeout());
                let accessor = ClientAccessor::new(DockerConnector);

                let info = block_on(async {
                    let client = accessor.get_client().await?;
                    ctx.run("inspect_network", client.inspect_network(&name)).await
                })??;

                println!("Network: {}", info.name);
                if let Some(id) = &info.id {
                    println!("  ID: {}", id);
                }
                println!("  Driver: {}", info.driver);
                println!("  Scope: {}", info.scope.as_deref().unwrap_or("unknown"));
            }
        },

        Commands::Up { no_persist } => {
            telemetry::init(cli.verbose)?;
            up(&cli.config, no_persist)?;
        }
    }

    Ok(())
}

/// Daemon startup: reconcile the network before anything else runs
fn up(config_path: &Path, no_persist: bool) -> Result<()> {
    let store = Arc::new(ConfigStore::open(config_path)?);
    let config = store.snapshot();
    let spec = config.docker.network.desired();
    let ctx = CallContext::with_timeout(config.docker.startup_timeout());

    let accessor = Arc::new(ClientAccessor::new(DockerConnector));
    let reconciler = NetworkReconciler::new(accessor, Arc::clone(&store));

    let facts = block_on(reconciler.ensure_network(&ctx, &spec))??;

    if !no_persist {
        store.write_to_disk()?;
    }

    let nw = store.snapshot().docker.network;
    println!("Network '{}' ready (driver {}).", spec.name, facts.driver);
    match nw.interface {
        Some(addr) => println!("  Bind interface: {}", addr),
        None => println!("  Bind interface: none"),
    }
    println!("  Multi-host: {}", facts.multi_host);

    Ok(())
}

fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(fut))
}
