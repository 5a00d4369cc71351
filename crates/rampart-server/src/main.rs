//! Rampart server binary.

use anyhow::Context;
use clap::Parser;
use rampart_map::MapDocument;
use rampart_server::{Server, ServerConfig};
use rampart_sim::SimConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Authoritative tick-driven server for Rampart matches.
#[derive(Debug, Parser)]
#[command(name = "rampart-server", version, about)]
struct Args {
    /// Address to bind the datagram socket to.
    #[arg(long, default_value = "0.0.0.0:47900")]
    bind: SocketAddr,

    /// Path to the map document.
    #[arg(long)]
    map: PathBuf,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 20)]
    tick_rate: u32,

    /// Maximum concurrently connected clients.
    #[arg(long, default_value_t = 8)]
    max_clients: usize,

    /// Seed for spawn-placement jitter.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let map = MapDocument::load(&args.map)
        .with_context(|| format!("loading map document {}", args.map.display()))?
        .into_map()
        .context("validating map document")?;
    log::info!(
        "loaded map '{}' ({}x{} tiles)",
        map.name(),
        map.width(),
        map.height()
    );

    let sim = SimConfig {
        tick_rate_hz: args.tick_rate,
        max_clients: args.max_clients,
        seed: args.seed,
        ..SimConfig::default()
    };
    let net = ServerConfig {
        bind_addr: args.bind,
        ..ServerConfig::default()
    };

    let _server = Server::start(map, sim, net).context("starting server")?;

    // The ingress and tick threads do all the work; park the main
    // thread until the process is signalled.
    loop {
        std::thread::park();
    }
}
