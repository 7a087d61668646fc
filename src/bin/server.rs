//! FlatKV Server Binary
//!
//! Opens the backing file and starts the TCP server.

use std::sync::Arc;

use clap::Parser;
use flatkv::network::Server;
use flatkv::{Config, Database, Engine, MemoryDatabase, SyncStrategy};
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// FlatKV Server
#[derive(Parser, Debug)]
#[command(name = "flatkv-server")]
#[command(about = "Key-value store backed by a single flat file")]
#[command(version)]
struct Args {
    /// Backing file path
    #[arg(short, long, default_value = "./data")]
    data_file: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    listen: String,

    /// Number of connection worker threads
    #[arg(short, long, default_value = "64")]
    max_connections: usize,

    /// fsync the backing file after every write
    #[arg(long)]
    sync: bool,

    /// Serve from memory only; nothing is written to disk
    #[arg(long)]
    in_memory: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("FlatKV Server v{}", flatkv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OsBuffered
    };

    let config = Config::builder()
        .data_file(&args.data_file)
        .sync_strategy(sync_strategy)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    if args.in_memory {
        tracing::info!("Serving from memory");
        serve(config, MemoryDatabase::new());
    } else {
        tracing::info!("Data file: {}", args.data_file);
        let engine = match Engine::open(config.clone()) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!("Failed to open engine: {}", e);
                std::process::exit(1);
            }
        };
        serve(config, engine);
    }
}

fn serve<D: Database + Send + 'static>(config: Config, db: D) {
    let mut server = Server::new(config, Arc::new(Mutex::new(db)));
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
