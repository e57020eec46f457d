// crates/lino-daemon/src/main.rs
//
// Binary entrypoint for the Lino ledger daemon.
//
// Initializes tracing, parses CLI arguments, loads configuration, opens the
// RocksDB ledger (or an in-memory one), applies genesis on first start, and
// replays the block log, logging the app hash after every block.

mod config;
mod replay;

use clap::Parser;
use config::DaemonConfig;

use lino_app::{Genesis, LinoApp};
use lino_core::KvStore;
use lino_store::{MemoryStore, RocksStore};

/// Lino ledger daemon: replays a block log against the ledger state.
#[derive(Parser, Debug)]
#[command(name = "lino-daemon", version = "0.1.0", about = "Lino ledger replay daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "./lino.toml")]
    config: String,

    /// Override the data directory from the config file.
    #[arg(long)]
    data_dir: Option<String>,

    /// Override the genesis path from the config file.
    #[arg(long)]
    genesis: Option<String>,

    /// Override the block log path from the config file.
    #[arg(long)]
    blocks: Option<String>,

    /// Override the log level from the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Replay into a throwaway in-memory store instead of RocksDB.
    #[arg(long)]
    in_memory: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level can seed the
    // filter; the load outcome is logged once the subscriber is up.
    let loaded = DaemonConfig::load(&args.config);
    let mut daemon_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    // CLI flags override the config file values.
    if let Some(data_dir) = args.data_dir.clone() {
        daemon_config.data_dir = data_dir;
    }
    if let Some(genesis) = args.genesis.clone() {
        daemon_config.genesis_path = genesis;
    }
    if let Some(blocks) = args.blocks.clone() {
        daemon_config.block_log_path = blocks;
    }
    if let Some(level) = args.log_level.clone() {
        daemon_config.log_level = level;
    }

    // Initialize tracing subscriber for structured logging. RUST_LOG wins
    // over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", args.config),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            args.config,
            e
        ),
    }

    if args.in_memory {
        tracing::info!("Using in-memory ledger");
        let app = LinoApp::new(MemoryStore::new(), daemon_config.params.clone());
        run(app, &daemon_config)
    } else {
        let store = RocksStore::open(&daemon_config.data_dir)?.with_sync_writes(daemon_config.sync_writes);
        tracing::info!("Opened ledger at {}", daemon_config.data_dir);
        let app = LinoApp::open(store, daemon_config.params.clone())?;
        run(app, &daemon_config)
    }
}

fn run<S: KvStore>(mut app: LinoApp<S>, config: &DaemonConfig) -> Result<(), Box<dyn std::error::Error>> {
    if app.has_genesis()? {
        tracing::info!("Resuming after block {}", app.last_block().height);
    } else {
        let genesis = Genesis::load(&config.genesis_path)?;
        app.init_genesis(&genesis)?;
        tracing::info!("Genesis applied, app hash {}", app.state_hash()?);
    }

    let blocks = replay::load_block_log(&config.block_log_path)?;
    tracing::info!("Replaying {} blocks from {}", blocks.len(), config.block_log_path);
    let summary = replay::replay(&mut app, &blocks)?;

    tracing::info!(
        "Replay complete: {} blocks applied, {} skipped, {} msgs committed, {} rejected, app hash {}",
        summary.blocks,
        summary.skipped_blocks,
        summary.committed,
        summary.rejected,
        summary.state_hash
    );
    println!("{}", summary.state_hash);
    Ok(())
}
