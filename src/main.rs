//! Flag Service
//!
//! Records and serves "flag" submissions: ordered lists of colors, each
//! stored with a generated id, the submitter's IP and a timestamp.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http::server (CORS, request id, trace)     │
//!                          │        │                                     │
//!                          │        ▼                                     │
//!                          │   routing (method + normalized path)         │
//!                          │        │                                     │
//!                          │        ▼                                     │
//!                          │   http::handlers ──▶ flags::store ───────────┼──▶ SQLite
//!     Client Response      │        │            (Flags, Colors)          │    (Flags, Colors)
//!     ◀────────────────────┼────────┘                                     │
//!                          │                                              │
//!                          │   config · observability · lifecycle         │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use flag_service::config::{check_config, read_config, ServiceConfig};
use flag_service::lifecycle::{self, signals, Shutdown};
use flag_service::observability::logging;

#[derive(Parser)]
#[command(name = "flag-service")]
#[command(about = "HTTP endpoint that records and lists color flag submissions", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `database.url`.
    #[arg(long)]
    database_url: Option<String>,

    /// Create the Flags and Colors tables if they are missing.
    #[arg(long)]
    bootstrap_schema: bool,
}

impl Cli {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if self.bootstrap_schema {
            config.database.bootstrap_schema = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };
    cli.apply(&mut config);
    check_config(&config)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("flag-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_url = %config.database.url,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let started = lifecycle::start(config).await?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::forward_signals(shutdown.clone());

    started.server.run(started.listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
