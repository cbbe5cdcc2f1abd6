//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, store, server)
//! - Bind the listener last, so traffic only arrives once the store is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Config is validated and logging installed by the caller beforehand

use std::sync::Arc;

use axum::http::header::InvalidHeaderName;
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::flags::{SqliteFlagStore, StoreError};
use crate::http::HttpServer;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("flag store: {0}")]
    Store(#[from] StoreError),

    #[error("client IP header: {0}")]
    ClientIpHeader(#[from] InvalidHeaderName),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// A server ready to run, with its bound listener.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Bring every subsystem up for `config`.
pub async fn start(config: ServiceConfig) -> Result<Started, StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let store = SqliteFlagStore::connect(&config.database).await?;
    if config.database.bootstrap_schema {
        store.bootstrap_schema().await?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        request_timeout_secs = config.timeouts.request_secs,
        client_ip_header = %config.client_ip.header,
        "Listening for connections"
    );

    let server = HttpServer::new(config, Arc::new(store))?;
    Ok(Started { server, listener })
}
