use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use nzbget_exporter::{
    api::{ApiClient, NzbgetApi},
    collector::Collector,
    config::ExporterConfig,
    logging,
    metrics::{Exporter, MetricRegistry},
    server,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ExporterConfig::parse();
    logging::init_logging(&config.log_level)?;

    info!("Starting nzbget-exporter v{}", env!("CARGO_PKG_VERSION"));

    let client = ApiClient::new(&config.upstream())?;
    match client.version().await {
        Ok(version) => info!(host = %config.host, version = %version, "Connected to NZBGet"),
        Err(e) => warn!(host = %config.host, error = %e, "Could not fetch NZBGet version"),
    }

    let registry = Arc::new(MetricRegistry::new(config.namespace.clone()));
    let exporter = Exporter::new(registry, Collector::new(Arc::new(client)));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;

    server::serve(listener, exporter, server::shutdown_signal()).await?;

    Ok(())
}
