//! Filedrop service binary.
//!
//! Polls the notification queue for file drops and merges each one into its
//! master file, then requests its own instance stop once the queue has been
//! idle for the configured window.

use filedrop_config::ServiceConfig;
use filedrop_service::config::load_service_config;
use filedrop_service::core::start_service;
use filedrop_telemetry::metrics::init_metrics;
use filedrop_telemetry::tracing::init_tracing;
use tracing::error;

fn main() -> anyhow::Result<()> {
    let config = load_service_config()?;

    init_tracing(env!("CARGO_BIN_NAME"));

    // Metrics install their own listener; do this before the runtime starts.
    init_metrics(Some(&config.instance_id))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(config))
}

async fn async_main(config: ServiceConfig) -> anyhow::Result<()> {
    if let Err(err) = start_service(config).await {
        error!(%err, "service terminated with an error");
        return Err(err);
    }

    Ok(())
}
