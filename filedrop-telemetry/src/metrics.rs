//! Metrics initialization.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Port the Prometheus scrape endpoint listens on.
const METRICS_PORT: u16 = 9000;

/// Initializes metrics with an automatic HTTP server on port 9000.
///
/// Installs a global metrics recorder and starts an HTTP server listening on
/// `[::]:9000/metrics` for Prometheus scraping. Call this once at startup,
/// before the async runtime is built; later calls fail because the global
/// recorder is already installed.
pub fn init_metrics(instance_id: Option<&str>) -> Result<(), BuildError> {
    let mut builder = PrometheusBuilder::new().with_http_listener(SocketAddr::new(
        IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        METRICS_PORT,
    ));

    if let Some(instance_id) = instance_id {
        builder = builder.add_global_label("instance", instance_id);
    }

    builder.install()?;

    Ok(())
}
