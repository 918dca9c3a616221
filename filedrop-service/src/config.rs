//! Service configuration loading.

use anyhow::Context;
use filedrop_config::{ServiceConfig, load_config};

/// Loads and validates the service configuration.
///
/// Uses the hierarchical loading mechanism from [`filedrop_config`] and
/// validates the resulting [`ServiceConfig`] before returning it.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let config: ServiceConfig = load_config().context("loading service configuration")?;
    config.validate()?;

    Ok(config)
}
