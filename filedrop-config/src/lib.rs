//! Configuration loading and the service configuration surface.
//!
//! Configuration is assembled hierarchically: `configuration/base.*` first,
//! then an environment-specific overlay, then `APP_`-prefixed environment
//! variables. See [`load::load_config`].

pub mod environment;
pub mod load;
pub mod service;

pub use environment::Environment;
pub use load::{LoadConfigError, load_config};
pub use service::{FileTypeEntry, ServiceConfig, StoreConfig, ValidationError};
