//! Telemetry bootstrap for filedrop binaries and tests.

pub mod metrics;
pub mod tracing;
