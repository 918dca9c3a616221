//! Queue-driven file drop processing.
//!
//! Wires the [`filedrop`] merge engine to a notification queue: each queue
//! message names an object that landed in storage, and the service resolves
//! its file type and merges it into the matching master file. When no
//! message arrives within the configured idle window, the service asks for
//! its own instance to be stopped and exits.

pub mod config;
pub mod core;
pub mod notification;
pub mod queue;
