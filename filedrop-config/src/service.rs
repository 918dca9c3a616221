//! Service configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the filedrop service binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Identifier of the compute instance to stop when the service goes
    /// idle.
    pub instance_id: String,

    /// Queue the storage notifications arrive on.
    pub incoming_queue: String,

    /// Queue the shutdown request is sent to.
    pub outgoing_queue: String,

    /// How long to keep polling without receiving a message before the
    /// service requests its own shutdown.
    #[serde(with = "humantime_serde", default = "default_idle_shutdown")]
    pub idle_shutdown: Duration,

    /// How long one empty receive waits before the next poll.
    #[serde(with = "humantime_serde", default = "default_receive_wait")]
    pub receive_wait: Duration,

    /// Object store backing the staging and master files.
    pub store: StoreConfig,

    /// Extra file types consulted before the built-in list.
    #[serde(default)]
    pub file_types: Vec<FileTypeEntry>,
}

/// Object store profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store, for development and tests.
    Memory {
        /// Bucket name expected in incoming notifications.
        bucket: String,
    },
}

/// One configured file type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeEntry {
    /// Display label used in logs.
    pub process_name: String,

    /// Glob-style pattern matched against incoming object keys.
    pub incoming_pattern: String,

    /// Key of the master object this type maintains.
    pub master_key: String,

    /// Name of the primary-key column.
    pub primary_key: String,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub field_delimiter: char,

    /// Text qualifier.
    #[serde(default = "default_qualifier")]
    pub text_qualifier: char,
}

fn default_idle_shutdown() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_receive_wait() -> Duration {
    Duration::from_secs(20)
}

fn default_delimiter() -> char {
    ','
}

fn default_qualifier() -> char {
    '"'
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The instance identifier is required for the shutdown request.
    #[error("`instance_id` cannot be empty")]
    InstanceIdEmpty,

    /// The incoming queue name is required.
    #[error("`incoming_queue` cannot be empty")]
    IncomingQueueEmpty,

    /// The outgoing queue name is required.
    #[error("`outgoing_queue` cannot be empty")]
    OutgoingQueueEmpty,

    /// A zero idle timeout would stop the service before its first poll.
    #[error("`idle_shutdown` cannot be zero")]
    IdleShutdownZero,

    /// The memory store needs a bucket name to match notifications against.
    #[error("`store.bucket` cannot be empty")]
    StoreBucketEmpty,

    /// A configured file type is unusable.
    #[error("invalid file type entry `{entry}`: {reason}")]
    FileTypeEntry { entry: String, reason: String },
}

impl ServiceConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.instance_id.is_empty() {
            return Err(ValidationError::InstanceIdEmpty);
        }
        if self.incoming_queue.is_empty() {
            return Err(ValidationError::IncomingQueueEmpty);
        }
        if self.outgoing_queue.is_empty() {
            return Err(ValidationError::OutgoingQueueEmpty);
        }
        if self.idle_shutdown.is_zero() {
            return Err(ValidationError::IdleShutdownZero);
        }

        let StoreConfig::Memory { bucket } = &self.store;
        if bucket.is_empty() {
            return Err(ValidationError::StoreBucketEmpty);
        }

        for entry in &self.file_types {
            entry.validate()?;
        }

        Ok(())
    }
}

impl FileTypeEntry {
    /// Validates one file type entry.
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("process_name", &self.process_name),
            ("incoming_pattern", &self.incoming_pattern),
            ("master_key", &self.master_key),
            ("primary_key", &self.primary_key),
        ] {
            if value.is_empty() {
                return Err(ValidationError::FileTypeEntry {
                    entry: self.process_name.clone(),
                    reason: format!("`{field}` cannot be empty"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig {
            instance_id: "i-0000demo".to_string(),
            incoming_queue: "filedrop-incoming".to_string(),
            outgoing_queue: "filedrop-control".to_string(),
            idle_shutdown: Duration::from_secs(900),
            receive_wait: Duration::from_secs(20),
            store: StoreConfig::Memory {
                bucket: "filedrop-demo".to_string(),
            },
            file_types: Vec::new(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_queue_names_are_rejected() {
        let mut broken = config();
        broken.incoming_queue.clear();

        assert!(matches!(
            broken.validate(),
            Err(ValidationError::IncomingQueueEmpty)
        ));
    }

    #[test]
    fn zero_idle_shutdown_is_rejected() {
        let mut broken = config();
        broken.idle_shutdown = Duration::ZERO;

        assert!(matches!(
            broken.validate(),
            Err(ValidationError::IdleShutdownZero)
        ));
    }

    #[test]
    fn file_type_entries_are_validated() {
        let mut broken = config();
        broken.file_types.push(FileTypeEntry {
            process_name: "Broken".to_string(),
            incoming_pattern: String::new(),
            master_key: "mstr/broken.csv".to_string(),
            primary_key: "Id".to_string(),
            field_delimiter: ',',
            text_qualifier: '"',
        });

        assert!(matches!(
            broken.validate(),
            Err(ValidationError::FileTypeEntry { .. })
        ));
    }

    #[test]
    fn durations_deserialize_from_humantime_strings() {
        let parsed: ServiceConfig = serde_json::from_str(
            r#"{
                "instance_id": "i-0000demo",
                "incoming_queue": "filedrop-incoming",
                "outgoing_queue": "filedrop-control",
                "idle_shutdown": "15m",
                "receive_wait": "20s",
                "store": { "kind": "memory", "bucket": "filedrop-demo" }
            }"#,
        )
        .expect("well-formed config");

        assert_eq!(parsed.idle_shutdown, Duration::from_secs(900));
        assert_eq!(parsed.receive_wait, Duration::from_secs(20));
        assert!(parsed.file_types.is_empty());
    }
}
