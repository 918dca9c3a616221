//! Storage-event notification parsing.

use filedrop::types::ObjectRef;
use serde::Deserialize;
use tracing::warn;

/// Envelope of a storage event notification.
///
/// Only the fields the service consumes are modeled; producers attach many
/// more, which deserialization ignores.
#[derive(Debug, Deserialize)]
struct StorageEvent {
    #[serde(rename = "Records", default)]
    records: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    s3: StorageEntity,
}

#[derive(Debug, Deserialize)]
struct StorageEntity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Extracts the object reference from a raw notification body.
///
/// Returns [`None`] when the body is not valid JSON or does not carry the
/// expected record shape; a bad message is a loggable event, not a fault.
pub fn object_from_notification(body: &str) -> Option<ObjectRef> {
    let event: StorageEvent = match serde_json::from_str(body) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "unparseable notification body");
            return None;
        }
    };

    let record = event.records.into_iter().next()?;
    Some(ObjectRef::new(record.s3.bucket.name, record.s3.object.key))
}
