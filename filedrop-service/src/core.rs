//! The service poll loop.

use std::time::Instant;

use filedrop::merge::{MergeEngine, MergeOutcome};
use filedrop::registry::{FileTypeProvider, FileTypeRegistry, StaticFileTypeProvider};
use filedrop::store::{MemoryObjectStore, ObjectStore};
use filedrop::types::FileType;
use filedrop_config::{ServiceConfig, StoreConfig};
use metrics::{counter, histogram};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};

use crate::notification::object_from_notification;
use crate::queue::{MemoryQueue, NotificationQueue, QueueMessage, ShutdownMessage};

/// Builds the configured store and queue and runs the service to completion.
pub async fn start_service(config: ServiceConfig) -> anyhow::Result<()> {
    config.validate()?;

    let registry = build_registry(&config);

    match &config.store {
        StoreConfig::Memory { bucket } => {
            info!(bucket = %bucket, "using in-process store and queue");
            let engine = MergeEngine::new(MemoryObjectStore::new());
            let queue = MemoryQueue::new();
            run_service(&config, &registry, &engine, &queue).await
        }
    }
}

/// Builds the registry: configured entries first, then the built-in list.
fn build_registry(config: &ServiceConfig) -> FileTypeRegistry<StaticFileTypeProvider> {
    let mut types: Vec<FileType> = config
        .file_types
        .iter()
        .map(|entry| {
            FileType::new(
                &entry.process_name,
                &entry.incoming_pattern,
                &entry.master_key,
                &entry.primary_key,
                entry.field_delimiter,
                entry.text_qualifier,
            )
        })
        .collect();
    types.extend(StaticFileTypeProvider::default().known_types());

    FileTypeRegistry::new(StaticFileTypeProvider::new(types))
}

/// Runs the poll loop until the idle timeout elapses or a shutdown signal
/// arrives.
///
/// Messages are processed strictly one at a time: a merge runs to completion
/// before the next message is considered. Every processed message is deleted,
/// whether its merge succeeded or not; a dead-letter queue for the failures
/// is future work.
pub async fn run_service<S, Q>(
    config: &ServiceConfig,
    registry: &FileTypeRegistry<StaticFileTypeProvider>,
    engine: &MergeEngine<S>,
    queue: &Q,
) -> anyhow::Result<()>
where
    S: ObjectStore,
    Q: NotificationQueue,
{
    info!(
        incoming_queue = %config.incoming_queue,
        outgoing_queue = %config.outgoing_queue,
        instance_id = %config.instance_id,
        idle_shutdown_secs = config.idle_shutdown.as_secs(),
        "service started"
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut last_message = Instant::now();

    loop {
        let batch = tokio::select! {
            batch = queue.receive() => batch?,
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        };

        if batch.is_empty() {
            if last_message.elapsed() >= config.idle_shutdown {
                info!(
                    instance_id = %config.instance_id,
                    "idle timeout reached, requesting instance stop"
                );
                queue
                    .send_shutdown(ShutdownMessage::stop(&config.instance_id))
                    .await?;
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(config.receive_wait) => {}
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down");
                    break;
                }
                _ = sigint.recv() => {
                    info!("received SIGINT, shutting down");
                    break;
                }
            }
            continue;
        }

        last_message = Instant::now();

        for message in batch {
            process_message(registry, engine, &message).await;
            queue.delete(&message).await?;
        }
    }

    info!("service stopped");
    Ok(())
}

/// Parses, resolves, and merges a single notification.
async fn process_message<S: ObjectStore>(
    registry: &FileTypeRegistry<StaticFileTypeProvider>,
    engine: &MergeEngine<S>,
    message: &QueueMessage,
) {
    let start = Instant::now();

    let Some(object) = object_from_notification(&message.body) else {
        warn!(receipt = %message.receipt, "invalid message format received");
        counter!("filedrop.messages.invalid").increment(1);
        return;
    };

    info!(address = %object.address(), "processing file drop");

    let Some(file_type) = registry.resolve(object.key()) else {
        warn!(address = %object.address(), "no file type for object key");
        counter!("filedrop.messages.unresolved").increment(1);
        return;
    };

    let outcome = engine.merge(&object, &file_type).await;
    counter!("filedrop.merges.total", "status" => outcome.status()).increment(1);
    histogram!("filedrop.merge.duration_seconds").record(start.elapsed().as_secs_f64());

    match &outcome {
        MergeOutcome::Completed(report) => {
            info!(
                master_file = %report.master_file,
                updated_rows = report.updated_rows,
                new_records = report.new_records,
                status = outcome.status(),
                "merge result"
            );
        }
        other => {
            error!(
                address = %object.address(),
                status = other.status(),
                "merge result"
            );
        }
    }
}
