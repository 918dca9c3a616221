//! End-to-end service loop scenarios against the in-process queue and store.

use std::time::Duration;

use bytes::Bytes;
use filedrop::merge::MergeEngine;
use filedrop::registry::{FileTypeRegistry, StaticFileTypeProvider};
use filedrop::store::{MemoryObjectStore, ObjectStore};
use filedrop::types::ObjectRef;
use filedrop_config::{ServiceConfig, StoreConfig};
use filedrop_service::core::run_service;
use filedrop_service::queue::MemoryQueue;
use filedrop_telemetry::tracing::init_test_tracing;

const BUCKET: &str = "filedrop-demo";

fn test_config() -> ServiceConfig {
    ServiceConfig {
        instance_id: "i-0000test".to_string(),
        incoming_queue: "filedrop-incoming".to_string(),
        outgoing_queue: "filedrop-control".to_string(),
        idle_shutdown: Duration::from_millis(200),
        receive_wait: Duration::from_millis(20),
        store: StoreConfig::Memory {
            bucket: BUCKET.to_string(),
        },
        file_types: Vec::new(),
    }
}

fn notification(key: &str) -> String {
    format!(
        r#"{{"Records": [{{"s3": {{"bucket": {{"name": "{BUCKET}"}}, "object": {{"key": "{key}"}}}}}}]}}"#
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn drops_are_merged_and_messages_deleted() {
    init_test_tracing();

    let store = MemoryObjectStore::new();
    let staging = ObjectRef::new(BUCKET, "user/randomDataFile.csv");
    store
        .write(&staging, Bytes::from_static(b"Id,V\n1,a\n2,b\n"))
        .await
        .unwrap();

    let queue = MemoryQueue::new();
    queue.push(notification("user/randomDataFile.csv")).await;

    let config = test_config();
    let registry = FileTypeRegistry::new(StaticFileTypeProvider::default());
    let engine = MergeEngine::new(store.clone());

    run_service(&config, &registry, &engine, &queue)
        .await
        .expect("service must stop cleanly");

    let master = ObjectRef::new(BUCKET, "mstr/randomDataFile.csv");
    let written = store
        .read(&master)
        .await
        .unwrap()
        .expect("master must be written");
    assert_eq!(written, Bytes::from_static(b"Id,V\n1,a\n2,b\n"));

    assert_eq!(queue.deleted().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn idle_timeout_sends_the_stop_request() {
    init_test_tracing();

    let store = MemoryObjectStore::new();
    let queue = MemoryQueue::new();
    let config = test_config();
    let registry = FileTypeRegistry::new(StaticFileTypeProvider::default());
    let engine = MergeEngine::new(store);

    run_service(&config, &registry, &engine, &queue)
        .await
        .expect("service must stop cleanly");

    let shutdowns = queue.shutdowns().await;
    assert_eq!(shutdowns.len(), 1);
    assert_eq!(shutdowns[0].instance_id, "i-0000test");
    assert_eq!(shutdowns[0].action, "stop");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_messages_are_deleted_without_merging() {
    init_test_tracing();

    let store = MemoryObjectStore::new();
    let queue = MemoryQueue::new();
    queue.push("not json at all").await;

    let config = test_config();
    let registry = FileTypeRegistry::new(StaticFileTypeProvider::default());
    let engine = MergeEngine::new(store.clone());

    run_service(&config, &registry, &engine, &queue)
        .await
        .expect("service must stop cleanly");

    assert_eq!(queue.deleted().await.len(), 1);
    let master = ObjectRef::new(BUCKET, "mstr/randomDataFile.csv");
    assert!(!store.exists(&master).await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn synthesized_types_cover_unknown_incoming_keys() {
    init_test_tracing();

    let store = MemoryObjectStore::new();
    let staging = ObjectRef::new(BUCKET, "user/brand_new_feed.csv");
    store
        .write(&staging, Bytes::from_static(b"Id,V\n7,x\n"))
        .await
        .unwrap();

    let queue = MemoryQueue::new();
    queue.push(notification("user/brand_new_feed.csv")).await;

    let config = test_config();
    let registry = FileTypeRegistry::new(StaticFileTypeProvider::default());
    let engine = MergeEngine::new(store.clone());

    run_service(&config, &registry, &engine, &queue)
        .await
        .expect("service must stop cleanly");

    let master = ObjectRef::new(BUCKET, "mstr/brand_new_feed.csv");
    let written = store
        .read(&master)
        .await
        .unwrap()
        .expect("synthesized master must be written");
    assert_eq!(written, Bytes::from_static(b"Id,V\n7,x\n"));
}
