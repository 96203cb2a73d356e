//! Integration tests for store durability and lifecycle
//!
//! These tests verify that:
//! - Rows and reported flags survive close/reopen
//! - Opening an existing store is non-destructive
//! - Flush destroys all rows and restarts both id sequences
//! - The two tables keep independent id spaces

use synthmon::DeliveryStatus;
use synthmon::store::{LogKind, LogStore, sqlite::SqliteStore};

use crate::helpers::{create_notification_result, create_probe_result, open_temp_store};

#[tokio::test]
async fn test_rows_survive_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("history.db");

    {
        let store = SqliteStore::open(&db_path).await.unwrap();
        let id = store
            .insert_request_log(&create_probe_result("1", 200))
            .await
            .unwrap();
        store
            .insert_request_log(&create_probe_result("2", 503))
            .await
            .unwrap();
        store.mark_reported(LogKind::Request, &[id]).await.unwrap();
        store.close().await.unwrap();
    }

    // Reopen: reported flags are durable, pending rows are still pending
    let store = SqliteStore::open(&db_path).await.unwrap();

    let all = store.list_all_request_logs().await.unwrap();
    assert_eq!(all.len(), 2, "open must not destroy existing rows");
    assert!(all[0].reported);
    assert!(!all[1].reported);

    let batch = store.list_unreported().await.unwrap();
    assert_eq!(batch.requests.len(), 1);
    assert_eq!(batch.requests[0].probe_id, "2");
    assert_eq!(batch.requests[0].status_code, 503);
}

#[tokio::test]
async fn test_id_sequence_continues_across_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("history.db");

    {
        let store = SqliteStore::open(&db_path).await.unwrap();
        let id = store
            .insert_request_log(&create_probe_result("1", 200))
            .await
            .unwrap();
        assert_eq!(id, 1);
        store.close().await.unwrap();
    }

    let store = SqliteStore::open(&db_path).await.unwrap();
    let id = store
        .insert_request_log(&create_probe_result("2", 200))
        .await
        .unwrap();
    assert_eq!(id, 2, "ids must not be reused across reopen");
}

#[tokio::test]
async fn test_flush_then_fresh_sequences() {
    let (_guard, store) = open_temp_store().await;

    for i in 0..3 {
        store
            .insert_request_log(&create_probe_result(&i.to_string(), 200))
            .await
            .unwrap();
    }
    store
        .insert_notification_log(&create_notification_result("1", DeliveryStatus::Failed))
        .await
        .unwrap();

    store.flush().await.unwrap();

    assert!(store.list_all_request_logs().await.unwrap().is_empty());
    assert!(store.list_unreported().await.unwrap().is_empty());

    let request_id = store
        .insert_request_log(&create_probe_result("9", 200))
        .await
        .unwrap();
    let notification_id = store
        .insert_notification_log(&create_notification_result("9", DeliveryStatus::Success))
        .await
        .unwrap();

    assert_eq!(request_id, 1);
    assert_eq!(notification_id, 1);
}

#[tokio::test]
async fn test_independent_id_spaces() {
    let (_guard, store) = open_temp_store().await;

    let request_id = store
        .insert_request_log(&create_probe_result("1", 200))
        .await
        .unwrap();
    let notification_id = store
        .insert_notification_log(&create_notification_result("1", DeliveryStatus::Failed))
        .await
        .unwrap();

    assert_eq!(request_id, 1);
    assert_eq!(
        notification_id, 1,
        "notification ids start their own sequence"
    );

    // Marking in one table never touches the other
    store
        .mark_reported(LogKind::Request, &[request_id])
        .await
        .unwrap();

    let batch = store.list_unreported().await.unwrap();
    assert!(batch.requests.is_empty());
    assert_eq!(batch.notifications.len(), 1);
}
