//! End-to-end tests for the record -> report -> mark pipeline
//!
//! These tests verify that:
//! - Recorded rows flow into the upload batch and are marked on a 2xx ack
//! - A failing collector leaves rows untouched for the next cycle
//! - Empty batches never hit the network
//! - The scheduled reporter drains a backlog

use std::sync::Arc;
use std::time::Duration;

use synthmon::DeliveryStatus;
use synthmon::recorder::Recorder;
use synthmon::reporter::{ReportOutcome, ReporterHandle, SymonReporter};
use synthmon::store::LogStore;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{
    create_failed_probe_result, create_notification_result, create_probe_result, open_temp_store,
};

fn build_reporter(collector_url: &str, store: Arc<synthmon::store::sqlite::SqliteStore>) -> SymonReporter {
    SymonReporter::new(collector_url, "test-key", "agent-1", "config-v1", store)
}

#[tokio::test]
async fn test_recorded_request_is_reported_and_marked() {
    let collector = crate::helpers::start_collector(200).await;

    let (_guard, store) = open_temp_store().await;
    let recorder = Recorder::new(store.clone());

    recorder.record_request(&create_probe_result("1", 200)).await;

    let reporter = build_reporter(&collector.uri(), store.clone());
    let outcome = reporter.report_once().await;

    assert_eq!(
        outcome,
        ReportOutcome::Uploaded {
            requests: 1,
            notifications: 0
        }
    );

    // Unreported set is drained, audit listing keeps the row
    assert!(store.list_unreported().await.unwrap().is_empty());
    let all = store.list_all_request_logs().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].probe_id, "1");
    assert_eq!(all[0].status_code, 200);
    assert_eq!(all[0].response_time_ms, Some(120));
    assert_eq!(all[0].error_message, "");
    assert!(all[0].reported);
}

#[tokio::test]
async fn test_failing_collector_keeps_rows_for_next_cycle() {
    let collector = crate::helpers::start_collector(500).await;

    let (_guard, store) = open_temp_store().await;
    let recorder = Recorder::new(store.clone());

    recorder
        .record_notification(&create_notification_result("1", DeliveryStatus::Failed))
        .await;

    let reporter = build_reporter(&collector.uri(), store.clone());

    let outcome = reporter.report_once().await;
    assert!(matches!(outcome, ReportOutcome::Failed(_)));

    // Row unchanged, still pending
    let batch = store.list_unreported().await.unwrap();
    assert_eq!(batch.notifications.len(), 1);
    assert_eq!(batch.notifications[0].status, DeliveryStatus::Failed);
    assert_eq!(batch.notifications[0].message, "smtp connect error");

    // Collector recovers: the same row is re-sent and marked
    let recovered = crate::helpers::start_collector(200).await;
    let reporter = build_reporter(&recovered.uri(), store.clone());
    let outcome = reporter.report_once().await;
    assert_eq!(
        outcome,
        ReportOutcome::Uploaded {
            requests: 0,
            notifications: 1
        }
    );
    assert!(store.list_unreported().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_batch_is_noop_without_network_call() {
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&collector)
        .await;

    let (_guard, store) = open_temp_store().await;
    let reporter = build_reporter(&collector.uri(), store);

    assert_eq!(reporter.report_once().await, ReportOutcome::NoOp);
}

#[tokio::test]
async fn test_mixed_batch_uploads_both_tables() {
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report"))
        .and(header("x-api-key", "test-key"))
        .and(header("content-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&collector)
        .await;

    let (_guard, store) = open_temp_store().await;
    let recorder = Recorder::new(store.clone());

    recorder.record_request(&create_probe_result("1", 200)).await;
    recorder.record_request(&create_failed_probe_result("2")).await;
    recorder
        .record_notification(&create_notification_result("2", DeliveryStatus::Success))
        .await;

    let reporter = build_reporter(&collector.uri(), store.clone());
    let outcome = reporter.report_once().await;

    assert_eq!(
        outcome,
        ReportOutcome::Uploaded {
            requests: 2,
            notifications: 1
        }
    );
    assert!(store.list_unreported().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scheduled_reporter_drains_backlog() {
    let collector = crate::helpers::start_collector(200).await;

    let (_guard, store) = open_temp_store().await;
    let recorder = Recorder::new(store.clone());

    for i in 0..5 {
        recorder
            .record_request(&create_probe_result(&i.to_string(), 200))
            .await;
    }

    let reporter = build_reporter(&collector.uri(), store.clone());
    let handle = ReporterHandle::spawn(reporter, Duration::from_secs(3600));

    // The startup cycle may already have drained the backlog; ReportNow
    // settles the race either way
    let outcome = handle.report_now().await.unwrap();
    assert!(matches!(
        outcome,
        ReportOutcome::NoOp | ReportOutcome::Uploaded { .. }
    ));

    assert!(store.list_unreported().await.unwrap().is_empty());
    assert_eq!(store.list_all_request_logs().await.unwrap().len(), 5);

    handle.shutdown().await;
}
