//! Test helpers and fixtures for integration tests

use std::sync::Arc;

use synthmon::store::sqlite::SqliteStore;
use synthmon::{DeliveryStatus, NotificationResult, ProbeResult, TRANSPORT_FAILURE_STATUS};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a successful probe result with sensible defaults
pub fn create_probe_result(probe_id: &str, status_code: u16) -> ProbeResult {
    ProbeResult {
        probe_id: probe_id.to_string(),
        probe_name: format!("probe-{probe_id}"),
        probe_url: "https://example.com/health".to_string(),
        status_code,
        response_time_ms: Some(120),
        error_message: String::new(),
    }
}

/// Create a probe result for a probe that never got a response
pub fn create_failed_probe_result(probe_id: &str) -> ProbeResult {
    ProbeResult {
        probe_id: probe_id.to_string(),
        probe_name: format!("probe-{probe_id}"),
        probe_url: "https://example.com/health".to_string(),
        status_code: TRANSPORT_FAILURE_STATUS,
        response_time_ms: None,
        error_message: "connection timed out".to_string(),
    }
}

/// Create a notification-delivery result
pub fn create_notification_result(probe_id: &str, status: DeliveryStatus) -> NotificationResult {
    NotificationResult {
        probe_id: probe_id.to_string(),
        alert_id: "status-not-2xx".to_string(),
        channel_id: "ops-mail".to_string(),
        channel_type: "smtp".to_string(),
        status,
        message: match status {
            DeliveryStatus::Success => String::new(),
            DeliveryStatus::Failed => "smtp connect error".to_string(),
        },
    }
}

/// Open a store on a fresh temporary database file
pub async fn open_temp_store() -> (tempfile::TempDir, Arc<SqliteStore>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("history.db"))
        .await
        .unwrap();
    (temp_dir, Arc::new(store))
}

/// Start a mock collector answering `POST /report` with the given status
pub async fn start_collector(report_status: u16) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report"))
        .respond_with(
            ResponseTemplate::new(report_status)
                .set_body_json(serde_json::json!({"result": "ok", "message": ""})),
        )
        .mount(&mock_server)
        .await;
    mock_server
}
