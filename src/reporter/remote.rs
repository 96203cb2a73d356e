//! Collector handshake and single-shot report cycle

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::store::{LogKind, LogStore};

use super::payload::ReportPayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Startup handshake failure. Surfaced to the caller, never retried here -
/// the surrounding system decides between abort and degraded operation.
#[derive(Debug)]
pub enum HandshakeError {
    /// Transport-level failure (DNS, refused connection, timeout)
    Unreachable(String),

    /// The collector answered with a non-2xx status
    Rejected { status: u16, message: String },
}

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeError::Unreachable(msg) => write!(f, "collector unreachable: {}", msg),
            HandshakeError::Rejected { status, message } => {
                write!(f, "collector rejected handshake (status {}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for HandshakeError {}

/// Result of one report cycle.
///
/// Upload failure is an expected, routinely-occurring condition (the
/// collector may be down for days), so it is an outcome value rather than
/// an error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing unreported; no network call was made
    NoOp,

    /// The collector acknowledged the batch and the rows were marked
    Uploaded { requests: usize, notifications: usize },

    /// Transport or collector failure; rows remain unreported and are
    /// re-included in the next cycle
    Failed(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandshakePayload {
    instance_id: String,
    hostname: String,
}

/// Uploads unreported history to the central collector.
pub struct SymonReporter {
    /// HTTP client (reused across requests for efficiency)
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    instance_id: String,
    config_version: String,
    store: Arc<dyn LogStore>,
}

impl SymonReporter {
    pub fn new(
        base_url: &str,
        api_key: &str,
        instance_id: &str,
        config_version: &str,
        store: Arc<dyn LogStore>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            instance_id: instance_id.to_string(),
            config_version: config_version.to_string(),
            store,
        }
    }

    /// One-time identity exchange with the collector at process start.
    ///
    /// Does not touch the log store.
    #[instrument(skip(self), fields(instance_id = %self.instance_id))]
    pub async fn handshake(&self) -> Result<(), HandshakeError> {
        let payload = HandshakePayload {
            instance_id: self.instance_id.clone(),
            hostname: sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string()),
        };

        let response = self
            .client
            .post(format!("{}/handshake", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HandshakeError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HandshakeError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        info!("handshake with collector accepted");
        Ok(())
    }

    /// One report cycle: read the unreported batch, upload it, and mark the
    /// uploaded rows on a confirmed 2xx.
    ///
    /// The read -> upload -> mark sequence is strictly ordered; rows
    /// inserted while the upload is in flight are picked up by the next
    /// cycle. There is no retry inside a cycle.
    #[instrument(skip(self))]
    pub async fn report_once(&self) -> ReportOutcome {
        let batch = match self.store.list_unreported().await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("failed to read unreported batch: {}", e);
                return ReportOutcome::Failed(e.to_string());
            }
        };

        if batch.is_empty() {
            debug!("no unreported rows, skipping upload");
            return ReportOutcome::NoOp;
        }

        let payload = ReportPayload::new(&self.instance_id, &self.config_version, &batch);
        let body = match payload.to_gzip_bytes() {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to encode report payload: {}", e);
                return ReportOutcome::Failed(e.to_string());
            }
        };

        let response = match self
            .client
            .post(format!("{}/report", self.base_url))
            .header("x-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::CONTENT_ENCODING, "gzip")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Can't report history to Symon: {}", e);
                return ReportOutcome::Failed(e.to_string());
            }
        };

        if !response.status().is_success() {
            let reason = format!("collector responded with status {}", response.status());
            warn!("Can't report history to Symon: {}", reason);
            return ReportOutcome::Failed(reason);
        }

        // The collector has accepted the batch; marking failures from here
        // on cannot roll that back, so each table is marked independently
        // and a failure on one never blocks the other.
        let request_ids = batch.request_ids();
        let notification_ids = batch.notification_ids();

        if let Err(e) = self.store.mark_reported(LogKind::Request, &request_ids).await {
            warn!("failed to mark request rows reported: {}", e);
        }

        if let Err(e) = self
            .store
            .mark_reported(LogKind::Notification, &notification_ids)
            .await
        {
            warn!("failed to mark notification rows reported: {}", e);
        }

        info!(
            "reported {} requests and {} notifications to collector",
            request_ids.len(),
            notification_ids.len()
        );

        ReportOutcome::Uploaded {
            requests: request_ids.len(),
            notifications: notification_ids.len(),
        }
    }
}
