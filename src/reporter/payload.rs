//! Wire payload for collector reports
//!
//! Report rows are the stored log entries minus the local `id` column: ids
//! only number rows inside this agent's store and must not leak to the
//! collector. The top-level key names are fixed by the collector contract.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::DeliveryStatus;
use crate::store::{NotificationLogEntry, RequestLogEntry, UnreportedBatch};

/// Body of a `POST /report`, gzip-compressed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(rename = "monika_instance_id")]
    pub instance_id: String,
    pub config_version: String,
    pub data: ReportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub requests: Vec<RequestReportRow>,
    pub notifications: Vec<NotificationReportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestReportRow {
    /// Unix milliseconds
    pub created_at: i64,
    pub probe_id: String,
    pub probe_name: String,
    pub probe_url: String,
    pub status_code: u16,
    pub response_time_ms: Option<u64>,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationReportRow {
    /// Unix milliseconds
    pub created_at: i64,
    pub probe_id: String,
    pub alert_id: String,
    pub channel_id: String,
    pub channel_type: String,
    pub status: DeliveryStatus,
    pub message: String,
}

impl From<&RequestLogEntry> for RequestReportRow {
    fn from(entry: &RequestLogEntry) -> Self {
        Self {
            created_at: entry.created_at.timestamp_millis(),
            probe_id: entry.probe_id.clone(),
            probe_name: entry.probe_name.clone(),
            probe_url: entry.probe_url.clone(),
            status_code: entry.status_code,
            response_time_ms: entry.response_time_ms,
            error_message: entry.error_message.clone(),
        }
    }
}

impl From<&NotificationLogEntry> for NotificationReportRow {
    fn from(entry: &NotificationLogEntry) -> Self {
        Self {
            created_at: entry.created_at.timestamp_millis(),
            probe_id: entry.probe_id.clone(),
            alert_id: entry.alert_id.clone(),
            channel_id: entry.channel_id.clone(),
            channel_type: entry.channel_type.clone(),
            status: entry.status,
            message: entry.message.clone(),
        }
    }
}

impl ReportPayload {
    pub fn new(instance_id: &str, config_version: &str, batch: &UnreportedBatch) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            config_version: config_version.to_string(),
            data: ReportData {
                requests: batch.requests.iter().map(Into::into).collect(),
                notifications: batch.notifications.iter().map(Into::into).collect(),
            },
        }
    }

    /// Serialize to JSON and gzip-compress for transmission.
    pub fn to_gzip_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let json = serde_json::to_vec(self)?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        Ok(encoder.finish()?)
    }
}
