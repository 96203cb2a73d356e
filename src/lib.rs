pub mod config;
pub mod fingerprint;
pub mod recorder;
pub mod reporter;
pub mod store;

use serde::{Deserialize, Serialize};

/// Status code recorded when a probe failed before any HTTP response was
/// obtained (DNS failure, refused connection, timeout).
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Outcome of a single probe execution, produced by the probe-scheduling
/// layer and handed to the [`recorder`](crate::recorder) as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub probe_id: String,
    pub probe_name: String,
    pub probe_url: String,
    /// Observed HTTP status, or [`TRANSPORT_FAILURE_STATUS`] when no
    /// response was obtained.
    pub status_code: u16,
    /// Latency in milliseconds; `None` if the probe failed before a
    /// response arrived.
    pub response_time_ms: Option<u64>,
    /// Empty on success.
    pub error_message: String,
}

/// Outcome of a single notification-delivery attempt, produced by the
/// notification-channel senders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub probe_id: String,
    pub alert_id: String,
    pub channel_id: String,
    pub channel_type: String,
    pub status: DeliveryStatus,
    pub message: String,
}

/// Whether a notification-delivery attempt succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Success,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Success => write!(f, "success"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

impl DeliveryStatus {
    /// Parse the TEXT column representation written by [`Display`].
    pub fn from_column(value: &str) -> Self {
        match value {
            "success" => DeliveryStatus::Success,
            _ => DeliveryStatus::Failed,
        }
    }
}
