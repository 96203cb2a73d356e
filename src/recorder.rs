//! Best-effort log writer for probe and notification outcomes
//!
//! The recorder sits between the probe/notification layers and the log
//! store. Each call performs exactly one insert and swallows store
//! failures: telemetry loss must never abort probe execution or
//! notification delivery, so a failed write is worth a warning line and
//! nothing more.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::store::LogStore;
use crate::{NotificationResult, ProbeResult};

/// Appends one row per event to the shared log store.
#[derive(Clone)]
pub struct Recorder {
    store: Arc<dyn LogStore>,
}

impl Recorder {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Record a completed probe execution. Never fails.
    pub async fn record_request(&self, result: &ProbeResult) {
        match self.store.insert_request_log(result).await {
            Ok(id) => trace!("recorded probe result for {} as row {}", result.probe_id, id),
            Err(e) => warn!("failed to record probe result: {}", e),
        }
    }

    /// Record a notification-delivery attempt. Never fails.
    pub async fn record_notification(&self, result: &NotificationResult) {
        match self.store.insert_notification_log(result).await {
            Ok(id) => trace!(
                "recorded notification delivery for {} as row {}",
                result.probe_id, id
            ),
            Err(e) => warn!("failed to record notification delivery: {}", e),
        }
    }
}
