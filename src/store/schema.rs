//! Table schema and typed row definitions
//!
//! Both log tables share the same lifecycle contract: a store-assigned
//! autoincrement `id` (never reused within a store generation), a
//! store-assigned `created_at` timestamp, the payload columns copied from
//! the triggering event, and a `reported` flag that defaults to false and
//! transitions to true exactly once.
//!
//! The DDL lives here because two paths execute it: `SqliteStore::open`
//! (idempotent `CREATE TABLE IF NOT EXISTS`) and `flush` (drop and
//! recreate inside one transaction).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DeliveryStatus;

/// One row per probe execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    /// Store-assigned, locally unique, monotonically increasing; has no
    /// meaning outside this agent's store
    pub id: i64,

    /// When the row was created (store-assigned, always UTC)
    pub created_at: DateTime<Utc>,

    pub probe_id: String,
    pub probe_name: String,
    pub probe_url: String,

    /// Observed HTTP status, 0 on transport failure
    pub status_code: u16,

    /// Latency in milliseconds; `None` if the probe failed before a
    /// response was obtained
    pub response_time_ms: Option<u64>,

    /// Empty on success
    pub error_message: String,

    /// True once the remote reporter has uploaded this row
    pub reported: bool,
}

/// One row per notification-delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLogEntry {
    /// Same contract as [`RequestLogEntry::id`], independent numbering space
    pub id: i64,

    pub created_at: DateTime<Utc>,

    pub probe_id: String,
    pub alert_id: String,
    pub channel_id: String,
    pub channel_type: String,

    pub status: DeliveryStatus,

    /// Human-readable detail (e.g. delivery error)
    pub message: String,

    pub reported: bool,
}

/// Which log table an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Request,
    Notification,
}

impl LogKind {
    pub(crate) fn table(&self) -> &'static str {
        match self {
            LogKind::Request => "request_logs",
            LogKind::Notification => "notification_logs",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogKind::Request => write!(f, "request"),
            LogKind::Notification => write!(f, "notification"),
        }
    }
}

/// Snapshot of all rows still awaiting upload, across both tables
#[derive(Debug, Clone, Default)]
pub struct UnreportedBatch {
    pub requests: Vec<RequestLogEntry>,
    pub notifications: Vec<NotificationLogEntry>,
}

impl UnreportedBatch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.notifications.is_empty()
    }

    /// Ids per table, in the order the rows were read
    pub fn request_ids(&self) -> Vec<i64> {
        self.requests.iter().map(|entry| entry.id).collect()
    }

    pub fn notification_ids(&self) -> Vec<i64> {
        self.notifications.iter().map(|entry| entry.id).collect()
    }
}

/// Idempotent schema creation, executed on open and after a flush.
///
/// AUTOINCREMENT keeps ids from ever being reused while a table exists;
/// dropping the table (flush) is the only way the sequence restarts.
pub(crate) const CREATE_TABLES_SQL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS request_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at INTEGER NOT NULL,
        probe_id TEXT NOT NULL,
        probe_name TEXT NOT NULL,
        probe_url TEXT NOT NULL,
        status_code INTEGER NOT NULL,
        response_time_ms INTEGER,
        error_message TEXT NOT NULL DEFAULT '',
        reported INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_request_logs_reported ON request_logs (reported)",
    r#"
    CREATE TABLE IF NOT EXISTS notification_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at INTEGER NOT NULL,
        probe_id TEXT NOT NULL,
        alert_id TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        channel_type TEXT NOT NULL,
        status TEXT NOT NULL,
        message TEXT NOT NULL DEFAULT '',
        reported INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_notification_logs_reported ON notification_logs (reported)",
];

pub(crate) const DROP_TABLES_SQL: &[&str] = &[
    "DROP TABLE IF EXISTS request_logs",
    "DROP TABLE IF EXISTS notification_logs",
];
